//! Command handlers
//!
//! Each handler returns the text to print so it can be tested without a terminal.

pub mod attestation;
pub mod config;
pub mod identifiers;

use std::path::Path;

use anyhow::Result;

use crate::commands::Commands;

pub use attestation::{handle_payload, handle_recover, handle_sign};
pub use config::{handle_config, resolve_config};
pub use identifiers::{handle_asset_id, handle_submission_id};

/// Run one command against the configuration at `config_path`
pub fn dispatch(command: &Commands, config_path: &Path) -> Result<String> {
    match command {
        Commands::AssetId { chain, token } => Ok(handle_asset_id(*chain, token)),
        Commands::SubmissionId {
            asset,
            amount,
            receiver,
            nonce,
        } => Ok(handle_submission_id(asset, *amount, receiver, *nonce)),
        Commands::Payload(args) => handle_payload(args),
        Commands::Sign {
            attestation,
            secret,
        } => handle_sign(attestation, secret),
        Commands::Recover {
            attestation,
            signature,
        } => handle_recover(attestation, signature),
        Commands::Config => handle_config(config_path),
    }
}
