//! Command definitions

use clap::Subcommand;

use qbridge_core::{Address, AssetId, AttestationKind, SubmissionId};

/// `qbridge` subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Derive an asset identifier from its native chain and token
    AssetId {
        /// Native chain of the asset
        #[arg(long)]
        chain: u64,
        /// Token reference on the native chain (zero address for the native currency)
        #[arg(long)]
        token: Address,
    },

    /// Derive the submission identifier of one transfer
    SubmissionId {
        /// Asset identifier
        #[arg(long)]
        asset: AssetId,
        /// Amount after fees, as emitted by send or burn
        #[arg(long)]
        amount: u128,
        /// Receiver on the destination chain
        #[arg(long)]
        receiver: Address,
        /// Transfer nonce
        #[arg(long)]
        nonce: u64,
    },

    /// Print the payload an attestor signs for a submission
    Payload(AttestationArgs),

    /// Sign an attestation with an attestor secret key
    Sign {
        #[command(flatten)]
        attestation: AttestationArgs,
        /// Hex-encoded secp256k1 secret key
        #[arg(long, env = "QBRIDGE_ATTESTOR_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Recover the attestor behind a relayed signature
    Recover {
        #[command(flatten)]
        attestation: AttestationArgs,
        /// Hex-encoded 65-byte `r || s || v` signature
        #[arg(long)]
        signature: String,
    },

    /// Print the effective configuration after file and environment layers
    Config,
}

/// Fields that select one attestation payload
#[derive(Debug, Clone, clap::Args)]
pub struct AttestationArgs {
    /// Vote table: mint, or burn (alias claim)
    #[arg(long)]
    pub kind: AttestationKind,
    /// Hex-encoded prefix chosen by the attestor
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Submission identifier
    #[arg(long)]
    pub submission: SubmissionId,
}
