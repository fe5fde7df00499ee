//! qbridge CLI library
//!
//! Command definitions and handlers behind the `qbridge` binary.

pub mod commands;
pub mod handlers;

pub use commands::{AttestationArgs, Commands};
pub use handlers::dispatch;
