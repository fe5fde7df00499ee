//! Unified error type for bridge operations
//!
//! Every failing operation aborts without touching state, so an error is always a complete
//! description of why nothing happened. `ErrorClass` tells callers what to do about it: fix the
//! inputs, get authorized, treat the request as already done, or retry later.

use serde::{Deserialize, Serialize};

use crate::types::{Address, AssetId, SubmissionId};

/// Unified error type for all qbridge operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum BridgeError {
    /// Input violates an operation precondition (wrong chain, unsupported destination,
    /// amount below minimum, value mismatch, ...)
    #[error("Precondition violated: {message}")]
    Precondition {
        /// What was violated
        message: String,
    },

    /// Caller or recovered signer lacks the required role
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Who was rejected and for what
        message: String,
    },

    /// Submission was already settled by mint or claim
    #[error("Submission {submission} already used")]
    AlreadyUsed {
        /// The consumed submission
        submission: SubmissionId,
    },

    /// Attestor already voted for this submission
    #[error("Attestor {attestor} already voted for {submission}")]
    AlreadyVoted {
        /// Submission being voted on
        submission: SubmissionId,
        /// Duplicate voter
        attestor: Address,
    },

    /// Settlement attempted before the attestor quorum confirmed the submission
    #[error("Quorum not reached for {submission}")]
    QuorumNotReached {
        /// Submission lacking confirmation
        submission: SubmissionId,
    },

    /// Custody or caller funds do not cover the request
    #[error("Insufficient funds: {message}")]
    InsufficientFunds {
        /// Shortfall description
        message: String,
    },

    /// No asset is registered under this identifier
    #[error("Asset not found: {asset}")]
    AssetNotFound {
        /// Unknown identifier
        asset: AssetId,
    },

    /// Token collaborator failed for a reason other than funds
    #[error("Token module error: {message}")]
    Token {
        /// Collaborator failure
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },
}

/// Coarse classification of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Caller must fix inputs and resubmit
    PreconditionViolation,
    /// Caller is not allowed to do this
    AuthorizationFailure,
    /// Already happened; no retry helps
    ReplayViolation,
    /// Retry later once attestations arrive
    QuorumNotReached,
    /// Caller must adjust the request
    InsufficientFunds,
    /// Referenced entity does not exist
    NotFound,
    /// External collaborator failed
    Collaborator,
    /// Local setup problem
    Configuration,
}

impl BridgeError {
    /// Create a precondition violation
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create an authorization failure
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an insufficient funds error
    pub fn insufficient_funds(message: impl Into<String>) -> Self {
        Self::InsufficientFunds {
            message: message.into(),
        }
    }

    /// Create a token collaborator error
    pub fn token(message: impl Into<String>) -> Self {
        Self::Token {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classification of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            BridgeError::Precondition { .. } => ErrorClass::PreconditionViolation,
            BridgeError::Unauthorized { .. } => ErrorClass::AuthorizationFailure,
            BridgeError::AlreadyUsed { .. } | BridgeError::AlreadyVoted { .. } => {
                ErrorClass::ReplayViolation
            }
            BridgeError::QuorumNotReached { .. } => ErrorClass::QuorumNotReached,
            BridgeError::InsufficientFunds { .. } => ErrorClass::InsufficientFunds,
            BridgeError::AssetNotFound { .. } => ErrorClass::NotFound,
            BridgeError::Token { .. } => ErrorClass::Collaborator,
            BridgeError::Config { .. } => ErrorClass::Configuration,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Precondition { .. } => "bridge_precondition",
            BridgeError::Unauthorized { .. } => "bridge_unauthorized",
            BridgeError::AlreadyUsed { .. } => "bridge_already_used",
            BridgeError::AlreadyVoted { .. } => "bridge_already_voted",
            BridgeError::QuorumNotReached { .. } => "bridge_quorum_not_reached",
            BridgeError::InsufficientFunds { .. } => "bridge_insufficient_funds",
            BridgeError::AssetNotFound { .. } => "bridge_asset_not_found",
            BridgeError::Token { .. } => "bridge_token_module",
            BridgeError::Config { .. } => "bridge_config",
        }
    }

    /// Whether retrying the same call later can succeed without changing it
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::QuorumNotReached
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

/// Standard Result type for qbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash32;

    #[test]
    fn test_error_creation() {
        let err = BridgeError::precondition("amount below minimum");
        assert!(matches!(err, BridgeError::Precondition { .. }));
        assert_eq!(err.to_string(), "Precondition violated: amount below minimum");
    }

    #[test]
    fn test_replay_errors_share_a_class() {
        let submission = SubmissionId(Hash32([1u8; 32]));
        let used = BridgeError::AlreadyUsed { submission };
        let voted = BridgeError::AlreadyVoted {
            submission,
            attestor: Address([2u8; 20]),
        };
        assert_eq!(used.class(), ErrorClass::ReplayViolation);
        assert_eq!(voted.class(), ErrorClass::ReplayViolation);
        assert_ne!(used.code(), voted.code());
    }

    #[test]
    fn test_only_quorum_is_retryable() {
        let submission = SubmissionId(Hash32([1u8; 32]));
        assert!(BridgeError::QuorumNotReached { submission }.is_retryable());
        assert!(!BridgeError::AlreadyUsed { submission }.is_retryable());
        assert!(!BridgeError::unauthorized("not admin").is_retryable());
    }
}
