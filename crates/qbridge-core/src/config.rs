//! Bridge configuration
//!
//! Sources are layered lowest to highest: built-in defaults, a TOML file, then `QBRIDGE_*`
//! environment variables. Validation runs after the last layer is applied.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{BridgeError, Result};
use crate::types::{Address, ChainId};

/// Environment variable overriding [`BridgeConfig::chain_id`]
pub const ENV_CHAIN_ID: &str = "QBRIDGE_CHAIN_ID";
/// Environment variable overriding [`BridgeConfig::custody`]
pub const ENV_CUSTODY: &str = "QBRIDGE_CUSTODY";
/// Environment variable overriding [`BridgeConfig::min_confirmations`]
pub const ENV_MIN_CONFIRMATIONS: &str = "QBRIDGE_MIN_CONFIRMATIONS";

/// Configuration validation
pub trait ConfigValidation {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}

/// Static parameters of one bridge deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Chain this ledger runs on
    pub chain_id: ChainId,
    /// Account holding locked funds and collected fees in the token module
    pub custody: Address,
    /// Distinct attestor votes required to confirm a submission
    pub min_confirmations: u16,
}

impl BridgeConfig {
    /// Local development configuration
    pub fn defaults() -> Self {
        let mut custody = [0u8; 20];
        custody[18] = 0xb7;
        custody[19] = 0x1d;
        Self {
            chain_id: ChainId(1),
            custody: Address(custody),
            min_confirmations: 1,
        }
    }

    /// Parse a TOML configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BridgeError::config(format!("failed to serialize config: {e}")))
    }

    /// Apply `QBRIDGE_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn merge_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CHAIN_ID) {
            let value = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| BridgeError::config(format!("{ENV_CHAIN_ID}: {e}")))?;
            self.chain_id = ChainId(value);
        }
        if let Some(raw) = lookup(ENV_CUSTODY) {
            self.custody = raw
                .trim()
                .parse()
                .map_err(|e| BridgeError::config(format!("{ENV_CUSTODY}: {e}")))?;
        }
        if let Some(raw) = lookup(ENV_MIN_CONFIRMATIONS) {
            self.min_confirmations = raw
                .trim()
                .parse()
                .map_err(|e| BridgeError::config(format!("{ENV_MIN_CONFIRMATIONS}: {e}")))?;
        }
        Ok(())
    }

    /// Load a file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ConfigValidation for BridgeConfig {
    fn validate(&self) -> Result<()> {
        if self.chain_id.get() == 0 {
            return Err(BridgeError::config("chain_id must be non-zero"));
        }
        if self.custody.is_zero() {
            return Err(BridgeError::config("custody must not be the zero address"));
        }
        if self.min_confirmations == 0 {
            return Err(BridgeError::config("min_confirmations must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BridgeConfig::defaults().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "chain_id = 5\ncustody = \"0x{}\"\nmin_confirmations = 3",
            "aa".repeat(20)
        )
        .unwrap();
        let config = BridgeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.chain_id, ChainId(5));
        assert_eq!(config.custody, Address([0xaa; 20]));
        assert_eq!(config.min_confirmations, 3);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = Path::new("/nonexistent/qbridge.toml");
        let err = BridgeConfig::load_from_file(path).unwrap_err();
        assert_matches!(err, BridgeError::Config { .. });
    }

    #[test]
    fn test_overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [(ENV_CHAIN_ID, "42"), (ENV_MIN_CONFIRMATIONS, "4")]
            .into_iter()
            .collect();
        let mut config = BridgeConfig::defaults();
        config
            .merge_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.chain_id, ChainId(42));
        assert_eq!(config.min_confirmations, 4);
        assert_eq!(config.custody, BridgeConfig::defaults().custody);
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let mut config = BridgeConfig::defaults();
        let err = config
            .merge_with(|key| (key == ENV_CUSTODY).then(|| "0x12".to_string()))
            .unwrap_err();
        assert_matches!(err, BridgeError::Config { .. });
    }

    #[test]
    fn test_validation_rejects_zero_threshold() {
        let config = BridgeConfig {
            min_confirmations: 0,
            ..BridgeConfig::defaults()
        };
        assert_matches!(config.validate(), Err(BridgeError::Config { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BridgeConfig::defaults();
        let parsed = BridgeConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
