//! Service configuration.

use std::{fs, path::Path};

use crosslink_primitives::AccountId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deployment identities the service authorizes against.
///
/// Protocol parameters live in [`crosslink_params::ProtocolParams`] and are
/// supplied separately; this file only binds the privileged caller accounts.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// The only account allowed to slash and to relay transfers.
    pub bridge_trigger: AccountId,

    /// The account allowed to edit the submitter set and client settings.
    pub governance: AccountId,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ServiceConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let raw = r#"
            bridge_trigger = "0101010101010101010101010101010101010101010101010101010101010101"
            governance = "0202020202020202020202020202020202020202020202020202020202020202"
        "#;
        let config: ServiceConfig = toml::from_str(raw).expect("parse");
        assert_eq!(config.bridge_trigger, AccountId::from([1; 32]));
        assert_eq!(config.governance, AccountId::from([2; 32]));
    }

    #[test]
    fn test_missing_field_rejected() {
        let raw = r#"
            governance = "0202020202020202020202020202020202020202020202020202020202020202"
        "#;
        assert!(toml::from_str::<ServiceConfig>(raw).is_err());
    }
}
