//! Settings of the Birina service.
//!
//! Loaded from a TOML file merged with `BIRINA__`-prefixed environment
//! variables (`BIRINA__PINATA__API_KEY`, ...). Every section has usable
//! defaults except the credentials, which stay empty until configured.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Listen address of the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    /// Host to bind
    pub listen_host: String,
    /// Port to bind
    pub listen_port: u16,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            listen_port: 8085,
        }
    }
}

/// Chain endpoint and claim contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Chain {
    /// JSON-RPC endpoint of the chain node
    pub rpc_url: String,
    /// Address of the claim contract
    pub contract_address: String,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            rpc_url: "https://sepolia.base.org".to_string(),
            contract_address: String::new(),
        }
    }
}

/// Pinning service credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pinata {
    /// Pinata API key
    pub api_key: String,
    /// Pinata secret API key
    pub secret_api_key: String,
}

/// Birina service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address
    pub info: Info,
    /// Chain gateway
    pub chain: Chain,
    /// Pinning gateway
    pub pinata: Pinata,
}

impl Settings {
    /// Load settings from the optional file plus the environment.
    pub fn new(config_file_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_file_path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(Environment::with_prefix("BIRINA").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let settings = Settings::default();
        assert_eq!(settings.info.listen_port, 8085);
        assert!(!settings.chain.rpc_url.is_empty());
        assert!(settings.pinata.api_key.is_empty());
    }
}
