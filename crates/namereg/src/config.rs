//! Service configuration, read from `NAMEREG_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use namereg_core::TokenVerifier;

use crate::error::ConfigError;

/// Default key of the registry document.
pub const DEFAULT_DOCUMENT_KEY: &str = "names.json";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Configuration for the service binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Key of the registry document in the store.
    pub document_key: String,
    /// Address to listen on.
    pub bind_addr: SocketAddr,
    /// SQLite database file. `None` selects the in-memory store.
    pub database_path: Option<PathBuf>,
    /// Create an empty `{}` document at startup if none exists.
    pub init_document: bool,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
    /// PEM public key replacing the embedded one.
    pub public_key_pem: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            document_key: DEFAULT_DOCUMENT_KEY.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: None,
            init_document: true,
            json_logs: false,
            public_key_pem: None,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("NAMEREG_BIND") {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError::InvalidValue {
                name: "NAMEREG_BIND",
                reason: format!("{}", e),
            })?;
        }

        if let Some(path) = lookup("NAMEREG_DB").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(key) = lookup("NAMEREG_DOCUMENT_KEY") {
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: "NAMEREG_DOCUMENT_KEY",
                    reason: "must not be empty".into(),
                });
            }
            config.document_key = key.to_string();
        }

        // A fresh in-memory store has nothing to update unless provisioned.
        config.init_document = match lookup("NAMEREG_INIT_DOCUMENT") {
            Some(value) => parse_bool("NAMEREG_INIT_DOCUMENT", &value)?,
            None => config.database_path.is_none(),
        };

        if let Some(value) = lookup("NAMEREG_JSON_LOGS") {
            config.json_logs = parse_bool("NAMEREG_JSON_LOGS", &value)?;
        }

        config.public_key_pem = lookup("NAMEREG_PUBLIC_KEY_PEM").filter(|p| !p.trim().is_empty());

        Ok(config)
    }

    /// Build the token verifier for the configured key.
    pub fn verifier(&self) -> Result<TokenVerifier, ConfigError> {
        let verifier = match &self.public_key_pem {
            Some(pem) => TokenVerifier::from_public_key_pem(pem)?,
            None => TokenVerifier::embedded()?,
        };
        Ok(verifier)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            name,
            reason: format!("expected a boolean, got {:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.document_key, DEFAULT_DOCUMENT_KEY);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert!(config.init_document);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("NAMEREG_BIND", "0.0.0.0:9000"),
            ("NAMEREG_DB", "/var/lib/namereg/names.db"),
            ("NAMEREG_DOCUMENT_KEY", "steam-names.json"),
            ("NAMEREG_JSON_LOGS", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/namereg/names.db"))
        );
        assert_eq!(config.document_key, "steam-names.json");
        assert!(config.json_logs);
        // Persistent stores are not provisioned unless asked.
        assert!(!config.init_document);
    }

    #[test]
    fn test_explicit_init() {
        let config = config_from(&[("NAMEREG_DB", "names.db"), ("NAMEREG_INIT_DOCUMENT", "yes")])
            .unwrap();
        assert!(config.init_document);

        let config = config_from(&[("NAMEREG_INIT_DOCUMENT", "0")]).unwrap();
        assert!(!config.init_document);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("NAMEREG_BIND", "not an address")]),
            Err(ConfigError::InvalidValue { name: "NAMEREG_BIND", .. })
        ));
        assert!(matches!(
            config_from(&[("NAMEREG_JSON_LOGS", "maybe")]),
            Err(ConfigError::InvalidValue { name: "NAMEREG_JSON_LOGS", .. })
        ));
        assert!(matches!(
            config_from(&[("NAMEREG_DOCUMENT_KEY", "  ")]),
            Err(ConfigError::InvalidValue { name: "NAMEREG_DOCUMENT_KEY", .. })
        ));
    }

    #[test]
    fn test_verifier_uses_embedded_key_by_default() {
        let verifier = ServiceConfig::default().verifier().unwrap();
        assert_eq!(verifier, TokenVerifier::embedded().unwrap());
    }

    #[test]
    fn test_bad_public_key() {
        let config = ServiceConfig {
            public_key_pem: Some("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----".into()),
            ..ServiceConfig::default()
        };
        assert!(matches!(config.verifier(), Err(ConfigError::PublicKey(_))));
    }
}
