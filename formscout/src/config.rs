// Server configuration: defaults, then environment, then command-line overrides

use formscout_scanner::{DEFAULT_USER_AGENT, ScannerConfig};
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

pub const ENV_BIND: &str = "FORMSCOUT_BIND";
pub const ENV_AUTOFILL_URL: &str = "FORMSCOUT_AUTOFILL_URL";
pub const ENV_TIMEOUT: &str = "FORMSCOUT_TIMEOUT";

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_AUTOFILL_URL: &str = "http://localhost:5000/autofill";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("Invalid autofill backend URL '{0}'")]
    InvalidBackend(String),

    #[error("Invalid timeout '{0}', expected whole seconds")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub autofill_backend: String,
    /// Applies to page fetches and autofill forwarding; 0 disables it
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            autofill_backend: DEFAULT_AUTOFILL_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Raw, unvalidated values from one configuration layer
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub autofill_backend: Option<String>,
    pub request_timeout_secs: Option<String>,
}

impl ConfigOverrides {
    /// Read overrides through `lookup`, normally `std::env::var`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind: lookup(ENV_BIND),
            autofill_backend: lookup(ENV_AUTOFILL_URL),
            request_timeout_secs: lookup(ENV_TIMEOUT),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ServerConfig {
    /// Apply a layer of overrides on top of this configuration, validating each value
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(bind) = overrides.bind.as_deref() {
            self.bind = bind
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBind(bind.to_string()))?;
        }

        if let Some(backend) = overrides.autofill_backend.as_deref() {
            let parsed = Url::parse(backend.trim())
                .map_err(|_| ConfigError::InvalidBackend(backend.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidBackend(backend.to_string()));
            }
            self.autofill_backend = parsed.to_string();
        }

        if let Some(timeout) = overrides.request_timeout_secs.as_deref() {
            self.request_timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(timeout.to_string()))?;
        }

        Ok(self)
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            user_agent: self.user_agent.clone(),
            timeout_secs: self.request_timeout_secs,
            ..ScannerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.autofill_backend, DEFAULT_AUTOFILL_URL);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_layer() {
        let overrides = ConfigOverrides::from_lookup(lookup_from(&[
            (ENV_BIND, "127.0.0.1:8088"),
            (ENV_AUTOFILL_URL, "http://backend:5000/autofill"),
            (ENV_TIMEOUT, "0"),
        ]));
        let config = ServerConfig::default().apply(&overrides).unwrap();

        assert_eq!(config.bind.to_string(), "127.0.0.1:8088");
        assert_eq!(config.autofill_backend, "http://backend:5000/autofill");
        assert_eq!(config.request_timeout_secs, 0);
        assert_eq!(config.scanner_config().timeout_secs, 0);
    }

    #[test]
    fn test_later_layer_wins() {
        let env = ConfigOverrides::from_lookup(lookup_from(&[(ENV_TIMEOUT, "10")]));
        let cli = ConfigOverrides {
            request_timeout_secs: Some("45".to_string()),
            ..ConfigOverrides::default()
        };
        let config = ServerConfig::default()
            .apply(&env)
            .and_then(|c| c.apply(&cli))
            .unwrap();
        assert_eq!(config.request_timeout_secs, 45);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_bind = ConfigOverrides {
            bind: Some("localhost".to_string()),
            ..ConfigOverrides::default()
        };
        assert_eq!(
            ServerConfig::default().apply(&bad_bind).unwrap_err(),
            ConfigError::InvalidBind("localhost".to_string())
        );

        let bad_backend = ConfigOverrides {
            autofill_backend: Some("ftp://backend/autofill".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            ServerConfig::default().apply(&bad_backend),
            Err(ConfigError::InvalidBackend(_))
        ));

        let bad_timeout = ConfigOverrides {
            request_timeout_secs: Some("soon".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            ServerConfig::default().apply(&bad_timeout),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
