/// Configuration schema for the license-check host
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::verification::{Credentials, DEFAULT_SERVER_URL};

/// Environment variables that override file values
pub const ENV_PUBLIC_KEY: &str = "LICENSE_PUBLIC_KEY";
pub const ENV_API_KEY: &str = "LICENSE_API_KEY";
pub const ENV_SERVER_URL: &str = "LICENSE_SERVER_URL";
pub const ENV_SERIAL_KEY: &str = "LICENSE_SERIAL_KEY";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// PEM public key of the product
    #[serde(default)]
    pub public_key: String,

    /// Product API key
    #[serde(default)]
    pub api_key: String,

    /// Licensing server base address
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Last serial key that validated successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_key: Option<String>,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Time of the last successful validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_validation: Option<DateTime<Utc>>,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            api_key: String::new(),
            server_url: default_server_url(),
            serial_key: None,
            timeout_secs: None,
            last_validation: None,
        }
    }
}

impl Config {
    /// Overlay `LICENSE_*` environment variables on top of file values
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup(ENV_PUBLIC_KEY) {
            self.public_key = v;
        }
        if let Some(v) = lookup(ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = lookup(ENV_SERVER_URL) {
            self.server_url = v;
        }
        if let Some(v) = lookup(ENV_SERIAL_KEY) {
            self.serial_key = Some(v);
        }
    }

    /// Record a successful validation of `serial_key`
    pub fn record_success(&mut self, serial_key: &str, at: DateTime<Utc>) {
        self.serial_key = Some(serial_key.to_string());
        self.last_validation = Some(at);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.public_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "public_key cannot be empty (set it in the config file or {})",
                ENV_PUBLIC_KEY
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "api_key cannot be empty (set it in the config file or {})",
                ENV_API_KEY
            )));
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "server_url must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// Credentials for the validation client
    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(self.public_key.clone(), self.api_key.clone())
            .with_server_url(self.server_url.clone());

        match self.timeout_secs {
            Some(secs) => credentials.with_timeout(Duration::from_secs(secs)),
            None => credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> Config {
        Config {
            public_key: "-----BEGIN PUBLIC KEY-----".to_string(),
            api_key: "k1".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.api_key = "".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.server_url = "ftp://licenses.example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_default_values() {
        let json = r#"{
            "public_key": "pem",
            "api_key": "k1"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.server_url, "http://localhost:5000");
        assert_eq!(config.serial_key, None);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "from-env"),
            (ENV_SERIAL_KEY, "A2UV9-9HZYZ-UWFK8-SS71A"),
            (ENV_SERVER_URL, "  "),
        ]);

        let mut config = valid_config();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.serial_key.as_deref(), Some("A2UV9-9HZYZ-UWFK8-SS71A"));
        // Blank values do not override
        assert_eq!(config.server_url, "http://localhost:5000");
        assert_eq!(config.public_key, "-----BEGIN PUBLIC KEY-----");
    }

    #[test]
    fn test_credentials() {
        let mut config = valid_config();
        config.server_url = "https://licenses.example.com".to_string();
        config.timeout_secs = Some(15);

        let creds = config.credentials();
        assert_eq!(creds.api_key, "k1");
        assert_eq!(creds.endpoint(), "https://licenses.example.com/api/v1/validate");
        assert_eq!(creds.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_record_success() {
        let mut config = valid_config();
        let now = Utc::now();
        config.record_success("SERIAL", now);

        assert_eq!(config.serial_key.as_deref(), Some("SERIAL"));
        assert_eq!(config.last_validation, Some(now));
    }
}
