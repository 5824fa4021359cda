use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Reads `name` through `lookup`, falling back to `default` when unset.
pub fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            })
        }
    }
}

/// Where the authentication backend lives and how requests to it behave.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash; endpoint paths are appended to it.
    pub base_url: String,
    /// Keep a cookie jar so session cookies set by the backend are sent back.
    pub include_credentials: bool,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            include_credentials: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url: String = parse_var(&lookup, "AUTH_BASE_URL", DEFAULT_BASE_URL.to_string())?;
        Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
            name: "AUTH_BASE_URL",
            value: base_url.clone(),
            reason: e.to_string(),
        })?;
        let timeout_secs = parse_var(&lookup, "AUTH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "AUTH_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(Self {
            include_credentials: parse_var(&lookup, "AUTH_INCLUDE_CREDENTIALS", true)?,
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AUTH_BASE_URL", "http://127.0.0.1:5050/"),
            ("AUTH_INCLUDE_CREDENTIALS", "false"),
            ("AUTH_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:5050");
        assert!(!config.include_credentials);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_rejects_bad_values() {
        let error = ClientConfig::from_lookup(lookup(&[("AUTH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid { name: "AUTH_TIMEOUT_SECS", .. }
        ));

        let error =
            ClientConfig::from_lookup(lookup(&[("AUTH_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { name: "AUTH_BASE_URL", .. }));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let error = ClientConfig::from_lookup(lookup(&[("AUTH_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Invalid {
                name: "AUTH_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be at least one second".to_string(),
            }
        );
    }
}
