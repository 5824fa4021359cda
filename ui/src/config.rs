use client::config::{parse_var, ClientConfig, ConfigError};
use types::domain::SignupVariant;

const DEFAULT_DESTINATION: &str = "/dashboard";

/// How the two forms behave around the HTTP calls.
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub signup_variant: SignupVariant,
    /// Where a successful login lands when the backend names no redirect.
    pub default_destination: String,
    /// Record the session flag and email after a successful login.
    pub remember_session: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            signup_variant: SignupVariant::Full,
            default_destination: DEFAULT_DESTINATION.to_string(),
            remember_session: true,
        }
    }
}

impl FormConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_destination: String = parse_var(
            &lookup,
            "AUTH_DEFAULT_DESTINATION",
            DEFAULT_DESTINATION.to_string(),
        )?;
        let default_destination = default_destination.trim().to_string();
        if default_destination.is_empty() {
            return Err(ConfigError::Invalid {
                name: "AUTH_DEFAULT_DESTINATION",
                value: default_destination,
                reason: "destination must not be empty".to_string(),
            });
        }
        Ok(Self {
            signup_variant: parse_var(&lookup, "AUTH_SIGNUP_VARIANT", SignupVariant::Full)?,
            default_destination,
            remember_session: parse_var(&lookup, "AUTH_REMEMBER_SESSION", true)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub form: FormConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| std::env::var(name).ok();
        Ok(Self {
            client: ClientConfig::from_lookup(lookup)?,
            form: FormConfig::from_lookup(lookup)?,
        })
    }
}
