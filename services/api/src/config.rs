//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_GENERATION_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_SCRIPT_MODEL: &str = "gemini-3-flash-preview";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    pub gemini_api_key: String,
    pub generation_api_base: String,
    pub script_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- Load the Generation API Settings ---
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;
        let generation_api_base = lookup("GENERATION_API_BASE")
            .unwrap_or_else(|| DEFAULT_GENERATION_API_BASE.to_string());
        let script_model =
            lookup("SCRIPT_MODEL").unwrap_or_else(|| DEFAULT_SCRIPT_MODEL.to_string());

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            gemini_api_key,
            generation_api_base,
            script_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "test-key")])).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.allowed_origin, "http://localhost:5173");
        assert_eq!(config.gemini_api_key, "test-key");
        assert_eq!(config.generation_api_base, DEFAULT_GENERATION_API_BASE);
        assert_eq!(config.script_model, "gemini-3-flash-preview");
    }

    #[test]
    fn missing_key_is_reported() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref name) if name == "GEMINI_API_KEY"));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("BIND_ADDRESS", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "BIND_ADDRESS"));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("RUST_LOG", "chatty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for the environment variable RUST_LOG: 'chatty' is not a valid log level"
        );
    }

    #[test]
    fn overrides_are_honoured() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("GENERATION_API_BASE", "http://localhost:9999/v1"),
            ("SCRIPT_MODEL", "gemini-2.5-flash"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.generation_api_base, "http://localhost:9999/v1");
        assert_eq!(config.script_model, "gemini-2.5-flash");
    }
}
