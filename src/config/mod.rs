//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the generation provider API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings for the generation provider.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Explicit API key. When absent, the key is read from the environment
    /// at call time.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-pro-preview".to_string(),
            temperature: 0.7,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl GenerationConfig {
    /// Resolves the API key, preferring the explicit value over the
    /// environment. Empty values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
    }
}

/// Directory holding the persisted archive and preferences.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".vidforge"))
        .unwrap_or_else(|| PathBuf::from(".vidforge"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "gemini-3-pro-preview");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_explicit_key_wins_over_environment() {
        let config = GenerationConfig {
            api_key: Some("explicit".to_string()),
            ..GenerationConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("explicit"));
    }

    #[test]
    fn test_empty_explicit_key_counts_as_absent() {
        let config = GenerationConfig {
            api_key: Some(String::new()),
            ..GenerationConfig::default()
        };
        std::env::remove_var(API_KEY_ENV);
        assert_eq!(config.resolve_api_key(), None);
    }
}
