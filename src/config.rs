//! Runtime configuration - a single base-URL setting read at startup

use crate::constants::{API_URL_ENV, DEFAULT_API_URL};

/// Backend connection settings
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash
    pub base_url: String,
}

impl Config {
    /// Build a config from an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Config { base_url }
    }

    /// Read the base URL from the environment, falling back to the default
    pub fn from_env() -> Self {
        Self::from_env_var(API_URL_ENV)
    }

    fn from_env_var(key: &str) -> Self {
        let url = std::env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_API_URL));
        Self::new(url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let config = Config::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_plain_url_unchanged() {
        let config = Config::new("https://api.example.com/v1");
        assert_eq!(config.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_unset_var_falls_back_to_default() {
        let config = Config::from_env_var("WHODO_TEST_UNSET_VAR");
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }
}
