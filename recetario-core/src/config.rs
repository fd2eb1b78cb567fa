//! Configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How long the "recipe saved" signal stays visible.
pub const DEFAULT_SUCCESS_BANNER_MS: u64 = 5000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Behavior of the recipe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// Visibility window of the success signal after a submit.
    pub success_banner: Duration,
    /// Require an image file extension on the main image URL.
    pub strict_image_urls: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_banner: Duration::from_millis(DEFAULT_SUCCESS_BANNER_MS),
            strict_image_urls: false,
        }
    }
}

impl FormConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `RECETARIO_SUCCESS_BANNER_MS`: success signal duration (default: 5000)
    /// - `RECETARIO_STRICT_IMAGE_URLS`: "true"/"1" to require image extensions (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`FormConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let success_banner = match lookup("RECETARIO_SUCCESS_BANNER_MS") {
            Some(v) => Duration::from_millis(parse_u64("RECETARIO_SUCCESS_BANNER_MS", &v)?),
            None => Duration::from_millis(DEFAULT_SUCCESS_BANNER_MS),
        };

        let strict_image_urls = match lookup("RECETARIO_STRICT_IMAGE_URLS") {
            Some(v) => parse_bool("RECETARIO_STRICT_IMAGE_URLS", &v)?,
            None => false,
        };

        Ok(Self {
            success_banner,
            strict_image_urls,
        })
    }
}

/// REST API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; endpoints are `{api_url}/recipes` and `{api_url}/tags`.
    pub api_url: String,
    pub timeout: Duration,
    /// Language code passed to the tag catalog, if any.
    pub language: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            language: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `RECETARIO_API_URL`: API base URL (default: "http://localhost:3000")
    /// - `RECETARIO_API_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `RECETARIO_LANGUAGE`: tag language, e.g. "es" (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("RECETARIO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if url::Url::parse(&api_url).is_err() {
            return Err(ConfigError::InvalidValue {
                var: "RECETARIO_API_URL",
                value: api_url,
            });
        }

        let timeout = match lookup("RECETARIO_API_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_u64("RECETARIO_API_TIMEOUT_SECS", &v)?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let language = lookup("RECETARIO_LANGUAGE").filter(|l| !l.trim().is_empty());

        Ok(Self {
            api_url,
            timeout,
            language,
        })
    }
}

fn parse_u64(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let form = FormConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(form, FormConfig::default());
        assert_eq!(form.success_banner, Duration::from_secs(5));

        let client = ClientConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(client, ClientConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let form = FormConfig::from_lookup(vars(&[
            ("RECETARIO_SUCCESS_BANNER_MS", "1500"),
            ("RECETARIO_STRICT_IMAGE_URLS", "1"),
        ]))
        .unwrap();
        assert_eq!(form.success_banner, Duration::from_millis(1500));
        assert!(form.strict_image_urls);

        let client = ClientConfig::from_lookup(vars(&[
            ("RECETARIO_API_URL", "https://api.example.com/v1"),
            ("RECETARIO_API_TIMEOUT_SECS", "5"),
            ("RECETARIO_LANGUAGE", "es"),
        ]))
        .unwrap();
        assert_eq!(client.api_url, "https://api.example.com/v1");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.language.as_deref(), Some("es"));
    }

    #[test]
    fn rejects_bad_values() {
        let err = FormConfig::from_lookup(vars(&[("RECETARIO_STRICT_IMAGE_URLS", "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "RECETARIO_STRICT_IMAGE_URLS",
                ..
            }
        ));

        assert!(ClientConfig::from_lookup(vars(&[("RECETARIO_API_URL", "not a url")])).is_err());
        assert!(
            ClientConfig::from_lookup(vars(&[("RECETARIO_API_TIMEOUT_SECS", "-3")])).is_err()
        );
    }
}
