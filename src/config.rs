//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Backend address used when `JOB_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Request timeout used when `JOB_API_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the backend client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the job backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("JOB_API_URL") {
            Some(url) => normalize_base_url(&url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let request_timeout = match lookup("JOB_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "JOB_API_TIMEOUT_SECS".to_string(),
                    message: format!("'{}' is not a number of seconds", raw),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "JOB_API_TIMEOUT_SECS".to_string(),
                        message: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: "JOB_API_URL".to_string(),
            message: format!("'{}' must start with http:// or https://", raw),
        });
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn trailing_slash_trimmed() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("JOB_API_URL", "https://jobs.example.com/")]))
                .unwrap();
        assert_eq!(config.base_url, "https://jobs.example.com");
    }

    #[test]
    fn rejects_non_http_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[("JOB_API_URL", "localhost:3000")]))
            .unwrap_err();
        assert!(err.to_string().contains("JOB_API_URL"));
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(
            ClientConfig::from_lookup(lookup_from(&[("JOB_API_TIMEOUT_SECS", "soon")])).is_err()
        );
        assert!(ClientConfig::from_lookup(lookup_from(&[("JOB_API_TIMEOUT_SECS", "0")])).is_err());

        let config =
            ClientConfig::from_lookup(lookup_from(&[("JOB_API_TIMEOUT_SECS", "5")])).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
