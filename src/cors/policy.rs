//! Router-wide CORS defaults.

use crate::config::CorsConfig;

/// Global CORS policy shared by every route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub enabled: bool,
    /// `Access-Control-Allow-Origin` values.
    pub allowed_origins: Vec<String>,
    /// `Access-Control-Allow-Credentials`.
    pub allow_credentials: bool,
    /// `Access-Control-Max-Age` in seconds; `-1` disables caching.
    pub max_age_secs: i64,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: vec!["*".to_string()],
            allow_credentials: false,
            max_age_secs: -1,
        }
    }
}

impl From<&CorsConfig> for CorsPolicy {
    fn from(config: &CorsConfig) -> Self {
        Self {
            enabled: config.enabled,
            allowed_origins: config.allowed_origins.clone(),
            allow_credentials: config.allow_credentials,
            max_age_secs: config.max_age_secs,
        }
    }
}

impl CorsPolicy {
    pub(crate) fn origin_header(&self) -> String {
        self.allowed_origins.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = CorsPolicy::default();
        assert!(!policy.enabled);
        assert_eq!(policy.origin_header(), "*");
        assert!(!policy.allow_credentials);
        assert_eq!(policy.max_age_secs, -1);
    }

    #[test]
    fn test_from_config() {
        let config = CorsConfig {
            enabled: true,
            allowed_origins: vec!["https://a.test".into(), "https://b.test".into()],
            allow_credentials: true,
            max_age_secs: 600,
        };
        let policy = CorsPolicy::from(&config);
        assert!(policy.enabled);
        assert_eq!(policy.origin_header(), "https://a.test, https://b.test");
        assert_eq!(policy.max_age_secs, 600);
    }
}
