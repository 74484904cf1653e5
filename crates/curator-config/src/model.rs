//! Typed configuration model and defaults.

use serde::Deserialize;
use url::Url;

/// Base URL used when no configuration is present.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
/// Request timeout applied when no configuration is present.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process-wide client configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server connection settings.
    pub server: ServerConfig,
    /// Credentials presented to the server.
    pub credentials: Credentials,
    /// Locale sent as `Accept-Language` on every request.
    pub locale: Option<String>,
}

/// Server connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the content-management server.
    pub url: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Credentials presented to the server via HTTP basic auth.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Account name; requests are unauthenticated when absent.
    pub username: Option<String>,
    /// Account password; prompted interactively when absent.
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            credentials: Credentials::default(),
            locale: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL parses"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.server.url.as_str(), "http://localhost:3000/");
        assert_eq!(config.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.credentials.username.is_none());
        assert!(config.locale.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [credentials]
            username = "admin"
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.credentials.username.as_deref(), Some("admin"));
        assert_eq!(config.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
