//! File and environment resolution for the client configuration.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file (an
//! explicit `--config` path or the per-user default location), then
//! `CURATOR_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::ClientConfig;

const ENV_SERVER_URL: &str = "CURATOR_SERVER_URL";
const ENV_USERNAME: &str = "CURATOR_USERNAME";
const ENV_PASSWORD: &str = "CURATOR_PASSWORD";
const ENV_LOCALE: &str = "CURATOR_LOCALE";
const ENV_TIMEOUT_SECS: &str = "CURATOR_TIMEOUT_SECS";

impl ClientConfig {
    /// Load the configuration from `path` (or the default location) and
    /// apply environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead. An
    /// explicitly given path that cannot be read is an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when an
    /// override value is malformed.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match resolve_path(path) {
            Some(file) if file.exists() || path.is_some() => Self::from_file(&file)?,
            other => {
                debug!(path = ?other, "no configuration file found, using defaults");
                Self::default()
            }
        };
        apply_overrides(&mut config, |name| env::var(name).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(explicit) = path {
        return Some(explicit.to_path_buf());
    }
    ProjectDirs::from("", "", "curator").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn apply_overrides(
    config: &mut ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    if let Some(value) = lookup(ENV_SERVER_URL) {
        config.server.url = Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
            value: value.clone(),
            source,
        })?;
    }
    if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
        config.server.timeout_secs = value
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout { value })?;
    }
    if let Some(value) = lookup(ENV_USERNAME) {
        config.credentials.username = Some(value);
    }
    if let Some(value) = lookup(ENV_PASSWORD) {
        config.credentials.password = Some(value);
    }
    if let Some(value) = lookup(ENV_LOCALE) {
        config.locale = Some(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn lookup_from<'a>(map: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| map.get(name).map(ToString::to_string)
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            locale = "de"

            [server]
            url = "https://content.example.com/"
            timeout_secs = 5

            [credentials]
            username = "admin"
            password = "secret"
            "#,
        )
        .expect("write config");

        let config = ClientConfig::load(Some(&path)).expect("load config");
        assert_eq!(config.server.url.as_str(), "https://content.example.com/");
        assert_eq!(config.server.timeout_secs, 5);
        assert_eq!(config.credentials.username.as_deref(), Some("admin"));
        assert_eq!(config.locale.as_deref(), Some("de"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.toml");
        let err = ClientConfig::load(Some(&path)).expect_err("missing explicit file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = ClientConfig::default();
        let vars = HashMap::from([
            (ENV_SERVER_URL, "https://other.example.com/"),
            (ENV_USERNAME, "deploy"),
            (ENV_TIMEOUT_SECS, "9"),
        ]);
        apply_overrides(&mut config, lookup_from(&vars)).expect("apply overrides");
        assert_eq!(config.server.url.as_str(), "https://other.example.com/");
        assert_eq!(config.credentials.username.as_deref(), Some("deploy"));
        assert_eq!(config.server.timeout_secs, 9);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        let mut config = ClientConfig::default();
        let bad_url = HashMap::from([(ENV_SERVER_URL, "not a url")]);
        assert!(matches!(
            apply_overrides(&mut config, lookup_from(&bad_url)),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let bad_timeout = HashMap::from([(ENV_TIMEOUT_SECS, "zero")]);
        assert!(matches!(
            apply_overrides(&mut config, lookup_from(&bad_timeout)),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }
}
