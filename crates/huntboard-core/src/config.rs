use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level user configuration, loaded from `huntboard/config.toml` in the
/// platform config directory. Every field has a default so a missing file
/// or an empty table is always valid.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Override for the local data directory (defaults to the platform
    /// data dir).
    pub data_dir: Option<PathBuf>,
    pub cache: CacheConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached application list stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

const fn default_cache_ttl_secs() -> u64 {
    30
}

/// Remote backend endpoint. `base_url` unset means remote features are
/// unavailable regardless of sign-in state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
}

/// Load configuration from the given file, or defaults when it is absent.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AppConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load configuration from the conventional per-user location.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(AppConfig::default());
    };
    load_config_from(&config_dir.join("huntboard/config.toml"))
}

impl AppConfig {
    /// Resolve where local data lives: the configured override, else the
    /// platform data directory, else the current directory.
    #[must_use]
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map_or_else(|| PathBuf::from("."), |dir| dir.join("huntboard"))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, load_config_from};
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(config.cache.ttl_secs, 30);
        assert!(config.remote.base_url.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "[remote]\nbase_url = \"https://api.example.test\"").expect("write");

        let config = load_config_from(&path).expect("load");
        assert_eq!(
            config.remote.base_url.as_deref(),
            Some("https://api.example.test")
        );
        assert_eq!(config.cache.ttl_secs, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cache = [nonsense").expect("write");
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn data_dir_override_wins() {
        let config = AppConfig {
            data_dir: Some("/tmp/huntboard-test".into()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.resolve_data_dir(),
            std::path::PathBuf::from("/tmp/huntboard-test")
        );
    }
}
