use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable that overrides `api_url`
pub const ENV_API_URL: &str = "FLOWDESK_API_URL";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const APP_DIR: &str = "flowdesk";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "flowdesk.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid api_url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the task service
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Read assistant replies aloud
    #[serde(default = "default_true")]
    pub speak_responses: bool,
    /// Desktop notification when a focus session completes
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Shell command that records one utterance and prints the transcript
    #[serde(default)]
    pub voice_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            speak_responses: true,
            notifications: true,
            log_file: None,
            voice_command: None,
        }
    }
}

impl Config {
    /// Load with the usual precedence: defaults, then the file, then
    /// `FLOWDESK_API_URL`, then the `--api-url` flag.
    pub fn load(path: Option<&Path>, api_url_flag: Option<&str>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        let env_url = std::env::var(ENV_API_URL).ok();
        config.apply_overrides(env_url.as_deref(), api_url_flag)?;
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply environment and flag overrides, then validate the URL
    pub fn apply_overrides(
        &mut self,
        env_url: Option<&str>,
        flag_url: Option<&str>,
    ) -> Result<(), ConfigError> {
        let chosen = flag_url
            .or(env_url)
            .map(str::trim)
            .filter(|u| !u.is_empty());
        if let Some(url) = chosen {
            self.api_url = url.to_string();
        }
        self.api_url = normalize_api_url(&self.api_url)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Where the interactive UI writes its log
    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => path.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join(LOG_FILE),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Check that `raw` is an http(s) URL and drop trailing slashes
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"http://tasks.local:9000/\"\nspeak_responses = false\n",
        )
        .unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.apply_overrides(None, None).unwrap();

        assert_eq!(config.api_url, "http://tasks.local:9000");
        assert!(!config.speak_responses);
        assert!(config.notifications);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = [").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let mut config = Config {
            api_url: "http://file:1".to_string(),
            ..Config::default()
        };
        config
            .apply_overrides(Some("http://env:2"), Some("http://flag:3/"))
            .unwrap();
        assert_eq!(config.api_url, "http://flag:3");

        config.api_url = "http://file:1".to_string();
        config.apply_overrides(Some("http://env:2"), None).unwrap();
        assert_eq!(config.api_url, "http://env:2");

        config.api_url = "http://file:1".to_string();
        config.apply_overrides(Some("  "), None).unwrap();
        assert_eq!(config.api_url, "http://file:1");
    }

    #[test]
    fn test_normalize_api_url_rejects_non_http() {
        assert!(matches!(
            normalize_api_url("ftp://example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(normalize_api_url("not a url").is_err());
        assert_eq!(
            normalize_api_url("https://api.example.com//").unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_log_path_override() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/fd.log")),
            ..Config::default()
        };
        assert_eq!(config.log_path(), PathBuf::from("/tmp/fd.log"));
    }
}
