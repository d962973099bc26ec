use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Catalog service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog service, including the API prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; a timed-out request fails like any
    /// other and is not retried
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick/refresh rate of the TUI event loop in milliseconds
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_ms: u64,

    /// How long the post-commit highlight stays on a card, in milliseconds
    #[serde(default = "default_highlight_duration")]
    pub highlight_duration_ms: u64,

    /// List offset beyond which the header collapses to its compact form
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: usize,
}

fn default_refresh_rate() -> u64 {
    100
}

fn default_highlight_duration() -> u64 {
    1800
}

fn default_scroll_threshold() -> usize {
    2
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate(),
            highlight_duration_ms: default_highlight_duration(),
            scroll_threshold: default_scroll_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and other local state
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".taller".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    /// User config file in the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taller").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so taller works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/taller/ (optional)
        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with TALLER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("TALLER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to the user config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::user_config_path()
            .context("No config directory available on this platform")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn logs_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.state).join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.ui.refresh_rate_ms, 100);
        assert!(config.logging.to_file);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("taller.toml");
        let mut file = std::fs::File::create(&config_file).unwrap();
        writeln!(file, "[api]").unwrap();
        writeln!(file, "base_url = \"http://catalog.example:9000/api\"").unwrap();
        writeln!(file, "[ui]").unwrap();
        writeln!(file, "highlight_duration_ms = 500").unwrap();

        let config = Config::load(Some(config_file.to_str().unwrap())).unwrap();
        assert_eq!(config.api.base_url, "http://catalog.example:9000/api");
        assert_eq!(config.ui.highlight_duration_ms, 500);
        // Untouched sections keep their defaults
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_logs_path_is_under_state_dir() {
        let mut config = Config::default();
        config.paths.state = "/tmp/taller-test".to_string();
        assert_eq!(config.logs_path(), PathBuf::from("/tmp/taller-test/logs"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.ui.scroll_threshold, config.ui.scroll_threshold);
    }
}
