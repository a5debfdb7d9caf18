use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub reviews: ReviewsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Third-party form backend the finished draft is posted to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Submission endpoint URL
    #[serde(default = "default_form_endpoint")]
    pub endpoint: String,
    /// Prefix for the email subject line; the project title is appended
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Rendering hint understood by the backend
    #[serde(default = "default_form_template")]
    pub template: String,
}

fn default_form_endpoint() -> String {
    "https://formspree.io/f/manbpywd".to_string()
}

fn default_subject_prefix() -> String {
    "New quote request:".to_string()
}

fn default_form_template() -> String {
    "table".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: default_form_endpoint(),
            subject_prefix: default_subject_prefix(),
            template: default_form_template(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsConfig {
    /// Reviews data endpoint URL
    #[serde(default = "default_reviews_endpoint")]
    pub endpoint: String,
    /// Maximum reviews shown in the browser
    #[serde(default = "default_reviews_limit")]
    pub limit: usize,
}

fn default_reviews_endpoint() -> String {
    "https://renohome.pt/api/google-reviews".to_string()
}

fn default_reviews_limit() -> usize {
    12
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_reviews_endpoint(),
            limit: default_reviews_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the draft slot and log files.
    /// Empty means the platform data dir, e.g. ~/.local/share/renoquote
    #[serde(default)]
    pub dir: String,
}

/// How a submission result is presented in the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultPresentation {
    /// Inline banner beneath the form
    #[default]
    Banner,
    /// Centered overlay dialog
    Dialog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval for the TUI loop
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_ms: u64,
    #[serde(default)]
    pub result_presentation: ResultPresentation,
}

fn default_refresh_rate() -> u64 {
    250
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate(),
            result_presentation: ResultPresentation::default(),
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

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the app works without any
        // config file on disk
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/renoquote/
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("renoquote").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with RENOQUOTE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("RENOQUOTE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Storage directory, resolving the platform default when unset.
    pub fn storage_dir(&self) -> PathBuf {
        if self.storage.dir.is_empty() {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("renoquote")
        } else {
            PathBuf::from(&self.storage.dir)
        }
    }

    /// Fixed slot for the persisted draft
    pub fn draft_path(&self) -> PathBuf {
        self.storage_dir().join("draft.json")
    }

    pub fn logs_path(&self) -> PathBuf {
        self.storage_dir().join("logs")
    }
}
