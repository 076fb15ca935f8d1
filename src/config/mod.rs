use crate::dialogs::DialogTimings;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Current working directory
    #[serde(skip)]
    pub cwd: PathBuf,

    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,

    /// Data directory holding the database and log file
    pub data_dir: PathBuf,

    /// Database file name, relative to `data_dir` unless absolute
    pub database_file: PathBuf,

    /// Whether mouse capture is enabled in the terminal UI
    pub mouse_enabled: bool,

    /// Event loop tick rate
    pub tick_rate_ms: u64,

    /// Dialog transition and banner timings
    pub dialogs: DialogTimings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            source: None,
            data_dir: PathBuf::from("./data"),
            database_file: PathBuf::from("revise.db"),
            mouse_enabled: true,
            tick_rate_ms: 250,
            dialogs: DialogTimings::default(),
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::load_from_file().await? {
            Some(file_config) => file_config,
            None => Self::default(),
        };

        // Environment overrides the file
        config.load_from_env();

        if !config.data_dir.exists() {
            std::fs::create_dir_all(&config.data_dir)?;
        }

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = var("REVISE_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Some(database_file) = var("REVISE_DATABASE_FILE") {
            self.database_file = PathBuf::from(database_file);
        }

        if let Some(mouse) = var("REVISE_MOUSE") {
            self.mouse_enabled = matches!(mouse.to_lowercase().as_str(), "1" | "true" | "on" | "yes");
        }

        if let Some(rate) = var("REVISE_TICK_RATE_MS").and_then(|v| v.parse().ok()) {
            self.tick_rate_ms = rate;
        }

        if let Some(ms) = var("REVISE_DIALOG_ENTER_MS").and_then(|v| v.parse().ok()) {
            self.dialogs.enter_delay_ms = ms;
        }

        if let Some(ms) = var("REVISE_DIALOG_EXIT_MS").and_then(|v| v.parse().ok()) {
            self.dialogs.exit_delay_ms = ms;
        }

        if let Some(ms) = var("REVISE_DIALOG_ERROR_MS").and_then(|v| v.parse().ok()) {
            self.dialogs.error_clear_ms = ms;
        }
    }

    /// Load configuration from the first revise.json found
    pub async fn load_from_file() -> Result<Option<Self>> {
        // Priority:
        // 1. ./.revise.json
        // 2. ./revise.json
        // 3. $CONFIG_DIR/revise/revise.json
        let mut config_paths = vec![PathBuf::from("./.revise.json"), PathBuf::from("./revise.json")];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("revise").join("revise.json"));
        }

        for path in config_paths {
            if path.exists() {
                return Self::load_path(&path).await.map(Some);
            }
        }

        Ok(None)
    }

    pub async fn load_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// One-line summary of where the configuration came from
    pub fn describe_source(&self) -> String {
        match &self.source {
            Some(path) => format!("Loaded configuration from {}", path.display()),
            None => "Using default configuration".to_string(),
        }
    }

    /// Full path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        if self.database_file.is_absolute() {
            self.database_file.clone()
        } else {
            self.data_dir.join(&self.database_file)
        }
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("revise.log")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("tick_rate_ms must be greater than 0"));
        }

        if self.dialogs.exit_delay_ms == 0 {
            return Err(anyhow::anyhow!("dialogs.exit_delay_ms must be greater than 0"));
        }

        if self.database_file.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("database_file is required"));
        }

        Ok(())
    }
}
