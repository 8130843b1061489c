//! Configuration loading and management.
//! Uses injected `AppPaths` so platform shells control where files live.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::options::{NotificationOptions, TaskOptions};
use crate::platform::AppPaths;

/// Initial notification content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    pub title: String,
    pub text: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            title: "Foreground task".to_string(),
            text: "Running in the background".to_string(),
        }
    }
}

/// Commands a desktop shell uses to emulate the foreground service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Keep-alive process; the task counts as running while it lives.
    pub command: String,
    pub args: Vec<String>,
    /// Posts the persistent notification. Receives title and text as trailing args.
    pub notify_command: String,
    #[serde(default)]
    pub notify_args: Vec<String>,
    #[serde(default)]
    pub wake_command: Option<String>,
    #[serde(default)]
    pub wake_args: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            command: "systemd-inhibit".to_string(),
            args: vec![
                "--what=idle:sleep".to_string(),
                "--who=foreground-task".to_string(),
                "--why=Foreground task running".to_string(),
                "sleep".to_string(),
                "infinity".to_string(),
            ],
            notify_command: "notify-send".to_string(),
            notify_args: Vec::new(),
            wake_command: Some("xset".to_string()),
            wake_args: vec!["dpms".to_string(), "force".to_string(), "on".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub notification: NotificationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskOptions>,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl Config {
    /// Load configuration from the provided paths. Creates a default file if missing.
    pub fn load_with(paths: &dyn AppPaths) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = paths.config_path();

        if !config_path.exists() {
            info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let default_config = Self::default();
            default_config.save_with(paths)?;
            return Ok(default_config);
        }

        debug!("Loading config from {:?}", config_path);
        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;

        info!(
            "Loaded config for notification channel '{}'",
            config.notification.channel_id
        );
        Ok(config)
    }

    /// Save configuration to the provided paths.
    pub fn save_with(&self, paths: &dyn AppPaths) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = paths.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Return configured PATH or fall back to current process PATH.
    pub fn get_path(&self) -> String {
        if let Some(path) = &self.path {
            return path.clone();
        }
        std::env::var("PATH").unwrap_or_default()
    }
}
