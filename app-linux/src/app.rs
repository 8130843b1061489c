use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use foreground_task_core::config::Config;
use foreground_task_core::{ForegroundTaskManager, TaskCallback, TaskError};
use log::{error, info, warn};

use crate::bridge::ProcessServiceBridge;
use crate::paths::LinuxPaths;

/// Shared application state for the Linux shell.
pub struct AppState {
    pub manager: ForegroundTaskManager<ProcessServiceBridge>,
    pub config: Config,
    ticks: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        let paths = LinuxPaths;

        let config = match Config::load_with(&paths) {
            Ok(config) => {
                info!("Loaded configuration successfully");
                config
            }
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                warn!("Using default configuration");
                Config::default()
            }
        };

        let bridge = ProcessServiceBridge::new(config.service.clone(), config.get_path());
        let mut manager = ForegroundTaskManager::new(bridge);
        manager.init_from_config(&config);

        Self {
            manager,
            config,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    fn tick_callback(&self) -> TaskCallback {
        let ticks = Arc::clone(&self.ticks);
        Arc::new(move |timestamp: DateTime<Local>| {
            let n = ticks.fetch_add(1, Ordering::SeqCst) + 1;
            info!("Tick {} at {}", n, timestamp.format("%H:%M:%S%.3f"));
        })
    }

    pub async fn start(&mut self) -> Result<(), TaskError> {
        let callback = self.tick_callback();
        let content = &self.config.content;
        self.manager
            .start(&content.title, &content.text, Some(callback))
            .await
    }

    /// Push the current tick count into the notification text.
    pub async fn refresh(&mut self) -> Result<(), TaskError> {
        let content = &self.config.content;
        let text = format!("{} ({} ticks)", content.text, self.ticks());
        self.manager.update(&content.title, &text, None).await
    }

    pub async fn cleanup(&mut self) {
        if let Err(e) = self.manager.stop().await {
            error!("Failed to stop foreground task: {}", e);
        }
    }
}
