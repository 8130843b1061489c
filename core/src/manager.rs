//! Foreground task lifecycle (platform-agnostic).
//! Validates start/update/stop against the service's reported running state
//! and drives the periodic callback.

use log::{debug, info};

use crate::config::Config;
use crate::error::TaskError;
use crate::options::{NotificationOptions, OptionsStore, TaskOptions};
use crate::platform::ServiceBridge;
use crate::scheduler::{PeriodicScheduler, TaskCallback};

/// Manages the lifecycle of the single foreground task.
///
/// Construct one per process and hand it to whatever needs it. Operations take
/// `&mut self`, so callers serialize access by construction. Running state is
/// never cached: every operation asks the bridge, since the host may stop the
/// service behind our back.
pub struct ForegroundTaskManager<B: ServiceBridge> {
    bridge: B,
    options: OptionsStore,
    scheduler: PeriodicScheduler,
}

impl<B: ServiceBridge> ForegroundTaskManager<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            options: OptionsStore::default(),
            scheduler: PeriodicScheduler::new(),
        }
    }

    /// Capability guard run once at the top of every operation.
    fn supported(&self, op: &str) -> bool {
        let supported = self.bridge.is_supported();
        if !supported {
            debug!("{} ignored: platform not supported", op);
        }
        supported
    }

    pub fn options(&self) -> &OptionsStore {
        &self.options
    }

    /// True while a periodic callback is armed.
    pub fn has_callback(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Store the notification options, and the task options when given.
    /// Omitting `task` keeps whatever was configured before.
    pub fn init(
        &mut self,
        notification: NotificationOptions,
        task: Option<TaskOptions>,
    ) -> &mut Self {
        debug!(
            "Configuring foreground task: channel '{}', task options {:?}",
            notification.channel_id, task
        );
        self.options.configure(notification, task);
        self
    }

    pub fn init_from_config(&mut self, config: &Config) -> &mut Self {
        self.init(config.notification.clone(), config.task)
    }

    /// Start the foreground service and, when `callback` is given, arm it at the
    /// configured interval.
    pub async fn start(
        &mut self,
        title: &str,
        text: &str,
        callback: Option<TaskCallback>,
    ) -> Result<(), TaskError> {
        if !self.supported("start") {
            return Ok(());
        }

        if self.bridge.query_is_running().await? {
            return Err(TaskError::AlreadyRunning);
        }

        let payload = self
            .options
            .payload(title, text)
            .ok_or(TaskError::NotInitialized)?;

        info!("Starting foreground task: '{}'", title);
        self.bridge.request_start(payload).await?;

        if let Some(callback) = callback {
            self.scheduler.arm(callback, self.options.task().interval());
        }
        Ok(())
    }

    /// Update the notification of a running task. Replaces the callback only when
    /// one is given. Does nothing if the task is not running.
    pub async fn update(
        &mut self,
        title: &str,
        text: &str,
        callback: Option<TaskCallback>,
    ) -> Result<(), TaskError> {
        if !self.supported("update") {
            return Ok(());
        }

        if !self.bridge.query_is_running().await? {
            debug!("update ignored: foreground task not running");
            return Ok(());
        }

        let payload = self
            .options
            .payload(title, text)
            .ok_or(TaskError::NotInitialized)?;

        debug!("Updating foreground task: '{}'", title);
        self.bridge.request_update(payload).await?;

        if let Some(callback) = callback {
            self.scheduler.arm(callback, self.options.task().interval());
        }
        Ok(())
    }

    /// Stop the foreground service and cancel the callback. Does nothing if the
    /// task is not running.
    pub async fn stop(&mut self) -> Result<(), TaskError> {
        if !self.supported("stop") {
            return Ok(());
        }

        if !self.bridge.query_is_running().await? {
            debug!("stop ignored: foreground task not running");
            return Ok(());
        }

        info!("Stopping foreground task");
        let result = self.bridge.request_stop().await;
        self.scheduler.disarm();
        result.map_err(TaskError::from)
    }

    pub async fn is_running_task(&self) -> Result<bool, TaskError> {
        if !self.supported("is_running_task") {
            return Ok(false);
        }
        Ok(self.bridge.query_is_running().await?)
    }

    pub async fn minimize_app(&self) -> Result<(), TaskError> {
        if !self.supported("minimize_app") {
            return Ok(());
        }
        Ok(self.bridge.minimize_app().await?)
    }

    pub async fn wake_up_screen(&self) -> Result<(), TaskError> {
        if !self.supported("wake_up_screen") {
            return Ok(());
        }
        Ok(self.bridge.wake_up_screen().await?)
    }

    pub async fn is_app_on_foreground(&self) -> Result<bool, TaskError> {
        if !self.supported("is_app_on_foreground") {
            return Ok(false);
        }
        Ok(self.bridge.is_app_on_foreground().await?)
    }
}
