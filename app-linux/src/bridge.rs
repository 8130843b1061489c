//! Desktop stand-in for a foreground service.
//! Keeps a supervised keep-alive process running and posts the notification
//! through a notify command.

use std::process::Stdio;

use async_trait::async_trait;
use foreground_task_core::config::ServiceConfig;
use foreground_task_core::options::{TEXT_KEY, TITLE_KEY};
use foreground_task_core::platform::{BridgeError, ServiceBridge, ServicePayload};
use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

pub struct ProcessServiceBridge {
    config: ServiceConfig,
    env_path: String,
    // Killed on drop, so a shell that exits without stopping leaves nothing behind.
    child: Mutex<Option<Child>>,
}

impl ProcessServiceBridge {
    pub fn new(config: ServiceConfig, env_path: String) -> Self {
        Self {
            config,
            env_path,
            child: Mutex::new(None),
        }
    }

    fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        debug!("Update PATH to: {}", self.env_path);
        cmd.env("PATH", &self.env_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    async fn notify(&self, options: &ServicePayload) -> Result<(), BridgeError> {
        let title = payload_str(options, TITLE_KEY);
        let text = payload_str(options, TEXT_KEY);

        let mut cmd = self.command(&self.config.notify_command);
        if self.config.notify_command == "notify-send" {
            if let Some(app_name) = options.get("notificationChannelName").and_then(Value::as_str) {
                cmd.arg(format!("--app-name={app_name}"));
            }
            cmd.arg(format!("--urgency={}", urgency(options)));
        }

        let status = cmd
            .args(&self.config.notify_args)
            .arg(title)
            .arg(text)
            .status()
            .await?;

        if !status.success() {
            warn!("Notify command exited with {}", status);
        }
        Ok(())
    }
}

async fn terminate(mut child: Child) {
    if let Err(e) = child.kill().await {
        warn!("Failed to kill service process: {}", e);
    }
}

#[async_trait]
impl ServiceBridge for ProcessServiceBridge {
    async fn request_start(&self, options: ServicePayload) -> Result<(), BridgeError> {
        info!(
            "Spawning service command: {} {:?}",
            self.config.command, self.config.args
        );

        let child = self
            .command(&self.config.command)
            .args(&self.config.args)
            .spawn()
            .map_err(|e| {
                error!("Failed to start service command: {}", e);
                e
            })?;

        // Without its notification the service is not started; roll back.
        if let Err(e) = self.notify(&options).await {
            error!("Failed to post notification, stopping service: {}", e);
            terminate(child).await;
            return Err(e);
        }

        *self.child.lock().await = Some(child);
        Ok(())
    }

    async fn request_update(&self, options: ServicePayload) -> Result<(), BridgeError> {
        self.notify(&options).await
    }

    async fn request_stop(&self) -> Result<(), BridgeError> {
        let Some(child) = self.child.lock().await.take() else {
            return Ok(());
        };

        info!("Stopping service process {:?}", child.id());
        terminate(child).await;
        debug!("Service process stopped");
        Ok(())
    }

    async fn query_is_running(&self) -> Result<bool, BridgeError> {
        let mut guard = self.child.lock().await;
        let Some(child) = guard.as_mut() else {
            return Ok(false);
        };

        match child.try_wait()? {
            None => Ok(true),
            Some(status) => {
                warn!("Service process exited on its own with {}", status);
                *guard = None;
                Ok(false)
            }
        }
    }

    async fn wake_up_screen(&self) -> Result<(), BridgeError> {
        let Some(program) = &self.config.wake_command else {
            debug!("No wake command configured");
            return Ok(());
        };

        self.command(program)
            .args(&self.config.wake_args)
            .status()
            .await?;
        Ok(())
    }
}

fn payload_str<'a>(options: &'a ServicePayload, key: &str) -> &'a str {
    options.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn urgency(options: &ServicePayload) -> &'static str {
    match options.get("notificationPriority").and_then(Value::as_i64) {
        Some(p) if p > 0 => "critical",
        Some(p) if p < 0 => "low",
        _ => "normal",
    }
}
