//! Linux shell for the foreground task.
//! Starts the task from the user config, keeps the notification current and
//! stops everything on Ctrl-C.

mod app;
mod bridge;
mod paths;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::Notify;

use crate::app::AppState;

const REFRESH_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    info!("starting foreground task (linux)");

    let mut app_state = AppState::new();

    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || {
            info!("received signal, stopping foreground task");
            shutdown.notify_one();
        }) {
            error!("Error setting Ctrl-C handler: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = app_state.start().await {
        error!("Failed to start foreground task: {}", e);
        app_state.cleanup().await;
        return ExitCode::FAILURE;
    }

    let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
    refresh.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = refresh.tick() => {
                match app_state.manager.is_running_task().await {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!("service stopped outside of this process; exiting");
                        break;
                    }
                    Err(e) => {
                        error!("failed to query service state: {}", e);
                        break;
                    }
                }
                if let Err(e) = app_state.refresh().await {
                    warn!("failed to refresh notification: {e}");
                }
            }
        }
    }

    info!("exiting after {} ticks; cleaning up", app_state.ticks());
    app_state.cleanup().await;
    ExitCode::SUCCESS
}
