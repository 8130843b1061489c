use std::path::PathBuf;

use foreground_task_core::platform::AppPaths;

#[derive(Default)]
pub struct LinuxPaths;

impl AppPaths for LinuxPaths {
    fn config_path(&self) -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("foreground_task")
            .join("config.toml")
    }
}
