//! Notification and task options, and the store that keeps the last configured values.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use crate::platform::ServicePayload;

pub const DEFAULT_INTERVAL_MS: u64 = 5000;

pub const TITLE_KEY: &str = "notificationContentTitle";
pub const TEXT_KEY: &str = "notificationContentText";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelImportance {
    None,
    Min,
    Low,
    #[default]
    Default,
    High,
    Max,
}

impl ChannelImportance {
    pub fn code(self) -> i32 {
        match self {
            ChannelImportance::None => 0,
            ChannelImportance::Min => 1,
            ChannelImportance::Low => 2,
            ChannelImportance::Default => 3,
            ChannelImportance::High => 4,
            ChannelImportance::Max => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Min,
    Low,
    #[default]
    Default,
    High,
    Max,
}

impl NotificationPriority {
    pub fn code(self) -> i32 {
        match self {
            NotificationPriority::Min => -2,
            NotificationPriority::Low => -1,
            NotificationPriority::Default => 0,
            NotificationPriority::High => 1,
            NotificationPriority::Max => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVisibility {
    #[default]
    Public,
    Private,
    Secret,
}

impl NotificationVisibility {
    pub fn code(self) -> i32 {
        match self {
            NotificationVisibility::Public => 1,
            NotificationVisibility::Private => 0,
            NotificationVisibility::Secret => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationButton {
    pub id: String,
    pub text: String,
}

/// Presentation of the persistent notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub channel_id: String,
    pub channel_name: String,
    #[serde(default)]
    pub channel_description: Option<String>,
    #[serde(default)]
    pub channel_importance: ChannelImportance,
    #[serde(default)]
    pub priority: NotificationPriority,
    #[serde(default)]
    pub enable_vibration: bool,
    #[serde(default = "default_true")]
    pub play_sound: bool,
    #[serde(default)]
    pub show_when: bool,
    #[serde(default = "default_true")]
    pub is_sticky: bool,
    #[serde(default)]
    pub visibility: NotificationVisibility,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub buttons: Vec<NotificationButton>,
}

fn default_true() -> bool {
    true
}

impl NotificationOptions {
    pub fn new(channel_id: impl Into<String>, channel_name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            channel_description: None,
            channel_importance: ChannelImportance::default(),
            priority: NotificationPriority::default(),
            enable_vibration: false,
            play_sound: true,
            show_when: false,
            is_sticky: true,
            visibility: NotificationVisibility::default(),
            icon: None,
            buttons: Vec::new(),
        }
    }

    /// Serialize into the key-value shape the service boundary expects.
    pub fn to_payload(&self) -> ServicePayload {
        let buttons: Vec<Value> = self
            .buttons
            .iter()
            .map(|b| json!({ "id": b.id, "text": b.text }))
            .collect();

        let mut map = ServicePayload::new();
        map.insert("notificationChannelId".into(), json!(self.channel_id));
        map.insert("notificationChannelName".into(), json!(self.channel_name));
        map.insert(
            "notificationChannelDescription".into(),
            json!(self.channel_description),
        );
        map.insert(
            "notificationChannelImportance".into(),
            json!(self.channel_importance.code()),
        );
        map.insert("notificationPriority".into(), json!(self.priority.code()));
        map.insert("enableVibration".into(), json!(self.enable_vibration));
        map.insert("playSound".into(), json!(self.play_sound));
        map.insert("showWhen".into(), json!(self.show_when));
        map.insert("isSticky".into(), json!(self.is_sticky));
        map.insert("visibility".into(), json!(self.visibility.code()));
        map.insert("iconData".into(), json!(self.icon));
        map.insert("buttons".into(), Value::Array(buttons));
        map
    }
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self::new("foreground_service", "Foreground Service")
    }
}

/// Scheduling options of the foreground task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Tick period in milliseconds.
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default)]
    pub auto_run_on_boot: bool,
    #[serde(default)]
    pub allow_wifi_lock: bool,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl TaskOptions {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            ..Self::default()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    pub fn to_payload(&self) -> ServicePayload {
        let mut map = ServicePayload::new();
        map.insert("interval".into(), json!(self.interval));
        map.insert("autoRunOnBoot".into(), json!(self.auto_run_on_boot));
        map.insert("allowWifiLock".into(), json!(self.allow_wifi_lock));
        map
    }
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_MS,
            auto_run_on_boot: false,
            allow_wifi_lock: false,
        }
    }
}

/// Holds the last configured options. Values are replaced wholesale, never edited.
#[derive(Debug, Clone, Default)]
pub struct OptionsStore {
    notification: Option<NotificationOptions>,
    task: Option<TaskOptions>,
}

impl OptionsStore {
    /// Replace the notification options, and the task options when supplied.
    pub fn configure(&mut self, notification: NotificationOptions, task: Option<TaskOptions>) {
        self.notification = Some(notification);
        if let Some(task) = task {
            self.task = Some(task);
        }
    }

    pub fn notification(&self) -> Option<&NotificationOptions> {
        self.notification.as_ref()
    }

    pub fn task(&self) -> TaskOptions {
        self.task.unwrap_or_default()
    }

    /// Build the start/update payload, or `None` before anything was configured.
    pub fn payload(&self, title: &str, text: &str) -> Option<ServicePayload> {
        let notification = self.notification.as_ref()?;
        let mut payload = notification.to_payload();
        payload.extend(self.task().to_payload());
        payload.insert(TITLE_KEY.into(), json!(title));
        payload.insert(TEXT_KEY.into(), json!(text));
        Some(payload)
    }
}
