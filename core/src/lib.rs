pub mod config;
pub mod error;
pub mod manager;
pub mod options;
pub mod scheduler;

pub use error::TaskError;
pub use manager::ForegroundTaskManager;
pub use options::{NotificationOptions, TaskOptions};
pub use scheduler::{PeriodicScheduler, TaskCallback};

/// Interfaces that platform shells implement to adapt the core library
/// without pulling in platform-specific dependencies.
pub mod platform {
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    /// Opaque error raised by a platform boundary call.
    pub type BridgeError = Box<dyn std::error::Error + Send + Sync>;

    /// Key-value payload sent with start/update requests.
    pub type ServicePayload = Map<String, Value>;

    /// Trait for the platform's long-running foreground service.
    ///
    /// The four request/query methods are one-shot calls across the platform
    /// boundary. Their errors are surfaced to the caller unchanged.
    #[async_trait]
    pub trait ServiceBridge: Send + Sync {
        /// Local capability report. Not a boundary call.
        fn is_supported(&self) -> bool {
            true
        }

        async fn request_start(&self, options: ServicePayload) -> Result<(), BridgeError>;
        async fn request_update(&self, options: ServicePayload) -> Result<(), BridgeError>;
        async fn request_stop(&self) -> Result<(), BridgeError>;

        /// Authoritative running state of the external service.
        async fn query_is_running(&self) -> Result<bool, BridgeError>;

        async fn minimize_app(&self) -> Result<(), BridgeError> {
            Ok(())
        }

        async fn wake_up_screen(&self) -> Result<(), BridgeError> {
            Ok(())
        }

        async fn is_app_on_foreground(&self) -> Result<bool, BridgeError> {
            Ok(false)
        }
    }

    /// Trait for platform-correct config paths.
    pub trait AppPaths {
        fn config_path(&self) -> std::path::PathBuf;
    }
}
