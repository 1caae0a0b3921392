use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Application configuration.
///
/// Every key is optional in the file; a missing key keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub guard: GuardConfig,
    pub listener: ListenerConfig,
    pub logging: LoggingConfig,
}

/// Clipboard acquisition retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

/// Hidden listener window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub window_class_name: String,
    pub window_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory; `None` means the platform default.
    pub directory: Option<PathBuf>,
    pub file_logging: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_ms: RetryPolicy::DEFAULT_INITIAL_BACKOFF.as_millis() as u64,
            max_backoff_ms: RetryPolicy::DEFAULT_MAX_BACKOFF.as_millis() as u64,
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            window_class_name: "clipkeeperListener".to_string(),
            window_title: "clipkeeper".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_logging: true,
        }
    }
}

impl GuardConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }
}

fn lookup<'a>(value: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    value.get(section).and_then(|s| s.get(key))
}

impl AppConfig {
    /// Create AppConfig from a parsed TOML document.
    ///
    /// Values of the wrong type are treated like missing ones. Negative
    /// numbers are clamped to zero.
    pub fn from_toml(value: &toml::Value) -> Self {
        let defaults = Self::default();

        let int = |section: &str, key: &str| {
            lookup(value, section, key)
                .and_then(|v| v.as_integer())
                .map(|n| n.max(0) as u64)
        };
        let string = |section: &str, key: &str| {
            lookup(value, section, key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        Self {
            guard: GuardConfig {
                max_attempts: int("guard", "max_attempts")
                    .map(|n| n.min(u32::MAX as u64) as u32)
                    .unwrap_or(defaults.guard.max_attempts),
                initial_backoff_ms: int("guard", "initial_backoff_ms")
                    .unwrap_or(defaults.guard.initial_backoff_ms),
                max_backoff_ms: int("guard", "max_backoff_ms")
                    .unwrap_or(defaults.guard.max_backoff_ms),
            },
            listener: ListenerConfig {
                window_class_name: string("listener", "window_class_name")
                    .unwrap_or(defaults.listener.window_class_name),
                window_title: string("listener", "window_title")
                    .unwrap_or(defaults.listener.window_title),
            },
            logging: LoggingConfig {
                directory: string("logging", "directory").map(PathBuf::from),
                file_logging: lookup(value, "logging", "file_logging")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(defaults.logging.file_logging),
            },
        }
    }
}
