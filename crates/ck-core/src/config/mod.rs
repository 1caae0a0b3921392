//! Configuration data structures and the TOML → DTO mapping.

mod app_config;

pub use app_config::{AppConfig, GuardConfig, ListenerConfig, LoggingConfig};
