//! # ck-core
//!
//! Core domain models and ports for clipkeeper.
//!
//! This crate contains pure domain logic without any operating system
//! dependencies: the change-notification classifier, the clipboard text
//! transfer encoding, the retry policy used when the clipboard is held by
//! another process, and the ports implemented by the platform layer.

pub mod app_dirs;
pub mod clipboard;
pub mod config;
pub mod notification;
pub mod ports;
pub mod retry;

// Re-export commonly used types at the crate root
pub use clipboard::{ClipboardFormat, ClipboardSnapshot, MemoryHandle};
pub use config::AppConfig;
pub use notification::{classify, ChangeNotification, NotificationClass};
pub use retry::RetryPolicy;
