//! Port interfaces for the application layer
//!
//! Ports define the contract between the capture/republish use cases and
//! the platform implementations. The application logic stays independent of
//! the operating system, so it can be driven by the in-memory adapters in
//! tests and by the Win32 adapters in production.

pub mod app_dirs;
pub mod clipboard;
pub mod errors;
pub mod memory;
pub mod notification_source;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use app_dirs::AppDirsPort;
pub use clipboard::SystemClipboardPort;
pub use errors::{AppDirsError, ClipboardError, MemoryError};
pub use memory::SharedMemoryPort;
pub use notification_source::NotificationSourcePort;
