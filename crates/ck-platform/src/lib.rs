//! # ck-platform
//!
//! Platform-specific implementations for clipkeeper.
//!
//! This crate contains the adapters that talk to the operating system: the
//! Win32 clipboard, movable global memory and the hidden listener window
//! with its message pump. It also provides an in-memory clipboard subsystem
//! that behaves like the Win32 one, notifications included, so the use
//! cases can be exercised anywhere.

pub mod adapters;
pub mod app_dirs;
pub mod error;

#[cfg(windows)]
pub mod win32;

pub use error::{PumpError, SetupError};
