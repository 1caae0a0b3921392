use std::ptr;

use ck_core::config::ListenerConfig;
use tracing::info;
use winapi::um::libloaderapi::GetModuleHandleW;
use winapi::um::winuser::{LoadCursorW, IDC_ARROW};

use super::clipboard::Win32Clipboard;
use super::last_error;
use super::memory::GlobalMemory;
use super::pump::MessagePump;
use super::window::{ClipboardSubscription, MessageWindow, WindowClass};
use crate::error::SetupError;

/// The listener's window resources, released in reverse order of setup.
pub struct ListenerHost {
    // Field order is drop order.
    _subscription: ClipboardSubscription,
    window: MessageWindow,
    _class: WindowClass,
}

impl ListenerHost {
    /// Registers the window class, creates the message-only window and
    /// subscribes it to clipboard updates.
    pub fn setup(config: &ListenerConfig) -> Result<Self, SetupError> {
        // SAFETY: a null name returns the handle of the current executable.
        let instance = unsafe { GetModuleHandleW(ptr::null()) };
        if instance.is_null() {
            return Err(SetupError::ModuleHandle(last_error()));
        }

        // SAFETY: IDC_ARROW is a predefined system cursor.
        let cursor = unsafe { LoadCursorW(ptr::null_mut(), IDC_ARROW) };
        if cursor.is_null() {
            return Err(SetupError::Cursor(last_error()));
        }

        let class = WindowClass::register(&config.window_class_name, instance, cursor)?;
        let window = MessageWindow::create(&class, &config.window_title)?;
        let subscription = ClipboardSubscription::subscribe(&window)?;

        info!(class = class.name(), "clipboard listener window ready");

        Ok(Self {
            _subscription: subscription,
            window,
            _class: class,
        })
    }

    pub fn clipboard(&self) -> Win32Clipboard<'_> {
        Win32Clipboard::new(&self.window)
    }

    pub fn memory(&self) -> GlobalMemory {
        GlobalMemory::new()
    }

    pub fn pump(&self) -> MessagePump<'_> {
        MessagePump::new(&self.window)
    }
}
