use std::mem;
use std::ptr;

use tracing::warn;
use winapi::shared::minwindef::HINSTANCE;
use winapi::shared::windef::{HBRUSH, HCURSOR, HWND};
use winapi::um::winuser::{
    AddClipboardFormatListener, CreateWindowExW, DefWindowProcW, DestroyWindow,
    RegisterClassExW, RemoveClipboardFormatListener, UnregisterClassW, COLOR_WINDOW,
    CW_USEDEFAULT, HWND_MESSAGE, WNDCLASSEXW, WS_MINIMIZE,
};

use super::{last_error, to_wide};
use crate::error::SetupError;

/// A registered window class; unregistered on drop.
pub struct WindowClass {
    name: Vec<u16>,
    display_name: String,
    instance: HINSTANCE,
}

impl WindowClass {
    /// Registers a class whose window procedure is the default one. The
    /// listener reads its messages from the queue and never dispatches.
    pub fn register(name: &str, instance: HINSTANCE, cursor: HCURSOR) -> Result<Self, SetupError> {
        let wide = to_wide(name)?;
        let class = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            style: 0,
            lpfnWndProc: Some(DefWindowProcW),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: instance,
            hIcon: ptr::null_mut(),
            hCursor: cursor,
            hbrBackground: (COLOR_WINDOW + 1) as usize as HBRUSH,
            lpszMenuName: ptr::null(),
            lpszClassName: wide.as_ptr(),
            hIconSm: ptr::null_mut(),
        };

        // SAFETY: `class` is fully initialised and `wide` outlives the call.
        if unsafe { RegisterClassExW(&class) } == 0 {
            return Err(SetupError::RegisterClass {
                name: name.to_string(),
                code: last_error(),
            });
        }

        Ok(Self {
            name: wide,
            display_name: name.to_string(),
            instance,
        })
    }

    pub fn name(&self) -> &str {
        &self.display_name
    }
}

impl Drop for WindowClass {
    fn drop(&mut self) {
        // SAFETY: the class was registered with this name and instance.
        if unsafe { UnregisterClassW(self.name.as_ptr(), self.instance) } == 0 {
            warn!(class = %self.display_name, code = last_error(), "UnregisterClassW failed");
        }
    }
}

/// A hidden message-only window; destroyed on drop.
pub struct MessageWindow {
    hwnd: HWND,
}

impl MessageWindow {
    pub fn create(class: &WindowClass, title: &str) -> Result<Self, SetupError> {
        let title = to_wide(title)?;
        // SAFETY: the class is registered and both strings are
        // NUL-terminated and outlive the call.
        let hwnd = unsafe {
            CreateWindowExW(
                0,
                class.name.as_ptr(),
                title.as_ptr(),
                WS_MINIMIZE,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                HWND_MESSAGE,
                ptr::null_mut(),
                class.instance,
                ptr::null_mut(),
            )
        };
        if hwnd.is_null() {
            return Err(SetupError::CreateWindow(last_error()));
        }
        Ok(Self { hwnd })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl Drop for MessageWindow {
    fn drop(&mut self) {
        // SAFETY: the window was created on this thread and not yet destroyed.
        if unsafe { DestroyWindow(self.hwnd) } == 0 {
            warn!(code = last_error(), "DestroyWindow failed");
        }
    }
}

/// Registration of a window in the clipboard format listener list;
/// removed on drop.
pub struct ClipboardSubscription {
    hwnd: HWND,
}

impl ClipboardSubscription {
    pub fn subscribe(window: &MessageWindow) -> Result<Self, SetupError> {
        // SAFETY: the window is alive.
        if unsafe { AddClipboardFormatListener(window.hwnd) } == 0 {
            return Err(SetupError::Subscribe(last_error()));
        }
        Ok(Self { hwnd: window.hwnd })
    }
}

impl Drop for ClipboardSubscription {
    fn drop(&mut self) {
        // SAFETY: the subscription is dropped before its window.
        if unsafe { RemoveClipboardFormatListener(self.hwnd) } == 0 {
            warn!(code = last_error(), "RemoveClipboardFormatListener failed");
        }
    }
}
