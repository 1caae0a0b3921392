use std::marker::PhantomData;

use ck_core::clipboard::{ClipboardFormat, MemoryHandle};
use ck_core::ports::{ClipboardError, SystemClipboardPort};
use winapi::shared::windef::HWND;
use winapi::shared::winerror::ERROR_ACCESS_DENIED;
use winapi::um::winnt::HANDLE;
use winapi::um::winuser::{
    CloseClipboard, EmptyClipboard, GetClipboardData, GetOpenClipboardWindow,
    IsClipboardFormatAvailable, OpenClipboard, SetClipboardData,
};

use super::last_error;
use super::window::MessageWindow;

/// System clipboard, opened on behalf of the listener window.
///
/// Borrowing the window keeps the owner handle valid for as long as the
/// clipboard adapter exists.
pub struct Win32Clipboard<'w> {
    owner: HWND,
    _window: PhantomData<&'w MessageWindow>,
}

impl<'w> Win32Clipboard<'w> {
    pub fn new(window: &'w MessageWindow) -> Self {
        Self {
            owner: window.hwnd(),
            _window: PhantomData,
        }
    }
}

impl SystemClipboardPort for Win32Clipboard<'_> {
    fn open(&self) -> Result<(), ClipboardError> {
        // SAFETY: `owner` is a live window for the lifetime of `self`.
        if unsafe { OpenClipboard(self.owner) } != 0 {
            return Ok(());
        }
        let code = last_error();
        // SAFETY: no preconditions.
        let held_elsewhere = !unsafe { GetOpenClipboardWindow() }.is_null();
        if held_elsewhere || code == ERROR_ACCESS_DENIED {
            Err(ClipboardError::Busy)
        } else {
            Err(ClipboardError::OpenFailed(code))
        }
    }

    fn close(&self) -> Result<(), ClipboardError> {
        // SAFETY: no preconditions; fails if the clipboard is not open.
        if unsafe { CloseClipboard() } == 0 {
            return Err(ClipboardError::CloseFailed(last_error()));
        }
        Ok(())
    }

    fn data(&self, format: ClipboardFormat) -> Result<Option<MemoryHandle>, ClipboardError> {
        // SAFETY: called while the clipboard is open.
        unsafe {
            if IsClipboardFormatAvailable(format.id()) == 0 {
                return Ok(None);
            }
            let handle = GetClipboardData(format.id());
            if handle.is_null() {
                return Err(ClipboardError::ReadFailed(last_error()));
            }
            Ok(Some(MemoryHandle::from_raw(handle as usize)))
        }
    }

    fn empty(&self) -> Result<(), ClipboardError> {
        // SAFETY: called while the clipboard is open.
        if unsafe { EmptyClipboard() } == 0 {
            return Err(ClipboardError::EmptyFailed(last_error()));
        }
        Ok(())
    }

    fn set_data(&self, format: ClipboardFormat, handle: MemoryHandle) -> Result<(), ClipboardError> {
        // SAFETY: `handle` is a movable block allocated by this process; on
        // success the system takes ownership of it.
        let result = unsafe { SetClipboardData(format.id(), handle.as_raw() as HANDLE) };
        if result.is_null() {
            return Err(ClipboardError::SetFailed(last_error()));
        }
        Ok(())
    }
}
