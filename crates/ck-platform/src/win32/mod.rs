//! Win32 implementations of the clipboard, memory and notification ports.
//!
//! Every FFI call is confined to these modules. Handles that must be
//! released are wrapped in guards that release them on drop.

mod clipboard;
mod host;
mod memory;
mod pump;
mod window;

pub use clipboard::Win32Clipboard;
pub use host::ListenerHost;
pub use memory::GlobalMemory;
pub use pump::MessagePump;
pub use window::{ClipboardSubscription, MessageWindow, WindowClass};

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use winapi::um::errhandlingapi::GetLastError;

use crate::error::SetupError;

pub(crate) fn last_error() -> u32 {
    // SAFETY: reads the calling thread's last-error value.
    unsafe { GetLastError() }
}

/// NUL-terminated UTF-16 copy of `value`, for `LPCWSTR` parameters.
pub(crate) fn to_wide(value: &str) -> Result<Vec<u16>, SetupError> {
    if value.contains('\0') {
        return Err(SetupError::InvalidName(value.to_string()));
    }
    Ok(OsStr::new(value).encode_wide().chain(Some(0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wide_appends_terminator() {
        assert_eq!(to_wide("ab").unwrap(), vec![0x61, 0x62, 0]);
    }

    #[test]
    fn to_wide_rejects_interior_nul() {
        assert!(matches!(
            to_wide("a\0b"),
            Err(SetupError::InvalidName(_))
        ));
    }
}
