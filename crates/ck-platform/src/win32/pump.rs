use std::marker::PhantomData;
use std::mem::MaybeUninit;

use ck_core::notification::{ChangeNotification, CLIPBOARD_UPDATE_MESSAGE};
use ck_core::ports::NotificationSourcePort;
use tracing::debug;
use winapi::shared::windef::HWND;
use winapi::um::winuser::{GetMessageW, MSG};

use super::last_error;
use super::window::MessageWindow;
use crate::error::PumpError;

/// Blocking source of clipboard update messages for one window.
///
/// Only clipboard updates are retrieved; other messages stay queued.
pub struct MessagePump<'w> {
    hwnd: HWND,
    _window: PhantomData<&'w MessageWindow>,
}

impl<'w> MessagePump<'w> {
    pub fn new(window: &'w MessageWindow) -> Self {
        Self {
            hwnd: window.hwnd(),
            _window: PhantomData,
        }
    }
}

impl NotificationSourcePort for MessagePump<'_> {
    type Error = PumpError;

    fn next_notification(&mut self) -> Result<Option<ChangeNotification>, Self::Error> {
        loop {
            let mut msg = MaybeUninit::<MSG>::zeroed();
            // SAFETY: `msg` is valid for writes and the window is alive.
            let ret = unsafe {
                GetMessageW(
                    msg.as_mut_ptr(),
                    self.hwnd,
                    CLIPBOARD_UPDATE_MESSAGE,
                    CLIPBOARD_UPDATE_MESSAGE,
                )
            };
            match ret {
                -1 => return Err(PumpError::GetMessage(last_error())),
                0 => {
                    debug!("message queue closed");
                    return Ok(None);
                }
                _ => {
                    // SAFETY: GetMessageW filled the structure.
                    let msg = unsafe { msg.assume_init() };
                    if let Some(notification) =
                        ChangeNotification::from_message(msg.message, msg.wParam)
                    {
                        return Ok(Some(notification));
                    }
                }
            }
        }
    }
}
