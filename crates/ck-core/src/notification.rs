//! Clipboard change notifications and their classification.
//!
//! The system broadcasts a content-changed message for every ownership
//! change of the clipboard, including the ones this process causes while
//! republishing. The subtype carried by the message tells them apart.

/// Message identifier of a clipboard content change (`WM_CLIPBOARDUPDATE`).
pub const CLIPBOARD_UPDATE_MESSAGE: u32 = 0x031D;

/// Subtype reported after this process set clipboard data.
pub const SET_MARKER: usize = 0x4;

/// Subtype reported after this process emptied the clipboard.
pub const EMPTY_MARKER: usize = 0x0;

/// One clipboard ownership change, as delivered to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotification {
    message: u32,
    subtype: usize,
}

impl ChangeNotification {
    /// Builds a notification from a raw window message.
    ///
    /// Returns `None` for any message other than a clipboard update.
    pub fn from_message(message: u32, subtype: usize) -> Option<Self> {
        (message == CLIPBOARD_UPDATE_MESSAGE).then_some(Self { message, subtype })
    }

    /// Shorthand for a clipboard update carrying `subtype`.
    pub fn clipboard_update(subtype: usize) -> Self {
        Self {
            message: CLIPBOARD_UPDATE_MESSAGE,
            subtype,
        }
    }

    pub fn message(&self) -> u32 {
        self.message
    }

    pub fn subtype(&self) -> usize {
        self.subtype
    }
}

/// Cause of a clipboard change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationClass {
    /// Raised by this process emptying the clipboard.
    SelfClear,
    /// Raised by this process publishing new clipboard data.
    SelfSet,
    /// Raised by anything else: another application copying, or content
    /// being deleted without replacement.
    External,
}

impl NotificationClass {
    pub fn is_self_caused(self) -> bool {
        !matches!(self, NotificationClass::External)
    }
}

/// Classifies a notification. Pure: inspects the subtype only.
pub fn classify(notification: &ChangeNotification) -> NotificationClass {
    match notification.subtype {
        SET_MARKER => NotificationClass::SelfSet,
        EMPTY_MARKER => NotificationClass::SelfClear,
        _ => NotificationClass::External,
    }
}
