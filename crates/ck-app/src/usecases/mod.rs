mod capture_and_republish;
mod capture_text;
mod handle_clipboard_notification;
mod run_listener;

pub use capture_and_republish::{CaptureAndRepublish, CycleError, CycleOutcome, SkipReason};
pub use capture_text::{capture_text, CaptureError, CapturedText};
pub use handle_clipboard_notification::{ClipboardListener, Dispatch, ListenerStats, SelfCause};
pub use run_listener::{ListenerError, RunListener};
