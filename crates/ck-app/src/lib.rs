//! clipkeeper application layer
//!
//! This crate contains the capture/republish use cases and the listener
//! state machine that feeds clipboard notifications into them.

pub mod guard;
pub mod memory;
pub mod usecases;

pub use guard::{GuardError, HeldClipboard, ResourceGuard};
pub use memory::OwnedBlock;
pub use usecases::{
    capture_text, CaptureAndRepublish, CaptureError, CapturedText, ClipboardListener,
    CycleError, CycleOutcome, Dispatch, ListenerError, ListenerStats, RunListener, SelfCause,
    SkipReason,
};
