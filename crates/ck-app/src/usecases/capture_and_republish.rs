use ck_core::clipboard::{encode_for_transfer, ClipboardFormat, EncodeError};
use ck_core::ports::{ClipboardError, MemoryError, SharedMemoryPort, SystemClipboardPort};
use tracing::{error, info, info_span, trace, warn};

use super::capture_text::{capture_text, CaptureError, CapturedText};
use crate::guard::{GuardError, HeldClipboard, ResourceGuard};
use crate::memory::OwnedBlock;

/// How a capture/republish cycle ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The captured text now lives in a block owned by the clipboard.
    Republished { utf16_units: usize, attempts: u32 },
    /// The clipboard holds no Unicode text; nothing was changed.
    NoData,
    /// The cycle stopped early without leaving the clipboard inconsistent,
    /// except for [`SkipReason::Encode`], where the content was already
    /// emptied.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("could not acquire clipboard: {0}")]
    Contention(#[from] GuardError),

    #[error("could not capture clipboard text: {0}")]
    Capture(#[from] CaptureError),

    #[error("could not empty clipboard: {0}")]
    Empty(ClipboardError),

    #[error("could not re-encode captured text: {0}")]
    Encode(#[from] EncodeError),
}

/// Failures after the clipboard was emptied that leave it without a
/// successor. Every variant is fatal to the listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error("failed to allocate clipboard memory: {0}")]
    AllocationFailed(MemoryError),

    #[error("failed to write clipboard memory: {0}")]
    WriteFailed(MemoryError),

    #[error("failed to publish clipboard data: {0}")]
    PublishFailed(ClipboardError),
}

/// Use case that takes ownership of the text a user just copied.
///
/// ## Typical Flow
///
/// ```text
/// acquire clipboard
///   → capture Unicode text          (NoData: release, stop)
///   → empty clipboard               (raises a self-clear notification)
///   → encode, allocate, fill block
///   → publish block                 (raises a self-set notification)
/// release clipboard
/// ```
///
/// The clipboard is released on every exit path, fatal ones included,
/// because [`HeldClipboard`] closes it when dropped. A block that was not
/// published is freed by [`OwnedBlock`] before the clipboard is released.
pub struct CaptureAndRepublish<C, M>
where
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    guard: ResourceGuard<C>,
    memory: M,
}

impl<C, M> CaptureAndRepublish<C, M>
where
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    pub fn new(guard: ResourceGuard<C>, memory: M) -> Self {
        Self { guard, memory }
    }

    pub fn execute(&mut self) -> Result<CycleOutcome, CycleError> {
        let span = info_span!("usecase.capture_and_republish.execute");
        let _entered = span.enter();

        let held = match self.guard.acquire() {
            Ok(held) => held,
            Err(e) => {
                warn!(error = %e, "skipping clipboard change");
                return Ok(CycleOutcome::Skipped(e.into()));
            }
        };

        let snapshot = match capture_text(&held, &self.memory) {
            Ok(CapturedText::Text(snapshot)) => snapshot,
            Ok(CapturedText::NoData) => {
                info!("clipboard holds no text, nothing to take over");
                return Ok(CycleOutcome::NoData);
            }
            Err(e) => {
                warn!(error = %e, "skipping clipboard change");
                return Ok(CycleOutcome::Skipped(e.into()));
            }
        };
        trace!(text = %snapshot.preview(64), "captured clipboard text");

        if let Err(e) = held.empty() {
            warn!(error = %e, "clipboard left untouched");
            return Ok(CycleOutcome::Skipped(SkipReason::Empty(e)));
        }

        let encoded = match encode_for_transfer(snapshot.text()) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "clipboard was emptied and its text could not be restored");
                return Ok(CycleOutcome::Skipped(e.into()));
            }
        };

        publish(&held, &self.memory, &encoded).inspect_err(|e| {
            error!(error = %e, "clipboard left empty, no successor published");
        })?;

        let utf16_units = snapshot.utf16_len();
        info!(
            utf16_units,
            attempts = held.attempts(),
            copied_at = %snapshot
                .captured_at()
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S%.3f"),
            "SetClipboardData: OK"
        );

        Ok(CycleOutcome::Republished {
            utf16_units,
            attempts: held.attempts(),
        })
    }
}

/// Allocates a block for `encoded`, fills it and hands it to the clipboard.
fn publish<C, M>(held: &HeldClipboard<'_, C>, memory: &M, encoded: &[u8]) -> Result<(), CycleError>
where
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    let mut block = OwnedBlock::allocate(memory, encoded.len()).map_err(CycleError::AllocationFailed)?;
    block.fill(encoded).map_err(CycleError::WriteFailed)?;

    match held.set_data(ClipboardFormat::UnicodeText, block.handle()) {
        Ok(()) => {
            block.transfer();
            Ok(())
        }
        // `block` is freed on drop: ownership never moved.
        Err(e) => Err(CycleError::PublishFailed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::clipboard::MemoryHandle;
    use ck_core::ports::mocks::{MockClipboard, MockMemory};
    use ck_core::RetryPolicy;
    use mockall::{predicate::eq, Sequence};

    const SOURCE: usize = 0x10;
    const FRESH: usize = 0x20;

    fn source() -> MemoryHandle {
        MemoryHandle::from_raw(SOURCE)
    }

    fn fresh() -> MemoryHandle {
        MemoryHandle::from_raw(FRESH)
    }

    /// Memory that holds `text` in the source block and hands out `fresh`.
    fn memory_with(text: &'static str) -> MockMemory {
        let mut memory = MockMemory::new();
        memory
            .expect_read()
            .with(eq(source()))
            .returning(move |_| Ok(encode_for_transfer(text).unwrap()));
        memory
    }

    #[test]
    fn republishes_in_order_and_releases() {
        let mut seq = Sequence::new();
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_open()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        clipboard
            .expect_data()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(source())));
        clipboard
            .expect_empty()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        clipboard
            .expect_set_data()
            .with(eq(ClipboardFormat::UnicodeText), eq(fresh()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        clipboard
            .expect_close()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut memory = memory_with("hello world");
        memory
            .expect_allocate()
            .with(eq(24))
            .times(1)
            .returning(|_| Ok(fresh()));
        memory.expect_write().times(1).returning(|_, _| Ok(()));
        memory.expect_free().never();

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(1)),
            memory,
        );

        assert_eq!(
            cycle.execute(),
            Ok(CycleOutcome::Republished {
                utf16_units: 11,
                attempts: 1
            })
        );
    }

    #[test]
    fn publish_failure_frees_block_then_releases() {
        let mut seq = Sequence::new();
        let mut clipboard = MockClipboard::new();
        clipboard.expect_open().returning(|| Ok(()));
        clipboard.expect_data().returning(|_| Ok(Some(source())));
        clipboard.expect_empty().returning(|| Ok(()));
        clipboard
            .expect_set_data()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(ClipboardError::SetFailed(5)));

        let mut memory = memory_with("lost");
        memory.expect_allocate().returning(|_| Ok(fresh()));
        memory.expect_write().returning(|_, _| Ok(()));
        memory
            .expect_free()
            .with(eq(fresh()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        clipboard
            .expect_close()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(1)),
            memory,
        );

        assert_eq!(
            cycle.execute(),
            Err(CycleError::PublishFailed(ClipboardError::SetFailed(5)))
        );
    }

    #[test]
    fn allocation_failure_is_fatal_and_releases() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_open().returning(|| Ok(()));
        clipboard.expect_data().returning(|_| Ok(Some(source())));
        clipboard.expect_empty().times(1).returning(|| Ok(()));
        clipboard.expect_set_data().never();
        clipboard.expect_close().times(1).returning(|| Ok(()));

        let mut memory = memory_with("abc");
        memory
            .expect_allocate()
            .returning(|size| Err(MemoryError::AllocFailed { size, code: 8 }));
        memory.expect_free().never();

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(1)),
            memory,
        );

        assert_eq!(
            cycle.execute(),
            Err(CycleError::AllocationFailed(MemoryError::AllocFailed {
                size: 8,
                code: 8
            }))
        );
    }

    #[test]
    fn write_failure_frees_block() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_open().returning(|| Ok(()));
        clipboard.expect_data().returning(|_| Ok(Some(source())));
        clipboard.expect_empty().returning(|| Ok(()));
        clipboard.expect_set_data().never();
        clipboard.expect_close().times(1).returning(|| Ok(()));

        let mut memory = memory_with("abc");
        memory.expect_allocate().returning(|_| Ok(fresh()));
        memory
            .expect_write()
            .returning(|_, _| Err(MemoryError::LockFailed(87)));
        memory
            .expect_free()
            .with(eq(fresh()))
            .times(1)
            .returning(|_| Ok(()));

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(1)),
            memory,
        );

        assert_eq!(
            cycle.execute(),
            Err(CycleError::WriteFailed(MemoryError::LockFailed(87)))
        );
    }

    #[test]
    fn no_data_releases_without_emptying() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_open().times(1).returning(|| Ok(()));
        clipboard.expect_data().returning(|_| Ok(None));
        clipboard.expect_empty().never();
        clipboard.expect_set_data().never();
        clipboard.expect_close().times(1).returning(|| Ok(()));

        let mut memory = MockMemory::new();
        memory.expect_allocate().never();

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(1)),
            memory,
        );

        assert_eq!(cycle.execute(), Ok(CycleOutcome::NoData));
    }

    #[test]
    fn empty_failure_skips_and_keeps_content() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_open().returning(|| Ok(()));
        clipboard.expect_data().returning(|_| Ok(Some(source())));
        clipboard
            .expect_empty()
            .returning(|| Err(ClipboardError::EmptyFailed(5)));
        clipboard.expect_set_data().never();
        clipboard.expect_close().times(1).returning(|| Ok(()));

        let mut memory = memory_with("kept");
        memory.expect_allocate().never();

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(1)),
            memory,
        );

        assert_eq!(
            cycle.execute(),
            Ok(CycleOutcome::Skipped(SkipReason::Empty(
                ClipboardError::EmptyFailed(5)
            )))
        );
    }

    #[test]
    fn exhausted_contention_skips_without_release() {
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_open()
            .times(2)
            .returning(|| Err(ClipboardError::Busy));
        clipboard.expect_close().never();

        let mut cycle = CaptureAndRepublish::new(
            ResourceGuard::new(clipboard, RetryPolicy::immediate(2)),
            MockMemory::new(),
        );

        assert_eq!(
            cycle.execute(),
            Ok(CycleOutcome::Skipped(SkipReason::Contention(
                GuardError::Exhausted { attempts: 2 }
            )))
        );
    }
}
