//! Scoped, exclusive access to the system clipboard.
//!
//! [`ResourceGuard::acquire`] retries while another process holds the
//! clipboard, up to the configured [`RetryPolicy`], and returns a
//! [`HeldClipboard`] that closes the clipboard when dropped. Acquiring takes
//! `&mut self`, so a second acquire while the first is still held does not
//! compile.

use std::thread;

use ck_core::clipboard::{ClipboardFormat, MemoryHandle};
use ck_core::ports::{ClipboardError, SystemClipboardPort};
use ck_core::RetryPolicy;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("clipboard still held by another process after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

pub struct ResourceGuard<C>
where
    C: SystemClipboardPort,
{
    clipboard: C,
    policy: RetryPolicy,
}

impl<C> ResourceGuard<C>
where
    C: SystemClipboardPort,
{
    pub fn new(clipboard: C, policy: RetryPolicy) -> Self {
        Self { clipboard, policy }
    }

    /// Opens the clipboard, retrying with backoff while it is busy.
    ///
    /// Errors other than contention are returned without retrying.
    pub fn acquire(&mut self) -> Result<HeldClipboard<'_, C>, GuardError> {
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            match self.clipboard.open() {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(attempt, "clipboard acquired after contention");
                    }
                    return Ok(HeldClipboard {
                        clipboard: &self.clipboard,
                        attempts: attempt,
                    });
                }
                Err(e) if e.is_busy() => {
                    let delay = self.policy.backoff_after(attempt);
                    debug!(attempt, ?delay, "clipboard busy, retrying");
                    if attempt < max_attempts && !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
                Err(e) => return Err(GuardError::Clipboard(e)),
            }
        }

        Err(GuardError::Exhausted {
            attempts: max_attempts,
        })
    }
}

/// The clipboard, open by this process until dropped.
pub struct HeldClipboard<'g, C>
where
    C: SystemClipboardPort,
{
    clipboard: &'g C,
    attempts: u32,
}

impl<C> HeldClipboard<'_, C>
where
    C: SystemClipboardPort,
{
    /// Number of open attempts it took to acquire the clipboard.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn data(&self, format: ClipboardFormat) -> Result<Option<MemoryHandle>, ClipboardError> {
        self.clipboard.data(format)
    }

    pub fn empty(&self) -> Result<(), ClipboardError> {
        self.clipboard.empty()
    }

    pub fn set_data(&self, format: ClipboardFormat, handle: MemoryHandle) -> Result<(), ClipboardError> {
        self.clipboard.set_data(format, handle)
    }
}

impl<C> Drop for HeldClipboard<'_, C>
where
    C: SystemClipboardPort,
{
    fn drop(&mut self) {
        if let Err(e) = self.clipboard.close() {
            warn!(error = %e, "failed to release clipboard");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::ports::mocks::MockClipboard;
    use mockall::{predicate::eq, Sequence};

    #[test]
    fn acquire_opens_once_and_releases_on_drop() {
        let mut clipboard = MockClipboard::new();
        let mut seq = Sequence::new();
        clipboard
            .expect_open()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        clipboard
            .expect_empty()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        clipboard
            .expect_close()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut guard = ResourceGuard::new(clipboard, RetryPolicy::immediate(3));
        {
            let held = guard.acquire().unwrap();
            assert_eq!(held.attempts(), 1);
            held.empty().unwrap();
        }
    }

    #[test]
    fn busy_clipboard_is_retried_until_available() {
        let mut clipboard = MockClipboard::new();
        let mut calls = 0;
        clipboard.expect_open().times(3).returning(move || {
            calls += 1;
            if calls < 3 {
                Err(ClipboardError::Busy)
            } else {
                Ok(())
            }
        });
        clipboard.expect_close().times(1).returning(|| Ok(()));

        let mut guard = ResourceGuard::new(clipboard, RetryPolicy::immediate(5));
        let held = guard.acquire().unwrap();
        assert_eq!(held.attempts(), 3);
    }

    #[test]
    fn acquisition_terminates_after_max_attempts() {
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_open()
            .times(4)
            .returning(|| Err(ClipboardError::Busy));
        clipboard.expect_close().never();

        let mut guard = ResourceGuard::new(clipboard, RetryPolicy::immediate(4));
        let result = guard.acquire().map(|held| held.attempts());

        assert_eq!(result, Err(GuardError::Exhausted { attempts: 4 }));
    }

    #[test]
    fn non_contention_failure_is_not_retried() {
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_open()
            .times(1)
            .returning(|| Err(ClipboardError::OpenFailed(5)));
        clipboard.expect_close().never();

        let mut guard = ResourceGuard::new(clipboard, RetryPolicy::immediate(10));
        let result = guard.acquire().map(|held| held.attempts());

        assert_eq!(
            result,
            Err(GuardError::Clipboard(ClipboardError::OpenFailed(5)))
        );
    }

    #[test]
    fn close_failure_does_not_panic() {
        let mut clipboard = MockClipboard::new();
        clipboard.expect_open().returning(|| Ok(()));
        clipboard
            .expect_data()
            .with(eq(ClipboardFormat::UnicodeText))
            .returning(|_| Ok(None));
        clipboard
            .expect_close()
            .times(1)
            .returning(|| Err(ClipboardError::CloseFailed(1418)));

        let mut guard = ResourceGuard::new(clipboard, RetryPolicy::immediate(1));
        let held = guard.acquire().unwrap();
        assert_eq!(held.data(ClipboardFormat::UnicodeText), Ok(None));
    }
}
