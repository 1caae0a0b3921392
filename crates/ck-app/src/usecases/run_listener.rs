use ck_core::ports::{NotificationSourcePort, SharedMemoryPort, SystemClipboardPort};
use tracing::{error, info, info_span};

use super::capture_and_republish::CycleError;
use super::handle_clipboard_notification::{ClipboardListener, ListenerStats};

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("notification source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("fatal clipboard failure: {0}")]
    Fatal(#[from] CycleError),
}

/// Use case for the outer dispatch loop.
///
/// Blocks on the notification source and feeds each notification to the
/// listener, one at a time. Cycles are therefore strictly serialized. The
/// loop ends when the source shuts down or a cycle fails fatally.
pub struct RunListener<S, C, M>
where
    S: NotificationSourcePort,
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    source: S,
    listener: ClipboardListener<C, M>,
}

impl<S, C, M> RunListener<S, C, M>
where
    S: NotificationSourcePort,
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    pub fn new(source: S, listener: ClipboardListener<C, M>) -> Self {
        Self { source, listener }
    }

    pub fn execute(&mut self) -> Result<ListenerStats, ListenerError> {
        let span = info_span!("usecase.run_listener.execute");
        let _entered = span.enter();

        info!("listening for clipboard changes");

        loop {
            let notification = match self.source.next_notification() {
                Ok(Some(notification)) => notification,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "notification source failed");
                    return Err(ListenerError::Source(Box::new(e)));
                }
            };

            if let Err(e) = self.listener.handle(&notification) {
                error!(error = %e, stats = ?self.listener.stats(), "stopping listener");
                return Err(e.into());
            }
        }

        let stats = self.listener.stats();
        info!(?stats, "notification source closed, listener stopped");
        Ok(stats)
    }
}
