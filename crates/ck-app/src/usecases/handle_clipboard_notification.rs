use ck_core::notification::{classify, ChangeNotification, NotificationClass};
use ck_core::ports::{SharedMemoryPort, SystemClipboardPort};
use tracing::{debug, info_span};

use super::capture_and_republish::{CaptureAndRepublish, CycleError, CycleOutcome};

/// Which of the cycle's own operations raised a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfCause {
    Clear,
    Set,
}

/// What the listener did with one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Self-caused notification, dropped without touching the clipboard.
    Suppressed(SelfCause),
    /// External notification, handled by one capture/republish cycle.
    Cycle(CycleOutcome),
}

/// Counters kept across the listener's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub external: u64,
    pub suppressed_clear: u64,
    pub suppressed_set: u64,
    pub republished: u64,
    pub no_data: u64,
    pub skipped: u64,
}

impl ListenerStats {
    pub fn suppressed(&self) -> u64 {
        self.suppressed_clear + self.suppressed_set
    }

    fn record(&mut self, dispatch: &Dispatch) {
        match dispatch {
            Dispatch::Suppressed(SelfCause::Clear) => self.suppressed_clear += 1,
            Dispatch::Suppressed(SelfCause::Set) => self.suppressed_set += 1,
            Dispatch::Cycle(outcome) => match outcome {
                CycleOutcome::Republished { .. } => self.republished += 1,
                CycleOutcome::NoData => self.no_data += 1,
                CycleOutcome::Skipped(_) => self.skipped += 1,
            },
        }
    }
}

/// State machine driven once per clipboard notification.
///
/// Self-caused notifications (the clear and the set issued by a cycle) are
/// classified before the clipboard is touched and terminate with no side
/// effect, so one external change triggers exactly one cycle.
pub struct ClipboardListener<C, M>
where
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    cycle: CaptureAndRepublish<C, M>,
    stats: ListenerStats,
}

impl<C, M> ClipboardListener<C, M>
where
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    pub fn new(cycle: CaptureAndRepublish<C, M>) -> Self {
        Self {
            cycle,
            stats: ListenerStats::default(),
        }
    }

    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    pub fn handle(&mut self, notification: &ChangeNotification) -> Result<Dispatch, CycleError> {
        let class = classify(notification);
        let span = info_span!(
            "usecase.handle_clipboard_notification.execute",
            subtype = notification.subtype(),
            ?class
        );
        let _entered = span.enter();

        let dispatch = match class {
            NotificationClass::SelfClear => {
                debug!("ignoring self-caused clipboard notification");
                Dispatch::Suppressed(SelfCause::Clear)
            }
            NotificationClass::SelfSet => {
                debug!("ignoring self-caused clipboard notification");
                Dispatch::Suppressed(SelfCause::Set)
            }
            NotificationClass::External => {
                self.stats.external += 1;
                Dispatch::Cycle(self.cycle.execute()?)
            }
        };

        self.stats.record(&dispatch);
        Ok(dispatch)
    }
}
