use crate::notification::ChangeNotification;

/// Blocking source of clipboard change notifications.
pub trait NotificationSourcePort {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Blocks until the next clipboard notification arrives.
    ///
    /// Returns `Ok(None)` once the source has shut down.
    fn next_notification(&mut self) -> Result<Option<ChangeNotification>, Self::Error>;
}
