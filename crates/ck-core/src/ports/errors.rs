#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard is held by another process")]
    Busy,

    #[error("failed to open clipboard (os error {0})")]
    OpenFailed(u32),

    #[error("failed to close clipboard (os error {0})")]
    CloseFailed(u32),

    #[error("failed to read clipboard data (os error {0})")]
    ReadFailed(u32),

    #[error("failed to empty clipboard (os error {0})")]
    EmptyFailed(u32),

    #[error("failed to set clipboard data (os error {0})")]
    SetFailed(u32),
}

impl ClipboardError {
    /// Contention is the only condition worth retrying.
    pub fn is_busy(&self) -> bool {
        matches!(self, ClipboardError::Busy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("failed to allocate {size} bytes of movable memory (os error {code})")]
    AllocFailed { size: usize, code: u32 },

    #[error("failed to lock memory block (os error {0})")]
    LockFailed(u32),

    #[error("failed to free memory block (os error {0})")]
    FreeFailed(u32),

    #[error("memory block holds {capacity} bytes, {needed} required")]
    TooSmall { capacity: usize, needed: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,
}
