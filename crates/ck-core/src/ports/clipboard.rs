use crate::clipboard::{ClipboardFormat, MemoryHandle};
use crate::ports::errors::ClipboardError;

/// The system-wide clipboard, as seen by a single owning window.
///
/// Every method except [`open`](Self::open) requires the clipboard to be
/// open by this process. Callers go through `ck_app::guard::ResourceGuard`,
/// which pairs each successful `open` with exactly one `close`.
pub trait SystemClipboardPort {
    /// Makes a single attempt to open the clipboard.
    ///
    /// Returns [`ClipboardError::Busy`] when another process holds it.
    fn open(&self) -> Result<(), ClipboardError>;

    fn close(&self) -> Result<(), ClipboardError>;

    /// Handle of the data stored under `format`, or `None` when the
    /// clipboard holds no data in that format.
    ///
    /// The returned block stays owned by the clipboard.
    fn data(&self, format: ClipboardFormat) -> Result<Option<MemoryHandle>, ClipboardError>;

    /// Empties the clipboard, releasing the previous owner's data.
    fn empty(&self) -> Result<(), ClipboardError>;

    /// Transfers `handle` to the clipboard under `format`.
    ///
    /// On `Ok` the clipboard owns the block and the caller must never free
    /// it. On `Err` ownership was never transferred.
    fn set_data(&self, format: ClipboardFormat, handle: MemoryHandle) -> Result<(), ClipboardError>;
}
