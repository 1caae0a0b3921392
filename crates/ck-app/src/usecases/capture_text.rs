use ck_core::clipboard::{decode_transfer_text, ClipboardFormat, ClipboardSnapshot, DecodeError};
use ck_core::ports::{ClipboardError, MemoryError, SharedMemoryPort, SystemClipboardPort};

use crate::guard::HeldClipboard;

/// Result of reading the clipboard as Unicode text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedText {
    Text(ClipboardSnapshot),
    /// No Unicode text on the clipboard: content was deleted, or something
    /// other than text was copied.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Reads the current clipboard text.
///
/// Requires the clipboard to be held. The only side effect is the
/// lock/unlock pair on the clipboard's own block, which stays owned by the
/// clipboard.
pub fn capture_text<C, M>(
    held: &HeldClipboard<'_, C>,
    memory: &M,
) -> Result<CapturedText, CaptureError>
where
    C: SystemClipboardPort,
    M: SharedMemoryPort,
{
    let Some(handle) = held.data(ClipboardFormat::UnicodeText)? else {
        return Ok(CapturedText::NoData);
    };

    let bytes = memory.read(handle)?;
    let text = decode_transfer_text(&bytes)?;

    Ok(CapturedText::Text(ClipboardSnapshot::new(text)))
}
