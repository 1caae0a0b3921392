/// Clipboard formats understood by clipkeeper.
///
/// Only plain Unicode text is ever requested; other formats on the
/// clipboard are never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardFormat {
    /// `CF_UNICODETEXT`: NUL-terminated UTF-16 text.
    UnicodeText,
}

impl ClipboardFormat {
    /// Numeric format selector used by the system clipboard.
    pub fn id(self) -> u32 {
        match self {
            ClipboardFormat::UnicodeText => 13,
        }
    }
}
