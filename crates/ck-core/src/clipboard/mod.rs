//! Clipboard domain types: the text format, opaque memory handles, the
//! captured snapshot and the transfer encoding.

mod encoding;
mod format;
mod handle;
mod snapshot;

pub use encoding::{decode_transfer_text, encode_for_transfer, DecodeError, EncodeError};
pub use format::ClipboardFormat;
pub use handle::MemoryHandle;
pub use snapshot::ClipboardSnapshot;
