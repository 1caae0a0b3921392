//! Transfer encoding for `CF_UNICODETEXT`: native-endian UTF-16 code units
//! followed by exactly one NUL terminator.

use std::iter;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("text contains a NUL character at UTF-16 offset {offset}")]
    InteriorNul { offset: usize },

    #[error("text of {units} UTF-16 units does not fit in a memory block")]
    TooLarge { units: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("clipboard text is not valid UTF-16")]
    InvalidUtf16,
}

/// Encodes `text` into the bytes stored in a clipboard memory block.
///
/// The output is sized exactly: `(units + 1) * 2` bytes.
pub fn encode_for_transfer(text: &str) -> Result<Vec<u8>, EncodeError> {
    if let Some(offset) = text.encode_utf16().position(|unit| unit == 0) {
        return Err(EncodeError::InteriorNul { offset });
    }

    let units = text.encode_utf16().count();
    let size = units
        .checked_add(1)
        .and_then(|n| n.checked_mul(2))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(EncodeError::TooLarge { units })?;

    let mut bytes = Vec::with_capacity(size);
    for unit in text.encode_utf16().chain(iter::once(0)) {
        bytes.extend_from_slice(&unit.to_ne_bytes());
    }
    Ok(bytes)
}

/// Decodes the content of a clipboard memory block.
///
/// Reads up to the first NUL code unit or the end of the block. A trailing
/// odd byte is ignored. Anything after the terminator (allocator padding)
/// is discarded, so a republished block never carries it forward.
pub fn decode_transfer_text(bytes: &[u8]) -> Result<String, DecodeError> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();

    String::from_utf16(&units).map_err(|_| DecodeError::InvalidUtf16)
}
