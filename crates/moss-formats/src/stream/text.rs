//! String codecs: fixed-length, null-terminated and UTF-16 text

use std::io::{Read, Write};

use binrw::Endian;

use super::error::StreamResult;
use super::numeric::{read_bytes, read_u32, write_u32};

/// Character set of a fixed-length text field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    /// 7-bit ASCII, bytes above 0x7F decode to U+FFFD
    #[default]
    Ascii,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
    /// UTF-8, invalid sequences decode to U+FFFD
    Utf8,
    /// UTF-16 little-endian
    Utf16Le,
    /// UTF-16 big-endian
    Utf16Be,
}

impl Charset {
    /// Decode `bytes` in this character set
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii => bytes
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        char::from(b)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16Le => decode_utf16_units(bytes, Endian::Little, false),
            Self::Utf16Be => decode_utf16_units(bytes, Endian::Big, false),
        }
    }
}

fn decode_utf16_units(bytes: &[u8], endian: Endian, stop_at_zero: bool) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| match endian {
            Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
            Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
        })
        .take_while(|&unit| !stop_at_zero || unit != 0);
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Read a null-terminated string from `buf` starting at `offset`
///
/// Returns the text before the first zero byte. When `max_len` bytes are
/// scanned without finding a terminator the text is truncated to `max_len`.
/// When the buffer ends first, `default` is returned instead: callers use it to
/// keep going on damaged but still useful data.
pub fn null_terminated_string(
    buf: &[u8],
    offset: usize,
    max_len: Option<usize>,
    default: &str,
) -> String {
    let Some(tail) = buf.get(offset..) else {
        return default.to_string();
    };
    let window = max_len.map_or(tail, |max| &tail[..max.min(tail.len())]);

    if let Some(end) = window.iter().position(|&b| b == 0) {
        return String::from_utf8_lossy(&window[..end]).into_owned();
    }
    match max_len {
        Some(max) if tail.len() >= max => String::from_utf8_lossy(window).into_owned(),
        _ => default.to_string(),
    }
}

/// Read exactly `len` bytes and decode them
///
/// With `reverse` the bytes are flipped before decoding, for identifiers some
/// containers store back to front. Trailing zero padding is not stripped.
pub fn read_fixed_string<R: Read>(
    reader: &mut R,
    len: usize,
    charset: Charset,
    reverse: bool,
) -> StreamResult<String> {
    let mut bytes = read_bytes(reader, len)?;
    if reverse {
        bytes.reverse();
    }
    Ok(charset.decode(&bytes))
}

/// Write `text` into a field of exactly `width` bytes
///
/// Longer text is cut, shorter text is padded with zero bytes.
pub fn write_fixed_string<W: Write>(writer: &mut W, text: &str, width: usize) -> StreamResult<()> {
    let bytes = text.as_bytes();
    let used = bytes.len().min(width);
    writer.write_all(&bytes[..used])?;
    writer.write_all(&vec![0u8; width - used])?;
    Ok(())
}

/// Read a UTF-16LE string prefixed with its 32-bit little-endian character count
pub fn read_utf16_prefixed<R: Read>(reader: &mut R) -> StreamResult<String> {
    let count = read_u32(reader, Endian::Little)? as usize;
    let bytes = read_bytes(reader, count.saturating_mul(2))?;
    Ok(decode_utf16_units(&bytes, Endian::Little, false))
}

/// Write a UTF-16LE string prefixed with its 32-bit little-endian unit count
pub fn write_utf16_prefixed<W: Write>(writer: &mut W, text: &str) -> StreamResult<()> {
    let units: Vec<u16> = text.encode_utf16().collect();
    write_u32(writer, units.len() as u32, Endian::Little)?;
    for unit in units {
        writer.write_all(&unit.to_le_bytes())?;
    }
    Ok(())
}

/// Decode UTF-16 text from a flat buffer, stopping at the first zero code unit
pub fn utf16_null_terminated(buf: &[u8], endian: Endian) -> String {
    decode_utf16_units(buf, endian, true)
}
