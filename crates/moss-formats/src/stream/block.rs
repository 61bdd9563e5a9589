//! Composite encodings: length-prefixed blocks, 7-bit integers, timestamps and peeking

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use binrw::Endian;
use chrono::{DateTime, Utc};

use super::error::{StreamError, StreamResult};
use super::numeric::{read_bytes, read_u32, read_u64, write_u64};

/// Size of the 64-bit length prefix, which counts itself
pub const BLOCK_HEADER_SIZE: u64 = 8;

/// Largest payload a length-prefixed block may declare
pub const MAX_BLOCK_PAYLOAD: u64 = isize::MAX as u64;

/// Read a block prefixed with a 64-bit size that includes the size field itself
pub fn read_block<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<Vec<u8>> {
    let size = read_u64(reader, endian)?;
    if size < BLOCK_HEADER_SIZE || size - BLOCK_HEADER_SIZE > MAX_BLOCK_PAYLOAD {
        return Err(StreamError::OversizedBlock(size));
    }
    let len = usize::try_from(size - BLOCK_HEADER_SIZE)
        .map_err(|_| StreamError::OversizedBlock(size))?;
    read_bytes(reader, len)
}

/// Write `payload` prefixed with its length plus the 8 header bytes
pub fn write_block<W: Write>(writer: &mut W, payload: &[u8], endian: Endian) -> StreamResult<()> {
    write_u64(writer, payload.len() as u64 + BLOCK_HEADER_SIZE, endian)?;
    writer.write_all(payload)?;
    Ok(())
}

/// Read a 7-bit variable-length integer, least significant group first
///
/// Returns the value and the number of bytes consumed. Reaching the end of the
/// stream in the middle of a sequence is not an error, the value holds whatever
/// groups were read. Groups beyond the 64th bit are consumed but ignored.
pub fn read_varint7<R: Read>(reader: &mut R) -> StreamResult<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut consumed = 0usize;
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
        consumed += 1;

        if shift < 64 {
            value |= u64::from(byte[0] & 0x7F) << shift;
        }
        shift += 7;

        if byte[0] & 0x80 == 0 {
            break;
        }
    }

    Ok((value, consumed))
}

/// Write a 7-bit variable-length integer, returning the number of bytes written
pub fn write_varint7<W: Write>(writer: &mut W, mut value: u64) -> StreamResult<usize> {
    let mut written = 0;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        writer.write_all(&[byte])?;
        written += 1;
        if value == 0 {
            return Ok(written);
        }
    }
}

/// Convert seconds since the Unix epoch into a UTC calendar time
pub fn unix_timestamp(seconds: u32) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(i64::from(seconds) * 1000).unwrap_or_default()
}

/// Read a 32-bit Unix timestamp
pub fn read_unix_timestamp<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<DateTime<Utc>> {
    Ok(unix_timestamp(read_u32(reader, endian)?))
}

/// Read `len` bytes and restore the stream position afterwards
///
/// The position is restored on failure as well, so format sniffing can try
/// another interpretation of the same bytes.
pub fn peek<R: Read + Seek>(reader: &mut R, len: usize) -> StreamResult<Vec<u8>> {
    let start = reader.stream_position()?;
    let result = read_bytes(reader, len);
    reader.seek(SeekFrom::Start(start))?;
    result
}
