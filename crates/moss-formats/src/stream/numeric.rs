//! Fixed-width integer and floating point codecs

use std::io::{ErrorKind, Read, Write};

use binrw::Endian;

use super::error::{StreamError, StreamResult};

/// Width of a fixed-size integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// One byte
    W8,
    /// Two bytes
    W16,
    /// Three bytes, used by some sample-frame fields
    W24,
    /// Four bytes
    W32,
    /// Eight bytes
    W64,
}

impl IntWidth {
    /// Number of bytes occupied by a field of this width
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W24 => 3,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// Number of bits occupied by a field of this width
    pub const fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }
}

/// Fill `buf` completely from `reader`
///
/// Unlike `read_exact` the error reports how many bytes were actually available.
pub fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> StreamResult<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(StreamError::ShortRead {
                    expected: buf.len(),
                    actual: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Read exactly `len` bytes
pub fn read_bytes<R: Read>(reader: &mut R, len: usize) -> StreamResult<Vec<u8>> {
    // Grow while reading so a bogus length cannot force a huge allocation up front
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    let actual = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if actual < len {
        return Err(StreamError::ShortRead {
            expected: len,
            actual,
        });
    }
    Ok(buf)
}

/// Read a fixed-size byte array
pub fn read_array<const N: usize, R: Read>(reader: &mut R) -> StreamResult<[u8; N]> {
    let mut buf = [0u8; N];
    read_fully(reader, &mut buf)?;
    Ok(buf)
}

/// Decode an unsigned integer from up to eight bytes
pub fn decode_uint(bytes: &[u8], endian: Endian) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    match endian {
        Endian::Big => bytes.iter().fold(0, fold),
        Endian::Little => bytes.iter().rev().fold(0, fold),
    }
}

/// Encode the low `width` bytes of `value`
pub fn encode_uint(value: u64, width: IntWidth, endian: Endian) -> Vec<u8> {
    let le = value.to_le_bytes();
    let mut out = le[..width.bytes()].to_vec();
    if matches!(endian, Endian::Big) {
        out.reverse();
    }
    out
}

fn sign_extend(value: u64, width: IntWidth) -> i64 {
    let shift = 64 - width.bits();
    ((value << shift) as i64) >> shift
}

/// Read an unsigned integer of the given width, never sign-extended
pub fn read_uint<R: Read>(reader: &mut R, width: IntWidth, endian: Endian) -> StreamResult<u64> {
    let mut buf = [0u8; 8];
    let slice = &mut buf[..width.bytes()];
    read_fully(reader, slice)?;
    Ok(decode_uint(slice, endian))
}

/// Read a two's complement signed integer of the given width
pub fn read_int<R: Read>(reader: &mut R, width: IntWidth, endian: Endian) -> StreamResult<i64> {
    Ok(sign_extend(read_uint(reader, width, endian)?, width))
}

/// Write the low `width` bytes of `value`; higher bits are discarded
pub fn write_uint<W: Write>(
    writer: &mut W,
    value: u64,
    width: IntWidth,
    endian: Endian,
) -> StreamResult<()> {
    writer.write_all(&encode_uint(value, width, endian))?;
    Ok(())
}

/// Write a signed integer truncated to `width` bytes
pub fn write_int<W: Write>(
    writer: &mut W,
    value: i64,
    width: IntWidth,
    endian: Endian,
) -> StreamResult<()> {
    write_uint(writer, value as u64, width, endian)
}

/// Read one unsigned byte
pub fn read_u8<R: Read>(reader: &mut R) -> StreamResult<u8> {
    Ok(read_array::<1, _>(reader)?[0])
}

/// Read one signed byte
pub fn read_i8<R: Read>(reader: &mut R) -> StreamResult<i8> {
    Ok(read_u8(reader)? as i8)
}

/// Read a 16-bit unsigned integer
pub fn read_u16<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<u16> {
    Ok(read_uint(reader, IntWidth::W16, endian)? as u16)
}

/// Read a 16-bit signed integer
pub fn read_i16<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<i16> {
    Ok(read_uint(reader, IntWidth::W16, endian)? as u16 as i16)
}

/// Read a 24-bit unsigned value widened into a `u32`
pub fn read_u24<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<u32> {
    Ok(read_uint(reader, IntWidth::W24, endian)? as u32)
}

/// Read a 24-bit signed value, sign-extended into an `i32`
pub fn read_i24<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<i32> {
    Ok(read_int(reader, IntWidth::W24, endian)? as i32)
}

/// Read a 32-bit unsigned integer
pub fn read_u32<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<u32> {
    Ok(read_uint(reader, IntWidth::W32, endian)? as u32)
}

/// Read a 32-bit signed integer
pub fn read_i32<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<i32> {
    Ok(read_uint(reader, IntWidth::W32, endian)? as u32 as i32)
}

/// Read a 64-bit unsigned integer
pub fn read_u64<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<u64> {
    read_uint(reader, IntWidth::W64, endian)
}

/// Read a 64-bit signed integer
pub fn read_i64<R: Read>(reader: &mut R, endian: Endian) -> StreamResult<i64> {
    Ok(read_uint(reader, IntWidth::W64, endian)? as i64)
}

/// Write one byte
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> StreamResult<()> {
    writer.write_all(&[value])?;
    Ok(())
}

/// Write a 16-bit integer
pub fn write_u16<W: Write>(writer: &mut W, value: u16, endian: Endian) -> StreamResult<()> {
    write_uint(writer, u64::from(value), IntWidth::W16, endian)
}

/// Write the low 24 bits of `value`
pub fn write_u24<W: Write>(writer: &mut W, value: u32, endian: Endian) -> StreamResult<()> {
    write_uint(writer, u64::from(value), IntWidth::W24, endian)
}

/// Write a 32-bit integer
pub fn write_u32<W: Write>(writer: &mut W, value: u32, endian: Endian) -> StreamResult<()> {
    write_uint(writer, u64::from(value), IntWidth::W32, endian)
}

/// Write a 64-bit integer
pub fn write_u64<W: Write>(writer: &mut W, value: u64, endian: Endian) -> StreamResult<()> {
    write_uint(writer, value, IntWidth::W64, endian)
}

/// Read an IEEE-754 single precision value stored little-endian
pub fn read_f32_le<R: Read>(reader: &mut R) -> StreamResult<f32> {
    Ok(f32::from_le_bytes(read_array(reader)?))
}

/// Read an IEEE-754 double precision value stored little-endian
pub fn read_f64_le<R: Read>(reader: &mut R) -> StreamResult<f64> {
    Ok(f64::from_le_bytes(read_array(reader)?))
}

/// Write an IEEE-754 single precision value little-endian
pub fn write_f32_le<W: Write>(writer: &mut W, value: f32) -> StreamResult<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Write an IEEE-754 double precision value little-endian
pub fn write_f64_le<W: Write>(writer: &mut W, value: f64) -> StreamResult<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}
