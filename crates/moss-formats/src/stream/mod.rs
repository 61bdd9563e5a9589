//! Byte-stream codec
//!
//! Stateless primitives that move values between raw bytes and Rust types in
//! either byte order. Every fixed-size read is "exactly N bytes or fail": a
//! short read is reported as [`StreamError::ShortRead`], never zero-filled.
//!
//! The only deliberately lenient primitives are
//! [`null_terminated_string`], which falls back to a caller-supplied default,
//! and [`read_varint7`], which stops quietly at the end of the stream.
//!
//! Byte order is expressed with [`binrw::Endian`] so the primitives compose
//! with `binrw` derived structures.

mod block;
mod error;
mod numeric;
mod text;

pub use binrw::Endian;
pub use block::{
    BLOCK_HEADER_SIZE, MAX_BLOCK_PAYLOAD, peek, read_block, read_unix_timestamp, read_varint7,
    unix_timestamp, write_block, write_varint7,
};
pub use error::{StreamError, StreamResult};
pub use numeric::{
    IntWidth, decode_uint, encode_uint, read_array, read_bytes, read_f32_le, read_f64_le,
    read_fully, read_i8, read_i16, read_i24, read_i32, read_i64, read_int, read_u8, read_u16,
    read_u24, read_u32, read_u64, read_uint, write_f32_le, write_f64_le, write_int, write_u8,
    write_u16, write_u24, write_u32, write_u64, write_uint,
};
pub use text::{
    Charset, null_terminated_string, read_fixed_string, read_utf16_prefixed,
    utf16_null_terminated, write_fixed_string, write_utf16_prefixed,
};
