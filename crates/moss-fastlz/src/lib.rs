//! FastLZ block compression for sampler preset containers
//!
//! Some proprietary sampler containers store their preset payload as a FastLZ
//! block: a byte-oriented LZ77 variant with two compression levels. This crate
//! provides a symmetric compressor and decompressor operating on byte slices.
//!
//! # Framing
//!
//! A block has no header of its own. The top three bits of the first byte carry
//! the compression level (1 or 2); the remaining bits belong to the first
//! literal run. The uncompressed length is *not* stored in the block, the
//! surrounding container must record it and hand it to [`decompress`].
//!
//! # Examples
//!
//! ```
//! use moss_fastlz::{compress, decompress};
//!
//! let data = b"sample sample sample sample sample";
//! let packed = compress(data);
//! let unpacked = decompress(&packed, data.len()).expect("valid block");
//! assert_eq!(unpacked, data);
//! ```

#![warn(missing_docs)]

mod compress;
mod decompress;
pub mod error;

pub use compress::{compress, compress_with_level, max_compressed_len};
pub use decompress::{block_level, decompress};
pub use error::{FastLzError, FastLzResult};

/// Inputs of this length and above are compressed with [`Level::Two`]
pub const LEVEL_TWO_THRESHOLD: usize = 65536;

/// Number of bits used by the match-finder hash
pub(crate) const HASH_LOG: u32 = 13;
/// Number of slots in the match-finder hash table
pub(crate) const HASH_SIZE: usize = 1 << HASH_LOG;
/// Longest literal run a single control byte can announce
pub(crate) const MAX_COPY: usize = 32;
/// Longest match a single level 1 token can describe
pub(crate) const MAX_LEN: usize = 264;
/// Level 1 back-reference window
pub(crate) const MAX_L1_DISTANCE: usize = 8192;
/// Level 2 near back-reference window
pub(crate) const MAX_L2_DISTANCE: usize = 8191;
/// Level 2 far back-reference window
pub(crate) const MAX_FAR_DISTANCE: usize = 65535 + MAX_L2_DISTANCE - 1;

/// FastLZ compression level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Level {
    /// Level 1, 8 KiB window, fastest
    One = 1,
    /// Level 2, adds run detection and far references up to ~72 KiB
    Two = 2,
}

impl Level {
    /// Select the level used for an input of `len` bytes
    pub fn for_length(len: usize) -> Self {
        if len < LEVEL_TWO_THRESHOLD {
            Self::One
        } else {
            Self::Two
        }
    }

    /// Parse the level number stored in the top three bits of a block's first byte
    pub fn from_marker(byte: u8) -> FastLzResult<Self> {
        match byte >> 5 {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(FastLzError::CompressionLevelUnsupported(other)),
        }
    }

    /// Bits OR'd into the first byte of a block compressed at this level
    pub fn marker(self) -> u8 {
        (self as u8) << 5
    }
}
