//! Four-character chunk identifiers

use std::fmt;

/// A 4-byte chunk identifier
///
/// Compared and hashed as a raw value, displayed as four ASCII characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// Reserved all-zero identifier, filler
    pub const NULL: Self = Self([0; 4]);
    /// Top-level RIFF form
    pub const RIFF: Self = Self(*b"RIFF");
    /// Nested list group
    pub const LIST: Self = Self(*b"LIST");
    /// Padding chunk
    pub const JUNK: Self = Self(*b"JUNK");
    /// Lower-case padding chunk written by some tools
    pub const JUNK_LOWER: Self = Self(*b"junk");

    /// Create an identifier from its raw bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Create an identifier from its 32-bit value, first character in the high byte
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// The 32-bit value of the identifier, first character in the high byte
    pub const fn as_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Raw bytes as they appear in a file
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// True when every byte is printable ASCII, or for the reserved null identifier
    pub fn is_valid(self) -> bool {
        self == Self::NULL || self.0.iter().all(|b| (0x20..=0x7E).contains(b))
    }

    /// True for identifiers whose chunks only contain other chunks
    pub fn is_group(self) -> bool {
        self == Self::RIFF || self == Self::LIST
    }

    /// True for padding identifiers that carry no data
    pub fn is_filler(self) -> bool {
        self == Self::NULL || self == Self::JUNK || self == Self::JUNK_LOWER
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<&[u8; 4]> for FourCc {
    fn from(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| (0x20..=0x7E).contains(b)) {
            for &b in &self.0 {
                write!(f, "{}", char::from(b))?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08X}", self.as_u32())
        }
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({self})")
    }
}
