//! Directory record with a fixed header and variable trailer

use std::fmt;
use std::io::{Read, Seek};

use binrw::{BinRead, BinResult, Endian};

use super::error::{MonolithError, MonolithResult};
use crate::stream::{read_bytes, read_i16, read_u16, read_u32, utf16_null_terminated};

/// Size of the fixed record header: length, pointer and reference type
pub const ENTRY_HEADER_SIZE: u16 = 8;

/// Kind of item a directory record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ReferenceType {
    /// Unused slot
    Empty = 0,
    /// Nested directory
    Directory = 1,
    /// Embedded file
    File = 2,
    /// Alias of another entry
    Alias = 3,
    /// Container metadata block
    Metadata = 4,
}

impl ReferenceType {
    /// Raw code as stored in the record
    pub const fn code(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for ReferenceType {
    type Error = MonolithError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Directory),
            2 => Ok(Self::File),
            3 => Ok(Self::Alias),
            4 => Ok(Self::Metadata),
            other => Err(MonolithError::UnknownReferenceType(other)),
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Directory => "directory",
            Self::File => "file",
            Self::Alias => "alias",
            Self::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// One record of a monolith directory
///
/// Layout, in the byte order of the whole archive:
///
/// | Field            | Size                  |
/// |------------------|-----------------------|
/// | record length    | 2                     |
/// | pointer          | 4                     |
/// | reference type   | 2 (signed)            |
/// | content          | record length - 8     |
///
/// The pointer is an absolute offset into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    record_length: u16,
    pointer: u32,
    reference_type: ReferenceType,
    content: Vec<u8>,
    endian: Endian,
}

impl DirectoryEntry {
    /// Read one record at the current position
    pub fn read<R: Read>(reader: &mut R, endian: Endian) -> MonolithResult<Self> {
        let record_length = read_u16(reader, endian)?;
        if record_length < ENTRY_HEADER_SIZE {
            return Err(MonolithError::InvalidRecordLength(record_length));
        }
        let pointer = read_u32(reader, endian)?;
        let reference_type = ReferenceType::try_from(read_i16(reader, endian)?)?;
        let content = read_bytes(reader, usize::from(record_length - ENTRY_HEADER_SIZE))?;

        Ok(Self {
            record_length,
            pointer,
            reference_type,
            content,
            endian,
        })
    }

    /// Total record length, header included
    pub fn record_length(&self) -> u16 {
        self.record_length
    }

    /// Absolute offset of the referenced item in the archive
    pub fn pointer(&self) -> u32 {
        self.pointer
    }

    /// Kind of the referenced item
    pub fn reference_type(&self) -> ReferenceType {
        self.reference_type
    }

    /// Raw trailing bytes
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-16 up to the first zero unit
    pub fn as_wide_string(&self) -> String {
        utf16_null_terminated(&self.content, self.endian)
    }
}

impl BinRead for DirectoryEntry {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        Self::read(reader, endian).map_err(|e| binrw::Error::Custom {
            pos,
            err: Box::new(e),
        })
    }
}

/// Read `count` consecutive records
pub fn read_directory<R: Read>(
    reader: &mut R,
    endian: Endian,
    count: usize,
) -> MonolithResult<Vec<DirectoryEntry>> {
    (0..count)
        .map(|_| DirectoryEntry::read(reader, endian))
        .collect()
}
