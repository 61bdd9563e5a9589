//! Chunk container error types

use thiserror::Error;

use super::fourcc::FourCc;
use crate::stream::StreamError;

/// Errors raised by the chunk container, reader and writer
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Neither an in-memory buffer nor a backing file was assigned
    #[error("chunk {0} has no payload")]
    NoPayload(FourCc),

    /// The payload was too large to load and is unavailable or only on disk
    #[error("chunk {0} payload is too large to hold in memory")]
    TooLarge(FourCc),

    /// An assigned payload is shorter than the declared size
    #[error("malformed data for chunk {id}: declared {declared} bytes, got {actual}")]
    MalformedChunkData {
        /// Chunk identifier
        id: FourCc,
        /// Size announced by the chunk header
        declared: u32,
        /// Length of the assigned buffer
        actual: usize,
    },

    /// A chunk header carried a non-printable identifier
    #[error("invalid chunk identifier {id} at offset {offset}")]
    InvalidIdentifier {
        /// Identifier as read
        id: FourCc,
        /// Stream offset of the chunk header
        offset: u64,
    },

    /// A different chunk was found where a specific one was required
    #[error("expected chunk {expected}, found {found}")]
    UnexpectedChunk {
        /// Required identifier
        expected: FourCc,
        /// Identifier actually found
        found: FourCc,
    },

    /// A chunk body does not fit the 32-bit size field
    #[error("chunk {id} body of {size} bytes exceeds the 32-bit size field")]
    SizeOverflow {
        /// Chunk identifier
        id: FourCc,
        /// Body length in bytes
        size: u64,
    },

    /// A group has children but no list type to write before them
    #[error("group {0} has children but no list type")]
    MissingListType(FourCc),

    /// Byte-stream decoding error
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// I/O error on a stream or backing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChunkError {
    /// True for the oversized-payload case, which callers may skip instead of aborting
    pub fn is_too_large(&self) -> bool {
        matches!(self, Self::TooLarge(_))
    }

    /// True when the input ended before a complete structure was read
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Stream(e) if e.is_short_read())
    }
}

/// Result type for chunk operations
pub type ChunkResult<T> = Result<T, ChunkError>;
