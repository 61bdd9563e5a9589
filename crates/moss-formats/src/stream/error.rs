//! Error types for byte-stream decoding

use thiserror::Error;

/// Errors raised by the byte-stream primitives
#[derive(Debug, Error)]
pub enum StreamError {
    /// Fewer bytes were available than a fixed-width or length-prefixed read requires
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Number of bytes the read required
        expected: usize,
        /// Number of bytes actually available
        actual: usize,
    },

    /// A length-prefixed block declared a size below its header or beyond what can be allocated
    #[error("invalid block size: {0}")]
    OversizedBlock(u64),

    /// An offset-based access fell outside the buffer
    #[error("range {offset}..{offset}+{len} is outside a buffer of {size} bytes")]
    OutOfBounds {
        /// Requested start offset
        offset: usize,
        /// Requested length
        len: usize,
        /// Size of the buffer
        size: usize,
    },

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StreamError {
    /// True when the error was caused by running out of data
    pub fn is_short_read(&self) -> bool {
        matches!(self, Self::ShortRead { .. } | Self::OutOfBounds { .. })
    }
}

/// Result type for byte-stream operations
pub type StreamResult<T> = Result<T, StreamError>;
