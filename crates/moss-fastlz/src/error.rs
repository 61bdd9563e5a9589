//! Error types for FastLZ operations

use thiserror::Error;

/// Errors that can occur while decompressing a FastLZ block
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FastLzError {
    /// The level marker in the first byte is not 1 or 2
    #[error("unsupported compression level: {0}")]
    CompressionLevelUnsupported(u8),

    /// A token would write past the output buffer or reference data before its start
    #[error("corrupt data at input offset {offset}: {reason}")]
    CorruptData {
        /// Offset of the offending token in the compressed input
        offset: usize,
        /// Description of the violated bound
        reason: String,
    },

    /// The compressed input ended inside a token
    #[error("compressed input truncated at offset {offset}")]
    TruncatedInput {
        /// Offset at which more input was required
        offset: usize,
    },

    /// The block decoded to a different length than the caller expected
    #[error("decompressed length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length supplied by the caller
        expected: usize,
        /// Length actually produced
        actual: usize,
    },
}

impl FastLzError {
    /// True when the error signals data that was never compressed rather than damage
    pub fn is_uncompressed_block(&self) -> bool {
        matches!(self, Self::CompressionLevelUnsupported(0))
    }
}

/// Result type for FastLZ operations
pub type FastLzResult<T> = Result<T, FastLzError>;
