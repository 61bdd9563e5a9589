//! Error types for monolith directory parsing

use thiserror::Error;

use crate::stream::StreamError;

/// Monolith directory result type
pub type MonolithResult<T> = Result<T, MonolithError>;

/// Errors raised while decoding directory records
#[derive(Debug, Error)]
pub enum MonolithError {
    /// Reference type code outside the known range 0 to 4
    #[error("Unknown reference type: {0}")]
    UnknownReferenceType(i16),

    /// Record length smaller than the 8-byte fixed header
    #[error("Invalid record length: {0} is shorter than the 8-byte header")]
    InvalidRecordLength(u16),

    /// Byte-stream decoding error
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl MonolithError {
    /// True when the directory ended before a record was complete
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Stream(e) if e.is_short_read())
    }
}
