//! Error types for WAV parsing

use thiserror::Error;

use crate::chunk::{ChunkError, FourCc};

/// WAV result type
pub type WavResult<T> = Result<T, WavError>;

/// Errors raised while interpreting a RIFF/WAVE stream
#[derive(Debug, Error)]
pub enum WavError {
    /// The RIFF form is not of type `WAVE`
    #[error("Not a WAVE file: form type {0}")]
    NotWave(FourCc),

    /// A required chunk is absent
    #[error("Missing required chunk: {0}")]
    MissingChunk(FourCc),

    /// The `fmt ` chunk is too short or inconsistent
    #[error("Invalid format chunk: {0}")]
    InvalidFormatChunk(String),

    /// Chunk container error
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Structure decoding error
    #[error("Binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl WavError {
    /// True when sample data was left on disk or skipped instead of loaded
    pub fn is_too_large(&self) -> bool {
        matches!(self, Self::Chunk(e) if e.is_too_large())
    }
}
