//! WAVE audio files
//!
//! Interprets RIFF/WAVE chunk trees: the `fmt ` chunk is decoded into a
//! [`FormatChunk`], sample data stays in its `data` chunk (in memory or
//! file-backed), and every other chunk is kept untouched for rewriting.

mod error;
mod file;
mod format;

pub use error::{WavError, WavResult};
pub use file::WaveFile;
pub use format::{
    FMT_ID, FormatChunk, FormatExtension, WAVE_FORMAT_EXTENSIBLE, WAVE_FORMAT_IEEE_FLOAT,
    WAVE_FORMAT_PCM,
};

use crate::chunk::FourCc;

/// RIFF form type of WAVE files
pub const WAVE_ID: FourCc = FourCc::new(*b"WAVE");
/// Sample data chunk
pub const DATA_ID: FourCc = FourCc::new(*b"data");
/// Sample count chunk of compressed formats
pub const FACT_ID: FourCc = FourCc::new(*b"fact");
