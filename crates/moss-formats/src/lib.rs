//! Binary building blocks for sampler preset formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_sign_loss)] // Signed fields stored as raw bits
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate holds the format-independent core shared by the multisample
//! converters: byte-order aware primitives, a generic chunk tree with RIFF
//! reading and writing, WAVE format interpretation, and the directory records
//! of monolith containers.
//!
//! # Modules
//!
//! - **stream**: fixed-width integers, floats, strings, length-prefixed blocks,
//!   7-bit integers and peeking, in either byte order
//! - **chunk**: chunks with properties and ordered collections, in-memory or
//!   file-backed payloads, tolerant RIFF reader and writer
//! - **wav**: `fmt ` decoding and WAVE file access
//! - **monolith**: directory entries locating files inside a monolith archive
//!
//! Compressed preset payloads are handled by the `moss-fastlz` crate.
//!
//! # Design Principles
//!
//! - **Exact reads**: a fixed-size read either gets all its bytes or fails
//! - **Tolerant structure parsing**: damaged chunk trees are read as far as
//!   possible, anomalies are attached to the affected chunk
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

/// Hierarchical chunk container with RIFF reading and writing
///
/// See the [`chunk`] module for the payload model and the reader options.
pub mod chunk;
/// Monolith archive directory records
pub mod monolith;
/// Byte-order aware read and write primitives
pub mod stream;
/// WAVE audio file interpretation
pub mod wav;

#[cfg(test)]
pub mod test_utils;

pub use chunk::{Chunk, ChunkError, ChunkReader, FourCc, ReadOptions};
pub use monolith::{DirectoryEntry, MonolithError};
pub use stream::{Endian, StreamError};
pub use wav::{FormatChunk, WavError, WaveFile};
