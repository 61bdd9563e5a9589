//! Hierarchical chunk container
//!
//! A [`Chunk`] has a four-character identifier, a type tag, an optional
//! declared size and a payload. It can also hold child chunks in two
//! tables:
//!
//! - properties, keyed by (identifier, type), where the last insert wins
//! - an ordered collection, which may repeat identifiers
//!
//! Payloads either live in memory or are backed by a file. Payloads above a
//! configurable threshold are spilled into a [`SpillStore`] while reading,
//! or skipped and flagged as too large.
//!
//! # Example
//!
//! ```
//! use moss_formats::chunk::{Chunk, ChunkReader, FourCc, ReadOptions};
//! use std::io::Cursor;
//!
//! let mut form = Chunk::group(FourCc::RIFF, FourCc::new(*b"WAVE"));
//! let mut data = form.new_child(FourCc::new(*b"data"));
//! data.set_data(vec![1, 2, 3])?;
//! form.add_to_collection(data);
//!
//! let bytes = form.to_bytes()?;
//! let parsed = ChunkReader::new(ReadOptions::default()).read(&mut Cursor::new(bytes))?;
//! assert_eq!(parsed.collection_of(FourCc::new(*b"data"))[0].data()?, &[1, 2, 3]);
//! # Ok::<(), moss_formats::chunk::ChunkError>(())
//! ```

mod error;
mod fourcc;
mod model;
mod reader;
mod spill;
mod writer;

pub use error::{ChunkError, ChunkResult};
pub use fourcc::FourCc;
pub use model::{Chunk, ChunkKey, Payload};
pub use reader::{CHUNK_HEADER_SIZE, ChunkReader, ReadOptions};
pub use spill::SpillStore;
