//! Monolith archive directory records
//!
//! A monolith bundles many logical files into one container. Its directory
//! is a run of [`DirectoryEntry`] records, each pointing at an absolute
//! offset inside the archive. Records are only ever read; locating and
//! extracting the referenced items is up to the caller.
//!
//! All records of one directory share the archive's byte order.

mod entry;
mod error;

pub use entry::{DirectoryEntry, ENTRY_HEADER_SIZE, ReferenceType, read_directory};
pub use error::{MonolithError, MonolithResult};
