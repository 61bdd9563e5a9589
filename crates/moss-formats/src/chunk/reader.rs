//! Chunk tree reader
//!
//! Parses RIFF-style streams: a 4-byte identifier, a 32-bit payload size that
//! excludes the pad byte, the payload, then one zero byte when the size is odd.
//! `RIFF` and `LIST` payloads start with a 4-byte list type followed by child
//! chunks.
//!
//! Damage that still leaves usable data is tolerated and recorded as a parser
//! message on the affected chunk instead of failing the whole read.

use std::collections::HashSet;
use std::io::{self, Read, Seek, SeekFrom};

use binrw::Endian;
use tracing::{debug, trace};

use super::error::{ChunkError, ChunkResult};
use super::fourcc::FourCc;
use super::model::{Chunk, Payload};
use super::spill::SpillStore;
use crate::stream::{StreamError, peek, read_array, read_bytes, read_u32};

/// Size of a chunk header: identifier plus size field
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Reader configuration
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Byte order of the size fields
    pub endian: Endian,
    /// Identifiers stored in the property table instead of the collection
    pub property_ids: HashSet<FourCc>,
    /// Largest payload loaded into memory; `None` loads everything
    pub max_in_memory: Option<u64>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            property_ids: HashSet::new(),
            max_in_memory: None,
        }
    }
}

impl ReadOptions {
    /// Set the byte order
    #[must_use]
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Store chunks with these identifiers as properties
    #[must_use]
    pub fn with_property_ids(mut self, ids: impl IntoIterator<Item = FourCc>) -> Self {
        self.property_ids.extend(ids);
        self
    }

    /// Payloads above `limit` bytes are not loaded into memory
    #[must_use]
    pub fn with_max_in_memory(mut self, limit: u64) -> Self {
        self.max_in_memory = Some(limit);
        self
    }

    fn exceeds_memory_limit(&self, size: u64) -> bool {
        self.max_in_memory.is_some_and(|limit| size > limit)
    }
}

/// Reads chunk trees from a seekable stream
///
/// Payloads above [`ReadOptions::max_in_memory`] are copied into the attached
/// [`SpillStore`] and become file-backed. Without a store they are skipped
/// and marked too large.
#[derive(Debug, Clone, Default)]
pub struct ChunkReader<'a> {
    options: ReadOptions,
    spill: Option<&'a SpillStore>,
}

impl<'a> ChunkReader<'a> {
    /// Create a reader
    pub fn new(options: ReadOptions) -> Self {
        Self {
            options,
            spill: None,
        }
    }

    /// Spill oversized payloads into `store`
    #[must_use]
    pub fn with_spill_store(mut self, store: &'a SpillStore) -> Self {
        self.spill = Some(store);
        self
    }

    /// Active configuration
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Read one chunk tree starting at the current stream position
    ///
    /// The returned chunk has the null type. A top-level identifier outside
    /// the printable range is fatal; the same problem inside a group only
    /// ends that group.
    pub fn read<R: Read + Seek>(&self, reader: &mut R) -> ChunkResult<Chunk> {
        let offset = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(offset))?;

        let id = FourCc::new(read_array(reader)?);
        if !id.is_valid() {
            return Err(ChunkError::InvalidIdentifier { id, offset });
        }
        let size = read_u32(reader, self.options.endian)?;
        let available = end.saturating_sub(offset + CHUNK_HEADER_SIZE);

        let (chunk, _) = self.read_body(reader, id, size, FourCc::NULL, available)?;
        Ok(chunk)
    }

    /// Read a chunk tree whose identifier must be `expected`
    ///
    /// The identifier is checked before anything is consumed, so on mismatch
    /// the stream is still positioned at the chunk header.
    pub fn read_expecting<R: Read + Seek>(
        &self,
        reader: &mut R,
        expected: FourCc,
    ) -> ChunkResult<Chunk> {
        let header = peek(reader, 4)?;
        let found = FourCc::new([header[0], header[1], header[2], header[3]]);
        if found != expected {
            return Err(ChunkError::UnexpectedChunk { expected, found });
        }
        self.read(reader)
    }

    /// Read the body of a chunk whose header was consumed
    ///
    /// `available` is the number of bytes the enclosing scope still holds.
    /// Returns the chunk and the number of bytes consumed, pad included.
    fn read_body<R: Read + Seek>(
        &self,
        reader: &mut R,
        id: FourCc,
        size: u32,
        parent_kind: FourCc,
        available: u64,
    ) -> ChunkResult<(Chunk, u64)> {
        let declared = u64::from(size);
        let body = declared.min(available);
        let truncated = body < declared;

        let mut chunk = if id.is_group() {
            self.read_group(reader, id, size, parent_kind, body)?
        } else {
            let mut chunk =
                Chunk::with_declared_size(id, parent_kind, size).with_endian(self.options.endian);
            let payload = self.read_payload(reader, id, body)?;
            chunk.replace_payload(payload);
            chunk
        };

        if truncated {
            debug!("Chunk {} declares {} bytes but only {} remain", id, declared, available);
            chunk.append_parser_message(&format!(
                "declared size {declared} exceeds the {available} bytes available, truncated"
            ));
        }

        let mut consumed = body;
        if declared % 2 == 1 && !truncated {
            if available > body {
                let _pad = read_array::<1, _>(reader)?;
                consumed += 1;
            } else {
                trace!("Chunk {} ends without its pad byte", id);
                chunk.append_parser_message("missing pad byte after odd-sized payload");
            }
        }

        Ok((chunk, consumed))
    }

    fn read_group<R: Read + Seek>(
        &self,
        reader: &mut R,
        id: FourCc,
        size: u32,
        kind: FourCc,
        body: u64,
    ) -> ChunkResult<Chunk> {
        let mut chunk = Chunk::with_declared_size(id, kind, size).with_endian(self.options.endian);
        if body < 4 {
            let remnant = read_bytes(reader, body as usize)?;
            chunk.replace_payload(Payload::InMemory(remnant));
            chunk.append_parser_message("group too short to hold a list type, raw body kept");
            return Ok(chunk);
        }

        let list_type = FourCc::new(read_array(reader)?);
        chunk = chunk.with_list_type(list_type);
        self.read_children(reader, &mut chunk, body - 4)?;
        Ok(chunk)
    }

    fn read_children<R: Read + Seek>(
        &self,
        reader: &mut R,
        parent: &mut Chunk,
        mut remaining: u64,
    ) -> ChunkResult<()> {
        while remaining >= CHUNK_HEADER_SIZE {
            let offset = reader.stream_position()?;
            let id = FourCc::new(read_array(reader)?);
            let size = read_u32(reader, self.options.endian)?;
            remaining -= CHUNK_HEADER_SIZE;

            if !id.is_valid() {
                debug!(
                    "Invalid chunk identifier {} at offset {}, skipping {} bytes",
                    id, offset, remaining
                );
                parent.append_parser_message(&format!(
                    "invalid chunk identifier {id} at offset {offset}, {remaining} bytes ignored"
                ));
                skip(reader, remaining)?;
                return Ok(());
            }

            if id.is_filler() {
                let padded = u64::from(size) + u64::from(size % 2);
                let skipped = padded.min(remaining);
                trace!("Skipping {} filler chunk of {} bytes", id, size);
                skip(reader, skipped)?;
                remaining -= skipped;
                continue;
            }

            let (child, consumed) =
                self.read_body(reader, id, size, parent.child_kind(), remaining)?;
            remaining -= consumed;

            if self.options.property_ids.contains(&id) {
                if let Some(replaced) = parent.put_property(child) {
                    debug!("Duplicate property chunk {} replaced", replaced.id());
                }
            } else {
                parent.add_to_collection(child);
            }
        }

        if remaining > 0 {
            trace!("Ignoring {} trailing bytes in {}", remaining, parent.id());
            parent.append_parser_message(&format!(
                "{remaining} trailing bytes too short for a chunk header"
            ));
            skip(reader, remaining)?;
        }
        Ok(())
    }

    fn read_payload<R: Read + Seek>(
        &self,
        reader: &mut R,
        id: FourCc,
        size: u64,
    ) -> ChunkResult<Payload> {
        if !self.options.exceeds_memory_limit(size) {
            let len = usize::try_from(size).map_err(|_| StreamError::OversizedBlock(size))?;
            return Ok(Payload::InMemory(read_bytes(reader, len)?));
        }

        let Some(store) = self.spill else {
            debug!("Chunk {} payload of {} bytes marked too large", id, size);
            skip(reader, size)?;
            return Ok(Payload::TooLarge { size });
        };

        let (mut file, path) = store.create_file()?;
        let copied = io::copy(&mut reader.by_ref().take(size), &mut file)?;
        if copied != size {
            return Err(StreamError::ShortRead {
                expected: usize::try_from(size).unwrap_or(usize::MAX),
                actual: usize::try_from(copied).unwrap_or(usize::MAX),
            }
            .into());
        }
        debug!("Spilled {} bytes of chunk {} to {}", size, id, path.display());
        Ok(Payload::FileBacked(path))
    }
}

fn skip<S: Seek>(reader: &mut S, len: u64) -> ChunkResult<()> {
    let len = i64::try_from(len).map_err(|_| StreamError::OversizedBlock(len))?;
    reader.seek(SeekFrom::Current(len))?;
    Ok(())
}
