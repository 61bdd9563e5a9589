//! Chunk tree model

use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use binrw::Endian;

use super::error::{ChunkError, ChunkResult};
use super::fourcc::FourCc;
use crate::stream::{IntWidth, StreamError, decode_uint, encode_uint, null_terminated_string};

/// Key of the property table: identifier plus type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// Chunk identifier
    pub id: FourCc,
    /// Secondary type tag
    pub kind: FourCc,
}

/// Position of a child in serialization order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildSlot {
    Property(ChunkKey),
    Collection(usize),
}

/// Where a chunk's data lives
///
/// Exactly one state holds at a time, so a chunk never carries both a
/// buffer and a backing file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    /// Nothing assigned yet
    #[default]
    Unset,
    /// Skipped while parsing because it exceeded the in-memory threshold
    TooLarge {
        /// Size of the skipped payload
        size: u64,
    },
    /// Held in memory
    InMemory(Vec<u8>),
    /// Stored in a file owned by the caller
    FileBacked(PathBuf),
}

/// A node of a chunk tree
///
/// Identity is the (identifier, type) pair; payload content does not take
/// part in equality or hashing, so chunks can be used as lookup keys. The
/// type of a parsed chunk is the list type of the group holding it, which
/// separates equally named chunks in different lists. Group chunks carry
/// their own list type separately.
///
/// Children are written back in the order they were read or inserted,
/// properties and collection interleaved. Replacing a property keeps its
/// position.
///
/// The property and collection tables are reference counted. A chunk built
/// from a template shares the template's tables until one side modifies
/// them, at which point that side gets its own copy.
#[derive(Debug, Clone)]
pub struct Chunk {
    id: FourCc,
    kind: FourCc,
    list_type: Option<FourCc>,
    declared_size: Option<u32>,
    payload: Payload,
    endian: Endian,
    properties: Arc<HashMap<ChunkKey, Chunk>>,
    collection: Arc<Vec<Chunk>>,
    order: Arc<Vec<ChildSlot>>,
    parser_message: Option<String>,
}

impl Chunk {
    /// Create an empty chunk with an unknown declared size
    pub fn new(id: FourCc, kind: FourCc) -> Self {
        Self {
            id,
            kind,
            list_type: None,
            declared_size: None,
            payload: Payload::Unset,
            endian: Endian::Little,
            properties: Arc::default(),
            collection: Arc::default(),
            order: Arc::default(),
            parser_message: None,
        }
    }

    /// Create an empty chunk announcing `size` payload bytes
    pub fn with_declared_size(id: FourCc, kind: FourCc, size: u32) -> Self {
        Self {
            declared_size: Some(size),
            ..Self::new(id, kind)
        }
    }

    /// Create an empty chunk sharing the list type and child tables of `template`
    pub fn from_template(
        id: FourCc,
        kind: FourCc,
        declared_size: Option<u32>,
        template: &Self,
    ) -> Self {
        Self {
            declared_size,
            list_type: template.list_type,
            endian: template.endian,
            properties: Arc::clone(&template.properties),
            collection: Arc::clone(&template.collection),
            order: Arc::clone(&template.order),
            ..Self::new(id, kind)
        }
    }

    /// Create a leaf chunk holding `data`
    pub fn leaf(id: FourCc, data: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Payload::InMemory(data.into()),
            ..Self::new(id, FourCc::NULL)
        }
    }

    /// Create a `LIST` or `RIFF` group with the given list type
    pub fn group(id: FourCc, list_type: FourCc) -> Self {
        Self {
            list_type: Some(list_type),
            ..Self::new(id, FourCc::NULL)
        }
    }

    /// Create an empty chunk typed to live in this chunk's tables
    pub fn new_child(&self, id: FourCc) -> Self {
        Self::new(id, self.child_kind()).with_endian(self.endian)
    }

    /// Set the type tag
    #[must_use]
    pub fn with_kind(mut self, kind: FourCc) -> Self {
        self.kind = kind;
        self
    }

    /// Set the list type written at the start of a group's payload
    #[must_use]
    pub fn with_list_type(mut self, list_type: FourCc) -> Self {
        self.list_type = Some(list_type);
        self
    }

    /// Set the byte order of the size field and the field accessors
    #[must_use]
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Chunk identifier
    pub fn id(&self) -> FourCc {
        self.id
    }

    /// Secondary type tag
    pub fn kind(&self) -> FourCc {
        self.kind
    }

    /// List type of a group, read from the first four payload bytes
    pub fn list_type(&self) -> Option<FourCc> {
        self.list_type
    }

    /// Type given to children: the list type for groups, otherwise this chunk's own type
    pub fn child_kind(&self) -> FourCc {
        self.list_type.unwrap_or(self.kind)
    }

    /// Property-table key of this chunk
    pub fn key(&self) -> ChunkKey {
        ChunkKey {
            id: self.id,
            kind: self.kind,
        }
    }

    /// Size announced by the encoded header, if known
    pub fn declared_size(&self) -> Option<u32> {
        self.declared_size
    }

    /// Byte order of this chunk
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// True for `RIFF` and `LIST` chunks
    pub fn is_group(&self) -> bool {
        self.id.is_group()
    }

    /// Current payload state
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Assign an in-memory payload
    ///
    /// A buffer shorter than the declared size is rejected, except on group
    /// chunks whose own payload is never meaningful.
    pub fn set_data(&mut self, data: Vec<u8>) -> ChunkResult<()> {
        if let Some(declared) = self.declared_size
            && !self.is_group()
            && (data.len() as u64) < u64::from(declared)
        {
            return Err(ChunkError::MalformedChunkData {
                id: self.id,
                declared,
                actual: data.len(),
            });
        }
        self.payload = Payload::InMemory(data);
        Ok(())
    }

    /// Store a payload read from a stream, where short data is noted rather than rejected
    pub(crate) fn replace_payload(&mut self, payload: Payload) {
        self.payload = payload;
    }

    /// Back the payload with a file, replacing any in-memory buffer
    pub fn set_backing_file(&mut self, path: impl Into<PathBuf>) {
        self.payload = Payload::FileBacked(path.into());
    }

    /// Flag the payload as too large to load, dropping any buffer
    pub fn mark_too_large(&mut self, size: u64) {
        self.payload = Payload::TooLarge { size };
    }

    /// Path of the backing file, for file-backed chunks
    pub fn backing_file(&self) -> Option<&Path> {
        match &self.payload {
            Payload::FileBacked(path) => Some(path),
            _ => None,
        }
    }

    /// In-memory payload
    ///
    /// Groups always yield an empty slice. Chunks skipped as oversized or
    /// stored in a backing file fail with [`ChunkError::TooLarge`] so callers
    /// can skip them; chunks that never received data fail with
    /// [`ChunkError::NoPayload`].
    pub fn data(&self) -> ChunkResult<&[u8]> {
        if self.is_group() {
            return Ok(&[]);
        }
        match &self.payload {
            Payload::InMemory(data) => Ok(data),
            Payload::TooLarge { .. } | Payload::FileBacked(_) => {
                Err(ChunkError::TooLarge(self.id))
            }
            Payload::Unset => Err(ChunkError::NoPayload(self.id)),
        }
    }

    fn data_mut(&mut self) -> ChunkResult<&mut [u8]> {
        match &mut self.payload {
            Payload::InMemory(data) => Ok(data),
            Payload::TooLarge { .. } | Payload::FileBacked(_) => {
                Err(ChunkError::TooLarge(self.id))
            }
            Payload::Unset => Err(ChunkError::NoPayload(self.id)),
        }
    }

    /// Payload bytes wherever they live, reading the backing file if needed
    pub fn load_data(&self) -> ChunkResult<Vec<u8>> {
        match &self.payload {
            Payload::FileBacked(path) => Ok(fs::read(path)?),
            _ => Ok(self.data()?.to_vec()),
        }
    }

    /// Payload length: the backing file's length when file-backed, otherwise the buffer length
    pub fn data_size(&self) -> ChunkResult<u64> {
        if self.is_group() {
            return Ok(0);
        }
        match &self.payload {
            Payload::FileBacked(path) => Ok(fs::metadata(path)?.len()),
            _ => Ok(self.data()?.len() as u64),
        }
    }

    /// Note recorded by the parser about a tolerated anomaly
    pub fn parser_message(&self) -> Option<&str> {
        self.parser_message.as_deref()
    }

    /// Replace the parser note
    pub fn set_parser_message(&mut self, message: impl Into<String>) {
        self.parser_message = Some(message.into());
    }

    /// Append to the parser note, keeping earlier anomalies
    pub(crate) fn append_parser_message(&mut self, message: &str) {
        match &mut self.parser_message {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(message);
            }
            None => self.parser_message = Some(message.to_string()),
        }
    }

    /// Insert or replace a property chunk, returning the replaced one
    pub fn put_property(&mut self, chunk: Self) -> Option<Self> {
        let key = chunk.key();
        let replaced = Arc::make_mut(&mut self.properties).insert(key, chunk);
        if replaced.is_none() {
            Arc::make_mut(&mut self.order).push(ChildSlot::Property(key));
        }
        replaced
    }

    /// Property chunk with identifier `id` under [`Self::child_kind`]
    pub fn property(&self, id: FourCc) -> Option<&Self> {
        self.properties.get(&ChunkKey {
            id,
            kind: self.child_kind(),
        })
    }

    /// Mutable access to a property chunk
    pub fn property_mut(&mut self, id: FourCc) -> Option<&mut Self> {
        let key = ChunkKey {
            id,
            kind: self.child_kind(),
        };
        Arc::make_mut(&mut self.properties).get_mut(&key)
    }

    /// Remove a property chunk
    pub fn remove_property(&mut self, id: FourCc) -> Option<Self> {
        let key = ChunkKey {
            id,
            kind: self.child_kind(),
        };
        if !self.properties.contains_key(&key) {
            return None;
        }
        Arc::make_mut(&mut self.order).retain(|slot| *slot != ChildSlot::Property(key));
        Arc::make_mut(&mut self.properties).remove(&key)
    }

    /// All property chunks, in no particular order
    pub fn property_chunks(&self) -> impl Iterator<Item = &Self> {
        self.properties.values()
    }

    /// Number of property chunks
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Append a chunk to the ordered collection
    pub fn add_to_collection(&mut self, chunk: Self) {
        let index = self.collection.len();
        Arc::make_mut(&mut self.collection).push(chunk);
        Arc::make_mut(&mut self.order).push(ChildSlot::Collection(index));
    }

    /// Collection chunks with identifier `id`, in insertion order
    ///
    /// Returns a new vector; later changes to the collection do not show up in it.
    pub fn collection_of(&self, id: FourCc) -> Vec<&Self> {
        self.collection.iter().filter(|c| c.id == id).collect()
    }

    /// All collection chunks in insertion order
    pub fn collection(&self) -> std::slice::Iter<'_, Self> {
        self.collection.iter()
    }

    /// Number of collection chunks
    pub fn collection_len(&self) -> usize {
        self.collection.len()
    }

    /// First child with identifier `id`, looking at properties before the collection
    pub fn find_child(&self, id: FourCc) -> Option<&Self> {
        self.property(id).or_else(|| self.collection.iter().find(|c| c.id == id))
    }

    /// True when both chunks still share the same property and collection tables
    pub fn shares_tables_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.properties, &other.properties)
            && Arc::ptr_eq(&self.collection, &other.collection)
            && Arc::ptr_eq(&self.order, &other.order)
    }

    /// Number of children in both tables
    pub fn child_count(&self) -> usize {
        self.order.len()
    }

    /// Children in read or insertion order, properties and collection interleaved
    pub fn ordered_children(&self) -> impl Iterator<Item = &Self> {
        self.order.iter().filter_map(|slot| match slot {
            ChildSlot::Property(key) => self.properties.get(key),
            ChildSlot::Collection(index) => self.collection.get(*index),
        })
    }

    /// Bytes of a group too short to hold its list type, kept for rewriting
    pub(crate) fn raw_group_body(&self) -> &[u8] {
        match &self.payload {
            Payload::InMemory(data) => data,
            _ => &[],
        }
    }

    // Field accessors over the in-memory payload

    fn field(&self, offset: usize, len: usize) -> ChunkResult<&[u8]> {
        let data = self.data()?;
        offset
            .checked_add(len)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| out_of_bounds(offset, len, data.len()))
    }

    fn field_mut(&mut self, offset: usize, len: usize) -> ChunkResult<&mut [u8]> {
        let data = self.data_mut()?;
        let size = data.len();
        offset
            .checked_add(len)
            .and_then(|end| data.get_mut(offset..end))
            .ok_or_else(|| out_of_bounds(offset, len, size))
    }

    fn uint_at(&self, offset: usize, width: IntWidth) -> ChunkResult<u64> {
        Ok(decode_uint(self.field(offset, width.bytes())?, self.endian))
    }

    fn set_uint_at(&mut self, offset: usize, value: u64, width: IntWidth) -> ChunkResult<()> {
        let bytes = encode_uint(value, width, self.endian);
        self.field_mut(offset, bytes.len())?.copy_from_slice(&bytes);
        Ok(())
    }

    /// Unsigned byte at `offset`
    pub fn u8_at(&self, offset: usize) -> ChunkResult<u8> {
        Ok(self.field(offset, 1)?[0])
    }

    /// Signed byte at `offset`
    pub fn i8_at(&self, offset: usize) -> ChunkResult<i8> {
        Ok(self.u8_at(offset)? as i8)
    }

    /// Unsigned 16-bit value at `offset`
    pub fn u16_at(&self, offset: usize) -> ChunkResult<u16> {
        Ok(self.uint_at(offset, IntWidth::W16)? as u16)
    }

    /// Signed 16-bit value at `offset`
    pub fn i16_at(&self, offset: usize) -> ChunkResult<i16> {
        Ok(self.u16_at(offset)? as i16)
    }

    /// Unsigned 32-bit value at `offset`
    pub fn u32_at(&self, offset: usize) -> ChunkResult<u32> {
        Ok(self.uint_at(offset, IntWidth::W32)? as u32)
    }

    /// Signed 32-bit value at `offset`
    pub fn i32_at(&self, offset: usize) -> ChunkResult<i32> {
        Ok(self.u32_at(offset)? as i32)
    }

    /// Overwrite the byte at `offset`
    pub fn set_u8_at(&mut self, offset: usize, value: u8) -> ChunkResult<()> {
        self.field_mut(offset, 1)?[0] = value;
        Ok(())
    }

    /// Overwrite the signed byte at `offset`
    pub fn set_i8_at(&mut self, offset: usize, value: i8) -> ChunkResult<()> {
        self.set_u8_at(offset, value as u8)
    }

    /// Overwrite the 16-bit value at `offset`
    pub fn set_u16_at(&mut self, offset: usize, value: u16) -> ChunkResult<()> {
        self.set_uint_at(offset, u64::from(value), IntWidth::W16)
    }

    /// Overwrite the signed 16-bit value at `offset`
    pub fn set_i16_at(&mut self, offset: usize, value: i16) -> ChunkResult<()> {
        self.set_u16_at(offset, value as u16)
    }

    /// Overwrite the 32-bit value at `offset`
    pub fn set_u32_at(&mut self, offset: usize, value: u32) -> ChunkResult<()> {
        self.set_uint_at(offset, u64::from(value), IntWidth::W32)
    }

    /// Overwrite the signed 32-bit value at `offset`
    pub fn set_i32_at(&mut self, offset: usize, value: i32) -> ChunkResult<()> {
        self.set_u32_at(offset, value as u32)
    }

    /// Null-terminated string at `offset`
    ///
    /// With `max_len` the field is fixed-width and a missing terminator cuts
    /// the text at the field end. Without it the string is unbounded and an
    /// unterminated tail yields an empty string.
    pub fn string_at(&self, offset: usize, max_len: Option<usize>) -> ChunkResult<String> {
        Ok(null_terminated_string(self.data()?, offset, max_len, ""))
    }

    /// Write `text` into a fixed-width field, padding with zero bytes
    ///
    /// Text longer than `width` is cut to fit.
    pub fn set_string_at(&mut self, offset: usize, text: &str, width: usize) -> ChunkResult<()> {
        let field = self.field_mut(offset, width)?;
        let bytes = text.as_bytes();
        let used = bytes.len().min(width);
        field[..used].copy_from_slice(&bytes[..used]);
        field[used..].fill(0);
        Ok(())
    }
}

fn out_of_bounds(offset: usize, len: usize, size: usize) -> ChunkError {
    StreamError::OutOfBounds { offset, len, size }.into()
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for Chunk {}

impl Hash for Chunk {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    const INFO: FourCc = FourCc::new(*b"INFO");
    const INAM: FourCc = FourCc::new(*b"INAM");
    const SMPL: FourCc = FourCc::new(*b"smpl");
    const INST: FourCc = FourCc::new(*b"inst");

    #[test]
    fn test_identity_ignores_payload() {
        let a = Chunk::leaf(SMPL, vec![1, 2, 3]);
        let b = Chunk::leaf(SMPL, vec![9]);
        let c = Chunk::new(SMPL, INFO);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Chunk> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_put_property_replaces_same_key() {
        let mut list = Chunk::group(FourCc::LIST, INFO);
        let mut first = list.new_child(INAM);
        first.set_data(b"one".to_vec()).unwrap();
        let mut second = Chunk::new(INAM, INFO);
        second.set_data(b"two".to_vec()).unwrap();

        assert!(list.put_property(first).is_none());
        let replaced = list.put_property(second).unwrap();
        assert_eq!(replaced.data().unwrap(), b"one");
        assert_eq!(list.property_count(), 1);
        assert_eq!(list.property(INAM).unwrap().data().unwrap(), b"two");
    }

    #[test]
    fn test_property_lookup_uses_own_type() {
        let mut list = Chunk::group(FourCc::LIST, INFO);
        list.put_property(Chunk::new(INAM, FourCc::new(*b"adtl")));
        assert!(list.property(INAM).is_none());
        list.put_property(Chunk::new(INAM, INFO));
        assert!(list.property(INAM).is_some());
        assert!(list.remove_property(INAM).is_some());
        assert!(list.remove_property(INAM).is_none());
    }

    #[test]
    fn test_collection_keeps_duplicates_in_order() {
        let mut parent = Chunk::group(FourCc::RIFF, FourCc::new(*b"WAVE"));
        parent.add_to_collection(Chunk::leaf(SMPL, vec![1]));
        parent.add_to_collection(Chunk::leaf(INST, vec![2]));
        parent.add_to_collection(Chunk::leaf(SMPL, vec![3]));

        let loops = parent.collection_of(SMPL);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].data().unwrap(), &[1]);
        assert_eq!(loops[1].data().unwrap(), &[3]);

        let ids: Vec<FourCc> = parent.collection().map(Chunk::id).collect();
        assert_eq!(ids, vec![SMPL, INST, SMPL]);
        assert!(parent.collection_of(INAM).is_empty());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut root = Chunk::group(FourCc::RIFF, FourCc::new(*b"WAVE"));
        let fmt = FourCc::new(*b"fmt ");
        let data = FourCc::new(*b"data");
        root.put_property(root.new_child(fmt));
        root.add_to_collection(root.new_child(SMPL));
        root.put_property(root.new_child(data));
        root.add_to_collection(root.new_child(INST));

        let ids: Vec<FourCc> = root.ordered_children().map(Chunk::id).collect();
        assert_eq!(ids, vec![fmt, SMPL, data, INST]);
        assert_eq!(root.child_count(), 4);
    }

    #[test]
    fn test_replaced_property_keeps_its_position() {
        let mut list = Chunk::group(FourCc::LIST, INFO);
        list.put_property(list.new_child(INAM));
        list.add_to_collection(list.new_child(SMPL));
        let mut renamed = list.new_child(INAM);
        renamed.set_data(b"new".to_vec()).unwrap();
        assert!(list.put_property(renamed).is_some());

        let children: Vec<&Chunk> = list.ordered_children().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id(), INAM);
        assert_eq!(children[0].data().unwrap(), b"new");

        list.remove_property(INAM);
        let ids: Vec<FourCc> = list.ordered_children().map(Chunk::id).collect();
        assert_eq!(ids, vec![SMPL]);
    }

    #[test]
    fn test_set_data_rejects_short_buffer() {
        let mut chunk = Chunk::with_declared_size(SMPL, FourCc::NULL, 8);
        let err = chunk.set_data(vec![0; 4]).unwrap_err();
        assert!(matches!(
            err,
            ChunkError::MalformedChunkData {
                declared: 8,
                actual: 4,
                ..
            }
        ));
        assert!(chunk.set_data(vec![0; 8]).is_ok());
        assert!(chunk.set_data(vec![0; 12]).is_ok());
    }

    #[test]
    fn test_set_data_skips_check_for_groups() {
        let mut list = Chunk::with_declared_size(FourCc::LIST, INFO, 100);
        assert!(list.set_data(Vec::new()).is_ok());
        assert_eq!(list.data().unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_no_payload_and_too_large_are_distinct() {
        let mut chunk = Chunk::new(SMPL, FourCc::NULL);
        assert!(matches!(chunk.data(), Err(ChunkError::NoPayload(_))));
        assert!(matches!(chunk.data_size(), Err(ChunkError::NoPayload(_))));

        chunk.mark_too_large(1 << 40);
        let err = chunk.data().unwrap_err();
        assert!(err.is_too_large());
        assert_eq!(chunk.payload(), &Payload::TooLarge { size: 1 << 40 });
    }

    #[test]
    fn test_group_payload_is_always_empty() {
        let group = Chunk::group(FourCc::LIST, INFO);
        assert!(group.data().unwrap().is_empty());
        assert_eq!(group.data_size().unwrap(), 0);
    }

    #[test]
    fn test_payload_states_are_exclusive() {
        let mut chunk = Chunk::leaf(SMPL, vec![1, 2]);
        chunk.set_backing_file("/tmp/does-not-matter.bin");
        assert!(matches!(chunk.payload(), Payload::FileBacked(_)));
        assert!(chunk.data().unwrap_err().is_too_large());

        chunk.set_data(vec![3]).unwrap();
        assert!(chunk.backing_file().is_none());
        assert_eq!(chunk.data().unwrap(), &[3]);
    }

    #[test]
    fn test_template_tables_are_copy_on_write() {
        let mut template = Chunk::group(FourCc::LIST, INFO);
        let mut name = Chunk::new(INAM, INFO);
        name.set_data(b"shared".to_vec()).unwrap();
        template.put_property(name);

        let mut sibling = Chunk::from_template(FourCc::LIST, FourCc::NULL, None, &template);
        assert_eq!(sibling.list_type(), Some(INFO));
        assert!(sibling.shares_tables_with(&template));
        assert_eq!(sibling.property(INAM).unwrap().data().unwrap(), b"shared");

        sibling.add_to_collection(Chunk::leaf(SMPL, vec![0]));
        assert!(!sibling.shares_tables_with(&template));
        assert_eq!(template.collection_len(), 0);
        assert_eq!(sibling.collection_len(), 1);
    }

    #[test]
    fn test_field_accessors_little_endian() {
        let mut chunk = Chunk::leaf(SMPL, vec![0; 12]);
        chunk.set_u32_at(0, 0xDEAD_BEEF).unwrap();
        chunk.set_i16_at(4, -2).unwrap();
        chunk.set_i8_at(6, -1).unwrap();
        chunk.set_u8_at(7, 0x7F).unwrap();

        assert_eq!(&chunk.data().unwrap()[..4], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(chunk.u32_at(0).unwrap(), 0xDEAD_BEEF);
        assert_eq!(chunk.i32_at(0).unwrap(), 0xDEAD_BEEFu32 as i32);
        assert_eq!(chunk.i16_at(4).unwrap(), -2);
        assert_eq!(chunk.u16_at(4).unwrap(), 0xFFFE);
        assert_eq!(chunk.i8_at(6).unwrap(), -1);
        assert_eq!(chunk.u8_at(7).unwrap(), 0x7F);
    }

    #[test]
    fn test_field_accessors_big_endian() {
        let mut chunk = Chunk::leaf(SMPL, vec![0; 4]).with_endian(Endian::Big);
        chunk.set_u16_at(0, 0x1234).unwrap();
        chunk.set_i16_at(2, -300).unwrap();
        assert_eq!(chunk.data().unwrap(), &[0x12, 0x34, 0xFE, 0xD4]);
        assert_eq!(chunk.i16_at(2).unwrap(), -300);
    }

    #[test]
    fn test_field_out_of_bounds() {
        let mut chunk = Chunk::leaf(SMPL, vec![0; 4]);
        let err = chunk.u32_at(1).unwrap_err();
        assert!(err.is_truncated());
        assert!(chunk.set_u16_at(3, 1).is_err());
        assert!(chunk.u8_at(usize::MAX).is_err());
        assert_eq!(chunk.data().unwrap(), &[0; 4]);
    }

    #[test]
    fn test_string_fields() {
        let mut chunk = Chunk::leaf(INAM, vec![0xFF; 16]);
        chunk.set_string_at(0, "Piano", 8).unwrap();
        chunk.set_string_at(8, "LongerThanField", 8).unwrap();

        assert_eq!(&chunk.data().unwrap()[..8], b"Piano\0\0\0");
        assert_eq!(chunk.string_at(0, None).unwrap(), "Piano");
        assert_eq!(chunk.string_at(8, Some(8)).unwrap(), "LongerTh");
        assert_eq!(chunk.string_at(8, None).unwrap(), "");
        assert!(chunk.set_string_at(12, "x", 8).is_err());
    }

    #[test]
    fn test_parser_message() {
        let mut chunk = Chunk::new(SMPL, FourCc::NULL);
        assert!(chunk.parser_message().is_none());
        chunk.append_parser_message("size mismatch");
        chunk.append_parser_message("missing pad");
        assert_eq!(chunk.parser_message(), Some("size mismatch; missing pad"));
        chunk.set_parser_message("replaced");
        assert_eq!(chunk.parser_message(), Some("replaced"));
    }
}
