//! Chunk tree serialization

use std::fs::File;
use std::io::{self, Read, Write};

use super::error::{ChunkError, ChunkResult};
use super::model::{Chunk, Payload};
use super::reader::CHUNK_HEADER_SIZE;
use crate::stream::{StreamError, write_u32};

impl Chunk {
    /// Length of the body as written to the size field, pad byte excluded
    ///
    /// For groups this is the list type plus every serialized child. A group
    /// read without a list type keeps the raw bytes it had instead.
    pub fn body_len(&self) -> ChunkResult<u64> {
        if !self.is_group() {
            return self.data_size();
        }
        if self.list_type().is_none() {
            return Ok(self.raw_group_body().len() as u64);
        }
        let mut len = 4;
        for child in self.ordered_children() {
            len += child.serialized_len()?;
        }
        Ok(len)
    }

    /// Total encoded length: header, body and pad byte
    pub fn serialized_len(&self) -> ChunkResult<u64> {
        let body = self.body_len()?;
        Ok(CHUNK_HEADER_SIZE + body + body % 2)
    }

    /// Serialize the chunk tree, returning the number of bytes written
    ///
    /// The size field holds the unpadded body length; an odd body is followed
    /// by one zero byte. Group children are written in the order they were
    /// read or inserted. File-backed payloads are streamed from their file and
    /// produce the same bytes as in-memory ones.
    ///
    /// A group without a list type cannot hold children and fails with
    /// [`ChunkError::MissingListType`] if it has any.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> ChunkResult<u64> {
        if self.is_group() && self.list_type().is_none() && self.child_count() > 0 {
            return Err(ChunkError::MissingListType(self.id()));
        }
        let body = self.body_len()?;
        let size = u32::try_from(body).map_err(|_| ChunkError::SizeOverflow {
            id: self.id(),
            size: body,
        })?;

        writer.write_all(self.id().as_bytes())?;
        write_u32(writer, size, self.endian())?;

        if self.is_group() {
            match self.list_type() {
                Some(list_type) => {
                    writer.write_all(list_type.as_bytes())?;
                    for child in self.ordered_children() {
                        child.write_to(writer)?;
                    }
                }
                None => writer.write_all(self.raw_group_body())?,
            }
        } else {
            self.write_payload(writer, body)?;
        }

        if body % 2 == 1 {
            writer.write_all(&[0])?;
        }
        Ok(CHUNK_HEADER_SIZE + body + body % 2)
    }

    fn write_payload<W: Write>(&self, writer: &mut W, len: u64) -> ChunkResult<()> {
        match self.payload() {
            Payload::InMemory(data) => writer.write_all(data)?,
            Payload::FileBacked(path) => {
                let file = File::open(path)?;
                let copied = io::copy(&mut file.take(len), writer)?;
                if copied != len {
                    return Err(StreamError::ShortRead {
                        expected: usize::try_from(len).unwrap_or(usize::MAX),
                        actual: usize::try_from(copied).unwrap_or(usize::MAX),
                    }
                    .into());
                }
            }
            Payload::TooLarge { .. } => return Err(ChunkError::TooLarge(self.id())),
            Payload::Unset => return Err(ChunkError::NoPayload(self.id())),
        }
        Ok(())
    }

    /// Serialize the chunk tree into a new buffer
    pub fn to_bytes(&self) -> ChunkResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkReader, FourCc, ReadOptions};
    use crate::test_utils::{leaf_bytes, random_bytes, riff_form};
    use binrw::Endian;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::io::Cursor;

    const DATA: FourCc = FourCc::new(*b"data");
    const INFO: FourCc = FourCc::new(*b"INFO");

    #[test]
    fn test_odd_payload_gets_pad_byte() {
        let chunk = Chunk::leaf(DATA, vec![1, 2, 3]);
        let bytes = chunk.to_bytes().unwrap();
        assert_eq!(bytes, b"data\x03\x00\x00\x00\x01\x02\x03\x00");
        assert_eq!(chunk.serialized_len().unwrap(), 12);
    }

    #[test]
    fn test_even_payload_has_no_pad() {
        let bytes = Chunk::leaf(DATA, vec![1, 2]).to_bytes().unwrap();
        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[4..8], &[2, 0, 0, 0]);
    }

    #[test]
    fn test_big_endian_size_field() {
        let chunk = Chunk::leaf(DATA, vec![0; 5]).with_endian(Endian::Big);
        let bytes = chunk.to_bytes().unwrap();
        assert_eq!(&bytes[4..8], &[0, 0, 0, 5]);
    }

    #[test]
    fn test_missing_payload_is_an_error() {
        let err = Chunk::new(DATA, FourCc::NULL).to_bytes().unwrap_err();
        assert!(matches!(err, ChunkError::NoPayload(id) if id == DATA));

        let mut skipped = Chunk::new(DATA, FourCc::NULL);
        skipped.mark_too_large(100);
        assert!(skipped.to_bytes().unwrap_err().is_too_large());
    }

    #[test]
    fn test_group_layout() {
        let mut list = Chunk::group(FourCc::LIST, INFO);
        let mut name = list.new_child(FourCc::new(*b"INAM"));
        name.set_data(b"Bell\0".to_vec()).unwrap();
        list.add_to_collection(name);

        let bytes = list.to_bytes().unwrap();
        // 4 list type + 8 header + 5 payload + 1 pad
        assert_eq!(list.body_len().unwrap(), 18);
        assert_eq!(&bytes[..12], b"LIST\x12\x00\x00\x00INFO");
        assert_eq!(&bytes[12..16], b"INAM");
        assert_eq!(bytes.len(), 26);
    }

    #[test]
    fn test_read_order_survives_rewrite() {
        let mut body = leaf_bytes(b"fmt ", &[3, 4]);
        body.extend(leaf_bytes(b"smpl", &[1, 2]));
        body.extend(leaf_bytes(b"data", &[5]));
        body.extend(leaf_bytes(b"cue ", &[6, 7]));
        let bytes = riff_form(b"WAVE", &body);

        let fmt = FourCc::new(*b"fmt ");
        let options = ReadOptions::default().with_property_ids([fmt, DATA]);
        let parsed = ChunkReader::new(options).read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(parsed.property_count(), 2);
        assert_eq!(parsed.collection_len(), 2);

        let ids: Vec<FourCc> = parsed.ordered_children().map(Chunk::id).collect();
        assert_eq!(
            ids,
            vec![fmt, FourCc::new(*b"smpl"), DATA, FourCc::new(*b"cue ")]
        );
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_short_group_body_is_kept() {
        let mut bytes = b"LIST".to_vec();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"IN");
        let parsed = ChunkReader::default().read(&mut Cursor::new(&bytes)).unwrap();

        assert!(parsed.list_type().is_none());
        assert!(parsed.parser_message().is_some());
        assert_eq!(parsed.body_len().unwrap(), 2);
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_children_without_list_type_are_rejected() {
        let mut list = Chunk::new(FourCc::LIST, FourCc::NULL);
        list.add_to_collection(Chunk::leaf(DATA, vec![1]));
        assert!(matches!(
            list.to_bytes(),
            Err(ChunkError::MissingListType(id)) if id == FourCc::LIST
        ));
    }

    #[test]
    fn test_unset_child_fails_group_write() {
        let mut root = Chunk::group(FourCc::RIFF, FourCc::new(*b"WAVE"));
        root.add_to_collection(root.new_child(DATA));
        assert!(matches!(root.to_bytes(), Err(ChunkError::NoPayload(_))));
    }

    #[test]
    fn test_round_trip_through_reader() {
        let mut root = Chunk::group(FourCc::RIFF, FourCc::new(*b"WAVE"));
        let mut fmt = root.new_child(FourCc::new(*b"fmt "));
        fmt.set_data(vec![9; 16]).unwrap();
        root.put_property(fmt);
        let mut data = root.new_child(DATA);
        data.set_data(vec![1, 2, 3, 4, 5, 6, 7]).unwrap();
        root.add_to_collection(data);

        let bytes = root.to_bytes().unwrap();
        let options = ReadOptions::default().with_property_ids([FourCc::new(*b"fmt ")]);
        let parsed = ChunkReader::new(options).read(&mut Cursor::new(&bytes)).unwrap();

        assert_eq!(parsed.list_type(), Some(FourCc::new(*b"WAVE")));
        assert_eq!(parsed.declared_size(), Some((bytes.len() - 8) as u32));
        assert_eq!(
            parsed.property(FourCc::new(*b"fmt ")).unwrap().data().unwrap(),
            &[9; 16]
        );
        let data = parsed.collection_of(DATA)[0];
        assert_eq!(data.declared_size(), Some(7));
        assert_eq!(data.data().unwrap(), &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_file_backed_matches_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        let payload = random_bytes(7, 255);
        std::fs::write(&path, &payload).unwrap();

        let in_memory = Chunk::leaf(DATA, payload.clone());
        let mut file_backed = Chunk::new(DATA, FourCc::NULL);
        file_backed.set_backing_file(&path);

        assert_eq!(file_backed.data_size().unwrap(), 255);
        assert_eq!(file_backed.to_bytes().unwrap(), in_memory.to_bytes().unwrap());
    }

    proptest! {
        #[test]
        fn prop_leaf_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..300)) {
            let bytes = Chunk::leaf(DATA, payload.clone()).to_bytes().unwrap();
            prop_assert_eq!(bytes.len(), 8 + payload.len() + payload.len() % 2);
            prop_assert_eq!(&bytes, &leaf_bytes(b"data", &payload));

            let parsed = ChunkReader::default().read(&mut Cursor::new(&bytes)).unwrap();
            prop_assert_eq!(parsed.declared_size(), Some(payload.len() as u32));
            prop_assert_eq!(parsed.data().unwrap(), payload.as_slice());
            prop_assert!(parsed.parser_message().is_none());
        }
    }
}
