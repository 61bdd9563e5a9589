//! RIFF/WAVE file access on top of the chunk tree

use std::io::{Read, Seek, Write};

use tracing::debug;

use super::error::{WavError, WavResult};
use super::format::{FMT_ID, FormatChunk};
use super::{DATA_ID, FACT_ID, WAVE_ID};
use crate::chunk::{Chunk, ChunkReader, FourCc, ReadOptions};

/// A parsed WAVE file
///
/// Keeps the whole chunk tree so metadata chunks such as `smpl`, `inst` or
/// `LIST` survive a read and write cycle.
#[derive(Debug, Clone)]
pub struct WaveFile {
    root: Chunk,
    format: FormatChunk,
}

impl WaveFile {
    /// Reader options for WAVE files: `fmt `, `data` and `fact` are properties,
    /// everything else stays in the ordered collection
    pub fn read_options() -> ReadOptions {
        ReadOptions::default().with_property_ids([FMT_ID, DATA_ID, FACT_ID])
    }

    /// Build a file from a format and interleaved sample bytes
    pub fn new(format: FormatChunk, samples: Vec<u8>) -> WavResult<Self> {
        let mut root = Chunk::group(FourCc::RIFF, WAVE_ID);
        root.put_property(format.to_chunk()?);
        let mut data = root.new_child(DATA_ID);
        data.set_data(samples)?;
        root.put_property(data);
        Ok(Self { root, format })
    }

    /// Parse a RIFF/WAVE stream
    pub fn read<R: Read + Seek>(reader: &mut R, chunks: &ChunkReader<'_>) -> WavResult<Self> {
        let root = chunks.read_expecting(reader, FourCc::RIFF)?;
        let form = root.list_type().unwrap_or(FourCc::NULL);
        if form != WAVE_ID {
            return Err(WavError::NotWave(form));
        }
        if let Some(message) = root.parser_message() {
            debug!("WAVE file read with anomalies: {}", message);
        }

        let fmt = root
            .find_child(FMT_ID)
            .ok_or(WavError::MissingChunk(FMT_ID))?;
        let format = FormatChunk::from_chunk(fmt)?;
        Ok(Self { root, format })
    }

    /// Sample format
    pub fn format(&self) -> &FormatChunk {
        &self.format
    }

    /// The whole chunk tree
    pub fn root(&self) -> &Chunk {
        &self.root
    }

    /// Mutable chunk tree, for adding or replacing metadata chunks
    pub fn root_mut(&mut self) -> &mut Chunk {
        &mut self.root
    }

    /// The `data` chunk, whether in memory, file-backed or skipped
    pub fn data_chunk(&self) -> WavResult<&Chunk> {
        self.root
            .find_child(DATA_ID)
            .ok_or(WavError::MissingChunk(DATA_ID))
    }

    /// Interleaved sample bytes held in memory
    pub fn samples(&self) -> WavResult<&[u8]> {
        Ok(self.data_chunk()?.data()?)
    }

    /// Number of sample frames in the `data` chunk
    pub fn frame_count(&self) -> WavResult<u64> {
        if self.format.block_align == 0 {
            return Err(WavError::InvalidFormatChunk("zero block alignment".to_string()));
        }
        let size = self.data_chunk()?.data_size()?;
        Ok(size / u64::from(self.format.block_align))
    }

    /// Every top-level chunk with identifier `id`, in file order
    pub fn records(&self, id: FourCc) -> Vec<&Chunk> {
        self.root.collection_of(id)
    }

    /// Serialize the file, returning the number of bytes written
    pub fn write_to<W: Write>(&self, writer: &mut W) -> WavResult<u64> {
        Ok(self.root.write_to(writer)?)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const SMPL: FourCc = FourCc::new(*b"smpl");

    fn sample_file() -> Vec<u8> {
        let format = FormatChunk::pcm(2, 44_100, 16).unwrap();
        let mut wave = WaveFile::new(format, vec![0x11; 40]).unwrap();
        let root = wave.root_mut();
        for index in 0..2u8 {
            let mut record = root.new_child(SMPL);
            record.set_data(vec![index; 4]).unwrap();
            root.add_to_collection(record);
        }
        let mut out = Vec::new();
        wave.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_read_written_file() {
        let bytes = sample_file();
        let reader = ChunkReader::new(WaveFile::read_options());
        let wave = WaveFile::read(&mut Cursor::new(bytes), &reader).unwrap();

        assert_eq!(wave.format().channels, 2);
        assert_eq!(wave.frame_count().unwrap(), 10);
        assert_eq!(wave.samples().unwrap(), &[0x11; 40]);
        let loops = wave.records(SMPL);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[1].data().unwrap(), &[1; 4]);
    }

    #[test]
    fn test_fmt_found_without_property_options() {
        let bytes = sample_file();
        let wave = WaveFile::read(&mut Cursor::new(bytes), &ChunkReader::default()).unwrap();
        assert_eq!(wave.format().sample_rate, 44_100);
        assert_eq!(wave.frame_count().unwrap(), 10);
    }

    #[test]
    fn test_rejects_other_forms() {
        let mut bytes = sample_file();
        bytes[8..12].copy_from_slice(b"AIFF");
        let err = WaveFile::read(&mut Cursor::new(bytes), &ChunkReader::default()).unwrap_err();
        assert!(matches!(err, WavError::NotWave(form) if form == FourCc::new(*b"AIFF")));
    }

    #[test]
    fn test_missing_format_chunk() {
        let mut root = Chunk::group(FourCc::RIFF, WAVE_ID);
        let mut data = root.new_child(DATA_ID);
        data.set_data(vec![0; 4]).unwrap();
        root.add_to_collection(data);
        let bytes = root.to_bytes().unwrap();

        let err = WaveFile::read(&mut Cursor::new(bytes), &ChunkReader::default()).unwrap_err();
        assert!(matches!(err, WavError::MissingChunk(id) if id == FMT_ID));
    }

    #[test]
    fn test_oversized_data_reports_too_large() {
        let bytes = sample_file();
        let reader = ChunkReader::new(WaveFile::read_options().with_max_in_memory(16));
        let wave = WaveFile::read(&mut Cursor::new(bytes), &reader).unwrap();

        assert!(wave.samples().unwrap_err().is_too_large());
        assert!(wave.frame_count().unwrap_err().is_too_large());
        assert!(wave.data_chunk().is_ok());
    }
}
