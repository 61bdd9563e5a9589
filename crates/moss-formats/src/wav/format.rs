//! `fmt ` chunk interpretation

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

use super::error::{WavError, WavResult};
use crate::chunk::{Chunk, FourCc};

/// Identifier of the format chunk
pub const FMT_ID: FourCc = FourCc::new(*b"fmt ");

/// Integer PCM
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
/// IEEE float samples
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
/// Format carried in the sub-format GUID of the extension
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Size of the fields every format chunk has
const BASE_SIZE: usize = 16;
/// Size of the extensible extension, after its own length field
const EXTENSION_SIZE: u16 = 22;

/// Fields added by `WAVE_FORMAT_EXTENSIBLE`
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FormatExtension {
    /// Bits of precision actually used in each sample
    pub valid_bits_per_sample: u16,
    /// Speaker position bit mask
    pub channel_mask: u32,
    /// GUID whose first two bytes hold the real format tag
    pub sub_format: [u8; 16],
}

/// Sample format description from a `fmt ` chunk
///
/// Layout (little-endian):
/// - Format tag (2 bytes)
/// - Channel count (2 bytes)
/// - Sample rate (4 bytes)
/// - Average byte rate (4 bytes)
/// - Block alignment (2 bytes)
/// - Bits per sample (2 bytes)
/// - Optional: extension size (2 bytes) and the 22-byte extensible block
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FormatChunk {
    /// Format tag, e.g. [`WAVE_FORMAT_PCM`]
    pub format_tag: u16,
    /// Number of interleaved channels
    pub channels: u16,
    /// Frames per second
    pub sample_rate: u32,
    /// Bytes per second
    pub byte_rate: u32,
    /// Bytes per frame
    pub block_align: u16,
    /// Bits per sample, container size
    pub bits_per_sample: u16,
    /// Extensible fields, when present
    #[br(ignore)]
    #[bw(ignore)]
    pub extension: Option<FormatExtension>,
}

impl FormatChunk {
    /// Describe interleaved integer PCM
    ///
    /// Fails when the frame size or the byte rate does not fit its field.
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> WavResult<Self> {
        let block_align = channels
            .checked_mul(bits_per_sample.div_ceil(8))
            .ok_or_else(|| {
                WavError::InvalidFormatChunk(format!(
                    "{channels} channels of {bits_per_sample} bits overflow the block alignment"
                ))
            })?;
        let byte_rate = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(|| {
                WavError::InvalidFormatChunk(format!(
                    "{sample_rate} Hz at {block_align} bytes per frame overflows the byte rate"
                ))
            })?;
        Ok(Self {
            format_tag: WAVE_FORMAT_PCM,
            channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            extension: None,
        })
    }

    /// Decode a format chunk payload
    pub fn parse(data: &[u8]) -> WavResult<Self> {
        if data.len() < BASE_SIZE {
            return Err(WavError::InvalidFormatChunk(format!(
                "{} bytes, need at least {BASE_SIZE}",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        let mut format = Self::read(&mut cursor)?;

        if format.format_tag == WAVE_FORMAT_EXTENSIBLE && data.len() >= BASE_SIZE + 2 {
            let extension_size = u16::read_le(&mut cursor)?;
            if extension_size >= EXTENSION_SIZE {
                format.extension = Some(FormatExtension::read(&mut cursor)?);
            }
        }
        Ok(format)
    }

    /// Decode the payload of a `fmt ` chunk
    pub fn from_chunk(chunk: &Chunk) -> WavResult<Self> {
        Self::parse(chunk.data()?)
    }

    /// Encode as a `fmt ` payload
    pub fn to_bytes(&self) -> WavResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(40));
        self.write(&mut cursor)?;
        if let Some(extension) = &self.extension {
            EXTENSION_SIZE.write_le(&mut cursor)?;
            extension.write(&mut cursor)?;
        }
        Ok(cursor.into_inner())
    }

    /// Build a `fmt ` chunk typed for a `WAVE` form
    pub fn to_chunk(&self) -> WavResult<Chunk> {
        let mut chunk = Chunk::new(FMT_ID, super::WAVE_ID);
        chunk.set_data(self.to_bytes()?)?;
        Ok(chunk)
    }

    /// Format tag with the extensible indirection resolved
    pub fn effective_format_tag(&self) -> u16 {
        match &self.extension {
            Some(ext) if self.format_tag == WAVE_FORMAT_EXTENSIBLE => {
                u16::from_le_bytes([ext.sub_format[0], ext.sub_format[1]])
            }
            _ => self.format_tag,
        }
    }

    /// True for integer PCM
    pub fn is_pcm(&self) -> bool {
        self.effective_format_tag() == WAVE_FORMAT_PCM
    }

    /// True for IEEE float samples
    pub fn is_float(&self) -> bool {
        self.effective_format_tag() == WAVE_FORMAT_IEEE_FLOAT
    }

    /// Bytes per sample of one channel
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    /// Check the channel count and the rate fields against each other
    pub fn validate(&self) -> WavResult<()> {
        if self.channels == 0 {
            return Err(WavError::InvalidFormatChunk("zero channels".to_string()));
        }
        if self.block_align == 0 {
            return Err(WavError::InvalidFormatChunk("zero block alignment".to_string()));
        }
        let frame = u32::from(self.channels) * u32::from(self.bytes_per_sample());
        if (self.is_pcm() || self.is_float()) && u32::from(self.block_align) != frame {
            return Err(WavError::InvalidFormatChunk(format!(
                "block alignment {} does not match {} channels of {} bits",
                self.block_align, self.channels, self.bits_per_sample
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extensible_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&WAVE_FORMAT_EXTENSIBLE.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&48_000u32.to_le_bytes());
        bytes.extend_from_slice(&288_000u32.to_le_bytes());
        bytes.extend_from_slice(&6u16.to_le_bytes());
        bytes.extend_from_slice(&24u16.to_le_bytes());
        bytes.extend_from_slice(&22u16.to_le_bytes());
        bytes.extend_from_slice(&24u16.to_le_bytes());
        bytes.extend_from_slice(&3u32.to_le_bytes());
        let mut guid = [0u8; 16];
        guid[0] = 0x01;
        guid[8] = 0x80;
        guid[13] = 0xAA;
        guid[15] = 0x71;
        bytes.extend_from_slice(&guid);
        bytes
    }

    #[test]
    fn test_parse_pcm() {
        let expected = FormatChunk::pcm(1, 44_100, 16).unwrap();
        let bytes = expected.to_bytes().unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..2], &[1, 0]);

        let format = FormatChunk::parse(&bytes).unwrap();
        assert_eq!(format, expected);
        assert_eq!(format.byte_rate, 88_200);
        assert_eq!(format.block_align, 2);
        assert!(format.is_pcm());
        format.validate().unwrap();
    }

    #[test]
    fn test_parse_extensible() {
        let bytes = extensible_bytes();
        let format = FormatChunk::parse(&bytes).unwrap();
        let extension = format.extension.as_ref().unwrap();
        assert_eq!(extension.valid_bits_per_sample, 24);
        assert_eq!(extension.channel_mask, 3);
        assert_eq!(format.effective_format_tag(), WAVE_FORMAT_PCM);
        assert!(format.is_pcm());
        assert_eq!(format.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_extensible_without_extension_keeps_raw_tag() {
        let mut bytes = extensible_bytes();
        bytes.truncate(16);
        let format = FormatChunk::parse(&bytes).unwrap();
        assert!(format.extension.is_none());
        assert_eq!(format.effective_format_tag(), WAVE_FORMAT_EXTENSIBLE);
    }

    #[test]
    fn test_short_chunk_rejected() {
        let err = FormatChunk::parse(&[1, 0, 1, 0]).unwrap_err();
        assert!(matches!(err, WavError::InvalidFormatChunk(_)));
    }

    #[test]
    fn test_validate_block_alignment() {
        let mut format = FormatChunk::pcm(2, 44_100, 24).unwrap();
        assert_eq!(format.block_align, 6);
        format.block_align = 4;
        assert!(format.validate().is_err());
        format.channels = 0;
        assert!(format.validate().is_err());
    }

    #[test]
    fn test_pcm_rejects_overflowing_fields() {
        let err = FormatChunk::pcm(u16::MAX, 44_100, 32).unwrap_err();
        assert!(matches!(err, WavError::InvalidFormatChunk(_)));

        let err = FormatChunk::pcm(8, u32::MAX, 24).unwrap_err();
        assert!(matches!(err, WavError::InvalidFormatChunk(_)));

        let widest = FormatChunk::pcm(16_383, 1, 32).unwrap();
        assert_eq!(widest.block_align, 65_532);
    }

    #[test]
    fn test_to_chunk() {
        let chunk = FormatChunk::pcm(2, 48_000, 32).unwrap().to_chunk().unwrap();
        assert_eq!(chunk.id(), FMT_ID);
        assert_eq!(FormatChunk::from_chunk(&chunk).unwrap().channels, 2);
    }
}
