//! Fixed-layout container header
//!
//! All fields sit at fixed offsets and are little-endian. The header is
//! decoded in one pass; validation covers only what playback depends on:
//! the buffer must hold the whole structure, and the payload the header
//! describes must be non-negative and 16-bit aligned. Id fields are kept
//! but not checked against magic values.

use crate::{Result, WavStreamError};
use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u32};
use nom::IResult;

/// Parsed container header
///
/// Field names follow the canonical WAV layout. `file_size` is the declared
/// overall container byte size and `sub_chunk1_size` the declared format
/// sub-chunk byte size; together they locate and bound the sample payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    /// Container id bytes (canonically `RIFF`, not validated)
    pub chunk_id: [u8; 4],
    /// Overall container byte size
    pub file_size: u32,
    /// Container format bytes (canonically `WAVE`, not validated)
    pub file_format: [u8; 4],
    /// Format sub-chunk id bytes (canonically `fmt `, not validated)
    pub sub_chunk1_id: [u8; 4],
    /// Declared format sub-chunk byte size
    pub sub_chunk1_size: u32,
    /// Audio format tag (1 = integer PCM)
    pub audio_format: u16,
    /// Channel count declared by the file
    pub channels: u16,
    /// Sample rate declared by the file (informational; playback uses the
    /// output driver's fixed rate)
    pub sample_rate: u32,
    /// Bytes per second declared by the file
    pub byte_rate: u32,
    /// Bytes per interleaved frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Data sub-chunk id bytes (canonically `data`, not validated)
    pub sub_chunk2_id: [u8; 4],
    /// Declared data sub-chunk byte size
    pub sub_chunk2_size: u32,
}

impl WavHeader {
    /// Size of the fixed header structure in bytes
    pub const SIZE: usize = 44;

    /// Byte offset where the raw sample payload begins: the fixed header
    /// plus the declared format sub-chunk.
    pub fn payload_offset(&self) -> u32 {
        (Self::SIZE as u32).saturating_add(self.sub_chunk1_size)
    }

    /// Number of mono 16-bit samples in the payload.
    ///
    /// Guaranteed exact for headers produced by [`parse`]; computed with
    /// saturating arithmetic so a hand-built header cannot underflow.
    pub fn sample_count(&self) -> u32 {
        self.file_size.saturating_sub(self.payload_offset()) / 2
    }
}

fn four_cc(input: &[u8]) -> IResult<&[u8], [u8; 4]> {
    let (input, bytes) = take(4usize)(input)?;
    let mut id = [0u8; 4];
    id.copy_from_slice(bytes);
    Ok((input, id))
}

fn header_fields(input: &[u8]) -> IResult<&[u8], WavHeader> {
    let (input, chunk_id) = four_cc(input)?;
    let (input, file_size) = le_u32(input)?;
    let (input, file_format) = four_cc(input)?;
    let (input, sub_chunk1_id) = four_cc(input)?;
    let (input, sub_chunk1_size) = le_u32(input)?;
    let (input, audio_format) = le_u16(input)?;
    let (input, channels) = le_u16(input)?;
    let (input, sample_rate) = le_u32(input)?;
    let (input, byte_rate) = le_u32(input)?;
    let (input, block_align) = le_u16(input)?;
    let (input, bits_per_sample) = le_u16(input)?;
    let (input, sub_chunk2_id) = four_cc(input)?;
    let (input, sub_chunk2_size) = le_u32(input)?;

    Ok((
        input,
        WavHeader {
            chunk_id,
            file_size,
            file_format,
            sub_chunk1_id,
            sub_chunk1_size,
            audio_format,
            channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            sub_chunk2_id,
            sub_chunk2_size,
        },
    ))
}

/// Parse a container header from the first bytes of a file.
///
/// Rejects buffers shorter than [`WavHeader::SIZE`] and headers whose
/// computed payload would start past the declared container size or would
/// not align to 2-byte sample boundaries.
pub fn parse(data: &[u8]) -> Result<WavHeader> {
    if data.len() < WavHeader::SIZE {
        return Err(WavStreamError::MalformedHeader(format!(
            "header needs {} bytes, got {}",
            WavHeader::SIZE,
            data.len()
        )));
    }

    let (_, header) = header_fields(data)
        .map_err(|_| WavStreamError::MalformedHeader("truncated header fields".into()))?;

    let payload_offset = header.payload_offset();
    let payload_len = header.file_size.checked_sub(payload_offset).ok_or_else(|| {
        WavStreamError::MalformedHeader(format!(
            "payload offset {} is past the declared container size {}",
            payload_offset, header.file_size
        ))
    })?;

    if payload_len % 2 != 0 {
        return Err(WavStreamError::MalformedHeader(format!(
            "payload length {} is not 16-bit aligned",
            payload_len
        )));
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::make_container;

    #[test]
    fn test_parse_valid_header() {
        let data = make_container(&[1, 2, 3, 4]);
        let header = parse(&data).unwrap();

        assert_eq!(&header.chunk_id, b"RIFF");
        assert_eq!(&header.file_format, b"WAVE");
        assert_eq!(header.sub_chunk1_size, 16);
        assert_eq!(header.payload_offset(), 60);
        assert_eq!(header.sample_count(), 4);
    }

    #[test]
    fn test_payload_offset_tracks_sub_chunk_size() {
        let mut data = make_container(&[0; 8]);
        // Enlarge the declared format sub-chunk by 4 bytes.
        data[16..20].copy_from_slice(&20u32.to_le_bytes());
        let header = parse(&data).unwrap();

        assert_eq!(header.payload_offset(), 64);
        assert_eq!(header.sample_count(), 6);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let data = make_container(&[1, 2, 3]);
        let result = parse(&data[..WavHeader::SIZE - 1]);
        assert!(matches!(result, Err(WavStreamError::MalformedHeader(_))));
    }

    #[test]
    fn test_negative_payload_rejected() {
        let mut data = make_container(&[1, 2, 3, 4]);
        // Declare a container smaller than its own payload offset.
        data[4..8].copy_from_slice(&40u32.to_le_bytes());
        let result = parse(&data);
        assert!(matches!(result, Err(WavStreamError::MalformedHeader(_))));
    }

    #[test]
    fn test_odd_payload_rejected() {
        let mut data = make_container(&[1, 2, 3, 4]);
        // One byte more than the samples occupy.
        data[4..8].copy_from_slice(&69u32.to_le_bytes());
        let result = parse(&data);
        assert!(matches!(result, Err(WavStreamError::MalformedHeader(_))));
    }

    #[test]
    fn test_magic_bytes_not_enforced() {
        let mut data = make_container(&[1, 2]);
        data[0..4].copy_from_slice(b"JUNK");
        assert!(parse(&data).is_ok());
    }
}
