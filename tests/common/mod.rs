//! Shared fixture helpers: build containers byte-exact to the on-disk
//! contract (44-byte fixed header, 16-byte format sub-chunk, PCM payload).

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub fn make_container(samples: &[i16]) -> Vec<u8> {
    const FMT_CHUNK_SIZE: u32 = 16;
    let payload_len = samples.len() as u32 * 2;
    let file_size = 44 + FMT_CHUNK_SIZE + payload_len;

    let mut data = Vec::with_capacity(file_size as usize);
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&file_size.to_le_bytes());
    data.extend_from_slice(b"WAVE");
    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM
    data.extend_from_slice(&1u16.to_le_bytes()); // mono
    data.extend_from_slice(&48_000u32.to_le_bytes());
    data.extend_from_slice(&96_000u32.to_le_bytes());
    data.extend_from_slice(&2u16.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes());
    data.extend_from_slice(b"data");
    data.extend_from_slice(&payload_len.to_le_bytes());
    data.extend_from_slice(&[0u8; FMT_CHUNK_SIZE as usize]);
    for sample in samples {
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

pub fn write_wav(dir: &Path, name: &str, samples: &[i16]) {
    fs::write(dir.join(name), make_container(samples)).unwrap();
}

pub fn ramp(len: usize) -> Vec<i16> {
    (0..len).map(|i| i as i16).collect()
}
