//! In-memory storage driver for unit tests
//!
//! Directories and file contents are scripted up front, so state-machine
//! tests get deterministic enumeration order and injectable open failures.

use std::collections::{HashMap, HashSet};

use super::{DirEntry, EntryAttributes, Storage};
use crate::{Result, WavStreamError};

#[derive(Default)]
pub(crate) struct MemStorage {
    dirs: HashMap<String, Vec<DirEntry>>,
    files: HashMap<String, Vec<u8>>,
    fail_open: HashSet<String>,
    fail_open_after: HashMap<String, usize>,
}

pub(crate) struct MemDir {
    entries: std::vec::IntoIter<DirEntry>,
}

pub(crate) struct MemFile {
    path: String,
    pos: usize,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, dir: &str, name: &str, attrs: EntryAttributes) {
        self.dirs.entry(dir.to_string()).or_default().push(DirEntry {
            name: name.to_string(),
            attrs,
        });
    }

    pub fn add_raw(&mut self, dir: &str, name: &str, data: Vec<u8>) {
        self.add_entry(dir, name, EntryAttributes::empty());
        self.files.insert(join(dir, name), data);
    }

    pub fn add_wav(&mut self, dir: &str, name: &str, samples: &[i16]) {
        self.add_raw(dir, name, make_container(samples));
    }

    pub fn fail_open(&mut self, dir: &str, name: &str) {
        self.fail_open.insert(join(dir, name));
    }

    /// Let the file open `successes` times, then fail every later attempt.
    pub fn fail_open_after(&mut self, dir: &str, name: &str, successes: usize) {
        self.fail_open_after.insert(join(dir, name), successes);
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

impl Storage for MemStorage {
    type Dir = MemDir;
    type File = MemFile;

    fn open_dir(&mut self, path: &str) -> Result<Self::Dir> {
        let entries = self
            .dirs
            .get(path)
            .cloned()
            .ok_or_else(|| WavStreamError::Storage(format!("no such directory: {path}")))?;
        Ok(MemDir {
            entries: entries.into_iter(),
        })
    }

    fn next_entry(&mut self, dir: &mut Self::Dir) -> Result<Option<DirEntry>> {
        Ok(dir.entries.next())
    }

    fn close_dir(&mut self, _dir: Self::Dir) -> Result<()> {
        Ok(())
    }

    fn open_file(&mut self, path: &str) -> Result<Self::File> {
        if self.fail_open.contains(path) {
            return Err(WavStreamError::Storage(format!("open failure: {path}")));
        }
        if let Some(remaining) = self.fail_open_after.get_mut(path) {
            if *remaining == 0 {
                return Err(WavStreamError::Storage(format!("open failure: {path}")));
            }
            *remaining -= 1;
        }
        if !self.files.contains_key(path) {
            return Err(WavStreamError::Storage(format!("no such file: {path}")));
        }
        Ok(MemFile {
            path: path.to_string(),
            pos: 0,
        })
    }

    fn read(&mut self, file: &mut Self::File, dest: &mut [u8]) -> Result<usize> {
        let data = self
            .files
            .get(&file.path)
            .ok_or_else(|| WavStreamError::Storage(format!("no such file: {}", file.path)))?;
        let n = dest.len().min(data.len().saturating_sub(file.pos));
        dest[..n].copy_from_slice(&data[file.pos..file.pos + n]);
        file.pos += n;
        Ok(n)
    }

    fn seek(&mut self, file: &mut Self::File, offset: u64) -> Result<()> {
        file.pos = offset as usize;
        Ok(())
    }

    fn close_file(&mut self, _file: Self::File) -> Result<()> {
        Ok(())
    }

    fn at_eof(&mut self, file: &mut Self::File) -> bool {
        match self.files.get(&file.path) {
            Some(data) => file.pos >= data.len(),
            None => true,
        }
    }
}

/// Build a container byte-exact to the on-disk contract: 44-byte fixed
/// header, 16-byte format sub-chunk, then the little-endian sample payload.
pub(crate) fn make_container(samples: &[i16]) -> Vec<u8> {
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
