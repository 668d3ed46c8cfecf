//! `std::fs`-backed storage driver
//!
//! Dot-prefixed names are reported as hidden, matching the convention of the
//! host platforms this backend runs on.

use std::fs;
use std::io::{Read, Seek, SeekFrom};

use super::{DirEntry, EntryAttributes, Storage};
use crate::Result;

/// Storage driver over the host filesystem
#[derive(Debug, Default)]
pub struct StdStorage;

impl StdStorage {
    /// Create a new host-filesystem driver.
    pub fn new() -> Self {
        StdStorage
    }
}

/// Directory handle over [`fs::ReadDir`]
pub struct StdDir {
    iter: fs::ReadDir,
}

/// File handle tracking its own position and length, so end-of-file checks
/// stay syscall-free on the refill path.
pub struct StdFile {
    inner: fs::File,
    len: u64,
    pos: u64,
}

impl Storage for StdStorage {
    type Dir = StdDir;
    type File = StdFile;

    fn open_dir(&mut self, path: &str) -> Result<Self::Dir> {
        let iter = fs::read_dir(path)?;
        Ok(StdDir { iter })
    }

    fn next_entry(&mut self, dir: &mut Self::Dir) -> Result<Option<DirEntry>> {
        let entry = match dir.iter.next() {
            Some(entry) => entry?,
            None => return Ok(None),
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let mut attrs = EntryAttributes::empty();
        if entry.file_type()?.is_dir() {
            attrs |= EntryAttributes::DIRECTORY;
        }
        if name.starts_with('.') {
            attrs |= EntryAttributes::HIDDEN;
        }
        if entry.metadata()?.permissions().readonly() {
            attrs |= EntryAttributes::READ_ONLY;
        }

        Ok(Some(DirEntry { name, attrs }))
    }

    fn close_dir(&mut self, dir: Self::Dir) -> Result<()> {
        drop(dir);
        Ok(())
    }

    fn open_file(&mut self, path: &str) -> Result<Self::File> {
        let inner = fs::File::open(path)?;
        let len = inner.metadata()?.len();
        Ok(StdFile { inner, len, pos: 0 })
    }

    fn read(&mut self, file: &mut Self::File, dest: &mut [u8]) -> Result<usize> {
        // A single fs read may return less than requested mid-file; keep
        // going so a shortfall only ever means end-of-file.
        let mut filled = 0;
        while filled < dest.len() {
            let n = file.inner.read(&mut dest[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        file.pos += filled as u64;
        Ok(filled)
    }

    fn seek(&mut self, file: &mut Self::File, offset: u64) -> Result<()> {
        file.inner.seek(SeekFrom::Start(offset))?;
        file.pos = offset;
        Ok(())
    }

    fn close_file(&mut self, file: Self::File) -> Result<()> {
        drop(file);
        Ok(())
    }

    fn at_eof(&mut self, file: &mut Self::File) -> bool {
        file.pos >= file.len
    }
}
