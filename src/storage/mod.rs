//! Storage collaborator interface
//!
//! The engine never touches a filesystem directly: directory enumeration and
//! file access go through the [`Storage`] trait. [`StdStorage`] implements it
//! over `std::fs` for hosts and tests; embedded targets implement it over
//! their SD/flash driver. Handles are owned values so every exit path,
//! including error paths, releases them.

#[cfg(test)]
pub(crate) mod mock;
mod std_fs;

pub use std_fs::StdStorage;

use crate::Result;

bitflags::bitflags! {
    /// Directory entry attribute mask, modeled on FAT attribute bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryAttributes: u8 {
        /// Entry is read-only
        const READ_ONLY = 0x01;
        /// Entry is hidden
        const HIDDEN = 0x02;
        /// Entry belongs to the operating system
        const SYSTEM = 0x04;
        /// Entry is a directory
        const DIRECTORY = 0x10;
        /// Entry carries the archive bit
        const ARCHIVE = 0x20;
    }
}

/// One enumerated directory entry
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// File name within the enumerated directory
    pub name: String,
    /// Attribute flags
    pub attrs: EntryAttributes,
}

impl DirEntry {
    /// Whether the entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.attrs.contains(EntryAttributes::DIRECTORY)
    }

    /// Whether the entry is hidden.
    pub fn is_hidden(&self) -> bool {
        self.attrs.contains(EntryAttributes::HIDDEN)
    }
}

/// Storage driver contract the player core requires.
///
/// Short reads are not errors: [`Storage::read`] returns how many bytes it
/// produced and the caller decides what a shortfall means. `Dir` and `File`
/// are owned handles; dropping one releases it even if the explicit close
/// call was skipped on an error path.
pub trait Storage {
    /// Open directory handle
    type Dir;
    /// Open file handle
    type File;

    /// Open a directory for enumeration.
    fn open_dir(&mut self, path: &str) -> Result<Self::Dir>;

    /// Produce the next directory entry, or `None` at the end.
    fn next_entry(&mut self, dir: &mut Self::Dir) -> Result<Option<DirEntry>>;

    /// Close a directory handle.
    fn close_dir(&mut self, dir: Self::Dir) -> Result<()>;

    /// Open a file read-only.
    fn open_file(&mut self, path: &str) -> Result<Self::File>;

    /// Read up to `dest.len()` bytes; returns the count actually read.
    fn read(&mut self, file: &mut Self::File, dest: &mut [u8]) -> Result<usize>;

    /// Seek to an absolute byte offset.
    fn seek(&mut self, file: &mut Self::File, offset: u64) -> Result<()>;

    /// Close a file handle.
    fn close_file(&mut self, file: Self::File) -> Result<()>;

    /// Whether the read position is at or past the end of the file.
    fn at_eof(&mut self, file: &mut Self::File) -> bool;
}
