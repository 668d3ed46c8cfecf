//! Bounded file discovery table
//!
//! A catalog is built once from a directory scan and is immutable until the
//! next rebuild. The entry table has a fixed capacity decided at build time;
//! it is allocated up front and never grows. Discovery is resilient: a file
//! that fails to open or parse is skipped and counted, only a failure to open
//! the directory itself aborts the build.

use crate::storage::Storage;
use crate::wav_format::{self, WavHeader};
use crate::{Result, WavStreamError};

/// File name suffix accepted by the catalog scan (case-insensitive)
pub const AUDIO_EXTENSION: &str = ".wav";

/// One cataloged file and its parsed metadata
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Display name (the directory entry's file name)
    pub name: String,
    /// Full path usable to reopen the file
    pub path: String,
    /// Parsed container header
    pub header: WavHeader,
    /// Number of mono 16-bit samples in the payload
    pub total_samples: u32,
}

impl FileEntry {
    /// Playback duration in seconds at the given output rate, using the
    /// channel count the file declares.
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        let channels = self.header.channels.max(1) as f32;
        self.total_samples as f32 / channels / sample_rate.max(1) as f32
    }

    /// Display string for playlist-style listings, capped at 99:59.
    pub fn display_string(&self, sample_rate: u32) -> String {
        let secs = self.duration_secs(sample_rate).min(5999.0);
        let mins = (secs / 60.0) as u32;
        let secs = (secs % 60.0) as u32;
        format!("{} ({:02}:{:02})", self.name, mins, secs)
    }
}

/// Ordered, fixed-capacity table of discovered playable files
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<FileEntry>,
    limit: usize,
    truncated: bool,
    skipped: usize,
}

impl Catalog {
    /// Scan `search_path` and build a catalog bounded by `max_files` slots.
    ///
    /// One slot is reserved, so at most `max_files - 1` entries are recorded;
    /// downstream tooling counts on that bound. Entries appear in enumeration
    /// order. Directories, hidden entries and names without the audio
    /// extension are skipped silently; files that fail to open or parse are
    /// skipped and counted in [`Catalog::skipped`].
    pub fn build<S: Storage>(storage: &mut S, search_path: &str, max_files: usize) -> Result<Self> {
        let limit = max_files.saturating_sub(1);

        // Pass 1: collect matching names, then release the directory handle.
        // Header parsing reopens each file afterwards, so storage drivers
        // with a single shared handle never hold a directory and a file
        // open at the same time.
        let mut dir = storage.open_dir(search_path)?;
        let mut found: Vec<(String, String)> = Vec::with_capacity(limit);
        let mut truncated = false;
        loop {
            let entry = match storage.next_entry(&mut dir) {
                Ok(Some(entry)) => entry,
                // A faulted entry read ends the scan with what was found;
                // only the directory open above is fatal.
                Ok(None) | Err(_) => break,
            };
            if entry.is_directory() || entry.is_hidden() {
                continue;
            }
            if !entry.name.to_ascii_lowercase().ends_with(AUDIO_EXTENSION) {
                continue;
            }
            if found.len() >= limit {
                truncated = true;
                break;
            }
            let path = join_path(search_path, &entry.name);
            found.push((entry.name, path));
        }
        let _ = storage.close_dir(dir);

        // Pass 2: parse each header; a bad file drops out of the table.
        let mut entries = Vec::with_capacity(found.len());
        let mut skipped = 0;
        for (name, path) in found {
            match load_entry(storage, name, path) {
                Ok(entry) => entries.push(entry),
                Err(_) => skipped += 1,
            }
        }

        Ok(Catalog {
            entries,
            limit,
            truncated,
            skipped,
        })
    }

    /// Number of cataloged files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if any.
    pub fn entry(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    /// All entries in enumeration order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Maximum number of entries this catalog could record.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether the scan found more matching files than the table could hold.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Number of matching files dropped because they failed to open or parse.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn load_entry<S: Storage>(storage: &mut S, name: String, path: String) -> Result<FileEntry> {
    let mut file = storage.open_file(&path)?;
    let mut raw = [0u8; WavHeader::SIZE];
    let read_result = storage.read(&mut file, &mut raw);
    let _ = storage.close_file(file);

    let n = read_result?;
    if n < WavHeader::SIZE {
        return Err(WavStreamError::MalformedHeader(format!(
            "{path}: file shorter than the fixed header"
        )));
    }
    let header = wav_format::parse(&raw)?;
    let total_samples = header.sample_count();

    Ok(FileEntry {
        name,
        path,
        header,
        total_samples,
    })
}

fn join_path(search_path: &str, name: &str) -> String {
    // Volume roots like "0:/" already end with a separator.
    if search_path.is_empty() || search_path.ends_with('/') {
        format!("{search_path}{name}")
    } else {
        format!("{search_path}/{name}")
    }
}
