#![forbid(unsafe_code)]

/// ESAR header magic.
pub const MAGIC: [u8; 4] = *b"ESAR";

/// ESAR layout (big-endian throughout):
/// - [MAGIC 4]
/// - [u32 total_len]
/// - [u32 checksum (xxh32, seed 0)]
/// - records, back-to-back, until total_len:
///   - [u16 name_len][name bytes UTF-8]
///   - [u8 type_len][type bytes UTF-8]
///   - [u32 mtime_secs]
///   - [u32 content_len]
///   - [content bytes]
pub const HEADER_LEN: usize = 12;

pub const MAX_NAME_LEN: usize = u16::MAX as usize;
pub const MAX_TYPE_LEN: usize = u8::MAX as usize;

/// Fixed per-record overhead: name len, type len, mtime, content len.
pub const RECORD_OVERHEAD: usize = 2 + 1 + 4 + 4;

/// A logical file held in memory, ready to be bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub media_type: String,
    /// Epoch milliseconds. Encoded at second resolution; `None` encodes as 0.
    pub last_modified: Option<u64>,
    pub content: Vec<u8>,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        last_modified: Option<u64>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            last_modified,
            content: content.into(),
        }
    }
}

/// Metadata of one on-wire record, as reported by `Archive::entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub media_type: String,
    /// Epoch milliseconds, always a whole number of seconds.
    pub last_modified: u64,
    pub size: u32,
}

/// Index slot: record metadata borrowed from the source buffer plus the
/// content offset into it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    pub name: &'a str,
    pub media_type: &'a str,
    pub last_modified: u64,
    pub size: u32,
    pub offset: usize,
}

impl Record<'_> {
    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            name: self.name.to_owned(),
            media_type: self.media_type.to_owned(),
            last_modified: self.last_modified,
            size: self.size,
        }
    }
}

/// A materialized entry borrowed from a parsed archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveFile<'a> {
    pub name: &'a str,
    pub media_type: &'a str,
    pub last_modified: u64,
    pub content: &'a [u8],
}

impl ArchiveFile<'_> {
    /// Content length; records never exceed `u32::MAX` bytes.
    pub fn size(&self) -> u32 {
        self.content.len() as u32
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.content.to_vec()
    }

    /// Content as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(self.content).ok()
    }
}

/// Round epoch milliseconds to the nearest second, half away from zero.
pub(crate) fn ms_to_secs(ms: u64) -> u64 {
    ms / 1000 + u64::from(ms % 1000 >= 500)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_second() {
        assert_eq!(ms_to_secs(0), 0);
        assert_eq!(ms_to_secs(499), 0);
        assert_eq!(ms_to_secs(500), 1);
        assert_eq!(ms_to_secs(1708915929964), 1708915930);
        assert_eq!(ms_to_secs(1708915929499), 1708915929);
    }

    #[test]
    fn archive_file_text() {
        let f = ArchiveFile {
            name: "a",
            media_type: "text/plain",
            last_modified: 0,
            content: b"hi",
        };
        assert_eq!(f.text(), Some("hi"));
        assert_eq!(f.size(), 2);
        assert_eq!(f.to_vec(), b"hi".to_vec());
    }
}
