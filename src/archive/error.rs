#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid esar archive: {0}")]
    InvalidFormat(String),

    #[error("entry name too long ({len} bytes, max 65535): {name}")]
    NameTooLong { name: String, len: usize },

    #[error("entry type too long ({len} bytes, max 255) for {name}")]
    TypeTooLong { name: String, len: usize },

    #[error("entry content too large ({len} bytes) for {name}")]
    ContentTooLarge { name: String, len: u64 },

    #[error("timestamp {ms}ms does not fit in 32-bit seconds for {name}")]
    TimestampOutOfRange { name: String, ms: u64 },

    #[error("archive too large: {0} bytes")]
    ArchiveTooLarge(u64),

    #[error("checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("extract conflict: {0}")]
    ExtractConflict(String),

    #[error("path is outside input dir: {0}")]
    Outside(String),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl ArchiveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ArchiveError::InvalidFormat(msg.into())
    }
}
