#![forbid(unsafe_code)]

mod bundle;
mod checksum;
mod error;
mod format;
mod io;
mod media;
mod ops;
mod path;
mod read;
mod source;

pub use bundle::bundle;
pub use checksum::{compute as compute_checksum, Checksum, RecordBytes};
pub use error::{ArchiveError, ArchiveResult};
pub use format::{
    ArchiveFile, Entry, EntryInfo, HEADER_LEN, MAGIC, MAX_NAME_LEN, MAX_TYPE_LEN,
};
pub use media::{guess as guess_media_type, DEFAULT_MEDIA_TYPE};
pub use read::Archive;
pub use source::{DiskEntry, EntrySource};

pub use ops::{cat, collect, entries, extract, list, pack, verify};
