#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::archive::error::ArchiveResult;
use crate::archive::format::Entry;

/// Something that can be bundled: metadata plus a way to obtain the content.
///
/// Content acquisition may do I/O; the bundler calls `read_content` once per
/// source, in order, and aborts on the first failure.
pub trait EntrySource {
    fn name(&self) -> &str;
    fn media_type(&self) -> &str;
    /// Epoch milliseconds.
    fn last_modified(&self) -> Option<u64>;
    fn read_content(&self) -> ArchiveResult<Cow<'_, [u8]>>;
}

impl<T: EntrySource + ?Sized> EntrySource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn media_type(&self) -> &str {
        (**self).media_type()
    }

    fn last_modified(&self) -> Option<u64> {
        (**self).last_modified()
    }

    fn read_content(&self) -> ArchiveResult<Cow<'_, [u8]>> {
        (**self).read_content()
    }
}

impl EntrySource for Entry {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn last_modified(&self) -> Option<u64> {
        self.last_modified
    }

    fn read_content(&self) -> ArchiveResult<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(&self.content))
    }
}

/// Milliseconds since the epoch, or `None` before the epoch or past `u64`.
pub(crate) fn epoch_millis(t: SystemTime) -> Option<u64> {
    let d = t.duration_since(UNIX_EPOCH).ok()?;
    u64::try_from(d.as_millis()).ok()
}

/// A file on disk, read only when bundled.
#[derive(Debug, Clone)]
pub struct DiskEntry {
    pub name: String,
    pub media_type: String,
    pub last_modified: Option<u64>,
    pub path: PathBuf,
}

impl DiskEntry {
    /// Take the timestamp from the file's metadata.
    pub fn from_path(name: impl Into<String>, media_type: impl Into<String>, path: &Path) -> ArchiveResult<Self> {
        let meta = std::fs::metadata(path)?;
        let last_modified = meta.modified().ok().and_then(epoch_millis);
        Ok(Self {
            name: name.into(),
            media_type: media_type.into(),
            last_modified,
            path: path.to_path_buf(),
        })
    }
}

impl EntrySource for DiskEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn last_modified(&self) -> Option<u64> {
        self.last_modified
    }

    fn read_content(&self) -> ArchiveResult<Cow<'_, [u8]>> {
        Ok(Cow::Owned(std::fs::read(&self.path)?))
    }
}
