#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::io::Cursor;

use tracing::{debug, info, warn};

use crate::archive::checksum::{self, times_field};
use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::format::{ArchiveFile, EntryInfo, Record, HEADER_LEN, MAGIC};
use crate::archive::io::{read_exact, read_u16, read_u32, read_u8, take, utf8};

/// A parsed ESAR archive.
///
/// Borrows the source buffer for its whole lifetime; content is sliced from
/// it on demand and never copied during parsing. The index is built once and
/// never changes afterwards.
#[derive(Debug, Clone)]
pub struct Archive<'a> {
    buf: &'a [u8],
    checksum: u32,
    records: Vec<Record<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Archive<'a> {
    /// Parse `buf`. The stored checksum is read but not verified; see
    /// [`Archive::verify`] and [`Archive::parse_verified`].
    pub fn parse(buf: &'a [u8]) -> ArchiveResult<Self> {
        if buf.len() < HEADER_LEN {
            return Err(ArchiveError::invalid("shorter than header"));
        }

        let mut cur = Cursor::new(buf);
        let magic = read_exact::<4>(&mut cur)?;
        if magic != MAGIC {
            return Err(ArchiveError::invalid("bad header magic"));
        }

        let declared = read_u32(&mut cur)? as usize;
        if declared != buf.len() {
            return Err(ArchiveError::invalid(format!(
                "declared length {declared} does not match buffer length {}",
                buf.len()
            )));
        }

        let checksum = read_u32(&mut cur)?;

        let mut records: Vec<Record<'a>> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        while (cur.position() as usize) < declared {
            let name_len = read_u16(&mut cur)? as usize;
            let name = utf8(take(&mut cur, name_len)?, "entry name")?;
            let type_len = read_u8(&mut cur)? as usize;
            let media_type = utf8(take(&mut cur, type_len)?, "entry type")?;
            let mtime_secs = read_u32(&mut cur)?;
            let size = read_u32(&mut cur)?;
            let offset = cur.position() as usize;
            take(&mut cur, size as usize)?;

            debug!(entry = name, offset, size, "record parsed");

            if index.insert(name, records.len()).is_some() {
                warn!(entry = name, "duplicate entry name, later record wins");
            }
            records.push(Record {
                name,
                media_type,
                last_modified: u64::from(mtime_secs) * 1000,
                size,
                offset,
            });
        }

        info!(entries = records.len(), bytes = declared, checksum, "archive parsed");

        Ok(Self {
            buf,
            checksum,
            records,
            index,
        })
    }

    /// Parse `buf` and reject it unless the stored checksum matches the content.
    pub fn parse_verified(buf: &'a [u8]) -> ArchiveResult<Self> {
        let archive = Self::parse(buf)?;
        archive.verify()?;
        Ok(archive)
    }

    /// The checksum stored in the header.
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Recompute the checksum over every on-wire record.
    pub fn computed_checksum(&self) -> u32 {
        checksum::compute(self.records.iter().map(|r| {
            (
                r.name.as_bytes(),
                r.media_type.as_bytes(),
                times_field((r.last_modified / 1000) as u32, r.size),
                self.content(r),
            )
        }))
    }

    pub fn verify(&self) -> ArchiveResult<()> {
        let computed = self.computed_checksum();
        if computed != self.checksum {
            warn!(stored = self.checksum, computed, "checksum mismatch");
            return Err(ArchiveError::ChecksumMismatch {
                stored: self.checksum,
                computed,
            });
        }
        Ok(())
    }

    /// Metadata of every on-wire record, in encounter order. Duplicate names
    /// appear once per record.
    pub fn entries(&self) -> Vec<EntryInfo> {
        self.records.iter().map(Record::info).collect()
    }

    /// Every on-wire record, in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = ArchiveFile<'a>> + '_ {
        self.records.iter().map(|r| self.materialize(r))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The last record named `name`, or `None`.
    pub fn file(&self, name: &str) -> Option<ArchiveFile<'a>> {
        self.index.get(name).map(|&i| self.materialize(&self.records[i]))
    }

    /// Number of on-wire records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    fn content(&self, r: &Record<'a>) -> &'a [u8] {
        let buf: &'a [u8] = self.buf;
        &buf[r.offset..r.offset + r.size as usize]
    }

    fn materialize(&self, r: &Record<'a>) -> ArchiveFile<'a> {
        ArchiveFile {
            name: r.name,
            media_type: r.media_type,
            last_modified: r.last_modified,
            content: self.content(r),
        }
    }
}
