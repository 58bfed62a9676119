#![forbid(unsafe_code)]

use std::borrow::Cow;

use tracing::{debug, info};

use crate::archive::checksum::{times_field, Checksum};
use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::format::{ms_to_secs, HEADER_LEN, MAGIC, MAX_NAME_LEN, MAX_TYPE_LEN, RECORD_OVERHEAD};
use crate::archive::io::{put_u16, put_u32, put_u8};
use crate::archive::source::EntrySource;

/// One source after validation and content acquisition.
struct Prepared<'a> {
    name: &'a [u8],
    media_type: &'a [u8],
    times: [u8; 8],
    content: Cow<'a, [u8]>,
}

impl Prepared<'_> {
    fn encoded_len(&self) -> u64 {
        (RECORD_OVERHEAD + self.name.len() + self.media_type.len()) as u64 + self.content.len() as u64
    }
}

fn prepare<S: EntrySource>(src: &S) -> ArchiveResult<Prepared<'_>> {
    let name = src.name().as_bytes();
    if name.len() > MAX_NAME_LEN {
        return Err(ArchiveError::NameTooLong {
            name: src.name().to_owned(),
            len: name.len(),
        });
    }
    let media_type = src.media_type().as_bytes();
    if media_type.len() > MAX_TYPE_LEN {
        return Err(ArchiveError::TypeTooLong {
            name: src.name().to_owned(),
            len: media_type.len(),
        });
    }

    let ms = src.last_modified().unwrap_or(0);
    let mtime_secs = u32::try_from(ms_to_secs(ms)).map_err(|_| ArchiveError::TimestampOutOfRange {
        name: src.name().to_owned(),
        ms,
    })?;

    let content = src.read_content()?;
    let size = u32::try_from(content.len()).map_err(|_| ArchiveError::ContentTooLarge {
        name: src.name().to_owned(),
        len: content.len() as u64,
    })?;

    Ok(Prepared {
        name,
        media_type,
        times: times_field(mtime_secs, size),
        content,
    })
}

/// Pack `sources` into one ESAR buffer, preserving their order.
///
/// All-or-nothing: any oversized name/type/content, unrepresentable timestamp
/// or failed content read aborts the bundle and nothing is returned.
pub fn bundle<S: EntrySource>(sources: &[S]) -> ArchiveResult<Vec<u8>> {
    let prepared = sources.iter().map(prepare).collect::<ArchiveResult<Vec<_>>>()?;

    let total: u64 = HEADER_LEN as u64 + prepared.iter().map(Prepared::encoded_len).sum::<u64>();
    let total_u32 = u32::try_from(total).map_err(|_| ArchiveError::ArchiveTooLarge(total))?;

    let mut out: Vec<u8> = Vec::with_capacity(total as usize);
    out.extend_from_slice(&MAGIC);
    put_u32(&mut out, total_u32);
    // checksum placeholder, patched once every record is hashed
    put_u32(&mut out, 0);

    let mut checksum = Checksum::new();
    for p in &prepared {
        put_u16(&mut out, p.name.len() as u16);
        out.extend_from_slice(p.name);
        put_u8(&mut out, p.media_type.len() as u8);
        out.extend_from_slice(p.media_type);
        out.extend_from_slice(&p.times);
        out.extend_from_slice(&p.content);

        checksum.update_record(p.name, p.media_type, &p.times, &p.content);
        debug!(
            entry = %String::from_utf8_lossy(p.name),
            size = p.content.len(),
            "record written"
        );
    }

    debug_assert_eq!(out.len() as u64, total);

    let sum = checksum.finish();
    out[8..HEADER_LEN].copy_from_slice(&sum.to_be_bytes());

    info!(entries = prepared.len(), bytes = total, checksum = sum, "archive bundled");
    Ok(out)
}
