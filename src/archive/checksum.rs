#![forbid(unsafe_code)]

//! Archive checksum: XXH32 (seed 0) fed, per record in encode order, with
//! name bytes, type bytes, the 8 raw mtime+size bytes and the content.

use xxhash_rust::xxh32::Xxh32;

pub const SEED: u32 = 0;

pub struct Checksum {
    state: Xxh32,
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum {
    pub fn new() -> Self {
        Self {
            state: Xxh32::new(SEED),
        }
    }

    /// Feed one record. `times` is the encoded `[u32 mtime_secs][u32 content_len]` pair.
    pub fn update_record(&mut self, name: &[u8], media_type: &[u8], times: &[u8; 8], content: &[u8]) {
        self.state.update(name);
        self.state.update(media_type);
        self.state.update(times);
        self.state.update(content);
    }

    pub fn finish(&self) -> u32 {
        self.state.digest()
    }
}

/// One record as the checksum sees it: name, type, mtime+size field, content.
pub type RecordBytes<'r> = (&'r [u8], &'r [u8], [u8; 8], &'r [u8]);

/// Checksum over any record sequence, in the given order.
pub fn compute<'r>(records: impl IntoIterator<Item = RecordBytes<'r>>) -> u32 {
    let mut sum = Checksum::new();
    for (name, media_type, times, content) in records {
        sum.update_record(name, media_type, &times, content);
    }
    sum.finish()
}

/// Encode the mtime+size pair exactly as it appears on the wire.
pub(crate) fn times_field(mtime_secs: u32, size: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&mtime_secs.to_be_bytes());
    out[4..].copy_from_slice(&size.to_be_bytes());
    out
}
