#![forbid(unsafe_code)]

use std::io::{Cursor, Read};

use crate::archive::error::{ArchiveError, ArchiveResult};

pub fn put_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn read_exact<const N: usize>(r: &mut dyn Read) -> ArchiveResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(eof_as_invalid)?;
    Ok(buf)
}

pub fn read_u8(r: &mut dyn Read) -> ArchiveResult<u8> {
    Ok(read_exact::<1>(r)?[0])
}

pub fn read_u16(r: &mut dyn Read) -> ArchiveResult<u16> {
    Ok(u16::from_be_bytes(read_exact::<2>(r)?))
}

pub fn read_u32(r: &mut dyn Read) -> ArchiveResult<u32> {
    Ok(u32::from_be_bytes(read_exact::<4>(r)?))
}

/// Borrow the next `len` bytes of the underlying buffer and advance past them.
pub fn take<'a>(cur: &mut Cursor<&'a [u8]>, len: usize) -> ArchiveResult<&'a [u8]> {
    let buf: &'a [u8] = *cur.get_ref();
    let start = cur.position() as usize;
    let end = start
        .checked_add(len)
        .filter(|&end| end <= buf.len())
        .ok_or_else(|| ArchiveError::invalid(format!("record at offset {start} overruns archive")))?;
    cur.set_position(end as u64);
    Ok(&buf[start..end])
}

pub fn utf8<'a>(bytes: &'a [u8], what: &str) -> ArchiveResult<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| ArchiveError::invalid(format!("{what} is not utf8")))
}

fn eof_as_invalid(e: std::io::Error) -> ArchiveError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ArchiveError::invalid("record overruns archive")
    } else {
        ArchiveError::Io(e)
    }
}

pub fn hex32(v: u32) -> String {
    format!("{v:08x}")
}
