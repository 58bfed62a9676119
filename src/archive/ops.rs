#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive::bundle::bundle;
use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::format::{ArchiveFile, EntryInfo};
use crate::archive::io::hex32;
use crate::archive::media;
use crate::archive::path::{normalize_rel_path, prefixed, safe_join, should_exclude};
use crate::archive::read::Archive;
use crate::archive::source::DiskEntry;

/// Collect the files under `input` as bundle sources.
///
/// Names are normalized to forward slashes and sorted by their bytes, so the
/// same tree always packs to the same archive.
pub fn collect(
    input: &Path,
    prefix: &str,
    excludes: &[String],
    media_type: Option<&str>,
) -> ArchiveResult<Vec<DiskEntry>> {
    let mut files: Vec<DiskEntry> = Vec::new();
    for ent in WalkDir::new(input).follow_links(false) {
        let ent = ent.map_err(|e| {
            let msg = e.to_string();
            let io = e.into_io_error().unwrap_or_else(|| std::io::Error::other(msg));
            ArchiveError::Io(io)
        })?;

        if !ent.file_type().is_file() {
            continue;
        }

        let rel = normalize_rel_path(input, ent.path())?;
        let name = prefixed(prefix, &rel);
        if should_exclude(&name, excludes) {
            debug!(entry = %name, "excluded");
            continue;
        }
        let ty = media_type.unwrap_or_else(|| media::guess(ent.path()));
        files.push(DiskEntry::from_path(name, ty, ent.path())?);
    }

    files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    Ok(files)
}

/// Pack a directory into an archive file. Returns the number of entries.
pub fn pack(
    input: &Path,
    output: &Path,
    prefix: &str,
    excludes: &[String],
    media_type: Option<&str>,
) -> ArchiveResult<usize> {
    let files = collect(input, prefix, excludes, media_type)?;
    let buf = bundle(&files)?;
    std::fs::write(output, &buf)?;
    info!(
        output = %output.display(),
        entries = files.len(),
        bytes = buf.len(),
        "pack written"
    );
    Ok(files.len())
}

fn read_archive_file(path: &Path) -> ArchiveResult<Vec<u8>> {
    let buf = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = buf.len(), "archive loaded");
    Ok(buf)
}

/// Read archive record metadata (without touching content).
pub fn entries(archive: &Path) -> ArchiveResult<Vec<EntryInfo>> {
    let buf = read_archive_file(archive)?;
    Ok(Archive::parse(&buf)?.entries())
}

pub fn list(archive: &Path, verbose: bool, out: &mut dyn Write) -> ArchiveResult<()> {
    let buf = read_archive_file(archive)?;
    let archive = Archive::parse(&buf)?;

    if verbose {
        writeln!(out, "checksum={}", hex32(archive.checksum()))?;
    }
    for e in archive.entries() {
        if verbose {
            writeln!(
                out,
                "{}  type={} size={} modified={}",
                e.name, e.media_type, e.size, e.last_modified
            )?;
        } else {
            writeln!(out, "{}", e.name)?;
        }
    }
    Ok(())
}

/// Extract entries to `output`. Returns the number of files written.
///
/// Duplicate names resolve to the last record, the same as lookup. Every
/// target path is checked before anything is written: a name that escapes
/// `output`, two names mapping to one path, or a file where another entry
/// needs a directory fails the whole extract. Later filesystem errors can
/// still leave earlier files behind.
pub fn extract(archive: &Path, output: &Path, filter: &[String], verify_checksum: bool) -> ArchiveResult<usize> {
    let buf = read_archive_file(archive)?;
    let archive = if verify_checksum {
        Archive::parse_verified(&buf)?
    } else {
        Archive::parse(&buf)?
    };

    let mut seen = HashSet::new();
    let mut plan: Vec<(PathBuf, ArchiveFile<'_>)> = Vec::new();
    for name in archive.iter().map(|e| e.name) {
        if !seen.insert(name) {
            continue;
        }
        if !filter.is_empty() && !filter.iter().any(|s| name.contains(s.as_str())) {
            continue;
        }
        let Some(e) = archive.file(name) else {
            continue;
        };
        plan.push((safe_join(output, e.name)?, e));
    }
    check_targets(output, &plan)?;

    std::fs::create_dir_all(output)?;
    for (out_path, e) in &plan {
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(out_path, e.content)?;
        debug!(entry = e.name, path = %out_path.display(), "extracted");
    }

    info!(files = plan.len(), output = %output.display(), "extract finished");
    Ok(plan.len())
}

fn check_targets(output: &Path, plan: &[(PathBuf, ArchiveFile<'_>)]) -> ArchiveResult<()> {
    let mut files: HashMap<&Path, &str> = HashMap::new();
    for (path, e) in plan {
        if let Some(other) = files.insert(path.as_path(), e.name) {
            return Err(ArchiveError::ExtractConflict(format!("{other} and {} map to one path", e.name)));
        }
    }
    for (path, e) in plan {
        for dir in path.ancestors().skip(1).take_while(|d| d.starts_with(output) && *d != output) {
            if let Some(other) = files.get(dir) {
                return Err(ArchiveError::ExtractConflict(format!("{} needs {other} to be a directory", e.name)));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(ArchiveError::ExtractConflict(format!(
                    "{} needs {} to be a directory",
                    e.name,
                    dir.display()
                )));
            }
        }
    }
    Ok(())
}

/// Check structure and checksum. Returns the number of records.
pub fn verify(archive: &Path) -> ArchiveResult<usize> {
    let buf = read_archive_file(archive)?;
    let archive = Archive::parse_verified(&buf)?;
    Ok(archive.len())
}

/// Write one entry's content to `out`.
pub fn cat(archive: &Path, name: &str, out: &mut dyn Write) -> ArchiveResult<()> {
    let buf = read_archive_file(archive)?;
    let archive = Archive::parse(&buf)?;
    let file = archive
        .file(name)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, format!("no entry named {name}")))?;
    out.write_all(file.content)?;
    Ok(())
}
