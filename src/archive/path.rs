#![forbid(unsafe_code)]

use std::path::{Component, Path, PathBuf};

use crate::archive::error::{ArchiveError, ArchiveResult};

/// Entry name for `file_path` relative to `input_root`, with forward slashes.
pub fn normalize_rel_path(input_root: &Path, file_path: &Path) -> ArchiveResult<String> {
    let rel = file_path
        .strip_prefix(input_root)
        .map_err(|_| ArchiveError::Outside(file_path.to_string_lossy().into_owned()))?;

    let out = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
        .replace('\\', "/");
    let out = out.trim_start_matches('/').to_string();

    if out.is_empty() {
        return Err(ArchiveError::invalid("empty relative path"));
    }

    Ok(out)
}

pub fn prefixed(prefix: &str, rel: &str) -> String {
    if prefix.is_empty() {
        return rel.to_string();
    }
    let mut p = prefix.replace('\\', "/");
    if !p.ends_with('/') {
        p.push('/');
    }
    let r = rel.trim_start_matches('/');
    format!("{p}{r}")
}

pub fn should_exclude(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|e| !e.is_empty() && name.contains(e))
}

/// Map an entry name onto `root`, refusing names that would escape it.
pub fn safe_join(root: &Path, name: &str) -> ArchiveResult<PathBuf> {
    let mut out = root.to_path_buf();
    let mut pushed = false;
    for part in name.split('/').filter(|p| !p.is_empty()) {
        match Path::new(part).components().next() {
            Some(Component::Normal(_)) if Path::new(part).components().count() == 1 => {
                out.push(part);
                pushed = true;
            }
            Some(Component::CurDir) => {}
            _ => return Err(ArchiveError::Outside(name.to_string())),
        }
    }
    if !pushed {
        return Err(ArchiveError::Outside(name.to_string()));
    }
    Ok(out)
}
