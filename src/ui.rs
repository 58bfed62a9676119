#![forbid(unsafe_code)]

use esar::archive::{self, ArchiveError, ArchiveResult};
use inquire::{Confirm, Text};
use std::path::{Path, PathBuf};

fn prompt_err(e: inquire::InquireError) -> ArchiveError {
    ArchiveError::Io(std::io::Error::other(e.to_string()))
}

fn normalize_prefix(mut s: String) -> String {
    s = s.trim().replace('\\', "/");
    if s == "." {
        s.clear();
    }
    if !s.is_empty() && !s.ends_with('/') {
        s.push('/');
    }
    s
}

fn split_excludes(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.to_string())
        .collect()
}

fn ensure_esar_ext(p: &Path) -> PathBuf {
    if p.extension().and_then(|e| e.to_str()).unwrap_or("") == "esar" {
        return p.to_path_buf();
    }
    p.with_extension("esar")
}

pub fn run() -> ArchiveResult<()> {
    println!("ESAR Wizard\n");

    let input = Text::new("Input directory")
        .with_default("./assets")
        .prompt()
        .map(PathBuf::from)
        .map_err(prompt_err)?;

    let output_raw = Text::new("Output .esar file")
        .with_default("./assets.esar")
        .prompt()
        .map_err(prompt_err)?;
    let output = ensure_esar_ext(Path::new(&output_raw));

    let prefix = Text::new("Name prefix inside archive (optional)")
        .with_default("")
        .prompt()
        .map(normalize_prefix)
        .map_err(prompt_err)?;

    let excludes_raw = Text::new("Excludes (comma-separated substrings, optional)")
        .with_default(".git,target")
        .prompt()
        .map_err(prompt_err)?;
    let excludes = split_excludes(&excludes_raw);

    let media_type_raw = Text::new("Media type for all entries (empty = guess from extension)")
        .with_default("")
        .prompt()
        .map_err(prompt_err)?;
    let media_type = Some(media_type_raw.trim()).filter(|t| !t.is_empty());

    println!("\nPack summary:");
    println!("  input   : {}", input.display());
    println!("  output  : {}", output.display());
    println!("  prefix  : {}", if prefix.is_empty() { "<none>" } else { &prefix });
    println!("  excludes: {}", if excludes.is_empty() { "<none>".to_string() } else { excludes.join(", ") });
    println!("  type    : {}", media_type.unwrap_or("<guess>"));

    let proceed = Confirm::new("Proceed?").with_default(true).prompt().map_err(prompt_err)?;
    if !proceed {
        return Ok(());
    }

    let n = archive::pack(&input, &output, &prefix, &excludes, media_type)?;
    println!("packed {n} entries into {}", output.display());
    Ok(())
}
