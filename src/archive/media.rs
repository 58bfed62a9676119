#![forbid(unsafe_code)]

use std::path::Path;

pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Guess a media type from the file extension.
pub fn guess(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "js" | "mjs" => "text/javascript",
        "ts" | "mts" => "application/typescript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        _ => DEFAULT_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_extensions() {
        assert_eq!(guess(Path::new("a/b.JSON")), "application/json");
        assert_eq!(guess(Path::new("index.mjs")), "text/javascript");
        assert_eq!(guess(Path::new("blob.bin")), DEFAULT_MEDIA_TYPE);
        assert_eq!(guess(Path::new("Makefile")), DEFAULT_MEDIA_TYPE);
    }
}
