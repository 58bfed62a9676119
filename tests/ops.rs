use std::fs;

use esar::archive::{self, Archive, ArchiveError, Entry};
use tempfile::TempDir;

fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("css")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
    fs::write(root.join("css/site.css"), "body{}").unwrap();
    fs::write(root.join("blob.bin"), [0u8, 1, 2, 255]).unwrap();
    fs::write(root.join(".git/HEAD"), "ref: main").unwrap();
    dir
}

#[test]
fn pack_list_extract_roundtrip() {
    let src = sample_tree();
    let work = TempDir::new().unwrap();
    let out = work.path().join("site.esar");

    let n = archive::pack(src.path(), &out, "www", &[".git".to_string()], None).unwrap();
    assert_eq!(n, 3);

    let entries = archive::entries(&out).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["www/blob.bin", "www/css/site.css", "www/index.html"]);
    assert_eq!(entries[0].media_type, "application/octet-stream");
    assert_eq!(entries[1].media_type, "text/css");
    assert_eq!(entries[2].media_type, "text/html");
    assert!(entries.iter().all(|e| e.last_modified % 1000 == 0));

    let mut listing = Vec::new();
    archive::list(&out, false, &mut listing).unwrap();
    assert_eq!(
        String::from_utf8(listing).unwrap(),
        "www/blob.bin\nwww/css/site.css\nwww/index.html\n"
    );

    assert_eq!(archive::verify(&out).unwrap(), 3);

    let dest = work.path().join("out");
    assert_eq!(archive::extract(&out, &dest, &[], true).unwrap(), 3);
    assert_eq!(fs::read(dest.join("www/blob.bin")).unwrap(), [0u8, 1, 2, 255]);
    assert_eq!(fs::read_to_string(dest.join("www/css/site.css")).unwrap(), "body{}");

    let mut cat = Vec::new();
    archive::cat(&out, "www/index.html", &mut cat).unwrap();
    assert_eq!(cat, b"<h1>hi</h1>");
    assert!(archive::cat(&out, "missing", &mut Vec::new()).is_err());
}

#[test]
fn pack_is_deterministic_and_honors_type_override() {
    let src = sample_tree();
    let work = TempDir::new().unwrap();
    let a = work.path().join("a.esar");
    let b = work.path().join("b.esar");

    archive::pack(src.path(), &a, "", &[], Some("application/x-test")).unwrap();
    archive::pack(src.path(), &b, "", &[], Some("application/x-test")).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());

    let entries = archive::entries(&a).unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.media_type == "application/x-test"));
}

#[test]
fn extract_filters_and_resolves_duplicates() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("dup.esar");
    let buf = archive::bundle(&[
        Entry::new("a.txt", "text/plain", None, "old"),
        Entry::new("b.txt", "text/plain", None, "bee"),
        Entry::new("a.txt", "text/plain", None, "new"),
    ])
    .unwrap();
    fs::write(&path, &buf).unwrap();

    let dest = work.path().join("all");
    assert_eq!(archive::extract(&path, &dest, &[], true).unwrap(), 2);
    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "new");

    let only_b = work.path().join("b");
    assert_eq!(archive::extract(&path, &only_b, &["b.".to_string()], true).unwrap(), 1);
    assert!(!only_b.join("a.txt").exists());
}

#[test]
fn extract_refuses_escaping_names() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("evil.esar");
    let buf = archive::bundle(&[Entry::new("../evil.txt", "text/plain", None, "x")]).unwrap();
    fs::write(&path, &buf).unwrap();

    let err = archive::extract(&path, &work.path().join("out"), &[], true).unwrap_err();
    assert!(matches!(err, ArchiveError::Outside(_)));
    assert!(!work.path().join("evil.txt").exists());
}

#[test]
fn corrupted_archive_fails_verification() {
    let src = sample_tree();
    let work = TempDir::new().unwrap();
    let out = work.path().join("site.esar");
    archive::pack(src.path(), &out, "", &[], None).unwrap();

    let mut buf = fs::read(&out).unwrap();
    let last = buf.len() - 1;
    buf[last] ^= 0xff;
    fs::write(&out, &buf).unwrap();

    // structure is intact, so unverified reads still work
    assert!(Archive::parse(&buf).is_ok());
    assert!(archive::entries(&out).is_ok());
    assert!(matches!(archive::verify(&out), Err(ArchiveError::ChecksumMismatch { .. })));
    assert!(archive::extract(&out, &work.path().join("x"), &[], true).is_err());
    assert!(archive::extract(&out, &work.path().join("y"), &[], false).is_ok());
}

#[test]
fn truncated_file_is_invalid() {
    let src = sample_tree();
    let work = TempDir::new().unwrap();
    let out = work.path().join("site.esar");
    archive::pack(src.path(), &out, "", &[], None).unwrap();

    let buf = fs::read(&out).unwrap();
    fs::write(&out, &buf[..buf.len() - 3]).unwrap();
    assert!(matches!(archive::entries(&out), Err(ArchiveError::InvalidFormat(_))));
}

#[test]
fn extract_checks_every_target_before_writing() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("clash.esar");
    let buf = archive::bundle(&[
        Entry::new("a", "text/plain", None, "file"),
        Entry::new("a/b", "text/plain", None, "nested"),
    ])
    .unwrap();
    fs::write(&path, &buf).unwrap();

    let dest = work.path().join("out");
    let err = archive::extract(&path, &dest, &[], true).unwrap_err();
    assert!(matches!(err, ArchiveError::ExtractConflict(_)));
    assert!(!dest.join("a").exists());

    // extracting only the nested entry is fine
    assert_eq!(archive::extract(&path, &dest, &["a/".to_string()], true).unwrap(), 1);
    assert_eq!(fs::read_to_string(dest.join("a/b")).unwrap(), "nested");
}

#[test]
fn extract_rejects_names_sharing_a_path() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("same.esar");
    let buf = archive::bundle(&[
        Entry::new("x/./y", "text/plain", None, "one"),
        Entry::new("x/y", "text/plain", None, "two"),
    ])
    .unwrap();
    fs::write(&path, &buf).unwrap();

    let dest = work.path().join("out");
    assert!(matches!(
        archive::extract(&path, &dest, &[], true),
        Err(ArchiveError::ExtractConflict(_))
    ));
    assert!(!dest.exists());
}

#[test]
fn extract_refuses_file_where_directory_is_needed() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("nested.esar");
    fs::write(&path, archive::bundle(&[Entry::new("d/f.txt", "text/plain", None, "x")]).unwrap()).unwrap();

    let dest = work.path().join("out");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("d"), "in the way").unwrap();

    assert!(matches!(
        archive::extract(&path, &dest, &[], true),
        Err(ArchiveError::ExtractConflict(_))
    ));
    assert_eq!(fs::read_to_string(dest.join("d")).unwrap(), "in the way");
}
