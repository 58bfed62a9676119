#![forbid(unsafe_code)]

//! ESAR: a flat archive of named, typed, timestamped blobs in one buffer.
//!
//! ```
//! use esar::archive::{bundle, Archive, Entry};
//!
//! let buf = bundle(&[Entry::new("foo.txt", "text/plain", Some(1_708_915_929_964), "hello")]).unwrap();
//! let archive = Archive::parse(&buf).unwrap();
//! assert_eq!(archive.file("foo.txt").unwrap().content, b"hello");
//! assert_eq!(archive.entries()[0].last_modified, 1_708_915_930_000);
//! ```

pub mod archive;
