//! Optional metadata hooks run on every record before it is delivered.
//!
//! A hook error aborts the walk: archive and sync consumers treat ownership,
//! device numbers and extended attributes as part of the entry, so a record
//! with some of them silently missing is worse than no record.

use std::{fs::Metadata, io, path::Path};

use crate::record::StatRecord;

pub trait Enricher {
    /// Fill optional fields of `record` for the entry at `full_path`.
    fn enrich(&mut self, full_path: &Path, meta: &Metadata, record: &mut StatRecord)
    -> io::Result<()>;
}

/// The hooks enabled by default on this platform.
pub fn platform_enrichers() -> Vec<Box<dyn Enricher>> {
    #[cfg(unix)]
    {
        vec![Box::new(UnixIdentity::default()), Box::new(Xattrs)]
    }
    #[cfg(not(unix))]
    {
        Vec::new()
    }
}

#[cfg(unix)]
pub use unix::{UnixIdentity, Xattrs};

#[cfg(unix)]
mod unix {
    use std::{
        collections::{HashMap, hash_map::Entry},
        fs::Metadata,
        io,
        os::unix::fs::{FileTypeExt, MetadataExt},
        path::Path,
    };

    use log::trace;

    use super::Enricher;
    use crate::record::StatRecord;

    #[cfg(any(target_os = "linux", target_os = "android"))]
    const ENOTSUP: i32 = 95;
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    const ENOTSUP: i32 = 45;

    /// Owner ids, device numbers and hardlink detection.
    ///
    /// Hardlinks are tracked by `(dev, ino)` for the lifetime of this value;
    /// a later path of an already seen inode gets the first path as its
    /// `linkname` and a size of 0. Use a fresh value for every walk.
    #[derive(Debug, Default)]
    pub struct UnixIdentity {
        seen: HashMap<(u64, u64), String>,
    }

    impl Enricher for UnixIdentity {
        fn enrich(
            &mut self,
            _full_path: &Path,
            meta: &Metadata,
            record: &mut StatRecord,
        ) -> io::Result<()> {
            record.uid = Some(meta.uid());
            record.gid = Some(meta.gid());

            let ft = meta.file_type();
            if ft.is_block_device() || ft.is_char_device() {
                let (major, minor) = split_dev(meta.rdev());
                record.dev_major = Some(major);
                record.dev_minor = Some(minor);
            }

            if !ft.is_dir() && meta.nlink() > 1 {
                match self.seen.entry((meta.dev(), meta.ino())) {
                    Entry::Occupied(first) => {
                        trace!("[enrich] {} is a hardlink of {}", record.path, first.get());
                        record.linkname = Some(first.get().clone());
                        record.size = 0;
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(record.path.clone());
                    }
                }
            }
            Ok(())
        }
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub(crate) fn split_dev(dev: u64) -> (u64, u64) {
        let major = ((dev >> 32) & 0xffff_f000) | ((dev >> 8) & 0x0000_0fff);
        let minor = ((dev >> 12) & 0xffff_ff00) | (dev & 0x0000_00ff);
        (major, minor)
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    pub(crate) fn split_dev(dev: u64) -> (u64, u64) {
        ((dev >> 24) & 0xff, dev & 0x00ff_ffff)
    }

    /// Extended attributes, read without following symlinks. Filesystems
    /// without xattr support contribute nothing.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Xattrs;

    impl Enricher for Xattrs {
        fn enrich(
            &mut self,
            full_path: &Path,
            _meta: &Metadata,
            record: &mut StatRecord,
        ) -> io::Result<()> {
            let names = match xattr::list(full_path) {
                Ok(names) => names,
                Err(e) if is_unsupported(&e) => return Ok(()),
                Err(e) => return Err(e),
            };

            for name in names {
                // Attributes can disappear between list and get.
                if let Ok(Some(value)) = xattr::get(full_path, &name) {
                    record
                        .xattrs
                        .insert(name.to_string_lossy().into_owned(), value);
                }
            }
            Ok(())
        }
    }

    fn is_unsupported(err: &io::Error) -> bool {
        err.kind() == io::ErrorKind::Unsupported || err.raw_os_error() == Some(ENOTSUP)
    }
}

#[cfg(all(test, unix))]
#[path = "enrich_tests.rs"]
mod tests;
