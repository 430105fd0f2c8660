use std::{
    ffi::OsString,
    fs::{self, Metadata},
    io,
    path::{Path, PathBuf},
};

/// Filesystem primitives the walker is built on.
///
/// The walker never touches `std::fs` directly, so tests can wrap [`OsFs`]
/// and observe exactly which paths were listed or stat'ed.
pub trait WalkFs {
    /// Resolve every symlink in `path` to an absolute path.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Stat following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Stat without following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Names of the entries of a directory, in no particular order.
    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<OsString>>;

    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl WalkFs for OsFs {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::symlink_metadata(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }
}

impl<F: WalkFs + ?Sized> WalkFs for &F {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        (**self).metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        (**self).symlink_metadata(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<OsString>> {
        (**self).read_dir_names(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).read_link(path)
    }
}
