use std::path::{Path, PathBuf};

use crate::{
    error::{Result, WalkError},
    fsys::{OsFs, WalkFs},
};

/// Resolve `path` to a canonical, symlink-free directory.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    resolve_root_with(&OsFs, path)
}

pub(crate) fn resolve_root_with<F: WalkFs + ?Sized>(fs: &F, path: &Path) -> Result<PathBuf> {
    let root = fs
        .canonicalize(path)
        .map_err(|source| WalkError::Resolution {
            path: path.to_path_buf(),
            source,
        })?;

    let meta = fs
        .metadata(&root)
        .map_err(|source| WalkError::io(&root, source))?;

    if !meta.is_dir() {
        return Err(WalkError::NotADirectory { path: root });
    }

    Ok(root)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
