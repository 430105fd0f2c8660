use std::{
    fs::Metadata,
    io,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    fsys::WalkFs,
    record::{FileMode, StatRecord},
};

/// How permission bits are adjusted before a record leaves the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionPolicy {
    /// Keep the host's permission bits untouched.
    Preserve,
    /// Set `grant` on every entry, then clamp the permission bits to
    /// `ceiling`. Type and special bits are never touched.
    ExecutableCeiling { grant: u32, ceiling: u32 },
}

impl PermissionPolicy {
    /// For hosts whose permission model has no executable bit: everything
    /// becomes executable, capped at `rwxr-xr-x`.
    pub const NO_EXEC_BIT: Self = PermissionPolicy::ExecutableCeiling {
        grant: 0o111,
        ceiling: 0o755,
    };

    /// Pick the policy for the platform this crate was compiled for.
    pub fn for_host() -> Self {
        if cfg!(unix) {
            PermissionPolicy::Preserve
        } else {
            PermissionPolicy::NO_EXEC_BIT
        }
    }

    pub fn apply(self, mode: FileMode) -> FileMode {
        match self {
            PermissionPolicy::Preserve => mode,
            PermissionPolicy::ExecutableCeiling { grant, ceiling } => {
                let perm = (mode.perm() | grant) & ceiling & FileMode::PERM.bits();
                let rest = mode.bits() & !FileMode::PERM.bits();
                FileMode::from_bits_retain(rest | perm)
            }
        }
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Build the portable record for one entry. Symlink targets are read but
/// never followed.
pub(crate) fn normalize<F: WalkFs + ?Sized>(
    fs: &F,
    full_path: &Path,
    rel_path: &str,
    meta: &Metadata,
    policy: PermissionPolicy,
) -> io::Result<StatRecord> {
    let mode = policy.apply(portable_mode(meta));

    let mut record = StatRecord::new(rel_path.to_owned(), mode);
    record.mod_time = to_unix_nanos(meta.modified().ok());
    if mode.is_regular() {
        record.size = meta.len();
    }
    if mode.is_symlink() {
        let target = fs.read_link(full_path)?;
        record.linkname = Some(target.to_string_lossy().into_owned());
    }

    Ok(record)
}

#[cfg(unix)]
pub(crate) fn portable_mode(meta: &Metadata) -> FileMode {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    const S_ISUID: u32 = 0o4000;
    const S_ISGID: u32 = 0o2000;
    const S_ISVTX: u32 = 0o1000;

    let raw = meta.permissions().mode();
    let mut mode = FileMode::from_bits_retain(raw & FileMode::PERM.bits());

    let ft = meta.file_type();
    if ft.is_dir() {
        mode |= FileMode::DIR;
    } else if ft.is_symlink() {
        mode |= FileMode::SYMLINK;
    } else if ft.is_fifo() {
        mode |= FileMode::NAMED_PIPE;
    } else if ft.is_socket() {
        mode |= FileMode::SOCKET;
    } else if ft.is_block_device() {
        mode |= FileMode::DEVICE;
    } else if ft.is_char_device() {
        mode |= FileMode::DEVICE | FileMode::CHAR_DEVICE;
    } else if !ft.is_file() {
        mode |= FileMode::IRREGULAR;
    }

    if raw & S_ISUID != 0 {
        mode |= FileMode::SETUID;
    }
    if raw & S_ISGID != 0 {
        mode |= FileMode::SETGID;
    }
    if raw & S_ISVTX != 0 {
        mode |= FileMode::STICKY;
    }
    mode
}

#[cfg(not(unix))]
pub(crate) fn portable_mode(meta: &Metadata) -> FileMode {
    let ft = meta.file_type();
    let mut perm = if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    };

    let kind = if ft.is_dir() {
        perm |= 0o111;
        FileMode::DIR
    } else if ft.is_symlink() {
        FileMode::SYMLINK
    } else if ft.is_file() {
        FileMode::empty()
    } else {
        FileMode::IRREGULAR
    };
    kind | FileMode::from_bits_retain(perm)
}

/// Nanoseconds since the epoch; times before it come out negative and a
/// missing timestamp as 0.
pub(crate) fn to_unix_nanos(t: Option<SystemTime>) -> i64 {
    let Some(t) = t else { return 0 };
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_nanos())
            .map(|n| -n)
            .unwrap_or(i64::MIN),
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
