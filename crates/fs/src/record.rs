use std::{
    collections::BTreeMap,
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// Portable file mode: permission bits in the low nine bits, entry type
    /// and special bits at the top of the word. The layout is identical on
    /// every host so downstream archive and diff consumers can compare modes
    /// produced on different platforms.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileMode: u32 {
        const DIR = 1 << 31;
        const APPEND = 1 << 30;
        const EXCLUSIVE = 1 << 29;
        const TEMPORARY = 1 << 28;
        const SYMLINK = 1 << 27;
        /// Block device, or character device when `CHAR_DEVICE` is also set.
        const DEVICE = 1 << 26;
        const NAMED_PIPE = 1 << 25;
        const SOCKET = 1 << 24;
        const SETUID = 1 << 23;
        const SETGID = 1 << 22;
        const CHAR_DEVICE = 1 << 21;
        const STICKY = 1 << 20;
        /// Non-regular node of an unknown kind.
        const IRREGULAR = 1 << 19;

        const PERM = 0o777;
        const TYPE = Self::DIR.bits()
            | Self::SYMLINK.bits()
            | Self::NAMED_PIPE.bits()
            | Self::SOCKET.bits()
            | Self::DEVICE.bits()
            | Self::CHAR_DEVICE.bits()
            | Self::IRREGULAR.bits();
    }
}

impl FileMode {
    #[inline]
    pub fn perm(self) -> u32 {
        self.bits() & Self::PERM.bits()
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        self.contains(Self::DIR)
    }

    #[inline]
    pub fn is_symlink(self) -> bool {
        self.contains(Self::SYMLINK)
    }

    /// No type bits set.
    #[inline]
    pub fn is_regular(self) -> bool {
        !self.intersects(Self::TYPE)
    }

    fn type_char(self) -> char {
        if self.is_dir() {
            'd'
        } else if self.is_symlink() {
            'l'
        } else if self.contains(Self::NAMED_PIPE) {
            'p'
        } else if self.contains(Self::SOCKET) {
            's'
        } else if self.contains(Self::DEVICE | Self::CHAR_DEVICE) {
            'c'
        } else if self.contains(Self::DEVICE) {
            'b'
        } else if self.contains(Self::IRREGULAR) {
            '?'
        } else {
            '-'
        }
    }
}

/// `ls -l` style rendering, e.g. `drwxr-xr-x`.
impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RWX: [char; 3] = ['r', 'w', 'x'];

        let mut out = String::with_capacity(10);
        out.push(self.type_char());

        let perm = self.perm();
        for bit in (0..9).rev() {
            if perm & (1 << bit) != 0 {
                out.push(RWX[2 - bit % 3]);
            } else {
                out.push('-');
            }
        }
        f.write_str(&out)
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

/// One filesystem entry that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRecord {
    /// Slash-separated path relative to the walk root.
    pub path: String,
    pub mode: FileMode,
    /// Byte length for regular files, 0 otherwise.
    pub size: u64,
    /// Nanoseconds since the Unix epoch; negative before it.
    pub mod_time: i64,
    /// Raw symlink target, or the first path of an already seen hardlink.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_major: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_minor: Option<u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub xattrs: BTreeMap<String, Vec<u8>>,
}

impl StatRecord {
    pub fn new(path: String, mode: FileMode) -> Self {
        Self {
            path,
            mode,
            size: 0,
            mod_time: 0,
            linkname: None,
            uid: None,
            gid: None,
            dev_major: None,
            dev_minor: None,
            xattrs: BTreeMap::new(),
        }
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.mode.is_symlink()
    }

    pub fn mod_time(&self) -> SystemTime {
        let magnitude = Duration::from_nanos(self.mod_time.unsigned_abs());
        if self.mod_time >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
