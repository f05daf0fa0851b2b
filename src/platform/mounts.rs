// Mounted filesystems and their space/inode statistics

use std::fs;
use std::path::PathBuf;

use crate::error::{DashError, Result};

/// One line of /proc/mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

impl MountEntry {
    pub fn new(device: &str, mount_point: &str, fs_type: &str) -> Self {
        Self {
            device: device.to_string(),
            mount_point: mount_point.to_string(),
            fs_type: fs_type.to_string(),
        }
    }
}

/// Raw statvfs numbers for one mount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStats {
    pub block_size: u64,
    pub blocks: u64,
    pub blocks_available: u64,
    pub files: u64,
    pub files_free: u64,
}

pub trait MountSource {
    fn mounts(&self) -> Result<Vec<MountEntry>>;
}

pub trait FsStat {
    fn stat(&self, mount_point: &str) -> Result<FsStats>;
}

/// Decode the octal escapes the kernel uses for spaces and friends (`\040`)
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(value) = u8::try_from(value) {
                    out.push(value);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Parse /proc/mounts content. Lines with fewer than three fields are skipped.
pub fn parse_mounts(text: &str) -> Vec<MountEntry> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            Some(MountEntry {
                device: unescape_mount_field(device),
                mount_point: unescape_mount_field(mount_point),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ProcMounts {
    path: PathBuf,
}

impl ProcMounts {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/proc/mounts"),
        }
    }
}

impl Default for ProcMounts {
    fn default() -> Self {
        Self::new()
    }
}

impl MountSource for ProcMounts {
    fn mounts(&self) -> Result<Vec<MountEntry>> {
        let text = fs::read_to_string(&self.path)?;
        Ok(parse_mounts(&text))
    }
}

/// statvfs(3) on the mount point
#[derive(Debug, Default, Clone, Copy)]
pub struct StatVfs;

#[cfg(unix)]
impl FsStat for StatVfs {
    fn stat(&self, mount_point: &str) -> Result<FsStats> {
        use std::ffi::CString;

        let path = CString::new(mount_point)
            .map_err(|_| DashError::parse("mount point", mount_point))?;
        let mut raw: libc::statvfs = unsafe { std::mem::zeroed() };

        // SAFETY: `path` is a valid NUL-terminated string and `raw` is a properly sized,
        // writable statvfs struct that outlives the call.
        let rc = unsafe { libc::statvfs(path.as_ptr(), &mut raw) };
        if rc != 0 {
            return Err(std::io::Error::last_os_error().into());
        }

        Ok(FsStats {
            block_size: raw.f_frsize as u64,
            blocks: raw.f_blocks as u64,
            blocks_available: raw.f_bavail as u64,
            files: raw.f_files as u64,
            files_free: raw.f_ffree as u64,
        })
    }
}

#[cfg(not(unix))]
impl FsStat for StatVfs {
    fn stat(&self, _mount_point: &str) -> Result<FsStats> {
        Err(DashError::unsupported("statvfs is only available on unix"))
    }
}
