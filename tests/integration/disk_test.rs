use std::collections::BTreeSet;

use sysdash::platform::{FsStat, FsStats, MountEntry};
use sysdash::probes::disk::{build_snapshot, DiskSnapshot, DEFAULT_FS_EXCLUSIONS};
use sysdash::Result;

struct UniformStat;

impl FsStat for UniformStat {
    fn stat(&self, _mount_point: &str) -> Result<FsStats> {
        Ok(FsStats {
            block_size: 4096,
            blocks: 1000,
            blocks_available: 250,
            files: 100,
            files_free: 40,
        })
    }
}

fn exclusions() -> BTreeSet<String> {
    DEFAULT_FS_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

fn mounts() -> Vec<MountEntry> {
    vec![
        MountEntry::new("/dev/sda1", "/", "ext4"),
        MountEntry::new("proc", "/proc", "proc"),
        MountEntry::new("tmpfs", "/run", "tmpfs"),
        MountEntry::new("/dev/sdb1", "/home", "xfs"),
        MountEntry::new("overlay", "/var/lib/docker/aufs", "ext4"),
    ]
}

#[test]
fn test_excluded_types_never_appear_in_any_order() {
    let forward = mounts();
    let mut backward = mounts();
    backward.reverse();

    let a = build_snapshot(&forward, &UniformStat, &exclusions(), &DiskSnapshot::new());
    let b = build_snapshot(&backward, &UniformStat, &exclusions(), &DiskSnapshot::new());

    assert_eq!(a, b);
    assert_eq!(a.keys().map(String::as_str).collect::<Vec<_>>(), vec!["/", "/home"]);
}

#[test]
fn test_usage_numbers() {
    let snapshot = build_snapshot(&mounts(), &UniformStat, &exclusions(), &DiskSnapshot::new());
    let root = &snapshot["/"];

    assert_eq!(root.total_bytes, 4096 * 1000);
    assert_eq!(root.available_bytes, 4096 * 250);
    assert_eq!(root.free_percent(), Some(25));
    assert_eq!(root.inodes_in_use, 60);
}
