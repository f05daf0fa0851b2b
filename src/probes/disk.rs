//! Free space per mounted filesystem.
//!
//! Every refresh rebuilds the snapshot from the mount table. Mounts whose type is in
//! the exclusion set are never shown, and a mount whose `statvfs` fails keeps the entry
//! from the previous snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::core::dashboard::{stacked_height, Probe, RefreshSchedule, Refreshable};
use crate::platform::{FsStat, FsStats, MountEntry, MountSource};
use crate::ui::dashboard::widgets::{level_gauge, titled_block};
use crate::ui::formatters::{center_string, percent_style, pretty_bytes};

pub const DISK_INTERVAL: Duration = Duration::from_secs(30);

const DISK_HEADER: &str = "--- Disks ---";

/// Pseudo and virtual filesystems never worth a gauge
pub const DEFAULT_FS_EXCLUSIONS: &[&str] = &[
    "sysfs",
    "proc",
    "udev",
    "devpts",
    "tmpfs",
    "cgroup",
    "cgroup2",
    "systemd-1",
    "mqueue",
    "debugfs",
    "hugetlbfs",
    "fusectl",
    "tracefs",
    "binfmt_misc",
    "devtmpfs",
    "securityfs",
    "pstore",
    "autofs",
    "fuse.jetbrains-toolbox",
    "fuse.gvfsd-fuse",
    "fuse.lxcfs",
    "overlay",
    "nsfs",
    "squashfs",
    "bpf",
    "configfs",
    "efivarfs",
    "ramfs",
    "rpc_pipefs",
];

/// Docker storage drivers mount a second copy of the root filesystem here
const DOCKER_DUPLICATE_ROOTS: &[&str] = &["/var/lib/docker/aufs", "/var/lib/docker/devicemapper"];

#[derive(Debug, Clone, PartialEq)]
pub struct DiskUsage {
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    /// `None` when the filesystem reports no blocks
    pub free_fraction: Option<f64>,
    pub total_inodes: u64,
    pub inodes_in_use: u64,
    pub free_inodes_fraction: Option<f64>,
}

impl DiskUsage {
    pub fn from_stats(mount: &MountEntry, stats: &FsStats) -> Self {
        let block_size = if stats.block_size == 0 {
            log::warn!("[disks] Block size 0 on {}, assuming 1", mount.mount_point);
            1
        } else {
            stats.block_size
        };

        let total_bytes = stats.blocks.saturating_mul(block_size);
        let available_bytes = stats.blocks_available.saturating_mul(block_size);
        let free_fraction = if total_bytes > 0 {
            Some(available_bytes as f64 / total_bytes as f64)
        } else {
            log::debug!("[disks] {} reports zero size", mount.mount_point);
            None
        };
        let free_inodes_fraction =
            (stats.files > 0).then(|| stats.files_free as f64 / stats.files as f64);

        Self {
            mount_point: mount.mount_point.clone(),
            fs_type: mount.fs_type.clone(),
            total_bytes,
            available_bytes,
            free_fraction,
            total_inodes: stats.files,
            inodes_in_use: stats.files.saturating_sub(stats.files_free),
            free_inodes_fraction,
        }
    }

    /// Free space as a whole percentage
    pub fn free_percent(&self) -> Option<u64> {
        self.free_fraction.map(|f| (f * 100.0) as u64)
    }

    fn label(&self) -> String {
        let avail = pretty_bytes(self.available_bytes);
        let total = pretty_bytes(self.total_bytes);
        match self.free_percent() {
            Some(pct) => format!("Free: {}/{} ({}%)", avail, total, pct),
            None => format!("Free: {}/{}", avail, total),
        }
    }
}

pub type DiskSnapshot = BTreeMap<String, DiskUsage>;

/// Build a new snapshot from the mount table. Excluded filesystem types and Docker's
/// duplicate roots are skipped; a stat failure carries the previous entry over.
pub fn build_snapshot<F: FsStat>(
    mounts: &[MountEntry],
    stat: &F,
    exclusions: &BTreeSet<String>,
    previous: &DiskSnapshot,
) -> DiskSnapshot {
    let mut snapshot = DiskSnapshot::new();

    for mount in mounts {
        if exclusions.contains(&mount.fs_type)
            || DOCKER_DUPLICATE_ROOTS.contains(&mount.mount_point.as_str())
        {
            continue;
        }

        match stat.stat(&mount.mount_point) {
            Ok(stats) => {
                snapshot.insert(mount.mount_point.clone(), DiskUsage::from_stats(mount, &stats));
            }
            Err(e) => {
                log::warn!("[disks] Error stat-ing {}: {}", mount.mount_point, e);
                if let Some(old) = previous.get(&mount.mount_point) {
                    snapshot.insert(mount.mount_point.clone(), old.clone());
                }
            }
        }
    }

    snapshot
}

pub struct DiskProbe<M: MountSource, F: FsStat> {
    mounts: M,
    stat: F,
    exclusions: BTreeSet<String>,
    schedule: RefreshSchedule,
    snapshot: DiskSnapshot,
    width: u16,
}

impl<M: MountSource, F: FsStat> DiskProbe<M, F> {
    pub fn new(mounts: M, stat: F, extra_exclusions: &[String]) -> Self {
        let exclusions = DEFAULT_FS_EXCLUSIONS
            .iter()
            .map(|s| s.to_string())
            .chain(extra_exclusions.iter().cloned())
            .collect();

        Self {
            mounts,
            stat,
            exclusions,
            schedule: RefreshSchedule::new(DISK_INTERVAL),
            snapshot: DiskSnapshot::new(),
            width: 0,
        }
    }

    pub fn snapshot(&self) -> &DiskSnapshot {
        &self.snapshot
    }
}

impl<M: MountSource, F: FsStat> Probe for DiskProbe<M, F> {
    fn name(&self) -> &str {
        "disks"
    }

    fn refresh(&mut self, now: Instant) {
        if !self.schedule.should_refresh(now) {
            return;
        }

        match self.mounts.mounts() {
            Ok(mounts) => {
                self.snapshot = build_snapshot(&mounts, &self.stat, &self.exclusions, &self.snapshot);
            }
            Err(e) => log::warn!("[disks] Error loading mounts: {}", e),
        }
    }

    fn on_resize(&mut self, width: u16, _height: u16) {
        self.width = width;
    }

    fn height(&self) -> u16 {
        stacked_height(1, self.snapshot.len(), 3)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let header = Rect { height: 1, ..area };
        Paragraph::new(center_string(self.width.min(area.width), DISK_HEADER))
            .style(Style::default().fg(Color::Green))
            .render(header, buf);

        let mut y = area.y + 1;
        for usage in self.snapshot.values() {
            if y + 3 > area.bottom() {
                break;
            }
            let slot = Rect::new(area.x, y, area.width, 3);
            let pct = usage.free_fraction.unwrap_or(0.0) * 100.0;

            level_gauge(
                titled_block(format!(" {} ", usage.mount_point)),
                pct,
                usage.label(),
                percent_style(pct, 0.0, 100.0, false),
            )
            .render(slot, buf);
            y += 3;
        }
    }

    fn schedule(&self) -> Option<&RefreshSchedule> {
        Some(&self.schedule)
    }
}
