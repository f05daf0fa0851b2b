//! CPU time counters, load average and uptime.

use std::fs;
use std::path::PathBuf;

use sysinfo::System;

use crate::error::{DashError, Result};

/// Aggregate CPU time counters from the `cpu` line of /proc/stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Time spent doing nothing, waiting on IO included
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn busy_total(&self) -> u64 {
        self.user + self.nice + self.system + self.irq + self.softirq + self.steal
    }

    pub fn total(&self) -> u64 {
        self.idle_total() + self.busy_total()
    }
}

/// Parse the aggregate `cpu` line plus the number of per-core lines
pub fn parse_proc_stat(text: &str) -> Result<(CpuTimes, usize)> {
    let mut aggregate = None;
    let mut cores = 0;

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("cpu") => {
                let values: Vec<u64> = fields.map(|f| f.parse().unwrap_or(0)).collect();
                if values.len() < 4 {
                    return Err(DashError::parse("/proc/stat cpu line", line));
                }
                let at = |i: usize| values.get(i).copied().unwrap_or(0);
                aggregate = Some(CpuTimes {
                    user: at(0),
                    nice: at(1),
                    system: at(2),
                    idle: at(3),
                    iowait: at(4),
                    irq: at(5),
                    softirq: at(6),
                    steal: at(7),
                });
            }
            Some(label) if label.starts_with("cpu") => cores += 1,
            _ => {}
        }
    }

    aggregate
        .map(|times| (times, cores.max(1)))
        .ok_or_else(|| DashError::parse("/proc/stat", text.lines().next().unwrap_or("")))
}

/// Previous and current CPU counters; utilisation needs both
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSamplePair {
    pub previous: Option<CpuTimes>,
    pub current: Option<CpuTimes>,
}

impl CpuSamplePair {
    pub fn push(&mut self, sample: CpuTimes) {
        self.previous = self.current.replace(sample);
    }

    /// Fraction of time busy between the two samples, in [0, 1].
    /// `None` until two samples exist or if the counters did not move.
    pub fn utilization(&self) -> Option<f64> {
        let (prev, cur) = (self.previous?, self.current?);

        let total_delta = cur.total().checked_sub(prev.total())?;
        if total_delta == 0 {
            return None;
        }
        let idle_delta = cur.idle_total().saturating_sub(prev.idle_total());

        let busy = 1.0 - (idle_delta as f64 / total_delta as f64);
        Some(busy.clamp(0.0, 1.0))
    }
}

/// 1, 5 and 15 minute load averages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Aggregate CPU counters plus processor count
pub trait CpuStatSource {
    fn sample(&mut self) -> Result<(CpuTimes, usize)>;
}

pub trait LoadSource {
    fn load(&mut self) -> Result<LoadAverage>;
}

/// Reads /proc/stat
#[derive(Debug, Clone)]
pub struct ProcStat {
    path: PathBuf,
}

impl ProcStat {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/proc/stat"),
        }
    }
}

impl Default for ProcStat {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuStatSource for ProcStat {
    fn sample(&mut self) -> Result<(CpuTimes, usize)> {
        let text = fs::read_to_string(&self.path)?;
        parse_proc_stat(&text)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoad;

impl LoadSource for SystemLoad {
    fn load(&mut self) -> Result<LoadAverage> {
        let load = System::load_average();
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }
}

/// Seconds since boot
pub fn uptime_secs() -> u64 {
    System::uptime()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "cpu  100 5 50 800 20 3 2 0 0 0\n\
                        cpu0 50 2 25 400 10 1 1 0 0 0\n\
                        cpu1 50 3 25 400 10 2 1 0 0 0\n\
                        intr 12345\n";

    #[test]
    fn test_parse_aggregate_line_and_core_count() {
        let (times, cores) = parse_proc_stat(STAT).unwrap();

        assert_eq!(times.user, 100);
        assert_eq!(times.idle, 800);
        assert_eq!(times.iowait, 20);
        assert_eq!(times.idle_total(), 820);
        assert_eq!(times.total(), 980);
        assert_eq!(cores, 2);
    }

    #[test]
    fn test_parse_rejects_missing_cpu_line() {
        let err = parse_proc_stat("intr 1 2 3\n").unwrap_err();
        assert!(matches!(err, DashError::Parse { .. }));
    }

    #[test]
    fn test_first_sample_has_no_utilization() {
        let mut pair = CpuSamplePair::default();
        assert_eq!(pair.utilization(), None);

        pair.push(CpuTimes {
            user: 10,
            idle: 90,
            ..Default::default()
        });
        assert_eq!(pair.utilization(), None);
    }

    #[test]
    fn test_utilization_from_deltas() {
        let mut pair = CpuSamplePair::default();
        pair.push(CpuTimes {
            user: 100,
            idle: 400,
            ..Default::default()
        });
        // idle +80, busy +20 => total +100
        pair.push(CpuTimes {
            user: 120,
            idle: 480,
            ..Default::default()
        });

        let busy = pair.utilization().unwrap();
        assert!((busy - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_unchanged_counters_give_none() {
        let sample = CpuTimes {
            user: 5,
            idle: 5,
            ..Default::default()
        };
        let pair = CpuSamplePair {
            previous: Some(sample),
            current: Some(sample),
        };
        assert_eq!(pair.utilization(), None);
    }

    #[test]
    fn test_counter_reset_is_not_negative() {
        let pair = CpuSamplePair {
            previous: Some(CpuTimes {
                user: 500,
                idle: 500,
                ..Default::default()
            }),
            current: Some(CpuTimes {
                user: 10,
                idle: 10,
                ..Default::default()
            }),
        };
        assert_eq!(pair.utilization(), None);
    }
}
