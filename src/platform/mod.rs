// Data sources the probes read from: commands, procfs, mounts, sound server, battery, HTTP

pub mod audio;
pub mod battery;
pub mod command;
pub mod http;
pub mod mounts;
pub mod network;
pub mod procfs;

// Re-exports para imports limpios
pub use audio::{AudioBackend, AudioLevel, PactlBackend, SharedAudioLevel, Subscription};
pub use battery::{BatteryReading, BatterySource, SystemBattery};
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use http::{HttpClient, ReqwestClient};
pub use mounts::{FsStat, FsStats, MountEntry, MountSource, ProcMounts, StatVfs};
pub use network::{InterfaceAddress, InterfaceSource, SysinfoInterfaces};
pub use procfs::{CpuSamplePair, CpuStatSource, CpuTimes, LoadAverage, LoadSource, ProcStat, SystemLoad};
