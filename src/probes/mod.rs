//! Concrete dashboard tiles and their default arrangement.

pub mod audio;
pub mod battery;
pub mod cpu;
pub mod disk;
pub mod feed;
pub mod git_repos;
pub mod header;
pub mod host_info;
pub mod network;
pub mod weather;

pub use audio::AudioProbe;
pub use battery::BatteryProbe;
pub use cpu::CpuProbe;
pub use disk::{DiskProbe, DiskSnapshot, DiskUsage};
pub use feed::FeedProbe;
pub use git_repos::GitReposProbe;
pub use header::HeaderProbe;
pub use host_info::HostInfoProbe;
pub use network::NetworkProbe;
pub use weather::WeatherProbe;

use crate::core::config::Config;
use crate::core::dashboard::{GRID_UNITS, LayoutColumn, LayoutManager, LayoutRow, ProbeRegistry};
use crate::error::Result;
use crate::git::{Git2StatusSource, IgnoreWalker};
use crate::platform::{
    AudioBackend, PactlBackend, ProcMounts, ProcStat, ReqwestClient, StatVfs, SysinfoInterfaces,
    SystemBattery, SystemCommandRunner, SystemLoad,
};

/// Register every probe and arrange them:
///
/// ```text
/// [6: host, battery, audio, network] [6: cpu]
/// [6: disks]                         [6: weather]
/// [12: git]
/// [feeds, split evenly]
/// ```
///
/// The header frames the whole screen.
pub fn default_dashboard(config: &Config) -> Result<(ProbeRegistry, LayoutManager)> {
    let runner = SystemCommandRunner;
    let http = ReqwestClient::new(config.http_timeout())?;
    let mut registry = ProbeRegistry::new();

    let header = registry.register(Box::new(HeaderProbe::detect(&runner)));
    let host = registry.register(Box::new(HostInfoProbe::new(runner)));

    let battery_source = SystemBattery::detect().unwrap_or_else(|e| {
        log::warn!("Battery detection failed: {}", e);
        None
    });
    let battery = registry.register(Box::new(BatteryProbe::new(battery_source)));

    let audio_backend =
        PactlBackend::connect(runner).map(|b| Box::new(b) as Box<dyn AudioBackend>);
    let audio = registry.register(Box::new(AudioProbe::new(audio_backend)));

    let network = registry.register(Box::new(NetworkProbe::new(SysinfoInterfaces::new())));
    let cpu = registry.register(Box::new(CpuProbe::new(ProcStat::new(), SystemLoad)));
    let disks = registry.register(Box::new(DiskProbe::new(
        ProcMounts::new(),
        StatVfs,
        &config.extra_fs_exclusions,
    )));
    let weather = registry.register(Box::new(WeatherProbe::new(
        http.clone(),
        &config.weather_location,
    )));
    let git = registry.register(Box::new(GitReposProbe::new(
        IgnoreWalker,
        Git2StatusSource,
        config.repo_search.clone(),
    )));

    let max_feeds = usize::from(GRID_UNITS);
    if config.feeds.len() > max_feeds {
        log::warn!(
            "{} feeds configured, only the first {} are shown",
            config.feeds.len(),
            max_feeds
        );
    }
    let feeds: Vec<_> = config
        .feeds
        .iter()
        .take(max_feeds)
        .map(|feed| registry.register(Box::new(FeedProbe::new(http.clone(), feed))))
        .collect();

    let mut rows = vec![
        LayoutRow::new(vec![
            LayoutColumn::new(6, vec![host, battery, audio, network]),
            LayoutColumn::new(6, vec![cpu]),
        ]),
        LayoutRow::new(vec![
            LayoutColumn::new(6, vec![disks]),
            LayoutColumn::new(6, vec![weather]),
        ]),
        LayoutRow::new(vec![LayoutColumn::new(12, vec![git])]),
    ];
    rows.extend(LayoutManager::even_row(&feeds));

    let layout = LayoutManager::new(Some(header), rows)?;
    log::info!("Dashboard wired with {} probes", registry.len());

    Ok((registry, layout))
}
