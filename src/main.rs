use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use sysdash::core::config::{FeedConfig, Overrides, SearchRoot};
use sysdash::ui::run_dashboard;
use sysdash::{init_logging, Config};

fn cli() -> Command {
    Command::new("sysdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal dashboard for host metrics, git repositories, weather and feeds")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file (default: <config dir>/sysdash/config.json)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-file")
                .short('l')
                .long("log-file")
                .value_name("FILE")
                .help("Append log records to FILE instead of discarding them")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("weather")
                .short('w')
                .long("weather")
                .value_name("LOCATION")
                .help("Weather location; empty lets the service geolocate"),
        )
        .arg(
            Arg::new("repo")
                .short('r')
                .long("repo")
                .value_name("PATH:DEPTH")
                .help("Directory to search for git repositories (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("feed")
                .short('f')
                .long("feed")
                .value_name("ACCOUNT[:COLOR]=URL")
                .help("Text feed shown in its own panel (repeatable)")
                .action(ArgAction::Append),
        )
}

fn overrides_from(matches: &ArgMatches) -> Result<Overrides> {
    let repo_search = matches
        .get_many::<String>("repo")
        .unwrap_or_default()
        .map(|spec| SearchRoot::parse(spec).with_context(|| format!("Invalid --repo {}", spec)))
        .collect::<Result<Vec<_>>>()?;

    let feeds = matches
        .get_many::<String>("feed")
        .unwrap_or_default()
        .map(|spec| FeedConfig::parse(spec).with_context(|| format!("Invalid --feed {}", spec)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Overrides {
        log_file: matches.get_one::<PathBuf>("log-file").cloned(),
        weather_location: matches.get_one::<String>("weather").cloned(),
        repo_search,
        feeds,
    })
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let overrides = overrides_from(&matches)?;

    let mut config = Config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path), overrides)
        .context("Failed to load configuration")?;

    init_logging(&config.log_destination()).context("Failed to initialize logging")?;
    for warning in config.take_startup_warnings() {
        log::warn!("{}", warning);
    }
    sysdash::utils::patterns::force_all();

    log::info!("sysdash {} starting", env!("CARGO_PKG_VERSION"));
    run_dashboard(&config)
}
