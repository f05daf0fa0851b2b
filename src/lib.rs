// sysdash library - public API

pub mod error;
pub use error::{DashError, Result};

pub mod core;
pub mod git;
pub mod platform;
pub mod probes;
pub mod ui;
pub mod utils;

pub use core::config::{Config, LogDestination};

use std::fs::OpenOptions;

/// Route log records away from the terminal the dashboard draws on.
/// `RUST_LOG` still narrows or widens the level when logging to a file.
pub fn init_logging(destination: &LogDestination) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    match destination {
        LogDestination::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        LogDestination::Discard => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    builder
        .try_init()
        .map_err(|e| DashError::config(format!("Logger already initialized: {}", e)))
}
