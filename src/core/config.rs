use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DashError, Result};

/// Environment variable holding `path:depth,path:depth` repository search roots
pub const REPO_SEARCH_ENV: &str = "SYSDASH_REPO_SEARCH_PATHS";

const DEFAULT_SEARCH_DEPTH: usize = 3;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// A directory to scan for git repositories and how deep to go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub depth: usize,
}

impl SearchRoot {
    pub fn new(path: impl Into<PathBuf>, depth: usize) -> Self {
        Self {
            path: path.into(),
            depth,
        }
    }

    /// Parse `PATH:DEPTH`. The last colon separates the depth.
    pub fn parse(spec: &str) -> Result<Self> {
        let (path, depth) = spec
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| DashError::config(format!("expected PATH:DEPTH, got {:?}", spec)))?;
        if path.is_empty() {
            return Err(DashError::config(format!("empty path in {:?}", spec)));
        }
        let depth = depth
            .parse()
            .map_err(|_| DashError::config(format!("invalid depth in {:?}", spec)))?;
        Ok(Self::new(path, depth))
    }
}

/// A short external text snippet shown in its own panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub account: String,
    pub url: String,
    /// Text color name or `#rrggbb`; terminal default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FeedConfig {
    /// Parse `ACCOUNT=URL` or `ACCOUNT:COLOR=URL`
    pub fn parse(spec: &str) -> Result<Self> {
        let (label, url) = spec.split_once('=').ok_or_else(|| {
            DashError::config(format!("expected ACCOUNT[:COLOR]=URL, got {:?}", spec))
        })?;
        let (account, color) = match label.split_once(':') {
            Some((account, color)) => (account.trim(), Some(color.trim().to_string())),
            None => (label.trim(), None),
        };
        if account.is_empty() {
            return Err(DashError::config(format!("empty account in {:?}", spec)));
        }
        url::Url::parse(url.trim())
            .map_err(|e| DashError::config(format!("invalid feed URL {:?}: {}", url, e)))?;

        let feed = Self {
            account: account.to_string(),
            url: url.trim().to_string(),
            color,
        };
        feed.text_color()?;
        Ok(feed)
    }

    pub fn text_color(&self) -> Result<Option<Color>> {
        self.color
            .as_deref()
            .map(|name| {
                Color::from_str(name)
                    .map_err(|_| DashError::config(format!("unknown color {:?}", name)))
            })
            .transpose()
    }
}

/// Where log records go while the dashboard owns the terminal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    #[default]
    Discard,
}

/// Values given on the command line; each one present replaces the loaded value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_file: Option<PathBuf>,
    pub weather_location: Option<String>,
    pub repo_search: Vec<SearchRoot>,
    pub feeds: Vec<FeedConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repo_search: Vec<SearchRoot>,
    /// Empty lets the weather service geolocate
    pub weather_location: String,
    pub feeds: Vec<FeedConfig>,
    pub log_file: Option<PathBuf>,
    pub quit_keys: Vec<String>,
    pub http_timeout_secs: u64,
    /// Filesystem types hidden from the disk panel on top of the built-in set
    pub extra_fs_exclusions: Vec<String>,
    /// Problems found while loading, logged once logging is up
    #[serde(skip)]
    startup_warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let repo_search = dirs::home_dir()
            .map(|home| vec![SearchRoot::new(home, DEFAULT_SEARCH_DEPTH)])
            .unwrap_or_default();

        Self {
            repo_search,
            weather_location: String::new(),
            feeds: Vec::new(),
            log_file: None,
            quit_keys: vec!["q".to_string(), "ctrl-c".to_string()],
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            extra_fs_exclusions: Vec::new(),
            startup_warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Defaults, then the JSON file, then the environment, then `overrides`
    pub fn load(explicit_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(value) = std::env::var(REPO_SEARCH_ENV) {
            config.apply_search_env(&value);
        }
        config.apply_overrides(overrides);
        config.normalize_search_roots();

        Ok(config)
    }

    /// `<config dir>/sysdash/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sysdash").join("config.json"))
    }

    /// Read a JSON config. A missing file yields defaults; anything unreadable or invalid
    /// is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(DashError::config(format!(
                    "Failed to read config file {:?}: {}",
                    path, e
                )))
            }
        };

        serde_json::from_str(&data)
            .map_err(|e| DashError::config(format!("Invalid config file {:?}: {}", path, e)))
    }

    /// Replace the search roots with the valid entries of `value`. Bad entries are
    /// skipped with a warning; with no valid entry the current roots stay.
    pub fn apply_search_env(&mut self, value: &str) {
        let mut roots = Vec::new();
        for entry in value.split(',').filter(|entry| !entry.trim().is_empty()) {
            match SearchRoot::parse(entry) {
                Ok(root) => roots.push(root),
                Err(e) => self.warn(format!("Ignoring {} entry: {}", REPO_SEARCH_ENV, e)),
            }
        }

        if roots.is_empty() {
            self.warn(format!(
                "{} has no usable entries, keeping configured roots",
                REPO_SEARCH_ENV
            ));
        } else {
            self.repo_search = roots;
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(path) = overrides.log_file {
            self.log_file = Some(path);
        }
        if let Some(location) = overrides.weather_location {
            self.weather_location = location;
        }
        if !overrides.repo_search.is_empty() {
            self.repo_search = overrides.repo_search;
        }
        if !overrides.feeds.is_empty() {
            self.feeds = overrides.feeds;
        }
    }

    pub fn normalize_search_roots(&mut self) {
        let mut warnings = Vec::new();
        for root in &mut self.repo_search {
            let expanded = expand_home(&root.path);
            root.path = match fs::canonicalize(&expanded) {
                Ok(path) => path,
                Err(e) => {
                    warnings.push(format!("Keeping search path {:?} as given: {}", expanded, e));
                    expanded
                }
            };
        }
        self.startup_warnings.extend(warnings);
    }

    /// Drain the warnings collected while loading. `load` runs before the logger
    /// exists, so the caller logs these once it does.
    pub fn take_startup_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.startup_warnings)
    }

    fn warn(&mut self, message: String) {
        self.startup_warnings.push(message);
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::File(path.clone()),
            None => LogDestination::Discard,
        }
    }
}

/// Replace a leading `~` with the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Expand a leading `~` and canonicalize, keeping the expanded path when that fails
pub fn normalize_path(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    fs::canonicalize(&expanded).unwrap_or(expanded)
}
