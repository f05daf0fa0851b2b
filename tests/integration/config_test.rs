use std::fs;
use std::path::PathBuf;

use sysdash::core::config::{FeedConfig, Overrides, SearchRoot, REPO_SEARCH_ENV};
use sysdash::{Config, LogDestination};
use tempfile::TempDir;

fn canonical(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::create_dir_all(&path).unwrap();
    fs::canonicalize(path).unwrap()
}

// The only test in this binary that touches the search-path variable
#[test]
fn test_file_then_env_then_flags() {
    let tmp = TempDir::new().unwrap();
    let from_file = canonical(&tmp, "from_file");
    let from_env = canonical(&tmp, "from_env");
    let from_flag = canonical(&tmp, "from_flag");

    let config_path = tmp.path().join("config.json");
    let body = serde_json::json!({
        "repo_search": [{ "path": from_file, "depth": 2 }],
        "weather_location": "Reykjavik",
        "feeds": [{ "account": "ops", "url": "https://example.com/ops.txt" }],
    });
    fs::write(&config_path, body.to_string()).unwrap();

    std::env::remove_var(REPO_SEARCH_ENV);
    let config = Config::load(Some(&config_path), Overrides::default()).unwrap();
    assert_eq!(config.repo_search, vec![SearchRoot::new(&from_file, 2)]);
    assert_eq!(config.weather_location, "Reykjavik");
    assert_eq!(config.log_destination(), LogDestination::Discard);

    std::env::set_var(REPO_SEARCH_ENV, format!("{}:4", from_env.display()));
    let config = Config::load(Some(&config_path), Overrides::default()).unwrap();
    assert_eq!(config.repo_search, vec![SearchRoot::new(&from_env, 4)]);

    let overrides = Overrides {
        repo_search: vec![SearchRoot::new(&from_flag, 1)],
        feeds: vec![FeedConfig::parse("news=https://example.com/news.txt").unwrap()],
        weather_location: Some(String::new()),
        log_file: Some(tmp.path().join("dash.log")),
    };
    let config = Config::load(Some(&config_path), overrides).unwrap();
    std::env::remove_var(REPO_SEARCH_ENV);

    assert_eq!(config.repo_search, vec![SearchRoot::new(&from_flag, 1)]);
    assert_eq!(config.feeds.len(), 1);
    assert_eq!(config.feeds[0].account, "news");
    assert_eq!(config.weather_location, "");
    assert_eq!(
        config.log_destination(),
        LogDestination::File(tmp.path().join("dash.log"))
    );
}

#[test]
fn test_unreadable_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("config.json");
    fs::write(&config_path, r#"{ "http_timeout_secs": "soon" }"#).unwrap();

    assert!(Config::load(Some(&config_path), Overrides::default()).is_err());
}
