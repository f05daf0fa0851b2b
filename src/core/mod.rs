// Core dashboard logic: probe contract, refresh policy, layout, scheduling and config

pub mod config;
pub mod dashboard;

// Re-export commonly used items
pub use config::{Config, FeedConfig, LogDestination, Overrides, SearchRoot};
