// UI and formatting module

pub mod dashboard;
pub mod formatters;

pub use dashboard::run_dashboard;
pub use formatters::{center_string, format_uptime, percent_style, pretty_bytes, right_justify, strip_ansi};
