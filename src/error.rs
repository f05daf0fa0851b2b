use std::io;
use thiserror::Error;

/// Error type shared by the dashboard core, probes and their sources
#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Battery error: {0}")]
    Battery(#[from] battery::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command `{program}` failed: {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Unexpected output from {context}: {raw:?}")]
    Parse { context: String, raw: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("TUI error: {0}")]
    Tui(String),
}

/// Result type alias for sysdash
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DashError::Config(msg.into())
    }

    /// Create a layout error
    pub fn layout<S: Into<String>>(msg: S) -> Self {
        DashError::Layout(msg.into())
    }

    /// Create a parse error carrying the offending raw output
    pub fn parse<C: Into<String>, R: Into<String>>(context: C, raw: R) -> Self {
        DashError::Parse {
            context: context.into(),
            raw: raw.into(),
        }
    }

    pub fn command<S: Into<String>>(program: S, source: io::Error) -> Self {
        DashError::Command {
            program: program.into(),
            source,
        }
    }

    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        DashError::Unsupported(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        DashError::Tui(msg.into())
    }
}
