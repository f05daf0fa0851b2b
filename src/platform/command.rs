// Shell command execution for probes that read their data from external tools

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{DashError, Result};

/// What a finished command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs. Spawn failures are errors; a non-zero exit is not, the
/// caller interprets the exit code itself.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], workdir: Option<&Path>) -> Result<CommandOutput>;

    /// Whether `program` can be found on PATH
    fn available(&self, program: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], workdir: Option<&Path>) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).stderr(Stdio::null());

        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| DashError::command(program, e))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            // killed by a signal: no code, report a generic failure
            exit_code: output.status.code().unwrap_or(1),
        })
    }

    fn available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
