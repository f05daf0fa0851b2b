//! PulseAudio/PipeWire sink volume via `pactl`.
//!
//! Besides on-demand queries, the backend can follow `pactl subscribe` on a background
//! thread and write fresh levels into a shared cell whenever the server reports a sink
//! change. The cell is the only state touched off the main loop.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::command::{CommandRunner, SystemCommandRunner};
use crate::error::{DashError, Result};
use crate::utils::patterns::VOLUME_PERCENT;

/// Volume of the default sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioLevel {
    pub volume_percent: u32,
    pub muted: bool,
}

/// Last known level, written by the push thread and read by the render pass
pub type SharedAudioLevel = Arc<Mutex<Option<AudioLevel>>>;

pub trait AudioBackend {
    fn query(&self) -> Result<AudioLevel>;

    /// Start pushing level changes into `cell` until the returned guard is dropped
    fn subscribe(&self, cell: SharedAudioLevel) -> Result<Subscription>;
}

/// Owns the event-listener process and its reader thread. Dropping it kills and reaps
/// the process, which ends the reader.
#[derive(Debug, Default)]
pub struct Subscription {
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(child: Child, reader: JoinHandle<()>) -> Self {
        Self {
            child: Some(child),
            reader: Some(reader),
        }
    }

    /// A subscription with nothing to stop
    pub fn inert() -> Self {
        Self::default()
    }

    pub fn process_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            stop_child(&mut child);
        }
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                log::warn!("Audio event reader panicked");
            }
        }
    }
}

fn stop_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("pactl subscribe already gone: {}", e);
    }
    match child.wait() {
        Ok(status) => log::debug!("pactl subscribe exited with {}", status),
        Err(e) => log::warn!("Failed to reap pactl subscribe: {}", e),
    }
}

/// Parse the first percentage of `pactl get-sink-volume` output
pub fn parse_volume(stdout: &str) -> Option<u32> {
    VOLUME_PERCENT
        .captures(stdout)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse `Mute: yes` / `Mute: no`
pub fn parse_mute(stdout: &str) -> Option<bool> {
    let value = stdout.trim().strip_prefix("Mute:")?.trim();
    match value {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

/// Whether a `pactl subscribe` line is about a sink or the server default changing
fn is_sink_change(line: &str) -> bool {
    line.contains("'change'") && (line.contains(" sink ") || line.contains(" server"))
}

const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

#[derive(Debug, Clone)]
pub struct PactlBackend<R: CommandRunner = SystemCommandRunner> {
    runner: R,
}

impl<R: CommandRunner> PactlBackend<R> {
    /// Connect if `pactl` exists and can talk to a server
    pub fn connect(runner: R) -> Option<Self> {
        if !runner.available("pactl") {
            log::info!("pactl not found, audio unsupported");
            return None;
        }
        match runner.run("pactl", &["info"], None) {
            Ok(out) if out.success() => Some(Self { runner }),
            Ok(out) => {
                log::warn!("pactl info exited with {}, audio unsupported", out.exit_code);
                None
            }
            Err(e) => {
                log::warn!("Error connecting to sound server: {}", e);
                None
            }
        }
    }

    fn query_with(runner: &R) -> Result<AudioLevel> {
        let volume = runner.run("pactl", &["get-sink-volume", DEFAULT_SINK], None)?;
        if !volume.success() {
            return Err(DashError::parse("pactl get-sink-volume", volume.stdout));
        }
        let volume_percent = parse_volume(&volume.stdout)
            .ok_or_else(|| DashError::parse("pactl get-sink-volume", volume.stdout.clone()))?;

        let mute = runner.run("pactl", &["get-sink-mute", DEFAULT_SINK], None)?;
        let muted = parse_mute(&mute.stdout)
            .ok_or_else(|| DashError::parse("pactl get-sink-mute", mute.stdout.clone()))?;

        Ok(AudioLevel {
            volume_percent,
            muted,
        })
    }
}

impl<R> AudioBackend for PactlBackend<R>
where
    R: CommandRunner + Clone + Send + 'static,
{
    fn query(&self) -> Result<AudioLevel> {
        Self::query_with(&self.runner)
    }

    fn subscribe(&self, cell: SharedAudioLevel) -> Result<Subscription> {
        let mut child = Command::new("pactl")
            .arg("subscribe")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DashError::command("pactl subscribe", e))?;

        let Some(stdout) = child.stdout.take() else {
            stop_child(&mut child);
            return Err(DashError::unsupported("pactl subscribe has no stdout"));
        };
        let runner = self.runner.clone();

        let spawned = thread::Builder::new()
            .name("audio-events".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if !is_sink_change(&line) {
                        continue;
                    }
                    match Self::query_with(&runner) {
                        Ok(level) => *cell.lock() = Some(level),
                        Err(e) => log::warn!("Audio change notification, query failed: {}", e),
                    }
                }
                log::info!("pactl subscribe ended, audio falls back to polling");
            });

        match spawned {
            Ok(reader) => Ok(Subscription::new(child, reader)),
            Err(e) => {
                stop_child(&mut child);
                Err(e.into())
            }
        }
    }
}
