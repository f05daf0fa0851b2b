// Local time, uptime and Kerberos ticket state

use std::time::Instant;

use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::core::dashboard::Probe;
use crate::platform::procfs::uptime_secs;
use crate::platform::CommandRunner;
use crate::ui::dashboard::widgets::{titled_block, unsupported_style};
use crate::ui::formatters::format_uptime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KerberosStatus {
    /// Valid ticket, with the time left when `kleft` reports it
    Valid(Option<String>),
    NoTicket,
    Unsupported,
    /// Nothing observed yet
    Unknown,
}

impl KerberosStatus {
    fn span(&self) -> Span<'static> {
        let bold = Modifier::BOLD;
        match self {
            KerberosStatus::Valid(Some(left)) => Span::styled(
                format!("OK ({})", left),
                Style::default().fg(Color::Green).add_modifier(bold),
            ),
            KerberosStatus::Valid(None) => {
                Span::styled("OK", Style::default().fg(Color::Green).add_modifier(bold))
            }
            KerberosStatus::NoTicket => Span::styled(
                "NO TICKET",
                Style::default().fg(Color::Red).add_modifier(bold),
            ),
            KerberosStatus::Unsupported => Span::styled("UNSUPPORTED", unsupported_style()),
            KerberosStatus::Unknown => Span::styled("--", Style::default().fg(Color::DarkGray)),
        }
    }
}

/// Time left is the second space-separated field of `kleft` output
pub fn parse_kleft(stdout: &str) -> Option<String> {
    stdout
        .split(' ')
        .nth(1)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HostInfo {
    time: String,
    uptime: String,
    kerberos: KerberosStatus,
}

pub struct HostInfoProbe<R: CommandRunner> {
    runner: R,
    kerberos_supported: bool,
    uptime: fn() -> u64,
    info: HostInfo,
}

impl<R: CommandRunner> HostInfoProbe<R> {
    pub fn new(runner: R) -> Self {
        Self::with_uptime(runner, uptime_secs)
    }

    pub fn with_uptime(runner: R, uptime: fn() -> u64) -> Self {
        let kerberos_supported = runner.available("klist");
        if !kerberos_supported {
            log::info!("klist not found, Kerberos status unsupported");
        }

        let kerberos = if kerberos_supported {
            KerberosStatus::Unknown
        } else {
            KerberosStatus::Unsupported
        };

        Self {
            runner,
            kerberos_supported,
            uptime,
            info: HostInfo {
                time: String::new(),
                uptime: String::new(),
                kerberos,
            },
        }
    }

    pub fn kerberos(&self) -> &KerberosStatus {
        &self.info.kerberos
    }

    /// `None` when the status cannot be determined this tick
    fn kerberos_status(&self) -> Option<KerberosStatus> {
        let has_ticket = match self.runner.run("klist", &["-s"], None) {
            Ok(out) => out.success(),
            Err(e) => {
                log::warn!("[host] klist failed: {}", e);
                return None;
            }
        };
        if !has_ticket {
            return Some(KerberosStatus::NoTicket);
        }

        match self.runner.run("kleft", &[], None) {
            Ok(out) => match parse_kleft(&out.stdout) {
                Some(left) => Some(KerberosStatus::Valid(Some(left))),
                None => {
                    log::warn!("[host] Unexpected kleft output: {:?}", out.stdout);
                    // klist already vouched for the ticket; only the time left is unknown
                    match &self.info.kerberos {
                        KerberosStatus::Valid(left) => Some(KerberosStatus::Valid(left.clone())),
                        _ => Some(KerberosStatus::Valid(None)),
                    }
                }
            },
            Err(_) => Some(KerberosStatus::Valid(None)),
        }
    }
}

impl<R: CommandRunner> Probe for HostInfoProbe<R> {
    fn name(&self) -> &str {
        "host"
    }

    fn refresh(&mut self, _now: Instant) {
        let kerberos = if self.kerberos_supported {
            self.kerberos_status()
                .unwrap_or_else(|| self.info.kerberos.clone())
        } else {
            KerberosStatus::Unsupported
        };

        self.info = HostInfo {
            time: Local::now().format("%Y/%m/%d %H:%M:%S %Z").to_string(),
            uptime: format_uptime((self.uptime)()),
            kerberos,
        };
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    fn height(&self) -> u16 {
        5
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Cyan);
        let lines = vec![
            Line::from(vec![
                Span::styled("Time", key),
                Span::raw("....... "),
                Span::styled(self.info.time.clone(), Style::default().fg(Color::Magenta)),
            ]),
            Line::from(vec![
                Span::styled("Uptime", key),
                Span::raw("..... "),
                Span::styled(self.info.uptime.clone(), Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::styled("Kerberos", key),
                Span::raw("... "),
                self.info.kerberos.span(),
            ]),
        ];

        Paragraph::new(lines)
            .block(
                titled_block(" Host ").border_style(
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .render(area, buf);
    }
}
