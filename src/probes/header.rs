// Full-screen frame naming the user and host

use std::env;
use std::time::Instant;

use ratatui::{prelude::*, widgets::Widget};
use sysinfo::System;

use crate::core::dashboard::Probe;
use crate::platform::CommandRunner;
use crate::ui::dashboard::widgets::titled_block;

/// `user @ pretty (host)`, or `user @ host` when there is no distinct pretty name
pub fn header_title(user: &str, host: &str, pretty: Option<&str>) -> String {
    match pretty {
        Some(pretty) if pretty != host => format!("{} @ {} ({})", user, pretty, host),
        _ => format!("{} @ {}", user, host),
    }
}

fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn pretty_hostname<R: CommandRunner>(runner: &R) -> Option<String> {
    if !runner.available("pretty-hostname") {
        return None;
    }
    match runner.run("pretty-hostname", &[], None) {
        Ok(out) if out.success() => {
            let name = out.stdout.trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        Ok(_) => None,
        Err(e) => {
            log::debug!("pretty-hostname failed: {}", e);
            None
        }
    }
}

pub struct HeaderProbe {
    title: String,
    height: u16,
}

impl HeaderProbe {
    pub fn detect<R: CommandRunner>(runner: &R) -> Self {
        let host = System::host_name().unwrap_or_else(|| "unknown".to_string());
        let pretty = pretty_hostname(runner);
        Self::new(header_title(&current_user(), &host, pretty.as_deref()))
    }

    pub fn new(title: String) -> Self {
        Self { title, height: 0 }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Probe for HeaderProbe {
    fn name(&self) -> &str {
        "header"
    }

    fn refresh(&mut self, _now: Instant) {}

    fn on_resize(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        titled_block(format!(" {} ", self.title))
            .border_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .render(area, buf);
    }
}
