// Addresses of the non-loopback interfaces

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::core::dashboard::{stacked_height, Probe};
use crate::platform::{InterfaceAddress, InterfaceSource};
use crate::ui::dashboard::widgets::titled_block;

pub struct NetworkProbe<S: InterfaceSource> {
    source: S,
    addresses: Vec<InterfaceAddress>,
}

impl<S: InterfaceSource> NetworkProbe<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            addresses: Vec::new(),
        }
    }

    pub fn addresses(&self) -> &[InterfaceAddress] {
        &self.addresses
    }
}

impl<S: InterfaceSource> Probe for NetworkProbe<S> {
    fn name(&self) -> &str {
        "network"
    }

    fn refresh(&mut self, _now: Instant) {
        match self.source.addresses() {
            Ok(mut addresses) => {
                addresses.retain(|a| a.name != "lo");
                addresses.sort_by(|a, b| a.name.cmp(&b.name).then(a.addr.cmp(&b.addr)));
                self.addresses = addresses;
            }
            Err(e) => log::warn!("[network] Failed to list interfaces: {}", e),
        }
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    fn height(&self) -> u16 {
        stacked_height(2, self.addresses.len(), 1)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .addresses
            .iter()
            .map(|a| {
                Line::from(vec![
                    Span::styled(format!("{:>10}", a.name), Style::default().fg(Color::Cyan)),
                    Span::raw(": "),
                    Span::styled(
                        format!("{:>15}", a.addr.to_string()),
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(titled_block(" Network "))
            .render(area, buf);
    }
}
