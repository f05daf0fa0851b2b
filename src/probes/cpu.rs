// CPU utilisation and load-average history

use std::time::Instant;

use chrono::Local;
use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

use crate::core::dashboard::{BoundedSeries, Probe};
use crate::platform::{CpuSamplePair, CpuStatSource, LoadAverage, LoadSource};
use crate::ui::dashboard::widgets::titled_block;
use crate::ui::formatters::percent_style;

pub struct CpuProbe<C: CpuStatSource, L: LoadSource> {
    cpu: C,
    load: L,
    samples: CpuSamplePair,
    cores: usize,
    utilization: Option<f64>,
    current_load: LoadAverage,
    history: BoundedSeries,
}

impl<C: CpuStatSource, L: LoadSource> CpuProbe<C, L> {
    pub fn new(cpu: C, load: L) -> Self {
        Self {
            cpu,
            load,
            samples: CpuSamplePair::default(),
            cores: 1,
            utilization: None,
            current_load: LoadAverage::default(),
            history: BoundedSeries::new(),
        }
    }

    pub fn utilization(&self) -> Option<f64> {
        self.utilization
    }

    pub fn history(&self) -> &BoundedSeries {
        &self.history
    }

    /// Five-minute load relative to the processor count, in percent
    fn load_percent(&self) -> f64 {
        100.0 * self.current_load.five / self.cores.max(1) as f64
    }

    fn title(&self) -> Line<'static> {
        let cpu_text = match self.utilization {
            Some(u) => format!(" CPU: {:.2}%", u * 100.0),
            None => " CPU: --".to_string(),
        };
        let cpu_style = percent_style(self.utilization.unwrap_or(0.0) * 100.0, 0.0, 100.0, true);
        let load_style = percent_style(self.load_percent(), 0.0, 100.0, true);

        Line::from(vec![
            Span::styled(cpu_text, cpu_style),
            Span::styled("───", Style::default().fg(Color::White)),
            Span::styled(format!("5m Load: {:.2} ", self.current_load.five), load_style),
        ])
    }
}

impl<C: CpuStatSource, L: LoadSource> Probe for CpuProbe<C, L> {
    fn name(&self) -> &str {
        "cpu"
    }

    fn refresh(&mut self, _now: Instant) {
        match self.cpu.sample() {
            Ok((times, cores)) => {
                self.samples.push(times);
                self.cores = cores;
                if let Some(u) = self.samples.utilization() {
                    self.utilization = Some(u);
                }
            }
            Err(e) => log::warn!("[cpu] Failed to read CPU counters: {}", e),
        }

        match self.load.load() {
            Ok(load) => {
                self.current_load = load;
                self.history.push(Local::now().format("%H:%M").to_string(), load.one);
            }
            Err(e) => log::warn!("[cpu] Failed to read load average: {}", e),
        }
    }

    fn on_resize(&mut self, width: u16, _height: u16) {
        self.history.set_capacity(2 * usize::from(width));
    }

    fn height(&self) -> u16 {
        20
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let data = self.history.as_chart_data();
        let axis_style = percent_style(self.load_percent(), 0.0, 100.0, true);

        let y_max = self
            .history
            .max_value()
            .unwrap_or(0.0)
            .max(1.0)
            .ceil();
        let x_max = (self.history.capacity().max(2) - 1) as f64;

        let x_labels: Vec<Span> = [self.history.first_label(), self.history.last_label()]
            .into_iter()
            .flatten()
            .map(|l| Span::raw(l.to_string()))
            .collect();

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
            .data(&data);

        Chart::new(vec![dataset])
            .block(titled_block(self.title()))
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([0.0, y_max])
                    .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
            )
            .render(area, buf);
    }
}
