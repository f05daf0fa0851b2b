// Battery charge gauge

use std::time::{Duration, Instant};

use ratatui::{prelude::*, widgets::Widget};

use crate::core::dashboard::{Probe, RefreshSchedule, Refreshable};
use crate::platform::{BatteryReading, BatterySource};
use crate::ui::dashboard::widgets::{level_gauge, titled_block, unsupported_gauge};
use crate::ui::formatters::{format_uptime, percent_style};

pub const BATTERY_INTERVAL: Duration = Duration::from_secs(10);

pub struct BatteryProbe<S: BatterySource> {
    /// `None` when the machine has no battery
    source: Option<S>,
    schedule: RefreshSchedule,
    reading: Option<BatteryReading>,
}

impl<S: BatterySource> BatteryProbe<S> {
    pub fn new(source: Option<S>) -> Self {
        if source.is_none() {
            log::info!("No battery detected, battery probe unsupported");
        }
        Self {
            source,
            schedule: RefreshSchedule::new(BATTERY_INTERVAL),
            reading: None,
        }
    }

    pub fn reading(&self) -> Option<&BatteryReading> {
        self.reading.as_ref()
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_some()
    }
}

fn battery_label(reading: &BatteryReading) -> String {
    let left = reading
        .time_to_empty
        .map(|d| format_uptime(d.as_secs()))
        .unwrap_or_else(|| "--".to_string());
    format!("{:.0}% ({})", reading.percent, left)
}

impl<S: BatterySource> Probe for BatteryProbe<S> {
    fn name(&self) -> &str {
        "battery"
    }

    fn refresh(&mut self, now: Instant) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        if !self.schedule.should_refresh(now) {
            return;
        }

        match source.sample() {
            Ok(reading) => self.reading = Some(reading),
            Err(e) => log::warn!("[battery] Failed to read battery: {}", e),
        }
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    fn height(&self) -> u16 {
        3
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        if self.source.is_none() {
            unsupported_gauge(titled_block(" Battery ")).render(area, buf);
            return;
        }

        let Some(reading) = &self.reading else {
            level_gauge(titled_block(" Battery "), 0.0, "(no data)".to_string(), Style::default())
                .render(area, buf);
            return;
        };

        let style = percent_style(reading.percent, 0.0, 100.0, false);
        let title = if reading.charging {
            Span::styled(
                " Battery (charging) ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" Battery ", style)
        };

        level_gauge(titled_block(title), reading.percent, battery_label(reading), style)
            .render(area, buf);
    }

    fn schedule(&self) -> Option<&RefreshSchedule> {
        Some(&self.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DashError, Result};

    struct Scripted(Vec<Result<BatteryReading>>);

    impl BatterySource for Scripted {
        fn sample(&mut self) -> Result<BatteryReading> {
            self.0.remove(0)
        }
    }

    fn reading(percent: f64) -> BatteryReading {
        BatteryReading {
            percent,
            charging: false,
            time_to_empty: Some(Duration::from_secs(2 * 3_600 + 600)),
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(battery_label(&reading(57.4)), "57% (2h 10m)");
    }

    #[test]
    fn test_refresh_follows_interval() {
        let start = Instant::now();
        let mut probe = BatteryProbe::new(Some(Scripted(vec![Ok(reading(80.0)), Ok(reading(79.0))])));

        probe.refresh(start);
        assert_eq!(probe.reading().unwrap().percent, 80.0);

        probe.refresh(start + Duration::from_secs(5));
        assert_eq!(probe.reading().unwrap().percent, 80.0);

        probe.refresh(start + Duration::from_secs(15));
        assert_eq!(probe.reading().unwrap().percent, 79.0);
    }

    #[test]
    fn test_failed_refresh_keeps_reading() {
        let start = Instant::now();
        let mut probe = BatteryProbe::new(Some(Scripted(vec![
            Ok(reading(42.0)),
            Err(DashError::unsupported("ejected")),
        ])));

        probe.refresh(start);
        probe.refresh(start + Duration::from_secs(11));

        assert_eq!(probe.reading(), Some(&reading(42.0)));
    }

    #[test]
    fn test_without_battery_renders_unsupported() {
        let mut probe: BatteryProbe<Scripted> = BatteryProbe::new(None);
        probe.refresh(Instant::now());
        assert!(!probe.is_supported());

        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        probe.render(area, &mut buf);

        let row: String = (0..30).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("UNSUPPORTED"));
    }
}
