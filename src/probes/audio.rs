// Default sink volume gauge

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use ratatui::{prelude::*, widgets::Widget};

use crate::core::dashboard::Probe;
use crate::platform::{AudioBackend, AudioLevel, SharedAudioLevel, Subscription};
use crate::ui::dashboard::widgets::{level_gauge, titled_block, unsupported_gauge};

pub struct AudioProbe {
    backend: Option<Box<dyn AudioBackend>>,
    level: SharedAudioLevel,
    // Stops the change listener when the probe goes away
    subscription: Option<Subscription>,
}

impl AudioProbe {
    /// Without a backend the probe shows "UNSUPPORTED" for its whole lifetime. With one,
    /// change notifications are followed when the backend can deliver them.
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        let level: SharedAudioLevel = Arc::new(Mutex::new(None));

        let subscription = backend.as_ref().and_then(|backend| {
            backend
                .subscribe(Arc::clone(&level))
                .map_err(|e| log::warn!("[audio] No change notifications, polling only: {}", e))
                .ok()
        });

        Self {
            backend,
            level,
            subscription,
        }
    }

    pub fn level(&self) -> Option<AudioLevel> {
        *self.level.lock()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Probe for AudioProbe {
    fn name(&self) -> &str {
        "audio"
    }

    fn refresh(&mut self, _now: Instant) {
        let Some(backend) = &self.backend else {
            return;
        };
        match backend.query() {
            Ok(level) => *self.level.lock() = Some(level),
            Err(e) => log::warn!("[audio] Failed to query volume: {}", e),
        }
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    fn height(&self) -> u16 {
        3
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = titled_block(" Audio ");
        if self.backend.is_none() {
            unsupported_gauge(block).render(area, buf);
            return;
        }

        match self.level() {
            Some(level) => {
                let color = if level.muted { Color::Red } else { Color::Green };
                level_gauge(
                    block,
                    f64::from(level.volume_percent),
                    format!("{}%", level.volume_percent),
                    Style::default().fg(color),
                )
                .render(area, buf);
            }
            None => level_gauge(block, 0.0, "(no data)".to_string(), Style::default())
                .render(area, buf),
        }
    }
}
