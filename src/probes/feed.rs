// Short external text snippet, one panel per configured account

use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget, Wrap},
};

use crate::core::config::FeedConfig;
use crate::core::dashboard::{stacked_height, Probe, RefreshSchedule, Refreshable};
use crate::platform::HttpClient;
use crate::ui::dashboard::widgets::titled_block;
use crate::ui::formatters::strip_ansi;

pub const FEED_INTERVAL: Duration = Duration::from_secs(60 * 60);

const BORDER: u16 = 2;
const DEFAULT_WRAP: u16 = 30;
const MIN_HEIGHT: u16 = 7;

/// First non-blank line of a response, without escape sequences
pub fn first_line(body: &str) -> Option<String> {
    body.lines()
        .map(|l| strip_ansi(l).trim().to_string())
        .find(|l| !l.is_empty())
}

pub struct FeedProbe<H: HttpClient> {
    http: H,
    name: String,
    account: String,
    url: String,
    schedule: RefreshSchedule,
    text: Option<String>,
    text_style: Style,
    wrap: u16,
}

impl<H: HttpClient> FeedProbe<H> {
    pub fn new(http: H, feed: &FeedConfig) -> Self {
        let text_style = match feed.text_color() {
            Ok(Some(color)) => Style::default().fg(color),
            Ok(None) => Style::default(),
            Err(e) => {
                log::warn!("[feed:{}] {}, using the default color", feed.account, e);
                Style::default()
            }
        };

        Self {
            http,
            name: format!("feed:{}", feed.account),
            account: feed.account.clone(),
            url: feed.url.clone(),
            schedule: RefreshSchedule::new(FEED_INTERVAL),
            text: None,
            text_style,
            wrap: DEFAULT_WRAP,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl<H: HttpClient> Probe for FeedProbe<H> {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh(&mut self, now: Instant) {
        if !self.schedule.should_refresh(now) {
            return;
        }

        match self.http.get(&self.url, &[]) {
            Ok(body) => match first_line(&body) {
                Some(line) => self.text = Some(line),
                None => log::warn!("[{}] Empty response from {}", self.name, self.url),
            },
            Err(e) => log::warn!("[{}] Error loading feed: {}", self.name, e),
        }
    }

    fn on_resize(&mut self, width: u16, _height: u16) {
        self.wrap = match width.saturating_sub(BORDER) {
            0 => DEFAULT_WRAP,
            wrap => wrap,
        };
    }

    fn height(&self) -> u16 {
        let len = self.text.as_deref().unwrap_or("(no data)").chars().count();
        stacked_height(BORDER + 1, len / usize::from(self.wrap), 1).max(MIN_HEIGHT)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.text.as_deref().unwrap_or("(no data)").to_string())
            .style(self.text_style)
            .wrap(Wrap { trim: true })
            .block(titled_block(Span::styled(
                format!(" @{} ", self.account),
                Style::default().fg(Color::Green),
            )))
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
    use std::cell::RefCell;

    struct ScriptedHttp(RefCell<Vec<Result<String>>>);

    impl HttpClient for ScriptedHttp {
        fn get(&self, _url: &str, _headers: &[(&str, &str)]) -> Result<String> {
            self.0.borrow_mut().remove(0)
        }
    }

    fn feed() -> FeedConfig {
        FeedConfig {
            account: "status".to_string(),
            url: "https://example.com/status".to_string(),
            color: None,
        }
    }

    fn probe(answers: Vec<Result<String>>) -> FeedProbe<ScriptedHttp> {
        FeedProbe::new(ScriptedHttp(RefCell::new(answers)), &feed())
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n  \n hello \nworld").as_deref(), Some("hello"));
        assert_eq!(first_line("\n\n"), None);
    }

    #[test]
    fn test_name_includes_account() {
        assert_eq!(probe(Vec::new()).name(), "feed:status");
    }

    #[test]
    fn test_no_data_until_first_success() {
        let start = Instant::now();
        let mut probe = probe(vec![Err(DashError::unsupported("offline")), Ok("All good".to_string())]);

        probe.refresh(start);
        assert_eq!(probe.text(), None);

        probe.refresh(start + FEED_INTERVAL + Duration::from_secs(1));
        assert_eq!(probe.text(), Some("All good"));
    }

    #[test]
    fn test_failure_and_empty_body_keep_text() {
        let start = Instant::now();
        let mut probe = probe(vec![
            Ok("first".to_string()),
            Ok("\n".to_string()),
            Err(DashError::unsupported("offline")),
        ]);

        probe.refresh(start);
        probe.refresh(start + FEED_INTERVAL + Duration::from_secs(1));
        probe.refresh(start + 2 * FEED_INTERVAL + Duration::from_secs(2));

        assert_eq!(probe.text(), Some("first"));
    }

    #[test]
    fn test_height_from_wrap_width() {
        let mut probe = probe(vec![Ok("x".repeat(200))]);
        probe.refresh(Instant::now());

        probe.on_resize(22, 50);
        assert_eq!(probe.height(), 13);

        probe.on_resize(102, 50);
        assert_eq!(probe.height(), 7);

        probe.on_resize(1, 50);
        assert_eq!(probe.height(), 9);
    }

    #[test]
    fn test_huge_text_height_saturates() {
        let mut probe = probe(vec![Ok("x".repeat(200_000))]);
        probe.refresh(Instant::now());
        probe.on_resize(3, 50);

        assert_eq!(probe.height(), u16::MAX);
    }

    #[test]
    fn test_text_uses_configured_color() {
        let feed = FeedConfig {
            color: Some("magenta".to_string()),
            ..feed()
        };
        let mut probe = FeedProbe::new(ScriptedHttp(RefCell::new(vec![Ok("hi".to_string())])), &feed);
        probe.refresh(Instant::now());

        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        probe.render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "h");
        assert_eq!(buf[(1, 1)].fg, Color::Magenta);
    }

    #[test]
    fn test_unknown_color_falls_back_to_default() {
        let feed = FeedConfig {
            color: Some("not-a-color".to_string()),
            ..feed()
        };
        let probe = FeedProbe::new(ScriptedHttp(RefCell::new(Vec::new())), &feed);

        assert_eq!(probe.text_style, Style::default());
    }
}
