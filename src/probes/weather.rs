// Current conditions from wttr.in

use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::core::dashboard::{Probe, RefreshSchedule, Refreshable};
use crate::error::{DashError, Result};
use crate::platform::HttpClient;
use crate::ui::dashboard::widgets::titled_block;
use crate::ui::formatters::strip_ansi;

pub const WEATHER_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub title: String,
    pub body: String,
}

/// Plain-text report URL. An empty location lets the service geolocate.
pub fn weather_url(location: &str) -> String {
    let location: String = url::form_urlencoded::byte_serialize(location.as_bytes()).collect();
    format!("http://wttr.in/{}?T0q", location)
}

/// The first line is the location title, the body starts on the third line
pub fn parse_report(text: &str) -> Result<WeatherReport> {
    let mut parts = text.splitn(3, '\n');
    let (Some(title), Some(_), Some(body)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DashError::parse("weather report", text));
    };

    Ok(WeatherReport {
        title: strip_ansi(title).trim().to_string(),
        body: strip_ansi(body).trim_end().to_string(),
    })
}

pub struct WeatherProbe<H: HttpClient> {
    http: H,
    url: String,
    schedule: RefreshSchedule,
    report: Option<WeatherReport>,
}

impl<H: HttpClient> WeatherProbe<H> {
    pub fn new(http: H, location: &str) -> Self {
        Self {
            http,
            url: weather_url(location),
            schedule: RefreshSchedule::new(WEATHER_INTERVAL),
            report: None,
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }
}

impl<H: HttpClient> Probe for WeatherProbe<H> {
    fn name(&self) -> &str {
        "weather"
    }

    fn refresh(&mut self, now: Instant) {
        if !self.schedule.should_refresh(now) {
            return;
        }

        let result = self
            .http
            .get(&self.url, &[("User-Agent", "curl")])
            .and_then(|text| parse_report(&text));
        match result {
            Ok(report) => self.report = Some(report),
            Err(e) => log::warn!("[weather] Error loading weather: {}", e),
        }
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    fn height(&self) -> u16 {
        7
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let (title, body) = match &self.report {
            Some(report) => (report.title.as_str(), report.body.as_str()),
            None => ("Weather", "(no data)"),
        };

        Paragraph::new(body.to_string())
            .block(titled_block(Span::styled(
                format!(" {} ", title),
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
    use std::cell::RefCell;

    struct ScriptedHttp {
        answers: RefCell<Vec<Result<String>>>,
        requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedHttp {
        fn new(answers: Vec<Result<String>>) -> Self {
            Self {
                answers: RefCell::new(answers),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpClient for ScriptedHttp {
        fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
            self.requests.borrow_mut().push((
                url.to_string(),
                headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ));
            self.answers.borrow_mut().remove(0)
        }
    }

    const REPORT: &str = "Weather report: Lisbon\n\n\x1b[38;5;226m    \\   /\x1b[0m     Sunny\n     .-.      21 °C\n\n";

    #[test]
    fn test_url() {
        assert_eq!(weather_url(""), "http://wttr.in/?T0q");
        assert_eq!(weather_url("New York"), "http://wttr.in/New+York?T0q");
    }

    #[test]
    fn test_parse_report() {
        let report = parse_report(REPORT).unwrap();
        assert_eq!(report.title, "Weather report: Lisbon");
        assert_eq!(report.body, "    \\   /     Sunny\n     .-.      21 °C");
    }

    #[test]
    fn test_parse_rejects_short_body() {
        assert!(matches!(parse_report("only one line"), Err(DashError::Parse { .. })));
    }

    #[test]
    fn test_request_uses_curl_agent() {
        let mut probe = WeatherProbe::new(ScriptedHttp::new(vec![Ok(REPORT.to_string())]), "Lisbon");
        probe.refresh(Instant::now());

        let requests = probe.http.requests.borrow();
        assert_eq!(requests[0].0, "http://wttr.in/Lisbon?T0q");
        assert_eq!(requests[0].1, vec![("User-Agent".to_string(), "curl".to_string())]);
    }

    #[test]
    fn test_failures_keep_previous_report() {
        let start = Instant::now();
        let mut probe = WeatherProbe::new(
            ScriptedHttp::new(vec![
                Ok(REPORT.to_string()),
                Err(DashError::unsupported("timeout")),
                Ok("garbage".to_string()),
            ]),
            "Lisbon",
        );

        probe.refresh(start);
        let first = probe.report().cloned();
        probe.refresh(start + WEATHER_INTERVAL + Duration::from_secs(1));
        probe.refresh(start + 2 * WEATHER_INTERVAL + Duration::from_secs(2));

        assert_eq!(probe.report().cloned(), first);
        assert!(first.is_some());
    }

    #[test]
    fn test_hourly_schedule() {
        let start = Instant::now();
        let mut probe = WeatherProbe::new(ScriptedHttp::new(vec![Ok(REPORT.to_string())]), "");
        probe.refresh(start);
        probe.refresh(start + Duration::from_secs(5));
        probe.refresh(start + WEATHER_INTERVAL);

        assert_eq!(probe.http.requests.borrow().len(), 1);
    }
}
