use humansize::{format_size, BINARY};
use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::utils::patterns::ANSI_ESCAPE;

/// Left-pad `text` so it sits in the middle of `width` columns
pub fn center_string(width: u16, text: &str) -> String {
    let start = (usize::from(width) / 2).saturating_sub(text.width() / 2);
    format!("{}{}", " ".repeat(start), text)
}

/// Right-align `text` in `width` columns
pub fn right_justify(width: usize, text: &str) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(pad), text)
}

/// Remove ANSI escape sequences
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Format bytes in binary units (KiB, MiB, GiB)
pub fn pretty_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Format uptime as `Nd Nh Nm`, leaving out leading zero units
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Style for a value within `[min, max]`, in six bands.
/// Without `invert` high is good (free space); with `invert` high is bad (load).
pub fn percent_style(value: f64, min: f64, max: f64, invert: bool) -> Style {
    let span = max - min;
    let v = value - min;
    let bold = Modifier::BOLD;

    let (color, modifier) = if invert {
        match v {
            v if v > 0.90 * span => (Color::Red, bold),
            v if v > 0.75 * span => (Color::Red, Modifier::empty()),
            v if v > 0.50 * span => (Color::Yellow, bold),
            v if v > 0.25 * span => (Color::Green, Modifier::empty()),
            v if v > 0.05 * span => (Color::Green, bold),
            _ => (Color::Blue, bold),
        }
    } else {
        match v {
            v if v < 0.10 * span => (Color::Red, bold),
            v if v < 0.25 * span => (Color::Red, Modifier::empty()),
            v if v < 0.50 * span => (Color::Yellow, bold),
            v if v < 0.75 * span => (Color::Green, Modifier::empty()),
            v if v < 0.95 * span => (Color::Green, bold),
            _ => (Color::Blue, bold),
        }
    };

    Style::default().fg(color).add_modifier(modifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_string() {
        assert_eq!(center_string(11, "abc"), "    abc");
        assert_eq!(center_string(2, "toolong"), "toolong");
    }

    #[test]
    fn test_right_justify() {
        assert_eq!(right_justify(6, "ab"), "    ab");
        assert_eq!(right_justify(1, "ab"), "ab");
    }

    #[test]
    fn test_strip_ansi() {
        let raw = "\x1b[38;5;226m   \\   /\x1b[0m     Sunny";
        assert_eq!(strip_ansi(raw), "   \\   /     Sunny");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_pretty_bytes() {
        assert_eq!(pretty_bytes(512), "512 B");
        assert!(pretty_bytes(1536).starts_with("1.5"));
        assert!(pretty_bytes(3 * 1024 * 1024 * 1024).ends_with("GiB"));
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3 * 3_600 + 120), "3h 2m");
        assert_eq!(format_uptime(2 * 86_400 + 3_600 + 60), "2d 1h 1m");
    }

    #[test]
    fn test_percent_style_bands() {
        assert_eq!(percent_style(5.0, 0.0, 100.0, false).fg, Some(Color::Red));
        assert_eq!(percent_style(60.0, 0.0, 100.0, false).fg, Some(Color::Green));
        assert_eq!(percent_style(99.0, 0.0, 100.0, false).fg, Some(Color::Blue));

        assert_eq!(percent_style(99.0, 0.0, 100.0, true).fg, Some(Color::Red));
        assert_eq!(percent_style(60.0, 0.0, 100.0, true).fg, Some(Color::Yellow));
        assert_eq!(percent_style(1.0, 0.0, 100.0, true).fg, Some(Color::Blue));
    }
}
