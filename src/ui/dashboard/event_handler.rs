use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::dashboard::{DashEvent, EventSource};
use crate::error::{DashError, Result};

/// A key that ends the dashboard, parsed from strings like `q`, `esc` or `ctrl-c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim().to_lowercase();
        let mut modifiers = KeyModifiers::NONE;
        let mut key = spec.as_str();

        while let Some((prefix, rest)) = key.split_once('-') {
            if rest.is_empty() {
                break;
            }
            modifiers |= match prefix {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                _ => return Err(DashError::config(format!("unknown modifier in key binding {:?}", spec))),
            };
            key = rest;
        }

        let code = match key {
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            k if k.starts_with('f') && k.len() > 1 => k[1..]
                .parse()
                .map(KeyCode::F)
                .map_err(|_| DashError::config(format!("invalid function key {:?}", spec)))?,
            k => {
                let mut chars = k.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(DashError::config(format!("invalid key binding {:?}", spec))),
                }
            }
        };

        Ok(Self { code, modifiers })
    }

    /// Shift is ignored so `q` also matches with caps lock
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        code == self.code && key.modifiers.difference(KeyModifiers::SHIFT) == self.modifiers
    }
}

pub fn parse_bindings(specs: &[String]) -> Result<Vec<KeyBinding>> {
    if specs.is_empty() {
        return Err(DashError::config("at least one quit key is required"));
    }
    specs.iter().map(|s| KeyBinding::parse(s)).collect()
}

/// Map a terminal event to a dashboard event. Unbound keys and other input yield `None`.
pub fn translate(event: &Event, bindings: &[KeyBinding]) -> Option<DashEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => bindings
            .iter()
            .any(|b| b.matches(key))
            .then_some(DashEvent::Quit),
        Event::Resize(width, height) => Some(DashEvent::Resize(*width, *height)),
        _ => None,
    }
}

/// Crossterm input with a tick deadline
pub struct TerminalEvents {
    bindings: Vec<KeyBinding>,
    tick: Duration,
    next_tick: Instant,
}

impl TerminalEvents {
    pub fn new(bindings: Vec<KeyBinding>, tick: Duration) -> Self {
        Self {
            bindings,
            tick,
            next_tick: Instant::now() + tick,
        }
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self) -> Result<DashEvent> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.next_tick = now + self.tick;
                return Ok(DashEvent::Tick);
            }

            if event::poll(self.next_tick - now)? {
                if let Some(ev) = translate(&event::read()?, &self.bindings) {
                    return Ok(ev);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_parse_bindings() {
        assert_eq!(
            KeyBinding::parse("q").unwrap(),
            KeyBinding {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE
            }
        );
        assert_eq!(
            KeyBinding::parse("Ctrl-C").unwrap(),
            KeyBinding {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL
            }
        );
        assert_eq!(KeyBinding::parse("esc").unwrap().code, KeyCode::Esc);
        assert_eq!(KeyBinding::parse("f10").unwrap().code, KeyCode::F(10));
        assert_eq!(KeyBinding::parse("-").unwrap().code, KeyCode::Char('-'));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(KeyBinding::parse("hyper-q").is_err());
        assert!(KeyBinding::parse("qq").is_err());
        assert!(parse_bindings(&[]).is_err());
        assert!(parse_bindings(&["q".to_string(), "nope-x".to_string()]).is_err());
    }

    #[test]
    fn test_translate_quit_keys() {
        let bindings = parse_bindings(&["q".to_string(), "ctrl-c".to_string()]).unwrap();

        assert_eq!(
            translate(&key(KeyCode::Char('q'), KeyModifiers::NONE), &bindings),
            Some(DashEvent::Quit)
        );
        assert_eq!(
            translate(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT), &bindings),
            Some(DashEvent::Quit)
        );
        assert_eq!(
            translate(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), &bindings),
            Some(DashEvent::Quit)
        );
        assert_eq!(translate(&key(KeyCode::Char('c'), KeyModifiers::NONE), &bindings), None);
        assert_eq!(translate(&key(KeyCode::Char('x'), KeyModifiers::NONE), &bindings), None);
    }

    #[test]
    fn test_translate_resize_and_other_input() {
        assert_eq!(translate(&Event::Resize(120, 40), &[]), Some(DashEvent::Resize(120, 40)));
        assert_eq!(translate(&Event::FocusGained, &[]), None);
    }
}
