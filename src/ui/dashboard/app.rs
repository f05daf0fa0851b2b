use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::event_handler::{parse_bindings, TerminalEvents};
use super::render::render_frame;
use crate::core::config::Config;
use crate::core::dashboard::{LayoutManager, ProbeRegistry, Scheduler, Screen, TICK_PERIOD};
use crate::error::DashError;
use crate::probes::default_dashboard;

/// The real terminal, drawn through ratatui's crossterm backend
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalScreen {
    pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>) -> Self {
        Self { terminal }
    }

    fn restore(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Screen for TerminalScreen {
    fn size(&self) -> crate::error::Result<(u16, u16)> {
        let size = self
            .terminal
            .size()
            .map_err(|e| DashError::tui(format!("Failed to read terminal size: {}", e)))?;
        Ok((size.width, size.height))
    }

    fn draw(&mut self, registry: &ProbeRegistry, layout: &LayoutManager) -> crate::error::Result<()> {
        self.terminal
            .draw(|frame| render_frame(registry, layout, frame.buffer_mut()))
            .map_err(|e| DashError::tui(format!("Failed to draw frame: {}", e)))?;
        Ok(())
    }
}

/// Take over the terminal and run the dashboard until a quit key is pressed.
/// The terminal is restored whether the loop ends cleanly or with an error.
pub fn run_dashboard(config: &Config) -> Result<()> {
    let bindings = parse_bindings(&config.quit_keys).context("Invalid quit keys")?;
    let (registry, layout) = default_dashboard(config).context("Failed to build dashboard")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }
    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e).context("Failed to create terminal");
        }
    };

    let events = TerminalEvents::new(bindings, TICK_PERIOD);
    let mut scheduler = Scheduler::new(registry, layout, TerminalScreen::new(terminal), events);
    let outcome = scheduler.run();

    let mut screen = scheduler.into_screen();
    let restored = screen.restore();
    log::logger().flush();

    outcome.context("Dashboard stopped")?;
    restored
}
