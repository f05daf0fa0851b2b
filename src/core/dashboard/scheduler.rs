//! The dashboard's driving loop.
//!
//! A single thread waits on one event stream. Each event is handled to completion
//! (every probe refreshed or resized, then one render) before the next is received, so
//! probes never run concurrently with each other or with drawing.

use std::time::{Duration, Instant};

use super::layout::LayoutManager;
use super::registry::ProbeRegistry;
use crate::error::Result;

/// The only periodic wake-up. Probe intervals are honoured at this granularity.
pub const TICK_PERIOD: Duration = Duration::from_secs(5);

/// Everything that can wake the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashEvent {
    /// Timer fired
    Tick,
    /// Terminal resized to (width, height)
    Resize(u16, u16),
    /// A quit binding was pressed
    Quit,
}

/// Blocking source of [`DashEvent`]s
pub trait EventSource {
    fn next_event(&mut self) -> Result<DashEvent>;
}

/// Where frames go. Drawing and size queries are the only calls that may fail the loop.
pub trait Screen {
    fn size(&self) -> Result<(u16, u16)>;

    fn draw(&mut self, registry: &ProbeRegistry, layout: &LayoutManager) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Initializing,
    Running,
    Terminating,
}

pub struct Scheduler<S: Screen, E: EventSource> {
    registry: ProbeRegistry,
    layout: LayoutManager,
    screen: S,
    events: E,
    state: SchedulerState,
}

impl<S: Screen, E: EventSource> Scheduler<S, E> {
    pub fn new(registry: ProbeRegistry, layout: LayoutManager, screen: S, events: E) -> Self {
        Self {
            registry,
            layout,
            screen,
            events,
            state: SchedulerState::Initializing,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &LayoutManager {
        &self.layout
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Initial refresh, sizing and first frame
    pub fn start(&mut self) -> Result<()> {
        self.state = SchedulerState::Initializing;

        let (width, height) = self.screen.size()?;
        self.layout.resize(width, height);
        log::info!(
            "Starting dashboard with {} probes at {}x{}",
            self.registry.len(),
            width,
            height
        );

        self.registry.refresh_all(Instant::now());
        self.resize_probes();
        self.screen.draw(&self.registry, &self.layout)?;

        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Handle one event to completion
    pub fn handle(&mut self, event: DashEvent) -> Result<()> {
        match event {
            DashEvent::Tick => {
                self.registry.refresh_all(Instant::now());
                self.screen.draw(&self.registry, &self.layout)?;
            }
            DashEvent::Resize(width, height) => {
                log::debug!("Resize to {}x{}", width, height);
                self.layout.resize(width, height);
                self.resize_probes();
                self.screen.draw(&self.registry, &self.layout)?;
            }
            DashEvent::Quit => {
                log::info!("Quit requested");
                self.state = SchedulerState::Terminating;
            }
        }
        Ok(())
    }

    /// Start, then consume events until a quit arrives
    pub fn run(&mut self) -> Result<()> {
        self.start()?;

        while self.state == SchedulerState::Running {
            let event = self.events.next_event()?;
            self.handle(event)?;
        }

        Ok(())
    }

    /// Hand the screen back so the caller can restore the terminal
    pub fn into_screen(self) -> S {
        self.screen
    }

    fn resize_probes(&mut self) {
        let (_, height) = self.layout.size();
        let layout = &self.layout;
        self.registry.resize_all(height, |id| layout.slot_width(id));
    }
}
