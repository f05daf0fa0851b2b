use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use ratatui::{buffer::Buffer, layout::Rect};
use sysdash::core::dashboard::{
    DashEvent, EventSource, LayoutColumn, LayoutManager, LayoutRow, Probe, ProbeRegistry,
    Scheduler, SchedulerState, Screen,
};
use sysdash::{DashError, Result};

type Journal = Rc<RefCell<Vec<String>>>;

struct Tile {
    name: &'static str,
    journal: Journal,
}

impl Probe for Tile {
    fn name(&self) -> &str {
        self.name
    }
    fn refresh(&mut self, _now: Instant) {
        self.journal.borrow_mut().push(format!("refresh {}", self.name));
    }
    fn on_resize(&mut self, width: u16, height: u16) {
        self.journal
            .borrow_mut()
            .push(format!("resize {} {}x{}", self.name, width, height));
    }
    fn height(&self) -> u16 {
        3
    }
    fn render(&self, _area: Rect, _buf: &mut Buffer) {}
}

struct FakeScreen {
    size: (u16, u16),
    journal: Journal,
}

impl Screen for FakeScreen {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(self.size)
    }
    fn draw(&mut self, _registry: &ProbeRegistry, layout: &LayoutManager) -> Result<()> {
        let (w, h) = layout.size();
        self.journal.borrow_mut().push(format!("draw {}x{}", w, h));
        Ok(())
    }
}

struct Scripted(VecDeque<DashEvent>);

impl EventSource for Scripted {
    fn next_event(&mut self) -> Result<DashEvent> {
        self.0
            .pop_front()
            .ok_or_else(|| DashError::tui("script exhausted"))
    }
}

fn dashboard(journal: &Journal) -> (ProbeRegistry, LayoutManager) {
    let mut registry = ProbeRegistry::new();
    let left = registry.register(Box::new(Tile {
        name: "left",
        journal: journal.clone(),
    }));
    let right = registry.register(Box::new(Tile {
        name: "right",
        journal: journal.clone(),
    }));
    let layout = LayoutManager::new(
        None,
        vec![LayoutRow::new(vec![
            LayoutColumn::new(4, vec![left]),
            LayoutColumn::new(8, vec![right]),
        ])],
    )
    .unwrap();
    (registry, layout)
}

#[test]
fn test_resize_reaches_probes_before_the_redraw() {
    let journal = Journal::default();
    let (registry, layout) = dashboard(&journal);
    let screen = FakeScreen {
        size: (120, 40),
        journal: journal.clone(),
    };
    let events = Scripted(VecDeque::from([DashEvent::Resize(60, 20), DashEvent::Quit]));

    let mut scheduler = Scheduler::new(registry, layout, screen, events);
    scheduler.run().unwrap();

    assert_eq!(scheduler.state(), SchedulerState::Terminating);
    assert_eq!(
        *journal.borrow(),
        vec![
            "refresh left",
            "refresh right",
            "resize left 40x40",
            "resize right 80x40",
            "draw 120x40",
            "resize left 20x20",
            "resize right 40x20",
            "draw 60x20",
        ]
    );
}

#[test]
fn test_tick_refreshes_then_draws() {
    let journal = Journal::default();
    let (registry, layout) = dashboard(&journal);
    let screen = FakeScreen {
        size: (12, 10),
        journal: journal.clone(),
    };
    let events = Scripted(VecDeque::from([DashEvent::Tick, DashEvent::Quit]));

    let mut scheduler = Scheduler::new(registry, layout, screen, events);
    scheduler.run().unwrap();

    let log = journal.borrow();
    assert_eq!(
        &log[log.len() - 3..],
        &["refresh left", "refresh right", "draw 12x10"]
    );
}

#[test]
fn test_event_source_failure_stops_the_loop() {
    let journal = Journal::default();
    let (registry, layout) = dashboard(&journal);
    let screen = FakeScreen {
        size: (12, 10),
        journal: journal.clone(),
    };

    let mut scheduler = Scheduler::new(registry, layout, screen, Scripted(VecDeque::new()));

    assert!(matches!(scheduler.run(), Err(DashError::Tui(_))));
}
