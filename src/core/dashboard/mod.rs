//! Refresh orchestration for the dashboard.
//!
//! Probes are registered once, placed on a fixed grid, and driven by a single-threaded
//! scheduler that refreshes them on a timer and resizes them with the terminal.

mod history;
mod layout;
mod probe;
mod refresh;
mod registry;
mod scheduler;

pub use history::{BoundedSeries, SeriesPoint};
pub use layout::{LayoutColumn, LayoutManager, LayoutRow, Placement, GRID_UNITS};
pub use probe::{stacked_height, Probe, ProbeId};
pub use refresh::{should_refresh, RefreshSchedule, Refreshable};
pub use registry::ProbeRegistry;
pub use scheduler::{DashEvent, EventSource, Scheduler, SchedulerState, Screen, TICK_PERIOD};
