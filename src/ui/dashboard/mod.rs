//! Full-screen dashboard: terminal setup, input and drawing.

mod app;
mod event_handler;
mod render;
pub mod widgets;

pub use app::{run_dashboard, TerminalScreen};
pub use event_handler::{parse_bindings, translate, KeyBinding, TerminalEvents};
pub use render::render_frame;
