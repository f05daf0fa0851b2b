use std::time::Instant;

use ratatui::{buffer::Buffer, layout::Rect};

use super::refresh::RefreshSchedule;

/// One dashboard tile: owns its data acquisition and the state it draws from.
///
/// Probes absorb their own failures. A refresh either replaces the renderable state
/// wholesale or leaves it exactly as it was, so the render pass never sees a torn value.
pub trait Probe {
    /// Stable identity used in logs and layout lookups
    fn name(&self) -> &str;

    /// Re-sample the backing source. Probes with a schedule return early when it is
    /// not yet due.
    fn refresh(&mut self, now: Instant);

    /// Recompute size-dependent presentation for a slot of `width` columns on a
    /// terminal `height` rows tall.
    fn on_resize(&mut self, width: u16, height: u16);

    /// Rows this probe wants in its layout slot, borders included
    fn height(&self) -> u16;

    /// Draw the current state into `area`. Must not change the probe.
    fn render(&self, area: Rect, buf: &mut Buffer);

    fn schedule(&self) -> Option<&RefreshSchedule> {
        None
    }
}

/// Height of `fixed` rows of chrome plus `rows` items of `row_height` each, saturating
/// at the largest representable height
pub fn stacked_height(fixed: u16, rows: usize, row_height: u16) -> u16 {
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_mul(row_height)
        .saturating_add(fixed)
}

/// Index of a probe in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProbeId(pub usize);
