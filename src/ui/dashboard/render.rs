use ratatui::buffer::Buffer;

use crate::core::dashboard::{LayoutManager, ProbeRegistry};

/// Draw every placed probe into `buf`: the frame first, then the grid in layout order
pub fn render_frame(registry: &ProbeRegistry, layout: &LayoutManager, buf: &mut Buffer) {
    let bounds = *buf.area();

    for placement in layout.placements(registry) {
        let area = placement.area.intersection(bounds);
        if area.is_empty() {
            continue;
        }
        if let Some(probe) = registry.get(placement.probe) {
            probe.render(area, buf);
        }
    }
}
