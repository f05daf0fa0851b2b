//! Grid placement of probes.
//!
//! Rows are split into columns whose spans add up to [`GRID_UNITS`]. A column stacks one
//! or more probes vertically. Which probe sits where is fixed at startup; only the
//! absolute geometry follows the terminal size. Probes with variable-length content
//! (disk gauges, repository rows) simply report a different height, the layout never
//! looks inside them.

use ratatui::layout::Rect;

use super::probe::ProbeId;
use super::registry::ProbeRegistry;
use crate::error::{DashError, Result};

/// Width units every row is divided into
pub const GRID_UNITS: u16 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutColumn {
    pub span: u16,
    pub probes: Vec<ProbeId>,
}

impl LayoutColumn {
    pub fn new(span: u16, probes: Vec<ProbeId>) -> Self {
        Self { span, probes }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub columns: Vec<LayoutColumn>,
}

impl LayoutRow {
    pub fn new(columns: Vec<LayoutColumn>) -> Self {
        Self { columns }
    }
}

/// Absolute rectangle assigned to one probe for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub probe: ProbeId,
    pub area: Rect,
}

#[derive(Debug, Clone)]
pub struct LayoutManager {
    frame: Option<ProbeId>,
    rows: Vec<LayoutRow>,
    width: u16,
    height: u16,
    body: Rect,
    // (x, width) per column, per row
    columns: Vec<Vec<(u16, u16)>>,
}

impl LayoutManager {
    /// Build the static assignment. Fails if any row's spans do not add up to the grid.
    pub fn new(frame: Option<ProbeId>, rows: Vec<LayoutRow>) -> Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            if row.columns.iter().any(|c| c.span == 0) {
                return Err(DashError::layout(format!("row {} has a zero-width column", index)));
            }
            let total: u16 = row.columns.iter().map(|c| c.span).sum();
            if total != GRID_UNITS {
                return Err(DashError::layout(format!(
                    "row {} spans {} units, expected {}",
                    index, total, GRID_UNITS
                )));
            }
        }

        let mut layout = Self {
            frame,
            rows,
            width: 0,
            height: 0,
            body: Rect::default(),
            columns: Vec::new(),
        };
        layout.resize(0, 0);
        Ok(layout)
    }

    /// Split `count` probes evenly across the grid, the last column taking the remainder
    pub fn even_row(probes: &[ProbeId]) -> Option<LayoutRow> {
        let count = u16::try_from(probes.len()).ok()?;
        if count == 0 || count > GRID_UNITS {
            return None;
        }
        let span = GRID_UNITS / count;
        let columns = probes
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let extra = if i + 1 == probes.len() {
                    GRID_UNITS - span * count
                } else {
                    0
                };
                LayoutColumn::new(span + extra, vec![*id])
            })
            .collect();
        Some(LayoutRow::new(columns))
    }

    pub fn frame(&self) -> Option<ProbeId> {
        self.frame
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Grid area inside the frame border
    pub fn body(&self) -> Rect {
        self.body
    }

    /// Recompute geometry for a new terminal size
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.body = if self.frame.is_some() {
            Rect::new(1, 1, width.saturating_sub(2), height.saturating_sub(2))
        } else {
            Rect::new(0, 0, width, height)
        };

        let body = self.body;
        self.columns = self
            .rows
            .iter()
            .map(|row| {
                let mut prefix: u32 = 0;
                row.columns
                    .iter()
                    .map(|column| {
                        let start = scale(body.width, prefix);
                        prefix += u32::from(column.span);
                        let end = scale(body.width, prefix);
                        (body.x + start, end - start)
                    })
                    .collect()
            })
            .collect();
    }

    /// Width of the slot holding `id`; the frame probe gets the whole terminal
    pub fn slot_width(&self, id: ProbeId) -> u16 {
        if self.frame == Some(id) {
            return self.width;
        }
        for (row, widths) in self.rows.iter().zip(&self.columns) {
            for (column, (_, width)) in row.columns.iter().zip(widths) {
                if column.probes.contains(&id) {
                    return *width;
                }
            }
        }
        self.body.width
    }

    /// Rectangles for the current frame, using the probes' reported heights.
    /// Anything below the bottom of the body is clipped or left out.
    pub fn placements(&self, registry: &ProbeRegistry) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(registry.len());

        if let Some(frame) = self.frame {
            placements.push(Placement {
                probe: frame,
                area: Rect::new(0, 0, self.width, self.height),
            });
        }

        let bottom = self.body.y.saturating_add(self.body.height);
        let mut y = self.body.y;

        for (row, widths) in self.rows.iter().zip(&self.columns) {
            let mut row_height = 0u16;

            for (column, (x, width)) in row.columns.iter().zip(widths) {
                let mut column_y = y;
                for id in &column.probes {
                    let wanted = registry.get(*id).map(|p| p.height()).unwrap_or(0);
                    let height = wanted.min(bottom.saturating_sub(column_y));
                    if height > 0 && *width > 0 {
                        placements.push(Placement {
                            probe: *id,
                            area: Rect::new(*x, column_y, *width, height),
                        });
                    }
                    column_y = column_y.saturating_add(wanted);
                }
                row_height = row_height.max(column_y - y);
            }

            y = y.saturating_add(row_height);
            if y >= bottom {
                break;
            }
        }

        placements
    }
}

fn scale(width: u16, units: u32) -> u16 {
    // units never exceeds GRID_UNITS, so the result fits back into u16
    (u32::from(width) * units / u32::from(GRID_UNITS)) as u16
}
