//! Pointer interaction: nearest-row hit-testing, selection state, and the
//! detail-box placement heuristic.

use crate::chart_data::Row;
use crate::scale::{LinearScale, TimeScale};

/// The currently hovered row of a chart. Scrubbing moves it from row to
/// row; there is no explicit clear, it lasts until the page is reloaded or
/// the chart variant changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(idx) => Some(idx),
        }
    }

    pub fn select(&mut self, idx: usize) {
        *self = Selection::Selected(idx);
    }

    pub fn clear(&mut self) {
        *self = Selection::Unselected;
    }
}

/// Index of the row whose time-scaled x-coordinate is nearest to `offset`
/// (cell columns relative to the plot origin). Ties resolve to the first
/// minimum encountered. O(n), run on every mouse move.
pub fn nearest_row(rows: &[Row], x: &TimeScale, offset: f64) -> Option<usize> {
    let mut nearest: Option<(usize, f64)> = None;
    for (idx, row) in rows.iter().enumerate() {
        let distance = (x.scale(row.date) - offset).abs();
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((idx, distance)),
        }
    }
    nearest.map(|(idx, _)| idx)
}

/// Where to render the detail box so it covers less of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailBoxPosition {
    Top,
    Bottom,
}

/// Guess the detail-box position: take the midpoint of the value scale's
/// tick extent and count, over the first half of the time-sorted rows, how
/// many values sit above vs. below it. More above means the data mass is
/// high, so the box goes to the bottom. Approximate on purpose; data
/// concentrated in the second half can still end up behind the box.
pub fn detail_box_position(y: &LinearScale, rows: &[Row]) -> DetailBoxPosition {
    let ticks = y.ticks(10);
    let mid = match (ticks.first(), ticks.last()) {
        (Some(first), Some(last)) => (first + last) / 2.0,
        _ => return DetailBoxPosition::Top,
    };

    let half = (rows.len() as f64 / 2.0).round() as usize;
    let mut top_count = 0usize;
    let mut bottom_count = 0usize;
    for row in &rows[..half.min(rows.len())] {
        for &value in &row.values {
            if value > mid {
                top_count += 1;
            } else {
                // NaN compares false and lands here, same as any low value.
                bottom_count += 1;
            }
        }
    }

    if top_count > bottom_count {
        DetailBoxPosition::Bottom
    } else {
        DetailBoxPosition::Top
    }
}
