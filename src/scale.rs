//! Domain-to-cell scale construction for the chart widgets.
//!
//! Coordinates are fractional terminal cells within the plot area. The value
//! scale is inverted: 0 maps to the bottom of the plot, the domain maximum
//! (plus headroom) toward the top.

use chrono::{DateTime, Utc};

use crate::chart_data::Row;

/// Headroom factor above the maximum single series value (line charts).
pub const LINE_HEADROOM: f64 = 1.2;
/// Headroom factor above the maximum stacked row sum (bar charts).
pub const BAR_HEADROOM: f64 = 1.1;
/// Inter-bar gap as a fraction of the bar width.
pub const BAR_GAP_RATIO: f64 = 0.7;

/// Four-sided cell insets separating the plot area from its container.
#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

/// Maps timestamps to fractional cell columns within a fixed range.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    t0: i64,
    t1: i64,
    r0: f64,
    r1: f64,
}

impl TimeScale {
    /// Build from the row extent. Returns `None` for an empty row set, whose
    /// domain extent is undefined.
    pub fn from_rows(rows: &[Row], range: (f64, f64)) -> Option<Self> {
        let t0 = rows.iter().map(|r| r.date.timestamp()).min()?;
        let t1 = rows.iter().map(|r| r.date.timestamp()).max()?;
        Some(Self {
            t0,
            t1,
            r0: range.0,
            r1: range.1,
        })
    }

    pub fn scale(&self, t: DateTime<Utc>) -> f64 {
        if self.t1 == self.t0 {
            // Degenerate single-instant domain; park everything mid-range.
            return (self.r0 + self.r1) / 2.0;
        }
        let frac = (t.timestamp() - self.t0) as f64 / (self.t1 - self.t0) as f64;
        self.r0 + frac * (self.r1 - self.r0)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.r0, self.r1)
    }
}

/// Maps numeric values to fractional cell rows. Built with an inverted range
/// so larger values land nearer the top of the plot.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    pub fn scale(&self, v: f64) -> f64 {
        if self.d1 == self.d0 {
            return self.r0;
        }
        let frac = (v - self.d0) / (self.d1 - self.d0);
        self.r0 + frac * (self.r1 - self.r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    /// Nice tick values covering the domain.
    pub fn ticks(&self, max_ticks: usize) -> Vec<f64> {
        let (lo, hi) = if self.d0 <= self.d1 {
            (self.d0, self.d1)
        } else {
            (self.d1, self.d0)
        };
        nice_ticks(lo, hi, max_ticks)
    }
}

/// Generate "nice" tick values in [min, max] with roughly max_ticks steps.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    let range = if max > min { max - min } else { 1.0 };
    if range <= 0.0 || max_ticks == 0 {
        return vec![min];
    }
    let raw_step = range / (max_ticks as f64).max(1.0);
    let mag = 10.0_f64.powf(raw_step.log10().floor());
    let norm = if mag > 0.0 { raw_step / mag } else { raw_step };
    let step = if norm <= 1.0 {
        mag
    } else if norm <= 2.0 {
        2.0 * mag
    } else if norm <= 5.0 {
        5.0 * mag
    } else {
        10.0 * mag
    };
    let step = step.max(f64::EPSILON);
    let start = (min / step).floor() * step;
    let mut ticks = Vec::new();
    let mut v = start;
    while v <= max + step * 0.001 {
        if v >= min - step * 0.001 {
            ticks.push(v);
        }
        v += step;
        if ticks.len() > max_ticks + 2 {
            break;
        }
    }
    if ticks.is_empty() {
        ticks.push(min);
    }
    ticks
}

/// Width of one bar such that n bars with gaps of `BAR_GAP_RATIO` times the
/// bar width exactly fill `width`:
///
///   n·w + (n − 1)·r·w = width  ⇒  w = width / (n + n·r − r)
pub fn bar_width(n: usize, width: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let r = BAR_GAP_RATIO;
    (width / (n + n * r - r)).max(0.0)
}

/// Scales for a line chart plot of the given inner size: time across the
/// full width, values with `LINE_HEADROOM` above the maximum single value.
pub fn line_scales(rows: &[Row], width: f64, height: f64) -> Option<(TimeScale, LinearScale)> {
    let x = TimeScale::from_rows(rows, (0.0, width))?;
    let max = rows
        .iter()
        .flat_map(|r| r.values.iter())
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let top = if max.is_finite() && max > 0.0 {
        LINE_HEADROOM * max
    } else {
        1.0
    };
    let y = LinearScale::new((0.0, top), (height, 0.0));
    Some((x, y))
}

/// Scales for a stacked bar chart plot: time inset by half a bar on each
/// side so bars centered on ticks do not clip, values with `BAR_HEADROOM`
/// above the maximum row sum.
pub fn bar_scales(
    rows: &[Row],
    width: f64,
    height: f64,
) -> Option<(TimeScale, LinearScale, f64)> {
    let bw = bar_width(rows.len(), width);
    let x = TimeScale::from_rows(rows, (bw / 2.0, width - bw / 2.0))?;
    let max_sum = rows
        .iter()
        .map(|r| {
            r.values
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .sum::<f64>()
        })
        .fold(f64::NEG_INFINITY, f64::max);
    let top = if max_sum.is_finite() && max_sum > 0.0 {
        BAR_HEADROOM * max_sum
    } else {
        1.0
    };
    let y = LinearScale::new((0.0, top), (height, 0.0));
    Some((x, y, bw))
}
