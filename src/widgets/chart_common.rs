//! Shared chart plumbing: margins, value formatting, axes, the selection
//! guideline and the detail-box overlay.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::prelude::Stylize;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::chart_data::{Row, RowTable};
use crate::config::Theme;
use crate::interact::DetailBoxPosition;
use crate::scale::{LinearScale, Margin, TimeScale};

/// Cell insets shared by both chart widgets: room for y-axis labels on the
/// left, one row of x-axis labels plus one legend row below.
pub const CHART_MARGIN: Margin = Margin {
    top: 1,
    right: 2,
    bottom: 2,
    left: 9,
};

/// The plot area inside a chart widget's container.
pub fn plot_rect(area: Rect, margin: Margin) -> Rect {
    Rect {
        x: area.x.saturating_add(margin.left),
        y: area.y.saturating_add(margin.top),
        width: area.width.saturating_sub(margin.left + margin.right),
        height: area.height.saturating_sub(margin.top + margin.bottom),
    }
}

/// How a chart formats its values (axis ticks and detail box).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Thousands-separated whole counts, e.g. "12,345".
    Count,
    /// Ratios rendered as percentages, e.g. "23.08%".
    Percent,
}

impl ValueFormat {
    pub fn format(self, v: f64) -> String {
        if !v.is_finite() {
            return "-".to_string();
        }
        match self {
            ValueFormat::Count => group_thousands(v),
            ValueFormat::Percent => format!("{:.2}%", v * 100.0),
        }
    }

    /// Compact form for axis ticks, where the left margin is narrow.
    pub fn format_tick(self, v: f64) -> String {
        if !v.is_finite() {
            return "-".to_string();
        }
        match self {
            ValueFormat::Count => {
                let abs = v.abs();
                if abs >= 1_000_000.0 {
                    format!("{:.1}M", v / 1_000_000.0)
                } else if abs >= 10_000.0 {
                    format!("{:.0}K", v / 1_000.0)
                } else {
                    group_thousands(v)
                }
            }
            ValueFormat::Percent => {
                let p = v * 100.0;
                if (p - p.round()).abs() < 1e-9 {
                    format!("{:.0}%", p)
                } else {
                    format!("{:.1}%", p)
                }
            }
        }
    }
}

/// Round to a whole number and insert thousands separators.
pub fn group_thousands(v: f64) -> String {
    let negative = v < 0.0;
    let digits = format!("{:.0}", v.abs());
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Centered placeholder for charts that cannot render (too little data).
pub fn render_placeholder(text: &str, area: Rect, buf: &mut Buffer, theme: &Theme) {
    Paragraph::new(text)
        .style(Style::default().fg(theme.get("text_secondary")))
        .centered()
        .render(area, buf);
}

/// Y-axis tick labels right-aligned in the left margin, with a sparse
/// gridline across the plot for every tick above the baseline.
pub fn render_left_axis(
    y: &LinearScale,
    plot: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    format: ValueFormat,
) {
    if plot.height == 0 {
        return;
    }
    let label_style = Style::default().fg(theme.get("axis"));
    let grid_style = Style::default().fg(theme.get("dimmed"));
    let max_row = plot.height.saturating_sub(1) as f64;

    for (idx, tick) in y.ticks(8).iter().enumerate() {
        let row_f = y.scale(*tick);
        if !(0.0..=max_row).contains(&row_f) {
            continue;
        }
        let row = plot.y + row_f.round() as u16;
        let label = format.format_tick(*tick);
        let width = label.chars().count() as u16;
        let end = plot.x.saturating_sub(1);
        let start = end.saturating_sub(width);
        buf.set_string(start, row, &label, label_style);

        if idx > 0 {
            // Dashes only where nothing has been drawn yet.
            for col in (plot.x..plot.x + plot.width).step_by(2) {
                if let Some(cell) = buf.cell_mut(Position::new(col, row)) {
                    if cell.symbol() == " " {
                        cell.set_symbol("╌").set_style(grid_style);
                    }
                }
            }
        }
    }
}

/// X-axis date labels on `label_row`, centered under their tick positions.
pub fn render_bottom_axis(
    x: &TimeScale,
    rows: &[Row],
    plot: Rect,
    label_row: u16,
    buf: &mut Buffer,
    theme: &Theme,
) {
    if rows.is_empty() || plot.width == 0 {
        return;
    }
    let style = Style::default().fg(theme.get("axis"));

    // Up to four labels taken from evenly spaced rows.
    let count = rows.len().min(4);
    let mut last_end: i32 = -1;
    for k in 0..count {
        let idx = if count == 1 {
            0
        } else {
            k * (rows.len() - 1) / (count - 1)
        };
        let date = rows[idx].date;
        let label = date.format("%-m/%-d").to_string();
        let width = label.chars().count() as u16;
        if width > plot.width {
            continue; // narrower than one label; skip rather than overflow
        }
        let center = x.scale(date).round() as i32;
        let start = (plot.x as i32 + center - width as i32 / 2)
            .clamp(plot.x as i32, (plot.x + plot.width).saturating_sub(width) as i32);
        if start <= last_end {
            continue; // avoid labels piling onto each other on narrow plots
        }
        buf.set_string(start as u16, label_row, &label, style);
        last_end = start + width as i32;
    }
}

/// Vertical guideline at the selected row's column, drawn only into cells no
/// mark occupies.
pub fn render_guideline(col_f: f64, plot: Rect, buf: &mut Buffer, theme: &Theme) {
    if plot.width == 0 || plot.height == 0 {
        return;
    }
    let max_col = plot.width.saturating_sub(1) as f64;
    let col = plot.x + col_f.round().clamp(0.0, max_col) as u16;
    let style = Style::default().fg(theme.get("guideline"));
    for row in plot.y..plot.y + plot.height {
        if let Some(cell) = buf.cell_mut(Position::new(col, row)) {
            if cell.symbol() == " " {
                cell.set_symbol("│").set_style(style);
            }
        }
    }
}

/// Floating annotation with the exact values of the selected row, at the top
/// or bottom of the plot depending on the placement heuristic.
pub fn render_detail_box(
    table: &RowTable,
    selected: usize,
    position: DetailBoxPosition,
    plot: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    format: ValueFormat,
) {
    let Some(row) = table.rows.get(selected) else {
        return;
    };
    let schema = table.detail_schema();

    let mut lines: Vec<Line> = vec![Line::from(row.date.format("%-m/%-d").to_string())];
    for (idx, label) in schema.iter().skip(1).enumerate() {
        let value = row.values.get(idx).copied().unwrap_or(f64::NAN);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", label),
                Style::default().fg(theme.series(idx)).bold(),
            ),
            Span::raw(format.format(value)),
        ]));
    }

    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 2;
    let height = lines.len() as u16 + 2;
    if width + 2 > plot.width || height > plot.height {
        return; // no room; dropping the box beats overflowing the plot
    }
    let y = match position {
        DetailBoxPosition::Top => plot.y,
        DetailBoxPosition::Bottom => plot.y + plot.height - height,
    };
    let rect = Rect::new(plot.x + 2, y, width, height);

    Clear.render(rect, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.get("detail_border"))),
        )
        .render(rect, buf);
}

/// One legend row: a colored mark plus the label of each series.
pub fn render_legend(schema: &[String], mark: &str, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let mut spans: Vec<Span> = Vec::new();
    for (idx, label) in schema.iter().skip(1).enumerate() {
        spans.push(Span::styled(
            format!("{} ", mark),
            Style::default().fg(theme.series(idx)),
        ));
        spans.push(Span::styled(
            format!("{}  ", label),
            Style::default().fg(theme.get("text_secondary")),
        ));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorConfig, Theme, ThemeConfig};
    use chrono::{TimeZone, Utc};
    use ratatui::style::Color;

    fn theme_with_axis(axis: &str) -> Theme {
        Theme::from_config(&ThemeConfig {
            color_mode: "truecolor".to_string(),
            colors: ColorConfig {
                axis: axis.to_string(),
                ..ColorConfig::default()
            },
        })
        .unwrap()
    }

    #[test]
    fn axis_labels_use_the_axis_theme_color() {
        let theme = theme_with_axis("#ff0000");
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let plot = plot_rect(area, CHART_MARGIN);
        let y = LinearScale::new((0.0, 100.0), (plot.height as f64, 0.0));
        render_left_axis(&y, plot, &mut buf, &theme, ValueFormat::Count);

        let red = Color::Rgb(255, 0, 0);
        let found = (0..area.width)
            .flat_map(|x| (0..area.height).map(move |y| (x, y)))
            .any(|(x, y)| buf[(x, y)].style().fg == Some(red));
        assert!(found);
    }

    #[test]
    fn bottom_axis_skips_labels_wider_than_plot() {
        let theme = theme_with_axis("gray");
        let rows = vec![
            Row::new(Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap(), vec![1.0]),
            Row::new(Utc.with_ymd_and_hms(2020, 3, 2, 0, 0, 0).unwrap(), vec![2.0]),
        ];
        let plot = Rect::new(9, 1, 2, 10);
        let x = TimeScale::from_rows(&rows, (0.0, 2.0)).unwrap();
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 14));
        render_bottom_axis(&x, &rows, plot, 12, &mut buf, &theme);

        // Every date label is wider than the two-cell plot, so the label row
        // stays blank.
        for col in 0..20 {
            assert_eq!(buf[(col, 12)].symbol(), " ");
        }
    }

    #[test]
    fn group_thousands_formats() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
        assert_eq!(group_thousands(-4200.0), "-4,200");
    }

    #[test]
    fn value_format_count_and_percent() {
        assert_eq!(ValueFormat::Count.format(12345.0), "12,345");
        assert_eq!(ValueFormat::Percent.format(0.2308), "23.08%");
        assert_eq!(ValueFormat::Count.format(f64::NAN), "-");
        assert_eq!(ValueFormat::Percent.format(f64::NAN), "-");
    }

    #[test]
    fn tick_format_compacts_large_counts() {
        assert_eq!(ValueFormat::Count.format_tick(2_500_000.0), "2.5M");
        assert_eq!(ValueFormat::Count.format_tick(50_000.0), "50K");
        assert_eq!(ValueFormat::Count.format_tick(2_000.0), "2,000");
        assert_eq!(ValueFormat::Percent.format_tick(0.05), "5%");
    }

    #[test]
    fn plot_rect_applies_margins() {
        let area = Rect::new(2, 3, 50, 20);
        let plot = plot_rect(area, CHART_MARGIN);
        assert_eq!(plot.x, 11);
        assert_eq!(plot.y, 4);
        assert_eq!(plot.width, 39);
        assert_eq!(plot.height, 17);
    }

    #[test]
    fn plot_rect_saturates_on_tiny_areas() {
        let area = Rect::new(0, 0, 4, 2);
        let plot = plot_rect(area, CHART_MARGIN);
        assert_eq!(plot.width, 0);
        assert_eq!(plot.height, 0);
    }
}
