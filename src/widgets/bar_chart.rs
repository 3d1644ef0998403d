//! Stacked bar chart widget. Each row becomes one bar; series stack bottom
//! to top in schema order, painted as cell-background runs.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::chart_data::{running_totals, RowTable};
use crate::config::Theme;
use crate::interact::{detail_box_position, Selection};
use crate::scale::bar_scales;
use crate::widgets::chart_common::{
    plot_rect, render_bottom_axis, render_detail_box, render_guideline, render_left_axis,
    render_legend, render_placeholder, ValueFormat, CHART_MARGIN,
};

pub struct BarChart<'a> {
    pub table: &'a RowTable,
    pub theme: &'a Theme,
    pub selection: Selection,
    pub format: ValueFormat,
}

impl Widget for &BarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = &self.table.rows;
        let plot = plot_rect(area, CHART_MARGIN);
        if plot.width < 2 || plot.height < 2 {
            return;
        }
        if rows.is_empty() {
            render_placeholder("Not enough data to chart", area, buf, self.theme);
            return;
        }
        let w = plot.width as f64;
        let h = plot.height as f64;
        let Some((x, y, bar_width)) = bar_scales(rows, w, h) else {
            return;
        };

        render_left_axis(&y, plot, buf, self.theme, self.format);
        render_bottom_axis(&x, rows, plot, plot.y + plot.height, buf, self.theme);

        let max_col = plot.width.saturating_sub(1) as f64;
        let baseline = y.scale(0.0);
        for row in rows.iter() {
            let center = x.scale(row.date);
            let left = (center - bar_width / 2.0).max(0.0);
            let start = left.round().clamp(0.0, max_col) as u16;
            // A bar always covers at least one column.
            let end = ((left + bar_width).round().min(plot.width as f64) as u16)
                .clamp(start + 1, plot.width);
            let col_start = plot.x + start;
            let col_end = plot.x + end;

            let totals = running_totals(&row.values);
            for (idx, total) in totals.iter().enumerate() {
                let value = row.values.get(idx).copied().unwrap_or(0.0);
                let value = if value.is_finite() { value } else { 0.0 };
                let height_px = (baseline - y.scale(value)).max(0.0);
                // Negative corrections can push the running total below zero,
                // putting its scaled position past the plot bottom.
                let top_px = y.scale(*total).clamp(0.0, h);

                let row_start = plot.y + top_px.round() as u16;
                let row_end = plot.y
                    + (top_px + height_px)
                        .round()
                        .clamp(top_px.round(), h) as u16;
                let style = Style::default().bg(self.theme.series(idx));
                for line in row_start..row_end {
                    for col in col_start..col_end {
                        if let Some(cell) = buf.cell_mut(Position::new(col, line)) {
                            cell.set_symbol(" ").set_style(style);
                        }
                    }
                }
            }
        }

        if let Some(idx) = self.selection.index() {
            if let Some(row) = rows.get(idx) {
                render_guideline(x.scale(row.date), plot, buf, self.theme);
                render_detail_box(
                    self.table,
                    idx,
                    detail_box_position(&y, rows),
                    plot,
                    buf,
                    self.theme,
                    self.format,
                );
            }
        }

        let legend_row = Rect::new(plot.x, area.y + area.height - 1, plot.width, 1);
        render_legend(&self.table.schema, "■", legend_row, buf, self.theme);
    }
}
