//! Line chart widget: one polyline per series with point markers, a
//! selection guideline and a detail box.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::Widget;

use crate::chart_data::RowTable;
use crate::config::Theme;
use crate::interact::{detail_box_position, Selection};
use crate::scale::line_scales;
use crate::widgets::chart_common::{
    plot_rect, render_bottom_axis, render_detail_box, render_guideline, render_left_axis,
    render_legend, render_placeholder, ValueFormat, CHART_MARGIN,
};

pub struct LineChart<'a> {
    pub table: &'a RowTable,
    pub theme: &'a Theme,
    pub selection: Selection,
    pub format: ValueFormat,
}

impl Widget for &LineChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = &self.table.rows;
        let plot = plot_rect(area, CHART_MARGIN);
        if plot.width < 2 || plot.height < 2 {
            return;
        }
        if rows.len() < 2 {
            render_placeholder("Not enough data to chart", area, buf, self.theme);
            return;
        }
        let w = plot.width as f64;
        let h = plot.height as f64;
        let Some((x, y)) = line_scales(rows, w, h) else {
            return;
        };

        render_left_axis(&y, plot, buf, self.theme, self.format);
        render_bottom_axis(&x, rows, plot, plot.y + plot.height, buf, self.theme);

        // Per-series polylines in canvas coordinates (origin bottom-left).
        // A NaN value simply drops out; the line connects the valid
        // neighbors instead of rendering a gap.
        let flip = |py: f64| h - py;
        let mut series: Vec<(Color, Vec<(f64, f64)>)> = Vec::new();
        for s in 0..self.table.series_count() {
            let points: Vec<(f64, f64)> = rows
                .iter()
                .filter(|r| r.values.get(s).is_some_and(|v| v.is_finite()))
                .map(|r| (x.scale(r.date), flip(y.scale(r.values[s]))))
                .collect();
            series.push((self.theme.series(s), points));
        }

        Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(|ctx| {
                for (color, points) in &series {
                    for pair in points.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: pair[0].0,
                            y1: pair[0].1,
                            x2: pair[1].0,
                            y2: pair[1].1,
                            color: *color,
                        });
                    }
                }
            })
            .render(plot, buf);

        // Point markers on top of the polylines, one cell per valid point.
        let max_col = plot.width.saturating_sub(1) as f64;
        let max_row = plot.height.saturating_sub(1) as f64;
        for s in 0..self.table.series_count() {
            let style = Style::default().fg(self.theme.series(s));
            for row in rows.iter() {
                let Some(&value) = row.values.get(s) else {
                    continue;
                };
                if !value.is_finite() {
                    continue;
                }
                let col = plot.x + x.scale(row.date).round().clamp(0.0, max_col) as u16;
                let line = plot.y + y.scale(value).round().clamp(0.0, max_row) as u16;
                if let Some(cell) = buf.cell_mut(Position::new(col, line)) {
                    cell.set_symbol("•").set_style(style);
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
        render_legend(&self.table.schema, "─●─", legend_row, buf, self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::{positive_rate_table, Row};
    use crate::config::{Theme, ThemeConfig};
    use chrono::{TimeZone, Utc};

    fn table(values: &[&[f64]]) -> RowTable {
        RowTable {
            schema: vec!["Date".into(), "Total".into(), "New".into()],
            short_schema: None,
            rows: values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    Row::new(
                        Utc.with_ymd_and_hms(2020, 3, i as u32 + 1, 0, 0, 0).unwrap(),
                        v.to_vec(),
                    )
                })
                .collect(),
        }
    }

    fn theme() -> Theme {
        Theme::from_config(&ThemeConfig {
            color_mode: "truecolor".to_string(),
            ..ThemeConfig::default()
        })
        .unwrap()
    }

    fn render(chart: &LineChart, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        buf
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_markers_and_legend() {
        let table = table(&[&[10.0, 2.0], &[20.0, 4.0], &[30.0, 6.0]]);
        let chart = LineChart {
            table: &table,
            theme: &theme(),
            selection: Selection::Unselected,
            format: ValueFormat::Count,
        };
        let text = buffer_text(&render(&chart, 60, 16));
        assert!(text.contains('•'));
        assert!(text.contains("Total"));
        assert!(text.contains("New"));
        assert!(text.contains("3/1"));
    }

    #[test]
    fn selection_draws_detail_box() {
        let table = table(&[&[10.0, 2.0], &[20.0, 4.0], &[30.0, 6.0]]);
        let chart = LineChart {
            table: &table,
            theme: &theme(),
            selection: Selection::Selected(1),
            format: ValueFormat::Count,
        };
        let text = buffer_text(&render(&chart, 60, 18));
        assert!(text.contains("3/2"));
        assert!(text.contains("20"));
    }

    #[test]
    fn single_row_renders_placeholder() {
        let table = table(&[&[10.0, 2.0]]);
        let chart = LineChart {
            table: &table,
            theme: &theme(),
            selection: Selection::Unselected,
            format: ValueFormat::Count,
        };
        let text = buffer_text(&render(&chart, 60, 16));
        assert!(text.contains("Not enough data"));
    }

    #[test]
    fn nan_rows_do_not_panic() {
        let table = table(&[&[f64::NAN, 2.0], &[20.0, f64::NAN], &[30.0, 6.0]]);
        let chart = LineChart {
            table: &table,
            theme: &theme(),
            selection: Selection::Selected(0),
            format: ValueFormat::Count,
        };
        let _ = render(&chart, 60, 16);
    }

    #[test]
    fn two_cell_plot_width_renders_without_panic() {
        let table = table(&[&[10.0, 2.0], &[20.0, 4.0], &[30.0, 6.0]]);
        let chart = LineChart {
            table: &table,
            theme: &theme(),
            selection: Selection::Unselected,
            format: ValueFormat::Count,
        };
        // Plot width comes out exactly 2, too narrow for a date label.
        let _ = render(&chart, 13, 16);
    }

    #[test]
    fn tiny_area_is_skipped() {
        let table = table(&[&[10.0], &[20.0]]);
        let chart = LineChart {
            table: &table,
            theme: &theme(),
            selection: Selection::Unselected,
            format: ValueFormat::Count,
        };
        let _ = render(&chart, 6, 3);
    }
}
