//! Headline summary: the latest national or state totals with day-over-day
//! deltas colored by whether an increase is good news.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Stylize;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Row as TableRow, Table, Widget};

use crate::config::Theme;
use crate::payload::SummaryRecord;
use crate::widgets::chart_common::group_thousands;

/// Render a day-over-day delta as "(+1,234)" / "(-1,234)", colored by
/// polarity. Zero and non-finite deltas render nothing.
pub fn delta_span(value: f64, higher_is_good: bool, theme: &Theme) -> Option<Span<'static>> {
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    let good = (higher_is_good && value > 0.0) || (!higher_is_good && value < 0.0);
    let color = if good {
        theme.get("good")
    } else {
        theme.get("bad")
    };
    let sign = if value > 0.0 { "+" } else { "-" };
    Some(Span::styled(
        format!("({}{})", sign, group_thousands(value.abs())),
        Style::default().fg(color),
    ))
}

pub struct SummaryTable<'a> {
    /// The latest snapshot.
    pub current: &'a SummaryRecord,
    /// The previous snapshot, used for the delta line.
    pub previous: &'a SummaryRecord,
    pub theme: &'a Theme,
}

impl SummaryTable<'_> {
    /// Column order with each metric's delta polarity: more deaths or
    /// positives is bad, more negatives or tests is good.
    fn columns(&self) -> [(&'static str, f64, f64, bool); 4] {
        let (c, p) = (self.current, self.previous);
        [
            ("Positive", c.positive, c.positive - p.positive, false),
            ("Negative", c.negative, c.negative - p.negative, true),
            ("Death", c.death, c.death - p.death, false),
            ("Tested", c.pos_neg, c.pos_neg - p.pos_neg, true),
        ]
    }
}

impl Widget for &SummaryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header_style = Style::default()
            .fg(self.theme.get("table_header"))
            .bg(self.theme.get("table_header_bg"))
            .bold();

        let columns = self.columns();
        let header = TableRow::new(
            columns
                .iter()
                .map(|(label, ..)| Cell::from(Line::from(*label).centered()))
                .collect::<Vec<_>>(),
        )
        .style(header_style);

        let cells: Vec<Cell> = columns
            .iter()
            .map(|&(_, value, delta, higher_is_good)| {
                let mut lines = vec![Line::from(group_thousands(value)).centered()];
                match delta_span(delta, higher_is_good, self.theme) {
                    Some(span) => lines.push(Line::from(span).centered()),
                    None => lines.push(Line::default()),
                }
                Cell::from(Text::from(lines))
            })
            .collect();

        let widths = vec![Constraint::Ratio(1, columns.len() as u32); columns.len()];
        Table::new(vec![TableRow::new(cells).height(2)], widths)
            .header(header)
            .column_spacing(1)
            .render(area, buf);
    }
}
