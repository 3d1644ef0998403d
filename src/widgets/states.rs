//! Per-state breakdown panel: a scrollable table of the latest totals for
//! every state reporting cases, with inline day-over-day deltas.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Stylize;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row as TableRow, StatefulWidget, Table, TableState};

use crate::config::Theme;
use crate::payload::RecordAndDiff;
use crate::widgets::chart_common::group_thousands;
use crate::widgets::summary::delta_span;

/// States with no reported positives are omitted from the table.
fn visible<'a>(data: &'a [RecordAndDiff]) -> impl Iterator<Item = &'a RecordAndDiff> {
    data.iter().filter(|entry| entry.record.positive != 0.0)
}

/// Number of rows the table will show, for scroll clamping.
pub fn visible_len(data: &[RecordAndDiff]) -> usize {
    visible(data).count()
}

pub struct StateTable<'a> {
    pub data: &'a [RecordAndDiff],
    pub theme: &'a Theme,
}

impl StateTable<'_> {
    fn value_cell(&self, value: f64, delta: f64, higher_is_good: bool) -> Cell<'static> {
        let mut spans = vec![Span::raw(group_thousands(value))];
        if let Some(delta) = delta_span(delta, higher_is_good, self.theme) {
            spans.push(Span::raw(" "));
            spans.push(delta);
        }
        Cell::from(Line::from(spans))
    }
}

impl StatefulWidget for &StateTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let header_style = Style::default()
            .fg(self.theme.get("table_header"))
            .bg(self.theme.get("table_header_bg"))
            .bold();
        let header = TableRow::new(vec!["State", "Positive", "Negative", "Death"])
            .style(header_style);

        let rows: Vec<TableRow> = visible(self.data)
            .map(|entry| {
                let (r, d) = (&entry.record, &entry.diff);
                TableRow::new(vec![
                    Cell::from(Span::styled(
                        r.state.clone(),
                        Style::default().fg(self.theme.get("primary")).bold(),
                    )),
                    self.value_cell(r.positive, d.positive, false),
                    self.value_cell(r.negative, d.negative, true),
                    self.value_cell(r.death, d.death, false),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Fill(3),
            Constraint::Fill(3),
            Constraint::Fill(2),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::default().bg(self.theme.get("dimmed")))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("primary")))
                    .title(" States "),
            );
        StatefulWidget::render(table, area, buf, state);
    }
}
