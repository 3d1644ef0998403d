//! Bottom key-hint strip, with a transient notice area on the right.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::Stylize;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::config::Theme;

const ATTRIBUTION: &str = "Data: The COVID Tracking Project";

pub struct Controls<'a> {
    pub theme: &'a Theme,
    /// Whether the per-state panel applies (national page only).
    pub states_available: bool,
    /// Transient message (export results and the like) shown instead of the
    /// data attribution.
    pub notice: Option<&'a str>,
}

impl Controls<'_> {
    fn entries(&self) -> Vec<(&'static str, &'static str)> {
        let mut entries = vec![("←/→", "Tests page")];
        if self.states_available {
            entries.push(("s", "States"));
        }
        entries.push(("e", "Export"));
        entries.push(("q", "Quit"));
        entries
    }
}

impl Widget for &Controls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let key_style = Style::default().fg(self.theme.get("primary")).bold();
        let action_style = Style::default().fg(self.theme.get("text_secondary"));

        let mut spans: Vec<Span> = Vec::new();
        for (key, action) in self.entries() {
            spans.push(Span::styled(format!("{} ", key), key_style));
            spans.push(Span::styled(format!("{}  ", action), action_style));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);

        let right = self.notice.unwrap_or(ATTRIBUTION);
        Paragraph::new(Line::from(Span::styled(right, action_style)))
            .right_aligned()
            .render(area, buf);
    }
}
