//! Tab strip for the tests sub-charts, clickable with the mouse.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::Stylize;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::config::Theme;

pub struct Pagination<'a> {
    pub names: &'a [&'a str],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for &Pagination<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let active = Style::default()
            .fg(self.theme.get("tab_active_fg"))
            .bg(self.theme.get("tab_active_bg"))
            .bold();
        let inactive = Style::default().fg(self.theme.get("primary"));

        let mut x = area.x;
        for (idx, name) in self.names.iter().enumerate() {
            let label = format!(" {} ", name);
            let width = label.chars().count() as u16;
            if x + width > area.x + area.width {
                break;
            }
            let style = if idx == self.selected { active } else { inactive };
            buf.set_string(x, area.y, &label, style);
            x += width + 1;
        }
    }
}

/// Which tab a click at `column` lands on. Mirrors the layout `render`
/// produces: " name " labels separated by one blank cell.
pub fn hit_tab(names: &[&str], area: Rect, column: u16) -> Option<usize> {
    let mut x = area.x;
    for (idx, name) in names.iter().enumerate() {
        let width = name.chars().count() as u16 + 2;
        if x + width > area.x + area.width {
            break;
        }
        if (x..x + width).contains(&column) {
            return Some(idx);
        }
        x += width + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Theme, ThemeConfig};

    const NAMES: [&str; 3] = ["Number", "Positive Rate", "Daily"];

    fn theme() -> Theme {
        Theme::from_config(&ThemeConfig {
            color_mode: "truecolor".to_string(),
            ..ThemeConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn renders_all_tab_names() {
        let widget = Pagination {
            names: &NAMES,
            selected: 1,
            theme: &theme(),
        };
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let mut text = String::new();
        for x in 0..area.width {
            text.push_str(buf[(x, 0)].symbol());
        }
        assert!(text.contains("Number"));
        assert!(text.contains("Positive Rate"));
        assert!(text.contains("Daily"));
    }

    #[test]
    fn selected_tab_gets_active_background() {
        let theme = theme();
        let widget = Pagination {
            names: &NAMES,
            selected: 0,
            theme: &theme,
        };
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let active_bg = theme.get("tab_active_bg");
        assert_eq!(buf[(1, 0)].style().bg, Some(active_bg));
        // First cell of the second tab (" Positive Rate ") is inactive.
        assert_ne!(buf[(10, 0)].style().bg, Some(active_bg));
    }

    #[test]
    fn hit_tab_matches_rendered_layout() {
        let area = Rect::new(0, 0, 40, 1);
        // " Number " occupies columns 0..8.
        assert_eq!(hit_tab(&NAMES, area, 0), Some(0));
        assert_eq!(hit_tab(&NAMES, area, 7), Some(0));
        // Gap cell between tabs hits nothing.
        assert_eq!(hit_tab(&NAMES, area, 8), None);
        // " Positive Rate " starts at column 9.
        assert_eq!(hit_tab(&NAMES, area, 9), Some(1));
        assert_eq!(hit_tab(&NAMES, area, 39), None);
    }

    #[test]
    fn hit_tab_respects_offset_areas() {
        let area = Rect::new(5, 3, 40, 1);
        assert_eq!(hit_tab(&NAMES, area, 5), Some(0));
        assert_eq!(hit_tab(&NAMES, area, 0), None);
    }
}
