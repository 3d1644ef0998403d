use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::prelude::Stylize;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, StatefulWidget, TableState};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod chart_data;
pub mod chart_export;
pub mod cli;
pub mod config;
pub mod interact;
pub mod payload;
pub mod scale;
pub mod widgets;

pub use cli::Args;
pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme,
};

use chart_data::{PageData, RowTable};
use interact::{nearest_row, Selection};
use scale::{bar_scales, line_scales};
use widgets::bar_chart::BarChart;
use widgets::chart_common::{plot_rect, ValueFormat, CHART_MARGIN};
use widgets::controls::Controls;
use widgets::line_chart::LineChart;
use widgets::pagination::{hit_tab, Pagination};
use widgets::states::{visible_len, StateTable};
use widgets::summary::SummaryTable;

/// Application name used for the config directory and other app-specific
/// paths.
pub const APP_NAME: &str = "covtui";

pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Open(PathBuf),
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

/// The sub-chart shown in the tests section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestsPage {
    #[default]
    Number,
    PositiveRate,
    Daily,
}

impl TestsPage {
    pub const NAMES: [&'static str; 3] = ["Number", "Positive Rate", "Daily"];

    pub fn index(self) -> usize {
        match self {
            TestsPage::Number => 0,
            TestsPage::PositiveRate => 1,
            TestsPage::Daily => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(TestsPage::Number),
            1 => Some(TestsPage::PositiveRate),
            2 => Some(TestsPage::Daily),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::NAMES.len()).unwrap_or_default()
    }

    pub fn prev(self) -> Self {
        let n = Self::NAMES.len();
        Self::from_index((self.index() + n - 1) % n).unwrap_or_default()
    }

    /// File stem for PNG export.
    fn export_stem(self) -> &'static str {
        match self {
            TestsPage::Number => "tests-number",
            TestsPage::PositiveRate => "tests-positive-rate",
            TestsPage::Daily => "tests-daily",
        }
    }
}

#[derive(Default)]
pub struct ErrorModal {
    pub active: bool,
    pub message: String,
}

impl ErrorModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: String) {
        self.active = true;
        self.message = message;
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.message.clear();
    }
}

pub struct App {
    events: Sender<AppEvent>,
    theme: Theme,
    config: AppConfig,
    page: Option<PageData>,
    tests_page: TestsPage,
    confirmed_selection: Selection,
    tests_selection: Selection,
    states_visible: bool,
    states_table_state: TableState,
    error_modal: ErrorModal,
    notice: Option<String>,
    // Rects from the last render, used to resolve mouse positions.
    confirmed_area: Rect,
    tests_area: Rect,
    tabs_area: Rect,
    states_area: Rect,
}

impl App {
    pub fn new(events: Sender<AppEvent>, config: AppConfig) -> Result<App> {
        let theme = Theme::from_config(&config.theme)?;
        Ok(App {
            events,
            theme,
            config,
            page: None,
            tests_page: TestsPage::default(),
            confirmed_selection: Selection::default(),
            tests_selection: Selection::default(),
            states_visible: false,
            states_table_state: TableState::default(),
            error_modal: ErrorModal::new(),
            notice: None,
            confirmed_area: Rect::default(),
            tests_area: Rect::default(),
            tabs_area: Rect::default(),
            states_area: Rect::default(),
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn events(&self) -> &Sender<AppEvent> {
        &self.events
    }

    pub fn tests_page(&self) -> TestsPage {
        self.tests_page
    }

    pub fn tests_selection(&self) -> Selection {
        self.tests_selection
    }

    /// Install decoded page data directly, bypassing the file open path.
    pub fn set_page(&mut self, page: PageData) {
        self.page = Some(page);
        self.confirmed_selection.clear();
        self.tests_selection.clear();
        self.states_visible = false;
    }

    pub fn confirmed_area(&self) -> Rect {
        self.confirmed_area
    }

    pub fn tests_area(&self) -> Rect {
        self.tests_area
    }

    pub fn tabs_area(&self) -> Rect {
        self.tabs_area
    }

    fn tests_table(&self) -> Option<(&RowTable, ValueFormat)> {
        let page = self.page.as_ref()?;
        Some(match self.tests_page {
            TestsPage::Number => (&page.total_pos_neg, ValueFormat::Count),
            TestsPage::PositiveRate => (&page.positive_rate, ValueFormat::Percent),
            TestsPage::Daily => (&page.daily_pos_neg, ValueFormat::Count),
        })
    }

    fn states_available(&self) -> bool {
        self.page
            .as_ref()
            .and_then(|p| p.state_most_recent.as_ref())
            .is_some_and(|data| visible_len(data) > 0)
    }

    fn switch_tests_page(&mut self, page: TestsPage) {
        if page != self.tests_page {
            self.tests_page = page;
            // Selection indexes one table's rows; it cannot carry over.
            self.tests_selection.clear();
        }
    }

    fn open(&mut self, path: &Path) -> Option<AppEvent> {
        match payload::Payload::from_file(path) {
            Ok(payload) => {
                self.page = Some(PageData::from_payload(payload));
                self.confirmed_selection.clear();
                self.tests_selection.clear();
                self.states_visible = false;
                None
            }
            Err(e) => Some(AppEvent::Crash(e.to_string())),
        }
    }

    fn scroll_states(&mut self, delta: i32) {
        let Some(data) = self.page.as_ref().and_then(|p| p.state_most_recent.as_ref()) else {
            return;
        };
        let len = visible_len(data);
        if len == 0 {
            return;
        }
        let current = self.states_table_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, len as i32 - 1) as usize;
        self.states_table_state.select(Some(next));
    }

    fn export_charts(&mut self) {
        let Some(page) = self.page.as_ref() else {
            return;
        };
        let Some((tests_table, _)) = self.tests_table() else {
            return;
        };
        let confirmed = PathBuf::from("confirmed.png");
        let tests = PathBuf::from(format!("{}.png", self.tests_page.export_stem()));
        let result = chart_export::export_png(&confirmed, &page.confirmed, "Confirmed Cases")
            .and_then(|_| {
                chart_export::export_png(
                    &tests,
                    tests_table,
                    TestsPage::NAMES[self.tests_page.index()],
                )
            });
        match result {
            Ok(()) => {
                self.notice = Some(format!(
                    "Exported {} and {}",
                    confirmed.display(),
                    tests.display()
                ));
            }
            Err(e) => self.error_modal.show(format!("Export failed: {}", e)),
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        if self.error_modal.active {
            match event.code {
                KeyCode::Esc | KeyCode::Enter => self.error_modal.hide(),
                _ => {}
            }
            return None;
        }

        // Any keypress retires a transient notice.
        self.notice = None;

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Exit),
            KeyCode::Left => self.switch_tests_page(self.tests_page.prev()),
            KeyCode::Right | KeyCode::Tab => self.switch_tests_page(self.tests_page.next()),
            KeyCode::Char('s') => {
                if self.states_available() {
                    self.states_visible = !self.states_visible;
                    if self.states_visible && self.states_table_state.selected().is_none() {
                        self.states_table_state.select(Some(0));
                    }
                }
            }
            KeyCode::Char('e') => self.export_charts(),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.states_visible {
                    self.scroll_states(1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.states_visible {
                    self.scroll_states(-1);
                }
            }
            _ => {}
        }
        None
    }

    /// Map a mouse column inside the confirmed chart to the nearest row.
    fn scrub_confirmed(&mut self, position: Position) {
        let Some(page) = self.page.as_ref() else {
            return;
        };
        let plot = plot_rect(self.confirmed_area, CHART_MARGIN);
        if !plot.contains(position) {
            return;
        }
        let rows = &page.confirmed.rows;
        let Some((x, _)) = line_scales(rows, plot.width as f64, plot.height as f64) else {
            return;
        };
        let offset = (position.x - plot.x) as f64;
        if let Some(idx) = nearest_row(rows, &x, offset) {
            self.confirmed_selection.select(idx);
        }
    }

    fn scrub_tests(&mut self, position: Position) {
        let plot = plot_rect(self.tests_area, CHART_MARGIN);
        if !plot.contains(position) {
            return;
        }
        let tests_page = self.tests_page;
        let Some((table, _)) = self.tests_table() else {
            return;
        };
        let rows = &table.rows;
        let (w, h) = (plot.width as f64, plot.height as f64);
        // The x scale must match the one the widget renders with: bar charts
        // inset the range by half a bar.
        let x = match tests_page {
            TestsPage::Number | TestsPage::Daily => bar_scales(rows, w, h).map(|(x, ..)| x),
            TestsPage::PositiveRate => line_scales(rows, w, h).map(|(x, _)| x),
        };
        let Some(x) = x else {
            return;
        };
        let offset = (position.x - plot.x) as f64;
        if let Some(idx) = nearest_row(rows, &x, offset) {
            self.tests_selection.select(idx);
        }
    }

    fn mouse(&mut self, event: &MouseEvent) -> Option<AppEvent> {
        if self.error_modal.active {
            return None;
        }
        let position = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                if self.confirmed_area.contains(position) {
                    self.scrub_confirmed(position);
                } else if self.tests_area.contains(position) {
                    self.scrub_tests(position);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.tabs_area.contains(position) {
                    if let Some(idx) = hit_tab(&TestsPage::NAMES, self.tabs_area, event.column) {
                        if let Some(page) = TestsPage::from_index(idx) {
                            self.switch_tests_page(page);
                        }
                    }
                } else if self.confirmed_area.contains(position) {
                    self.scrub_confirmed(position);
                } else if self.tests_area.contains(position) {
                    self.scrub_tests(position);
                }
            }
            MouseEventKind::ScrollDown => {
                if self.states_visible && self.states_area.contains(position) {
                    self.scroll_states(1);
                }
            }
            MouseEventKind::ScrollUp => {
                if self.states_visible && self.states_area.contains(position) {
                    self.scroll_states(-1);
                }
            }
            _ => {}
        }
        None
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Mouse(mouse) => self.mouse(mouse),
            AppEvent::Open(path) => self.open(path),
            AppEvent::Resize(_, _) => None, // next render re-measures everything
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn render_breadcrumb(&self, area: Rect, buf: &mut Buffer) {
        let Some(page) = self.page.as_ref() else {
            return;
        };
        let style = Style::default().fg(self.theme.get("primary")).bold();
        let text = if page.is_us {
            "US".to_string()
        } else {
            format!("US > {}", page.page_type)
        };
        Paragraph::new(text).style(style).render(area, buf);
    }

    fn render_error_modal(&self, area: Rect, buf: &mut Buffer) {
        let popup_area = centered_rect(area, 70, 40);
        Clear.render(popup_area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Error")
            .border_style(Style::default().fg(self.theme.get("bad")));
        let inner_area = block.inner(popup_area);
        block.render(popup_area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(inner_area);

        Paragraph::new(self.error_modal.message.as_str())
            .style(Style::default().fg(self.theme.get("bad")))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .render(chunks[0], buf);

        Paragraph::new("[ OK ]")
            .centered()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("primary"))),
            )
            .render(chunks[1], buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .style(Style::default().bg(self.theme.get("background")))
            .render(area, buf);

        let Some(page) = self.page.as_ref() else {
            Paragraph::new("Loading ...")
                .centered()
                .style(Style::default().fg(self.theme.get("text_secondary")))
                .render(area, buf);
            if self.error_modal.active {
                self.render_error_modal(area, buf);
            }
            return;
        };

        let show_states = self.states_visible && self.states_available();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if show_states {
                vec![Constraint::Fill(1), Constraint::Length(44)]
            } else {
                vec![Constraint::Fill(1)]
            })
            .split(area);
        let main = columns[0];

        let show_summary = page.most_recently.len() >= 2;
        let mut constraints = vec![Constraint::Length(1)]; // breadcrumb
        if show_summary {
            constraints.push(Constraint::Length(3));
        }
        constraints.extend([
            Constraint::Length(1), // confirmed heading
            Constraint::Fill(1),   // confirmed chart
            Constraint::Length(1), // tests heading
            Constraint::Length(1), // tests tabs
            Constraint::Fill(1),   // tests chart
            Constraint::Length(1), // controls
        ]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(main);

        let mut next = 0;
        let mut take = || {
            let r = rows[next];
            next += 1;
            r
        };

        self.render_breadcrumb(take(), buf);
        if show_summary {
            let summary = SummaryTable {
                current: &page.most_recently[0],
                previous: &page.most_recently[1],
                theme: &self.theme,
            };
            (&summary).render(take(), buf);
        }

        let heading_style = Style::default().fg(self.theme.get("text_primary")).bold();
        Paragraph::new("Confirmed Cases")
            .style(heading_style)
            .render(take(), buf);

        self.confirmed_area = take();
        let confirmed = LineChart {
            table: &page.confirmed,
            theme: &self.theme,
            selection: self.confirmed_selection,
            format: ValueFormat::Count,
        };
        (&confirmed).render(self.confirmed_area, buf);

        Paragraph::new("Tests")
            .style(heading_style)
            .render(take(), buf);

        self.tabs_area = take();
        let tabs = Pagination {
            names: &TestsPage::NAMES,
            selected: self.tests_page.index(),
            theme: &self.theme,
        };
        (&tabs).render(self.tabs_area, buf);

        self.tests_area = take();
        match self.tests_page {
            TestsPage::Number => {
                let chart = BarChart {
                    table: &page.total_pos_neg,
                    theme: &self.theme,
                    selection: self.tests_selection,
                    format: ValueFormat::Count,
                };
                (&chart).render(self.tests_area, buf);
            }
            TestsPage::PositiveRate => {
                let chart = LineChart {
                    table: &page.positive_rate,
                    theme: &self.theme,
                    selection: self.tests_selection,
                    format: ValueFormat::Percent,
                };
                (&chart).render(self.tests_area, buf);
            }
            TestsPage::Daily => {
                let chart = BarChart {
                    table: &page.daily_pos_neg,
                    theme: &self.theme,
                    selection: self.tests_selection,
                    format: ValueFormat::Count,
                };
                (&chart).render(self.tests_area, buf);
            }
        }

        let controls = Controls {
            theme: &self.theme,
            states_available: self.states_available(),
            notice: self.notice.as_deref(),
        };
        (&controls).render(take(), buf);

        if show_states {
            self.states_area = columns[1];
            if let Some(data) = page.state_most_recent.as_ref() {
                let table = StateTable {
                    data,
                    theme: &self.theme,
                };
                StatefulWidget::render(
                    &table,
                    self.states_area,
                    buf,
                    &mut self.states_table_state,
                );
            }
        } else {
            self.states_area = Rect::default();
        }

        if self.error_modal.active {
            self.render_error_modal(area, buf);
        }
    }
}

fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
