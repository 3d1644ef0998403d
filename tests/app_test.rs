use covtui::chart_data::PageData;
use covtui::payload::Payload;
use covtui::{App, AppEvent, AppConfig, TestsPage};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::mpsc::channel;

const SAMPLE: &str = r#"{
    "pageType": "US",
    "confirmed": [
        {"date": "2020-03-01T00:00:00Z", "totalPositive": 60, "newPositive": 60},
        {"date": "2020-03-02T00:00:00Z", "totalPositive": 100, "newPositive": 40},
        {"date": "2020-03-03T00:00:00Z", "totalPositive": 180, "newPositive": 80}
    ],
    "totalPosNeg": [
        {"date": "2020-03-01T00:00:00Z", "positive": 10, "negative": 20},
        {"date": "2020-03-02T00:00:00Z", "positive": 15, "negative": 35},
        {"date": "2020-03-03T00:00:00Z", "positive": 25, "negative": 55}
    ],
    "dailyPosNeg": [
        {"date": "2020-03-01T00:00:00Z", "positive": 10, "negative": 20},
        {"date": "2020-03-02T00:00:00Z", "positive": 5, "negative": 15},
        {"date": "2020-03-03T00:00:00Z", "positive": 10, "negative": 20}
    ],
    "mostRecently": [
        {"positive": 180, "negative": 900, "death": 3, "posNeg": 1080},
        {"positive": 100, "negative": 700, "death": 2, "posNeg": 800}
    ],
    "stateMostRecent": [
        {
            "record": {"state": "WA", "positive": 70, "negative": 500, "death": 3},
            "diff": {"state": "WA", "positive": 10, "negative": 100, "death": 1}
        }
    ]
}"#;

fn app_with_sample() -> App {
    let (tx, _rx) = channel::<AppEvent>();
    let mut app = App::new(tx, AppConfig::default()).expect("build app");
    let payload = Payload::from_str(SAMPLE).expect("decode sample");
    app.set_page(PageData::from_payload(payload));
    app
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn draw(app: &mut App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|frame| frame.render_widget(app, frame.area()))
        .expect("draw");
    let buffer = terminal.backend().buffer().clone();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn renders_dashboard_sections() {
    let mut app = app_with_sample();
    let text = draw(&mut app, 100, 40);

    assert!(text.contains("US"));
    assert!(text.contains("Confirmed Cases"));
    assert!(text.contains("Tests"));
    assert!(text.contains("Number"));
    assert!(text.contains("Positive Rate"));
    assert!(text.contains("Daily"));
    assert!(text.contains("(+80)")); // positive delta in the summary
    assert!(text.contains("COVID Tracking Project"));
}

#[test]
fn loading_screen_before_payload_arrives() {
    let (tx, _rx) = channel::<AppEvent>();
    let mut app = App::new(tx, AppConfig::default()).expect("build app");
    let text = draw(&mut app, 60, 20);
    assert!(text.contains("Loading ..."));
}

#[test]
fn arrow_keys_cycle_tests_pages() {
    let mut app = app_with_sample();
    assert_eq!(app.tests_page(), TestsPage::Number);

    app.event(&key(KeyCode::Right));
    assert_eq!(app.tests_page(), TestsPage::PositiveRate);
    app.event(&key(KeyCode::Right));
    assert_eq!(app.tests_page(), TestsPage::Daily);
    app.event(&key(KeyCode::Right));
    assert_eq!(app.tests_page(), TestsPage::Number);
    app.event(&key(KeyCode::Left));
    assert_eq!(app.tests_page(), TestsPage::Daily);
}

#[test]
fn quit_keys_produce_exit() {
    let mut app = app_with_sample();
    assert!(matches!(app.event(&key(KeyCode::Char('q'))), Some(AppEvent::Exit)));
    assert!(matches!(app.event(&key(KeyCode::Esc)), Some(AppEvent::Exit)));
}

#[test]
fn states_panel_toggles_on_national_page() {
    let mut app = app_with_sample();
    let before = draw(&mut app, 110, 40);
    assert!(!before.contains("WA"));

    app.event(&key(KeyCode::Char('s')));
    let after = draw(&mut app, 110, 40);
    assert!(after.contains(" States "));
    assert!(after.contains("WA"));

    app.event(&key(KeyCode::Char('s')));
    let again = draw(&mut app, 110, 40);
    assert!(!again.contains("WA"));
}

#[test]
fn mouse_move_over_confirmed_chart_selects_a_day() {
    let mut app = app_with_sample();
    // Render once so the app knows where the charts are.
    let _ = draw(&mut app, 100, 40);

    let area = app.confirmed_area();
    let event = MouseEvent {
        kind: MouseEventKind::Moved,
        column: area.x + area.width / 2,
        row: area.y + area.height / 2,
        modifiers: KeyModifiers::NONE,
    };
    app.event(&AppEvent::Mouse(event));

    let text = draw(&mut app, 100, 40);
    // The detail box names the selected day.
    assert!(text.contains("3/1") || text.contains("3/2") || text.contains("3/3"));
    assert!(text.contains('│'));
}

#[test]
fn clicking_a_tab_switches_the_tests_chart() {
    let mut app = app_with_sample();
    let _ = draw(&mut app, 100, 40);

    let tabs = app.tabs_area();
    // " Number " is 8 wide plus a gap; " Positive Rate " starts at x + 9.
    let event = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: tabs.x + 10,
        row: tabs.y,
        modifiers: KeyModifiers::NONE,
    };
    app.event(&AppEvent::Mouse(event));
    assert_eq!(app.tests_page(), TestsPage::PositiveRate);
}

#[test]
fn switching_tab_clears_the_tests_selection() {
    let mut app = app_with_sample();
    let _ = draw(&mut app, 100, 40);

    let area = app.tests_area();
    app.event(&AppEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Moved,
        column: area.x + area.width / 2,
        row: area.y + area.height / 2,
        modifiers: KeyModifiers::NONE,
    }));
    assert!(app.tests_selection().index().is_some());

    app.event(&key(KeyCode::Right));
    assert!(app.tests_selection().index().is_none());
}
