use clap::Parser;
use color_eyre::Result;
use covtui::{App, AppEvent, Args, ConfigManager, APP_NAME};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind};
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::time::Duration;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn event_loop(
    mut terminal: DefaultTerminal,
    app: &mut App,
    rx: std::sync::mpsc::Receiver<AppEvent>,
    poll_interval: Duration,
) -> Result<()> {
    let tx = app.events().clone();
    render(&mut terminal, app)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                    tx.send(AppEvent::Key(key))?
                }
                crossterm::event::Event::Mouse(mouse) => tx.send(AppEvent::Mouse(mouse))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.write_config {
        let manager = ConfigManager::new(APP_NAME)?;
        match manager.write_default_config(args.force) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error writing config: {}", e);
                std::process::exit(1);
            }
        }
    }
    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;

    let mut config = ConfigManager::new(APP_NAME)?.load_config()?;
    if let Some(mode) = &args.color_mode {
        config.theme.color_mode = mode.clone();
    }
    let mouse = config.display.mouse && !args.no_mouse;
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new(tx.clone(), config)?;
    tx.send(AppEvent::Open(args.path.clone()))?;

    let terminal = ratatui::init();
    if mouse {
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    }
    let result = event_loop(terminal, &mut app, rx, poll_interval);
    if mouse {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    }
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
