use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use casualty_map::app::App;
use casualty_map::casualty::{DatasetLoader, PendingLoad};
use casualty_map::config::Config;
use casualty_map::data;
use casualty_map::filter::Dimension;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

fn main() -> Result<()> {
    let config = Config::parse();
    init_logger(config.log_file.as_deref())?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &config);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Log file used when `RUST_LOG` is set without `--log-file`
const DEFAULT_LOG_FILE: &str = "casualty-map.log";

/// Logs always go to a file, never to stderr, which the UI draws over.
/// `--log-file` turns on warnings; `RUST_LOG` alone logs to
/// `casualty-map.log` in the temp dir. With neither, no logger is installed.
fn init_logger(log_file: Option<&Path>) -> Result<()> {
    let filters = std::env::var("RUST_LOG").ok();
    let Some(path) = log_path(log_file, filters.is_some()) else {
        return Ok(());
    };

    let file =
        File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;
    let mut builder = pretty_env_logger::formatted_builder();
    builder
        .filter_level(log::LevelFilter::Warn)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)));
    if let Some(filters) = &filters {
        builder.parse_filters(filters);
    }

    builder.try_init()?;
    Ok(())
}

fn log_path(log_file: Option<&Path>, rust_log_set: bool) -> Option<PathBuf> {
    match log_file {
        Some(path) => Some(path.to_path_buf()),
        None => rust_log_set.then(|| std::env::temp_dir().join(DEFAULT_LOG_FILE)),
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.press(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.release(mouse.column, mouse.row),
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            if !app.close_popup() {
                app.quit();
            }
        }
        KeyCode::Char('q') => app.quit(),

        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char('a') => app.cycle_filter(Dimension::Animal, true),
        KeyCode::Char('A') => app.cycle_filter(Dimension::Animal, false),
        KeyCode::Char('i') => app.cycle_filter(Dimension::Infrastructure, true),
        KeyCode::Char('I') => app.cycle_filter(Dimension::Infrastructure, false),

        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.map_renderer.toggle_states(),

        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &Config) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, size.width as usize, size.height as usize);

    let mut pending: PendingLoad = DatasetLoader::new(&config.dataset).spawn();

    if data::load_basemap(&mut app.map_renderer, &config.data_dir) == 0 {
        log::info!("no base map in {}, using built-in outline", config.data_dir.display());
    }
    if !app.map_renderer.has_data() {
        data::fallback_outline(&mut app.map_renderer);
    }

    loop {
        if let Some(result) = pending.try_resolve() {
            app.on_dataset_loaded(result);
        }

        terminal.draw(|frame| casualty_map::ui::render(frame, &app))?;

        // ~60fps
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key.code),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_never_stderr() {
        assert_eq!(log_path(None, false), None);
        assert_eq!(
            log_path(Some(Path::new("run.log")), false),
            Some(PathBuf::from("run.log"))
        );
        assert_eq!(
            log_path(Some(Path::new("run.log")), true),
            Some(PathBuf::from("run.log"))
        );
        assert_eq!(
            log_path(None, true),
            Some(std::env::temp_dir().join(DEFAULT_LOG_FILE))
        );
    }
}
