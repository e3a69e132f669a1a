mod app;
mod event;
mod list;

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

use crate::storage::FileStorage;
use crate::store::TaskStore;
use crate::watch;
use app::App;
use event::KeyAction;

pub fn run(dir: &Path, debounce_ms: u64, poll_interval: u64) -> Result<()> {
    let store = TaskStore::load(FileStorage::new(dir))?;
    let mut app = App::new(store, Duration::from_millis(debounce_ms));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, dir, poll_interval);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<FileStorage>,
    dir: &Path,
    poll_interval: u64,
) -> Result<()> {
    let poll_duration = Duration::from_millis(poll_interval);

    // Refresh when another process edits the stored tasks
    let (_watcher, rx) = watch::watch_store(dir)?;

    loop {
        terminal.draw(|frame| list::render(frame, app))?;

        // Never sleep past a pending debounce emission
        let timeout = match app.debounce.deadline() {
            Some(deadline) => poll_duration.min(deadline.saturating_duration_since(Instant::now())),
            None => poll_duration,
        };

        if ct_event::poll(timeout)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(app, key, Instant::now())? {
                        KeyAction::Quit => {
                            app.debounce.cancel();
                            return Ok(());
                        }
                        KeyAction::Continue => {}
                    }
                }
            }
        }

        app.tick(Instant::now());

        // Check for storage changes (non-blocking)
        if watch::wait_for_change(&rx, Duration::ZERO) {
            watch::drain_events(&rx);
            app.reload()?;
        }
    }
}
