//! Terminal front end: raw-mode setup, event loop and key handling.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tracing::info;

use super::{Dashboard, DashboardError, StatusLevel, ui};
use crate::quotes::QuoteSource;

/// Upper bound on one input poll so the clock in the header keeps moving.
const MAX_POLL: Duration = Duration::from_millis(250);

/// Ticker input box state. `buffer` is `Some` while the user is editing.
#[derive(Debug, Default)]
pub struct InputState {
    title: String,
    buffer: Option<String>,
}

impl InputState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            buffer: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.buffer.is_some()
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Applies one key press to the dashboard and the input box.
pub fn handle_key<S: QuoteSource>(
    dashboard: &mut Dashboard<S>,
    input: &mut InputState,
    key: KeyEvent,
) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    if let Some(buffer) = input.buffer.as_mut() {
        match key.code {
            KeyCode::Enter => {
                let text = buffer.clone();
                input.buffer = None;
                dashboard.set_symbols(&text);
            }
            KeyCode::Esc => input.buffer = None,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('r') => {
            dashboard.request_refresh();
            dashboard.set_status(StatusLevel::Info, "Refreshing...");
        }
        KeyCode::Char('e') | KeyCode::Char('/') => {
            input.buffer = Some(dashboard.symbols().join(", "));
        }
        KeyCode::Char('d') => {
            // Outcome is reported through the status line.
            let _ = dashboard.export_history();
        }
        _ => {}
    }

    KeyOutcome::Continue
}

/// Leaves raw mode and the alternate screen when dropped, including when
/// setup fails halfway.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self {
            restore: restore_terminal,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Takes over the terminal and runs the dashboard until the user quits.
pub async fn run<S: QuoteSource>(
    dashboard: &mut Dashboard<S>,
    title: &str,
) -> Result<(), DashboardError> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    info!("terminal UI started");
    let mut input = InputState::new(title);
    let result = event_loop(&mut terminal, dashboard, &mut input).await;
    info!("terminal UI stopped");

    result
}

async fn event_loop<B: Backend, S: QuoteSource>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard<S>,
    input: &mut InputState,
) -> Result<(), DashboardError> {
    loop {
        if dashboard.is_due(Instant::now()) {
            terminal.draw(|frame| ui::draw(frame, dashboard, input))?;
            dashboard.run_pass().await;
        }

        terminal.draw(|frame| ui::draw(frame, dashboard, input))?;

        let wait = dashboard.time_until_due(Instant::now()).min(MAX_POLL);
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(dashboard, input, key) == KeyOutcome::Quit
                {
                    return Ok(());
                }
            }
        }
    }
}
