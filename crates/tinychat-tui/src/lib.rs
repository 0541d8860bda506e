//! tinychat-tui: Terminal UI for tinychat
//!
//! This crate provides the interactive chat screen:
//! - Scrollable transcript of user and bot bubbles
//! - Single-line input box that submits on Enter
//! - Loading overlay while a request is outstanding

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use tinychat_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tinychat_engine::{ChatBackend, PendingTurn, RequestFailure};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use ui::widgets::TextInputState;

type TurnHandle = JoinHandle<Result<Option<String>, RequestFailure>>;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop against `backend`, and
/// restores the terminal on exit.
pub async fn run_tui(
    backend: Arc<dyn ChatBackend>,
    model: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let mut app = App::new(model);

    // 10 Hz keeps the spinner moving
    let mut events = EventHandler::new(100);

    let result = run_loop(&mut terminal, &mut app, &mut events, backend).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut turn_handle: Option<TurnHandle> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.viewport = area;
            let buf = frame.buffer_mut();

            screens::chat::ChatScreen.render(app, area, buf);

            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if let Some(turn) = handle_key(app, key) {
                        turn_handle = Some(spawn_turn(Arc::clone(&backend), turn));
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                        MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                }
            }
        }

        // Check for a settled request
        if turn_handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = turn_handle.take() {
                app.finish_turn(join_turn(handle).await);
            }
        }

        if app.should_quit {
            if let Some(handle) = turn_handle.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Route a key to the input box or to an action.
///
/// Returns the turn to send when Enter starts a submission.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<PendingTurn> {
    // Any key closes help
    if app.show_help {
        app.handle_action(event::key_to_action(key));
        return None;
    }

    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        let handled = match key.code {
            KeyCode::Char(c) => {
                app.edit(|input| input.insert(c));
                true
            }
            KeyCode::Backspace => {
                app.edit(TextInputState::backspace);
                true
            }
            KeyCode::Delete => {
                app.edit(TextInputState::delete);
                true
            }
            KeyCode::Left => {
                app.edit(TextInputState::move_left);
                true
            }
            KeyCode::Right => {
                app.edit(TextInputState::move_right);
                true
            }
            KeyCode::Home => {
                app.edit(TextInputState::move_home);
                true
            }
            KeyCode::End => {
                app.edit(TextInputState::move_end);
                true
            }
            _ => false,
        };
        if handled {
            return None;
        }
    }

    match event::key_to_action(key) {
        Action::Submit => app.start_submit(),
        action => {
            app.handle_action(action);
            None
        }
    }
}

fn spawn_turn(backend: Arc<dyn ChatBackend>, turn: PendingTurn) -> TurnHandle {
    tokio::spawn(async move { backend.generate(&turn.prompt).await })
}

/// Await a finished request task, folding a panicked task into a failure.
async fn join_turn(handle: TurnHandle) -> Result<Option<String>, RequestFailure> {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "chat request task failed");
            Err(RequestFailure::new(e.to_string()))
        }
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
