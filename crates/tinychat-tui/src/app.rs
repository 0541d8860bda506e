//! Application state and update logic for the tinychat TUI.

use crate::event::Action;
use crate::ui::layout::chat_layout;
use crate::ui::widgets::{transcript, TextInputState};
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders};
use tinychat_engine::{ChatSession, PendingTurn, RequestFailure, Submission};
use tracing::debug;

/// Lines moved per PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Conversation, input buffer and loading flag.
    pub session: ChatSession,

    /// Cursor-aware editor mirroring `session.input()`.
    pub input_state: TextInputState,

    /// Model identifier shown in the status bar.
    pub model: String,

    /// Tick counter for animations.
    pub tick: usize,

    /// Transcript lines scrolled up from the bottom (0 follows new messages).
    pub transcript_scroll: usize,

    /// Last known terminal size, for scroll clamping.
    pub viewport: Rect,

    seen_revision: u64,
}

impl App {
    /// Create a new app instance.
    pub fn new(model: impl Into<String>) -> Self {
        let session = ChatSession::new();
        let seen_revision = session.revision();
        Self {
            should_quit: false,
            show_help: false,
            session,
            input_state: TextInputState::new(),
            model: model.into(),
            tick: 0,
            transcript_scroll: 0,
            viewport: Rect::new(0, 0, 80, 24),
            seen_revision,
        }
    }

    /// Create an app for tests, with the default model name.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(tinychat_engine::Config::default().model)
    }

    /// Handle an action. `Submit` is handled by the event loop.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        // The loading overlay blocks everything else
        if self.session.is_loading() {
            return;
        }

        match action {
            Action::Up => self.scroll_up(1),
            Action::Down => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_LINES),
            Action::PageDown => self.scroll_down(PAGE_LINES),
            _ => {}
        }
    }

    /// Apply an edit to the input box and sync the session buffer.
    ///
    /// Ignored while a request is outstanding.
    pub fn edit(&mut self, f: impl FnOnce(&mut TextInputState)) {
        if self.session.is_loading() || self.show_help {
            return;
        }
        f(&mut self.input_state);
        self.session.edit_input(self.input_state.content());
    }

    /// Accept the current input, returning the turn to send if one started.
    pub fn start_submit(&mut self) -> Option<PendingTurn> {
        if self.show_help {
            return None;
        }
        let submission = self.session.begin_submit();
        self.sync_revision();
        match submission {
            Submission::Started(turn) => Some(turn),
            other => {
                debug!(?other, "submit not started");
                None
            }
        }
    }

    /// Apply the settled request outcome.
    pub fn finish_turn(&mut self, result: Result<Option<String>, RequestFailure>) {
        self.session.complete(result);
        self.input_state.clear();
        self.sync_revision();
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    fn max_transcript_scroll(&self) -> usize {
        let area = Block::default()
            .borders(Borders::ALL)
            .inner(chat_layout(self.viewport).transcript);
        transcript::max_scroll(self.session.messages(), area)
    }

    fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = (self.transcript_scroll + lines).min(self.max_transcript_scroll());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// New session content snaps the transcript back to the bottom.
    fn sync_revision(&mut self) {
        let revision = self.session.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.transcript_scroll = 0;
        }
    }
}
