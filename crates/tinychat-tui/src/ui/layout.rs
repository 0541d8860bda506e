//! Layout helpers for the tinychat TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Areas of the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub title: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Split the full screen into title, transcript, input and status bar.
pub fn chat_layout(area: Rect) -> ChatLayout {
    let (main_area, status) = main_layout(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input
        ])
        .split(main_area);

    ChatLayout {
        title: chunks[0],
        transcript: chunks[1],
        input: chunks[2],
        status,
    }
}
