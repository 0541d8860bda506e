//! Conversation transcript widget.
//!
//! Messages are laid out as bubbles: user messages right-aligned on the
//! user color, bot messages left-aligned on the bot color. A bubble is at
//! most 80% of the available width and wraps on word boundaries.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use tinychat_engine::Message;
use unicode_width::UnicodeWidthStr;

/// Horizontal padding inside a bubble, per side.
const BUBBLE_PADDING: usize = 1;

/// Maximum share of the width a bubble may take, in percent.
const BUBBLE_MAX_PERCENT: usize = 80;

/// Build the rendered lines for a conversation at a given width.
pub fn transcript_lines(messages: &[Message], width: u16) -> Vec<Line<'static>> {
    let max_bubble = (usize::from(width) * BUBBLE_MAX_PERCENT / 100).max(BUBBLE_PADDING * 2 + 1);
    let text_width = max_bubble - BUBBLE_PADDING * 2;

    let mut lines = Vec::new();
    for message in messages {
        let (base, alignment) = if message.is_user() {
            (Styles::user_bubble(), Alignment::Right)
        } else {
            (Styles::bot_bubble(), Alignment::Left)
        };

        let mut rows: Vec<(String, Style)> = wrap_text(message.text(), text_width)
            .into_iter()
            .map(|row| (row, base))
            .collect();
        if let Some(error) = message.error() {
            rows.extend(
                wrap_text(&format!("(Error: {error})"), text_width)
                    .into_iter()
                    .map(|row| (row, Styles::bubble_error())),
            );
        }

        let inner_width = rows.iter().map(|(row, _)| row.width()).max().unwrap_or(0);
        let pad = " ".repeat(BUBBLE_PADDING);
        for (row, style) in rows {
            let fill = " ".repeat(inner_width - row.width());
            lines.push(
                Line::from(vec![
                    Span::styled(pad.clone(), base),
                    Span::styled(format!("{row}{fill}"), style),
                    Span::styled(pad.clone(), base),
                ])
                .alignment(alignment),
            );
        }
        lines.push(Line::from(""));
    }
    lines
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|paragraph| {
            textwrap::wrap(paragraph, width)
                .into_iter()
                .map(std::borrow::Cow::into_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Renders the tail of the conversation, scrolled up by `scroll` lines.
#[derive(Debug, Clone)]
pub struct Transcript<'a> {
    messages: &'a [Message],
    scroll: usize,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            scroll: 0,
        }
    }

    /// Lines scrolled up from the bottom. Clamped at render time.
    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

/// How far the transcript can scroll up within an area.
pub fn max_scroll(messages: &[Message], area: Rect) -> usize {
    transcript_lines(messages, area.width)
        .len()
        .saturating_sub(usize::from(area.height))
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        if self.messages.is_empty() {
            let hint = Line::from(Span::styled(
                "Say something to start the conversation.",
                Styles::dim(),
            ))
            .alignment(Alignment::Center);
            Paragraph::new(vec![Line::from(""), hint])
                .style(Styles::default())
                .render(area, buf);
            return;
        }

        let lines = transcript_lines(self.messages, area.width);
        let height = usize::from(area.height);
        let scroll = self.scroll.min(lines.len().saturating_sub(height));
        let start = lines.len().saturating_sub(height + scroll);

        let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(area, buf);
    }
}
