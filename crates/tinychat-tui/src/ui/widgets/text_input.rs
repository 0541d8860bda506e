//! Single-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// A single-line text input widget.
///
/// When the content is wider than the area, the view scrolls so the
/// cursor stays visible.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    content: &'a str,
    /// Cursor position (character index).
    cursor: usize,
    focused: bool,
    placeholder: Option<&'a str>,
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let mut spans = vec![Span::styled(self.prompt, Styles::active())];

        if self.content.is_empty() {
            if self.focused {
                spans.push(Span::styled(" ", Styles::cursor()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        // Columns available for content plus a trailing cursor cell
        let budget = usize::from(area.width).saturating_sub(self.prompt.len()).max(1);

        let chars: Vec<char> = self.content.chars().collect();
        let cursor = self.cursor.min(chars.len());

        // Scroll so the cursor cell fits within the budget
        let mut start = 0;
        let width_between = |from: usize, to: usize| -> usize {
            chars[from..to].iter().map(|c| c.width().unwrap_or(0)).sum()
        };
        while start < cursor && width_between(start, cursor) + 1 > budget {
            start += 1;
        }

        let mut used = 0;
        for (i, ch) in chars.iter().enumerate().skip(start) {
            let w = ch.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            let style = if self.focused && i == cursor {
                Styles::cursor()
            } else {
                Styles::default()
            };
            spans.push(Span::styled(ch.to_string(), style));
        }
        if self.focused && cursor == chars.len() && used < budget {
            spans.push(Span::styled(" ", Styles::cursor()));
        }

        Paragraph::new(Line::from(spans))
            .style(Styles::default())
            .render(area, buf);
    }
}

/// State for a text input, managing content and cursor position.
///
/// The cursor is a character index, never a byte offset.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Create a widget from this state.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput {
            content: &self.content,
            cursor: self.cursor,
            focused: true,
            placeholder: None,
            prompt: "> ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_text_input_state_basic() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor(), 2);

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_text_input_state_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor(), 3);

        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        assert_eq!(state.cursor(), 0);
        state.move_left();
        assert_eq!(state.cursor(), 0);

        state.delete();
        assert_eq!(state.content(), "elXlo");

        state.move_end();
        assert_eq!(state.cursor(), 5);
        state.move_right();
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn test_text_input_state_multibyte() {
        let mut state = TextInputState::new();
        state.insert_str("héllo");
        assert_eq!(state.cursor(), 5);

        state.move_left();
        state.move_left();
        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "hllo");

        state.insert('ü');
        assert_eq!(state.content(), "hüllo");
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_widget_shows_placeholder_when_empty() {
        let state = TextInputState::new();
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        state
            .widget()
            .placeholder("Type a message...")
            .render(area, &mut buf);

        assert_eq!(buffer_to_string(&buf), ">  Type a message...");
    }

    #[test]
    fn test_widget_scrolls_to_keep_cursor_visible() {
        let mut state = TextInputState::new();
        state.insert_str("abcdefghijklmnopqrstuvwxyz");
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        state.widget().render(area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.starts_with("> "));
        assert!(text.ends_with('z'));
        assert!(!text.contains('a'));
    }
}
