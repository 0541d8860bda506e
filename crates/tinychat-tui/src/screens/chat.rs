//! Chat screen: title, transcript, input box and loading overlay.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::centered_fixed;
use crate::ui::layout::chat_layout;
use crate::ui::theme::{spinner_frame, Styles};
use crate::ui::widgets::{KeyHint, StatusBar, Transcript};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const TITLE: &str = "🤖 Chatbot (Local Server)";
const PLACEHOLDER: &str = "Type a message...";
const LOADING_CAPTION: &str = "Getting response...";

/// The chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let layout = chat_layout(area);

        Paragraph::new(Line::from(Span::styled(TITLE, Styles::title())))
            .alignment(Alignment::Center)
            .style(Styles::default())
            .render(layout.title, buf);

        render_transcript(app, layout.transcript, buf);
        render_input(app, layout.input, buf);

        let hints = vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("↑/↓", "Scroll"),
            KeyHint::new("F1", "Help"),
            KeyHint::new("Ctrl+C", "Quit"),
        ];
        StatusBar::new("Chat")
            .hints(hints)
            .right(&app.model)
            .render(layout.status, buf);

        if app.session.is_loading() {
            render_loading_overlay(app, area, buf);
        }
    }
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    Transcript::new(app.session.messages())
        .scroll(app.transcript_scroll)
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let loading = app.session.is_loading();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if loading {
            Styles::border()
        } else {
            Styles::border_active()
        })
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    app.input_state
        .widget()
        .focused(!loading)
        .placeholder(PLACEHOLDER)
        .render(inner, buf);
}

/// Modal shown while a request is outstanding. Blocks interaction.
fn render_loading_overlay(app: &App, area: Rect, buf: &mut Buffer) {
    let width = 30.min(area.width.saturating_sub(4));
    let height = 5.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::modal());

    let lines = vec![
        Line::from(Span::styled(spinner_frame(app.tick), Styles::spinner())),
        Line::from(Span::styled(LOADING_CAPTION, Styles::modal())),
    ];

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .style(Styles::modal())
        .render(overlay_area, buf);
}
