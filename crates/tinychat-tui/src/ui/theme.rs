//! Theme and styling definitions for the tinychat TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(249, 249, 249);
    pub const FG: Color = Color::Rgb(30, 30, 40);
    pub const DIM: Color = Color::Rgb(120, 120, 130);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(0, 123, 255);

    // Message bubbles
    pub const USER_BUBBLE: Color = Color::Rgb(220, 248, 198);
    pub const BOT_BUBBLE: Color = Color::Rgb(238, 238, 238);
    pub const BUBBLE_FG: Color = Color::Rgb(20, 20, 20);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(45, 45, 60);
    pub const STATUS_FG: Color = Color::Rgb(220, 220, 230);
    pub const STATUS_KEY_BG: Color = Color::Rgb(70, 90, 140);

    // Status colors
    pub const ERROR: Color = Color::Rgb(200, 40, 40);

    // Border colors
    pub const BORDER: Color = Color::Rgb(204, 204, 204);
    pub const BORDER_ACTIVE: Color = Color::Rgb(0, 123, 255);

    // Modal
    pub const MODAL_BG: Color = Color::Rgb(255, 255, 255);
}

/// Spinner frames.
pub struct Symbols;

impl Symbols {
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Spinner frame for a tick count.
pub fn spinner_frame(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Text cursor in the input box.
    pub fn cursor() -> Style {
        Styles::default().add_modifier(Modifier::REVERSED)
    }

    /// Bubble for messages the user typed.
    pub fn user_bubble() -> Style {
        Style::default().fg(Palette::BUBBLE_FG).bg(Palette::USER_BUBBLE)
    }

    /// Bubble for bot replies.
    pub fn bot_bubble() -> Style {
        Style::default().fg(Palette::BUBBLE_FG).bg(Palette::BOT_BUBBLE)
    }

    /// Error annotation inside a bot bubble.
    pub fn bubble_error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BOT_BUBBLE)
    }

    /// Loading modal body.
    pub fn modal() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::MODAL_BG)
    }

    /// Spinner glyph.
    pub fn spinner() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::MODAL_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::STATUS_FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::STATUS_FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::STATUS_FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER).bg(Palette::BG)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE).bg(Palette::BG)
    }
}
