use ratatui::style::{Color, Modifier, Style};

/// Clinic theme: light teal on a dark slate background.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(16, 20, 24);
    pub const FG: Color = Color::Rgb(200, 235, 230);
    pub const FG_DIM: Color = Color::Rgb(120, 160, 155);
    pub const FG_MUTED: Color = Color::Rgb(80, 95, 100);

    pub const ACCENT_TEAL: Color = Color::Rgb(0, 200, 180);
    pub const ACCENT_GOLD: Color = Color::Rgb(240, 200, 80);
    pub const ACCENT_RED: Color = Color::Rgb(255, 90, 90);

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    /// Border of the focused panel.
    pub fn border_focus() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Focused form row.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::BG)
            .bg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    /// The annual estimate.
    pub fn amount() -> Style {
        Style::default()
            .fg(Self::ACCENT_GOLD)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ACCENT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }
}
