// UI Styles
// Color schemes for the quick-pick menu and log lines

use crossterm::style::Color as TermColor;
use ratatui::style::{Color, Modifier, Style};

use super::Level;

/// Application color scheme and styles
pub struct Styles;

impl Styles {
    // === Quick-pick ===

    pub fn header() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn list_selected_focused() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn list_normal() -> Style {
        Style::default()
    }

    // === Log lines ===

    pub fn level_color(level: Level) -> TermColor {
        match level {
            Level::Info => TermColor::Cyan,
            Level::Success => TermColor::Green,
            Level::Warn => TermColor::Yellow,
            Level::Error => TermColor::Red,
        }
    }
}
