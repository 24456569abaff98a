// Event Handling
// Maps terminal events to quick-pick menu actions

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

/// Actions the quick-pick menu understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Move highlight up
    SelectPrevious,

    /// Move highlight down
    SelectNext,

    /// Jump to first item
    First,

    /// Jump to last item
    Last,

    /// Accept the highlighted item
    Confirm,

    /// Close without choosing
    Cancel,

    /// No operation
    None,
}

/// Converts crossterm events to picker events
pub struct EventHandler;

impl EventHandler {
    /// Convert a crossterm event to a picker event
    pub fn handle(event: Event) -> PickerEvent {
        match event {
            Event::Key(key) => Self::handle_key(key),
            Event::Mouse(mouse) => Self::handle_mouse(mouse),
            _ => PickerEvent::None,
        }
    }

    fn handle_key(key: KeyEvent) -> PickerEvent {
        // Only handle key press events
        if key.kind != KeyEventKind::Press {
            return PickerEvent::None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PickerEvent::Cancel,
            KeyCode::Esc | KeyCode::Char('q') => PickerEvent::Cancel,

            KeyCode::Up | KeyCode::Char('k') => PickerEvent::SelectPrevious,
            KeyCode::Down | KeyCode::Char('j') => PickerEvent::SelectNext,
            KeyCode::Home | KeyCode::PageUp => PickerEvent::First,
            KeyCode::End | KeyCode::PageDown => PickerEvent::Last,

            KeyCode::Enter | KeyCode::Char(' ') => PickerEvent::Confirm,

            _ => PickerEvent::None,
        }
    }

    fn handle_mouse(mouse: MouseEvent) -> PickerEvent {
        match mouse.kind {
            MouseEventKind::ScrollUp => PickerEvent::SelectPrevious,
            MouseEventKind::ScrollDown => PickerEvent::SelectNext,
            _ => PickerEvent::None,
        }
    }
}
