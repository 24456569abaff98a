// Quick-pick Menu
// Inline list selection rendered below the cursor

use std::io;

use crossterm::event;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};

use super::Styles;
use crate::core::{EventHandler, PickerEvent};

/// Rows of items shown at once
const MAX_VISIBLE: usize = 12;

/// What the picker should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerStep {
    Continue,
    Done(Option<usize>),
}

/// Highlight position within the item list
#[derive(Debug, Default)]
pub struct PickerState {
    list: ListState,
    len: usize,
}

impl PickerState {
    pub fn new(len: usize) -> Self {
        let mut list = ListState::default();
        if len > 0 {
            list.select(Some(0));
        }
        Self { list, len }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list.selected()
    }

    /// Apply one event
    pub fn apply(&mut self, event: PickerEvent) -> PickerStep {
        if self.len == 0 {
            return PickerStep::Done(None);
        }

        let current = self.list.selected().unwrap_or(0);
        match event {
            PickerEvent::SelectPrevious => self.list.select(Some(current.saturating_sub(1))),
            PickerEvent::SelectNext => self.list.select(Some((current + 1).min(self.len - 1))),
            PickerEvent::First => self.list.select(Some(0)),
            PickerEvent::Last => self.list.select(Some(self.len - 1)),
            PickerEvent::Confirm => return PickerStep::Done(self.selected()),
            PickerEvent::Cancel => return PickerStep::Done(None),
            PickerEvent::None => {}
        }
        PickerStep::Continue
    }
}

fn render_picker(f: &mut Frame, title: &str, items: &[String], state: &mut ListState) {
    let list = List::new(items.iter().map(|i| ListItem::new(i.as_str())).collect::<Vec<_>>())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), Styles::header()))
                .title_bottom(Line::styled(" ↑/↓ move  enter select  esc cancel ", Styles::footer())),
        )
        .style(Styles::list_normal())
        .highlight_style(Styles::list_selected_focused())
        .highlight_symbol("> ");

    f.render_stateful_widget(list, f.area(), state);
}

/// Show `items` inline and wait for a choice
pub fn run_picker(title: &str, items: &[String]) -> io::Result<Option<usize>> {
    if items.is_empty() {
        return Ok(None);
    }

    let height = (items.len().min(MAX_VISIBLE) + 2) as u16;

    enable_raw_mode()?;
    let result = (|| -> io::Result<Option<usize>> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;
        let mut state = PickerState::new(items.len());

        loop {
            terminal.draw(|f| render_picker(f, title, items, &mut state.list))?;

            if let PickerStep::Done(choice) = state.apply(EventHandler::handle(event::read()?)) {
                terminal.clear()?;
                return Ok(choice);
            }
        }
    })();
    disable_raw_mode()?;

    result
}
