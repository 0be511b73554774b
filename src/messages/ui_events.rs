//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Focusable panels, cycled with Tab
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    EmployeeForm,
    PositionForm,
    TaskForm,
    Search,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::EmployeeForm => Panel::PositionForm,
            Panel::PositionForm => Panel::TaskForm,
            Panel::TaskForm => Panel::Search,
            Panel::Search => Panel::EmployeeForm,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::EmployeeForm => Panel::Search,
            Panel::PositionForm => Panel::EmployeeForm,
            Panel::TaskForm => Panel::PositionForm,
            Panel::Search => Panel::TaskForm,
        }
    }
}

/// Input mode for the focused field
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Panel and field navigation
    NextPanel,
    PrevPanel,
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Selector fields (employee picker, search type)
    ChoicePrev,
    ChoiceNext,

    // Form actions
    Submit,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Translate a key event into a UI event for the current mode
pub fn key_to_ui_event(key: KeyEvent, input_mode: InputMode, show_help: bool) -> Option<UiEvent> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::Left => Some(UiEvent::ChoicePrev),
            KeyCode::Right => Some(UiEvent::ChoiceNext),
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_q_quits_in_normal_mode() {
        let event = key_to_ui_event(key(KeyCode::Char('q')), InputMode::Normal, false);
        assert!(matches!(event, Some(UiEvent::Quit)));
    }

    #[test]
    fn test_q_is_text_while_editing() {
        let event = key_to_ui_event(key(KeyCode::Char('q')), InputMode::Editing, false);
        assert!(matches!(event, Some(UiEvent::CharInput('q'))));
    }

    #[test]
    fn test_ctrl_c_quits_even_while_editing() {
        let event = key_to_ui_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            InputMode::Editing,
            false,
        );
        assert!(matches!(event, Some(UiEvent::Quit)));
    }

    #[test]
    fn test_any_key_closes_help() {
        let event = key_to_ui_event(key(KeyCode::Char('x')), InputMode::Normal, true);
        assert!(matches!(event, Some(UiEvent::CloseHelp)));
    }

    #[test]
    fn test_panel_cycle_is_a_loop() {
        let start = Panel::EmployeeForm;
        assert_eq!(start.next().next().next().next(), start);
        assert_eq!(start.prev(), Panel::Search);
    }
}
