//! App state - pure data structure with no I/O logic

use std::time::Instant;

use chrono::NaiveDate;
use crate::constants::{DATE_INPUT_FORMAT, MIN_NAME_LEN};
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::AppMsg;
use crate::models::{Employee, NewEmployee, NewPosition, NewTask, Resource};

/// Transient status-bar notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// "Add new Employee" form
#[derive(Clone, Debug, Default)]
pub struct EmployeeForm {
    pub name: String,
}

/// "Add new Position" form; `employee` indexes the current roster snapshot
#[derive(Clone, Debug, Default)]
pub struct PositionForm {
    pub name: String,
    pub employee: Option<usize>,
    pub from_date: String,
    pub to_date: String,
}

/// "Add new Task" form
#[derive(Clone, Debug, Default)]
pub struct TaskForm {
    pub name: String,
    pub employee: Option<usize>,
    pub date: String,
}

/// Type + id lookup form
#[derive(Clone, Debug, Default)]
pub struct SearchForm {
    pub id: String,
    pub kind: Resource,
}

/// A validated form submission, ready to be dispatched
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    CreateEmployee(NewEmployee),
    CreatePosition(NewPosition),
    CreateTask(NewTask),
    Search { resource: Resource, id: String },
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub active_panel: Panel,
    pub input_mode: InputMode,
    /// Index of the focused field within the active panel
    pub field: usize,
    /// Cursor position in chars within the focused text field
    pub cursor: usize,

    pub employee_form: EmployeeForm,
    pub position_form: PositionForm,
    pub task_form: TaskForm,
    pub search_form: SearchForm,

    /// Pretty-printed JSON of the last successful lookup
    pub search_result: Option<String>,
    /// Submissions currently running
    pub in_flight: usize,
    pub toast: Option<Toast>,
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            active_panel: Panel::EmployeeForm,
            input_mode: InputMode::Normal,
            field: 0,
            cursor: 0,
            employee_form: EmployeeForm::default(),
            position_form: PositionForm::default(),
            task_form: TaskForm::default(),
            search_form: SearchForm::default(),
            search_result: None,
            in_flight: 0,
            toast: None,
            show_help: false,
        }
    }

    fn field_count(&self) -> usize {
        match self.active_panel {
            Panel::EmployeeForm => 1,
            Panel::PositionForm => 4,
            Panel::TaskForm => 3,
            Panel::Search => 2,
        }
    }

    /// True when the focused field is a selector rather than text
    pub fn on_selector_field(&self) -> bool {
        matches!(
            (self.active_panel, self.field),
            (Panel::PositionForm, 1) | (Panel::TaskForm, 1) | (Panel::Search, 1)
        )
    }

    /// Mutable access to the focused text field, if there is one
    fn current_text_mut(&mut self) -> Option<&mut String> {
        match (self.active_panel, self.field) {
            (Panel::EmployeeForm, 0) => Some(&mut self.employee_form.name),
            (Panel::PositionForm, 0) => Some(&mut self.position_form.name),
            (Panel::PositionForm, 2) => Some(&mut self.position_form.from_date),
            (Panel::PositionForm, 3) => Some(&mut self.position_form.to_date),
            (Panel::TaskForm, 0) => Some(&mut self.task_form.name),
            (Panel::TaskForm, 2) => Some(&mut self.task_form.date),
            (Panel::Search, 0) => Some(&mut self.search_form.id),
            _ => None,
        }
    }

    fn current_text_len(&mut self) -> usize {
        self.current_text_mut().map(|s| s.chars().count()).unwrap_or(0)
    }

    // --- navigation ---

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.field = 0;
        self.stop_editing();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.field = 0;
        self.stop_editing();
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % self.field_count();
        self.cursor = self.current_text_len();
        if self.on_selector_field() {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.field_count();
        self.field = (self.field + count - 1) % count;
        self.cursor = self.current_text_len();
        if self.on_selector_field() {
            self.input_mode = InputMode::Normal;
        }
    }

    // --- text editing ---

    pub fn start_editing(&mut self) {
        if !self.on_selector_field() {
            self.input_mode = InputMode::Editing;
            self.cursor = self.current_text_len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.current_text_mut() {
            let at = byte_index(text, cursor);
            text.insert(at, c);
            self.cursor += 1;
        }
    }

    pub fn delete_char(&mut self) {
        let cursor = self.cursor;
        if cursor == 0 {
            return;
        }
        if let Some(text) = self.current_text_mut() {
            let at = byte_index(text, cursor - 1);
            text.remove(at);
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.current_text_len();
        self.cursor = (self.cursor + 1).min(len);
    }

    // --- selector fields ---

    pub fn choice_next(&mut self, roster_len: usize) {
        match (self.active_panel, self.field) {
            (Panel::PositionForm, 1) => cycle_pick(&mut self.position_form.employee, roster_len, 1),
            (Panel::TaskForm, 1) => cycle_pick(&mut self.task_form.employee, roster_len, 1),
            (Panel::Search, 1) => self.search_form.kind = self.search_form.kind.next(),
            _ => {}
        }
    }

    pub fn choice_prev(&mut self, roster_len: usize) {
        match (self.active_panel, self.field) {
            (Panel::PositionForm, 1) => cycle_pick(&mut self.position_form.employee, roster_len, -1),
            (Panel::TaskForm, 1) => cycle_pick(&mut self.task_form.employee, roster_len, -1),
            (Panel::Search, 1) => self.search_form.kind = self.search_form.kind.prev(),
            _ => {}
        }
    }

    // --- submission ---

    /// Validate the active form against the presence/length rules the
    /// original form fields enforced. Everything else (referential
    /// integrity, date ordering) is the server's call.
    pub fn build_submission(&self, roster: &[Employee]) -> Result<Submission, String> {
        match self.active_panel {
            Panel::EmployeeForm => {
                let name = checked_name(&self.employee_form.name)?;
                Ok(Submission::CreateEmployee(NewEmployee { name }))
            }
            Panel::PositionForm => {
                let form = &self.position_form;
                let name = checked_name(&form.name)?;
                let employee_id = picked_employee(form.employee, roster)?;
                let from_date = parse_date(&form.from_date)?;
                let to_date = match form.to_date.trim() {
                    "" => None,
                    raw => Some(parse_date(raw)?),
                };
                Ok(Submission::CreatePosition(NewPosition {
                    name,
                    employee_id,
                    from_date,
                    to_date,
                }))
            }
            Panel::TaskForm => {
                let form = &self.task_form;
                let name = checked_name(&form.name)?;
                let employee_id = picked_employee(form.employee, roster)?;
                let date = parse_date(&form.date)?;
                Ok(Submission::CreateTask(NewTask {
                    name,
                    employee_id,
                    date,
                }))
            }
            Panel::Search => {
                let id = self.search_form.id.trim();
                if id.is_empty() {
                    return Err(String::from("Enter an id to search for"));
                }
                Ok(Submission::Search {
                    resource: self.search_form.kind,
                    id: String::from(id),
                })
            }
        }
    }

    pub fn begin_submission(&mut self) {
        self.in_flight += 1;
    }

    /// Apply a completed submission. Success clears the form; failure
    /// leaves the input in place for resubmission.
    pub fn apply_outcome(&mut self, msg: AppMsg) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match msg {
            AppMsg::Created { resource } => {
                self.clear_form(resource);
                self.show_success(format!("{} created", resource.label()));
            }
            AppMsg::CreateFailed { .. } => {
                // Error toast already arrived through the notification path
            }
            AppMsg::SearchResult { body } => {
                self.search_result = Some(body);
            }
            AppMsg::SearchFailed => {
                self.search_result = None;
            }
        }
    }

    fn clear_form(&mut self, resource: Resource) {
        match resource {
            Resource::Employees => self.employee_form = EmployeeForm::default(),
            Resource::Positions => self.position_form = PositionForm::default(),
            Resource::Tasks => self.task_form = TaskForm::default(),
        }
        self.cursor = 0;
    }

    pub fn show_success(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast {
            text: text.into(),
            kind: ToastKind::Success,
            shown_at: Instant::now(),
        });
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast {
            text: text.into(),
            kind: ToastKind::Error,
            shown_at: Instant::now(),
        });
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .map(|(i, _)| i)
        .nth(char_idx)
        .unwrap_or(s.len())
}

fn cycle_pick(pick: &mut Option<usize>, len: usize, step: i64) {
    if len == 0 {
        *pick = None;
        return;
    }
    let next = match *pick {
        None => 0,
        Some(i) => (i as i64 + step).rem_euclid(len as i64) as usize,
    };
    *pick = Some(next);
}

fn checked_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(format!("Name must be at least {} characters", MIN_NAME_LEN));
    }
    Ok(String::from(name))
}

fn picked_employee(pick: Option<usize>, roster: &[Employee]) -> Result<i64, String> {
    pick.and_then(|i| roster.get(i))
        .map(|e| e.id)
        .ok_or_else(|| String::from("Select an employee"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| String::from("Dates must be YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Employee> {
        vec![
            Employee {
                id: 10,
                name: String::from("Ada"),
            },
            Employee {
                id: 11,
                name: String::from("Grace"),
            },
        ]
    }

    fn filled_task_state() -> AppState {
        let mut state = AppState::new();
        state.active_panel = Panel::TaskForm;
        state.task_form.name = String::from("Standup");
        state.task_form.employee = Some(1);
        state.task_form.date = String::from("2024-05-20");
        state
    }

    #[test]
    fn test_editing_inserts_at_cursor() {
        let mut state = AppState::new();
        state.start_editing();
        for c in "Aa".chars() {
            state.enter_char(c);
        }
        state.move_cursor_left();
        state.enter_char('d');
        assert_eq!(state.employee_form.name, "Ada");
    }

    #[test]
    fn test_backspace_at_start_is_a_no_op() {
        let mut state = AppState::new();
        state.start_editing();
        state.enter_char('A');
        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.employee_form.name, "A");
    }

    #[test]
    fn test_short_name_rejected() {
        let mut state = AppState::new();
        state.employee_form.name = String::from(" A ");
        assert!(state.build_submission(&roster()).is_err());
    }

    #[test]
    fn test_employee_submission_trims_name() {
        let mut state = AppState::new();
        state.employee_form.name = String::from("  Ada  ");
        let submission = state.build_submission(&roster()).unwrap();
        assert_eq!(
            submission,
            Submission::CreateEmployee(NewEmployee {
                name: String::from("Ada")
            })
        );
    }

    #[test]
    fn test_position_requires_an_employee_pick() {
        let mut state = AppState::new();
        state.active_panel = Panel::PositionForm;
        state.position_form.name = String::from("Developer");
        state.position_form.from_date = String::from("2024-01-01");
        let err = state.build_submission(&roster()).unwrap_err();
        assert!(err.contains("employee"));
    }

    #[test]
    fn test_position_end_date_is_optional() {
        let mut state = AppState::new();
        state.active_panel = Panel::PositionForm;
        state.position_form.name = String::from("Developer");
        state.position_form.employee = Some(0);
        state.position_form.from_date = String::from("2024-01-01");
        let submission = state.build_submission(&roster()).unwrap();
        match submission {
            Submission::CreatePosition(payload) => {
                assert_eq!(payload.employee_id, 10);
                assert_eq!(payload.to_date, None);
            }
            other => panic!("unexpected submission: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_date_rejected() {
        let mut state = filled_task_state();
        state.task_form.date = String::from("20.05.2024");
        assert!(state.build_submission(&roster()).is_err());
    }

    #[test]
    fn test_search_sends_id_as_entered() {
        let mut state = AppState::new();
        state.active_panel = Panel::Search;
        state.search_form.id = String::from(" 42x ");
        state.search_form.kind = Resource::Tasks;
        let submission = state.build_submission(&roster()).unwrap();
        assert_eq!(
            submission,
            Submission::Search {
                resource: Resource::Tasks,
                id: String::from("42x"),
            }
        );
    }

    #[test]
    fn test_successful_create_clears_the_form() {
        let mut state = filled_task_state();
        state.begin_submission();
        state.apply_outcome(AppMsg::Created {
            resource: Resource::Tasks,
        });
        assert!(state.task_form.name.is_empty());
        assert!(state.task_form.employee.is_none());
        assert_eq!(state.in_flight, 0);
        assert!(matches!(
            state.toast,
            Some(Toast {
                kind: ToastKind::Success,
                ..
            })
        ));
    }

    #[test]
    fn test_failed_create_keeps_the_form_populated() {
        let mut state = filled_task_state();
        state.begin_submission();
        state.apply_outcome(AppMsg::CreateFailed {
            resource: Resource::Tasks,
        });
        assert_eq!(state.task_form.name, "Standup");
        assert_eq!(state.task_form.employee, Some(1));
    }

    #[test]
    fn test_employee_pick_cycles_through_roster() {
        let mut state = AppState::new();
        state.active_panel = Panel::TaskForm;
        state.field = 1;
        state.choice_next(2);
        assert_eq!(state.task_form.employee, Some(0));
        state.choice_next(2);
        assert_eq!(state.task_form.employee, Some(1));
        state.choice_next(2);
        assert_eq!(state.task_form.employee, Some(0));
        state.choice_prev(2);
        assert_eq!(state.task_form.employee, Some(1));
    }

    #[test]
    fn test_empty_roster_clears_the_pick() {
        let mut state = AppState::new();
        state.active_panel = Panel::TaskForm;
        state.field = 1;
        state.task_form.employee = Some(3);
        state.choice_next(0);
        assert_eq!(state.task_form.employee, None);
    }
}
