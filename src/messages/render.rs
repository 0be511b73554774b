//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{EmployeeForm, PositionForm, SearchForm, TaskForm, Toast};
use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{Employee, Position, Task};
use crate::store::LoadState;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Focus
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub field: usize,
    pub cursor: usize,

    // Forms
    pub employee_form: EmployeeForm,
    pub position_form: PositionForm,
    pub task_form: TaskForm,
    pub search_form: SearchForm,

    // Lookup result panel
    pub search_result: Option<String>,

    // Store snapshots
    pub employees: Vec<Employee>,
    pub positions: Vec<Position>,
    pub tasks: Vec<Task>,
    pub employees_state: LoadState,
    pub positions_state: LoadState,
    pub tasks_state: LoadState,

    // Status
    pub busy: bool,
    pub toast: Option<Toast>,
    pub show_help: bool,
}
