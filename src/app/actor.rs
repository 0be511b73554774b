//! App actor - message loop processing UI events, submission outcomes,
//! provider notifications, and store changes

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::app::state::{AppState, Submission};
use crate::messages::ui_events::InputMode;
use crate::messages::{AppMsg, RenderState, UiEvent};
use crate::models::{Employee, NewEmployee, NewPosition, NewTask, Position, Resource, Task};
use crate::provider::{ApiError, DataProvider, Notice};
use crate::store::{Backend, Store};

/// What the actor needs from the data layer beyond the store's list
/// access: the creates and the id lookup.
///
/// `DataProvider` is the production implementation; tests inject fakes.
#[async_trait]
pub trait Api: Backend {
    async fn create_employee(&self, payload: &NewEmployee) -> Result<Employee, ApiError>;
    async fn create_position(&self, payload: &NewPosition) -> Result<Position, ApiError>;
    async fn create_task(&self, payload: &NewTask) -> Result<Task, ApiError>;
    async fn lookup(&self, resource: Resource, id: &str) -> Result<serde_json::Value, ApiError>;
}

#[async_trait]
impl Api for DataProvider {
    async fn create_employee(&self, payload: &NewEmployee) -> Result<Employee, ApiError> {
        self.create(Resource::Employees, payload).await
    }

    async fn create_position(&self, payload: &NewPosition) -> Result<Position, ApiError> {
        self.create(Resource::Positions, payload).await
    }

    async fn create_task(&self, payload: &NewTask) -> Result<Task, ApiError> {
        self.create(Resource::Tasks, payload).await
    }

    async fn lookup(&self, resource: Resource, id: &str) -> Result<serde_json::Value, ApiError> {
        self.get_one(resource, id).await
    }
}

/// App actor that owns the form state and dispatches submissions
pub struct AppActor<A> {
    state: AppState,
    provider: Arc<A>,
    store: Arc<Store<A>>,
    outcome_tx: mpsc::UnboundedSender<AppMsg>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl<A: Api + 'static> AppActor<A> {
    pub fn new(
        provider: Arc<A>,
        store: Arc<Store<A>>,
        outcome_tx: mpsc::UnboundedSender<AppMsg>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            provider,
            store,
            outcome_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut outcome_rx: mpsc::UnboundedReceiver<AppMsg>,
        mut notice_rx: mpsc::UnboundedReceiver<Notice>,
    ) {
        let mut revision = self.store.subscribe();

        // Send initial render state
        self.render().await;

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event).await {
                        break;
                    }
                    self.render().await;
                }
                Some(msg) = outcome_rx.recv() => {
                    self.state.apply_outcome(msg);
                    self.render().await;
                }
                Some(notice) = notice_rx.recv() => {
                    self.state.show_error(notice.text);
                    self.render().await;
                }
                changed = revision.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.render().await;
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    async fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            UiEvent::ChoicePrev => {
                let roster_len = self.store.employees().await.len();
                self.state.choice_prev(roster_len);
            }
            UiEvent::ChoiceNext => {
                let roster_len = self.store.employees().await.len();
                self.state.choice_next(roster_len);
            }

            UiEvent::Submit => self.submit().await,

            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            UiEvent::Quit => return true,
        }
        false
    }

    async fn submit(&mut self) {
        if self.state.input_mode == InputMode::Editing {
            self.state.stop_editing();
        }
        let roster = self.store.employees().await;
        match self.state.build_submission(&roster) {
            Ok(submission) => {
                self.state.begin_submission();
                self.spawn_submission(submission);
            }
            Err(message) => self.state.show_error(message),
        }
    }

    /// Run a validated submission off the actor loop
    fn spawn_submission(&self, submission: Submission) {
        let provider = Arc::clone(&self.provider);
        let store = Arc::clone(&self.store);
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let msg = run_submission(&*provider, &store, submission).await;
            let _ = outcome_tx.send(msg);
        });
    }

    /// Snapshot state + store into a RenderState for the UI
    async fn render(&self) {
        let state = RenderState {
            active_panel: self.state.active_panel,
            input_mode: self.state.input_mode,
            field: self.state.field,
            cursor: self.state.cursor,
            employee_form: self.state.employee_form.clone(),
            position_form: self.state.position_form.clone(),
            task_form: self.state.task_form.clone(),
            search_form: self.state.search_form.clone(),
            search_result: self.state.search_result.clone(),
            employees: self.store.employees().await,
            positions: self.store.positions().await,
            tasks: self.store.tasks().await,
            employees_state: self.store.employees_state().await,
            positions_state: self.store.positions_state().await,
            tasks_state: self.store.tasks_state().await,
            busy: self.state.in_flight > 0,
            toast: self.state.toast.clone(),
            show_help: self.state.show_help,
        };
        let _ = self.render_tx.send(state);
    }
}

/// Dispatch one submission against the data layer. A successful create
/// refreshes the matching collection before reporting back; a failed one
/// triggers no refresh (the provider has already notified).
async fn run_submission<A: Api>(api: &A, store: &Store<A>, submission: Submission) -> AppMsg {
    match submission {
        Submission::CreateEmployee(payload) => {
            let resource = Resource::Employees;
            match api.create_employee(&payload).await {
                Ok(created) => {
                    tracing::info!(id = created.id, "employee created");
                    let _ = store.refresh(resource).await;
                    AppMsg::Created { resource }
                }
                Err(_) => AppMsg::CreateFailed { resource },
            }
        }
        Submission::CreatePosition(payload) => {
            let resource = Resource::Positions;
            match api.create_position(&payload).await {
                Ok(created) => {
                    tracing::info!(id = created.id, "position created");
                    let _ = store.refresh(resource).await;
                    AppMsg::Created { resource }
                }
                Err(_) => AppMsg::CreateFailed { resource },
            }
        }
        Submission::CreateTask(payload) => {
            let resource = Resource::Tasks;
            match api.create_task(&payload).await {
                Ok(created) => {
                    tracing::info!(id = created.id, "task created");
                    let _ = store.refresh(resource).await;
                    AppMsg::Created { resource }
                }
                Err(_) => AppMsg::CreateFailed { resource },
            }
        }
        Submission::Search { resource, id } => match api.lookup(resource, &id).await {
            Ok(value) => AppMsg::SearchResult {
                body: serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
            },
            Err(_) => AppMsg::SearchFailed,
        },
    }
}
