//! WhoDo TUI - terminal CRUD client for the Who Does What staffing API
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Data Layer (Tokio + reqwest) - REST provider and shared store

mod app;
mod config;
mod constants;
mod messages;
mod models;
mod provider;
mod store;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::state::ToastKind;
use app::AppActor;
use config::Config;
use constants::{DATE_DISPLAY_FORMAT, TOAST_SECS};
use messages::ui_events::{key_to_ui_event, InputMode, Panel};
use messages::{AppMsg, RenderState, UiEvent};
use provider::{DataProvider, Notifier};
use store::Store;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", constants::LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::from_env();
    tracing::info!(base_url = %config.base_url, "starting");

    // Data layer: provider + store, initial load of all three collections
    let (notifier, notice_rx) = Notifier::channel();
    let provider = Arc::new(DataProvider::new(&config, notifier));
    let store = Arc::new(Store::new(Arc::clone(&provider)));
    store.start();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<AppMsg>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn app actor
    let actor = AppActor::new(provider, store, outcome_tx, render_tx);
    tokio::spawn(actor.run(ui_rx, outcome_rx, notice_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) =
                    key_to_ui_event(key, current_state.input_mode, current_state.show_help)
                {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_chunks[0]);

    draw_forms_column(f, state, columns[0]);
    draw_tables_column(f, state, columns[1]);
    draw_status_bar(f, state, main_chunks[1]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_forms_column(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Employee form
            Constraint::Length(6), // Position form
            Constraint::Length(5), // Task form
            Constraint::Length(4), // Search form
            Constraint::Min(3),    // Search result
        ])
        .split(area);

    draw_employee_form(f, state, chunks[0]);
    draw_position_form(f, state, chunks[1]);
    draw_task_form(f, state, chunks[2]);
    draw_search_form(f, state, chunks[3]);
    draw_search_result(f, state, chunks[4]);
}

/// Label, display value, and selector flag for one form field
struct FieldView {
    label: &'static str,
    value: String,
    selector: bool,
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect, panel: Panel, title: &str, fields: &[FieldView]) {
    let focused = state.active_panel == panel;
    let editing = focused && state.input_mode == InputMode::Editing;

    let lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            ui::field_line(
                field.label,
                &field.value,
                focused && state.field == i,
                field.selector,
            )
        })
        .collect();

    let form = Paragraph::new(lines).block(ui::form_block(title, focused, editing));
    f.render_widget(form, area);

    // Cursor inside the edited text field
    if editing {
        if let Some(field) = fields.get(state.field) {
            if !field.selector {
                // border + marker + label + ": "
                let offset = 1 + 2 + field.label.len() as u16 + 2;
                let max_x = area.x + area.width.saturating_sub(2);
                let cursor_x = (area.x + offset + state.cursor as u16).min(max_x);
                let cursor_y = area.y + 1 + state.field as u16;
                f.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }
    }
}

/// Display text for an employee picker field
fn employee_pick_value(state: &RenderState, pick: Option<usize>) -> String {
    match pick.and_then(|i| state.employees.get(i)) {
        Some(employee) => format!("< {} >", employee.name),
        None => String::from("< select employee >"),
    }
}

fn draw_employee_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let fields = [FieldView {
        label: "Name",
        value: state.employee_form.name.clone(),
        selector: false,
    }];
    draw_form(f, state, area, Panel::EmployeeForm, "Add new Employee", &fields);
}

fn draw_position_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let fields = [
        FieldView {
            label: "Name",
            value: state.position_form.name.clone(),
            selector: false,
        },
        FieldView {
            label: "Employee",
            value: employee_pick_value(state, state.position_form.employee),
            selector: true,
        },
        FieldView {
            label: "Start Date",
            value: state.position_form.from_date.clone(),
            selector: false,
        },
        FieldView {
            label: "End Date",
            value: state.position_form.to_date.clone(),
            selector: false,
        },
    ];
    draw_form(f, state, area, Panel::PositionForm, "Add new Position", &fields);
}

fn draw_task_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let fields = [
        FieldView {
            label: "Name",
            value: state.task_form.name.clone(),
            selector: false,
        },
        FieldView {
            label: "Employee",
            value: employee_pick_value(state, state.task_form.employee),
            selector: true,
        },
        FieldView {
            label: "Date",
            value: state.task_form.date.clone(),
            selector: false,
        },
    ];
    draw_form(f, state, area, Panel::TaskForm, "Add new Task", &fields);
}

fn draw_search_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let fields = [
        FieldView {
            label: "Id",
            value: state.search_form.id.clone(),
            selector: false,
        },
        FieldView {
            label: "Type",
            value: format!("< {} >", state.search_form.kind.label()),
            selector: true,
        },
    ];
    draw_form(f, state, area, Panel::Search, "Search", &fields);
}

fn draw_search_result(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Result ");

    let lines = match &state.search_result {
        Some(body) => ui::highlight_json(body),
        None => vec![Line::from(Span::styled(
            "No result yet. Fill the search form and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let result = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(result, area);
}

fn draw_tables_column(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(area);

    draw_employee_table(f, state, chunks[0]);
    draw_position_table(f, state, chunks[1]);
    draw_task_table(f, state, chunks[2]);
}

fn table_header(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.to_vec()).style(Style::default().fg(Color::Cyan).bold())
}

fn draw_employee_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let rows: Vec<Row> = state
        .employees
        .iter()
        .map(|e| Row::new(vec![e.id.to_string(), e.name.clone()]))
        .collect();

    let title = format!(
        " Employee List{} ",
        ui::loading_suffix(state.employees_state)
    );
    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(10)])
        .header(table_header(&["Id", "Name"]))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn format_to_date(position: &models::Position) -> String {
    match position.to_date {
        Some(date) => date.format(DATE_DISPLAY_FORMAT).to_string(),
        None => String::from("-"),
    }
}

fn draw_position_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let rows: Vec<Row> = state
        .positions
        .iter()
        .map(|p| {
            Row::new(vec![
                p.id.to_string(),
                p.name.clone(),
                p.employee_id.to_string(),
                p.from_date.format(DATE_DISPLAY_FORMAT).to_string(),
                format_to_date(p),
            ])
        })
        .collect();

    let title = format!(
        " Positions List{} ",
        ui::loading_suffix(state.positions_state)
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(table_header(&["Id", "Name", "EmployeeId", "FromDate", "ToDate"]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn draw_task_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let rows: Vec<Row> = state
        .tasks
        .iter()
        .map(|t| {
            Row::new(vec![
                t.id.to_string(),
                t.name.clone(),
                t.employee_id.to_string(),
                t.date.format(DATE_DISPLAY_FORMAT).to_string(),
            ])
        })
        .collect();

    let title = format!(" Task List{} ", ui::loading_suffix(state.tasks_state));
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(table_header(&["Id", "Name", "EmployeeId", "Date"]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    // Fresh toasts take over the status bar, then it falls back to key hints
    if let Some(toast) = &state.toast {
        if toast.shown_at.elapsed() < Duration::from_secs(TOAST_SECS) {
            let style = match toast.kind {
                ToastKind::Success => Style::default().fg(Color::Green),
                ToastKind::Error => Style::default().fg(Color::Red).bold(),
            };
            let bar = Paragraph::new(format!(" {} ", toast.text)).style(style);
            f.render_widget(bar, area);
            return;
        }
    }

    let busy = if state.busy { " [...]" } else { "" };
    let hints = if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Enter:submit | Tab:next field "
    } else {
        " Tab:panel | arrows:field/choice | e:edit | Enter:submit | ?:help | q:quit "
    };

    let bar = Paragraph::new(format!("{}{}", hints, busy))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 WHODO TUI - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch form panels
   Up / Down          Move between fields
   Left / Right       Cycle employee picker / search type

 FORMS
   e                  Edit the focused field
   Enter              Submit the active form
   Esc                Stop editing

 SEARCH
   Enter an id, pick a type, press Enter.
   Results show below the search form.

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
