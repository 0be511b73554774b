//! # WhoDo TUI
//!
//! A terminal CRUD client for the "Who Does What" staffing API: create
//! employees, positions, and tasks, list them, and look records up by
//! type and id.
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Data Layer (reqwest provider + shared store on Tokio)
//!
//! The data layer is the interesting part: [`provider::DataProvider`]
//! normalizes REST calls and reports every failure exactly once as a
//! user-facing notification, and [`store::Store`] owns the in-memory
//! collection snapshots with wholesale, last-resolved-wins refreshes.

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod provider;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use app::{Api, AppActor, AppState};
pub use config::Config;
pub use messages::{AppMsg, RenderState, UiEvent};
pub use models::{Employee, NewEmployee, NewPosition, NewTask, Position, Resource, Task};
pub use provider::{ApiError, DataProvider, Notice, Notifier};
pub use store::{Backend, LoadState, Store};
