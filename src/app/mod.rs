//! App layer - central state management and submission dispatch
//!
//! The App actor receives UI events, provider notifications, and
//! submission outcomes, updates state, and emits render state.

pub mod actor;
pub mod state;

pub use actor::{Api, AppActor};
pub use state::AppState;
