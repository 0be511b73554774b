//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and data layers.

pub mod outcome;
pub mod render;
pub mod ui_events;

pub use outcome::AppMsg;
pub use render::RenderState;
pub use ui_events::UiEvent;
