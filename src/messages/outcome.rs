//! Outcome messages - completions of async work sent back to the App layer

use crate::models::Resource;

/// Result of a submission task spawned by the App actor.
///
/// Failure variants carry no message: the provider has already emitted the
/// user-facing notification before the error reached the task.
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// A record was created and the matching collection refreshed
    Created { resource: Resource },
    /// Creation failed; the form must keep its input and skip the refresh
    CreateFailed { resource: Resource },
    /// Lookup succeeded; pretty-printed JSON for the result panel
    SearchResult { body: String },
    /// Lookup failed; no partial result
    SearchFailed,
}
