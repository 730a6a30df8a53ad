//! Reconcile-time errors.
//!
//! These never abort a run: callers record them in the report and move on.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// No source group matches the requested id or address.
    #[error("source group not found: {key}")]
    GroupNotFound { key: String },
}
