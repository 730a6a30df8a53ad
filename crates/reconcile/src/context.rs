//! Progress and confirmation callbacks
//!
//! These traits let the executor run without depending on a particular
//! terminal UI.

use crate::types::{ApplyResult, Operation};
use anyhow::Result;

/// Progress callback for execution
///
/// Implement this trait to receive progress updates while a plan is applied.
pub trait ProgressCallback {
    /// Called once before the first operation
    fn on_start(&mut self, count: usize);

    /// Called when starting to apply a single operation
    fn on_operation_start(&mut self, operation: &Operation);

    /// Called when an operation completes
    fn on_operation_complete(&mut self, operation: &Operation, result: &ApplyResult);

    /// Called after the last operation
    fn on_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _count: usize) {}
    fn on_operation_start(&mut self, _operation: &Operation) {}
    fn on_operation_complete(&mut self, _operation: &Operation, _result: &ApplyResult) {}
    fn on_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
