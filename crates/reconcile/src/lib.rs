//! # Reconcile
//!
//! Turns a pair of directory snapshots into an ordered list of operations and
//! applies them through a connector.
//!
//! ## Core Concepts
//!
//! - **GroupReconciler**: converges target groups toward source groups
//! - **AccountReconciler**: provisions missing accounts and deprovisions
//!   unknown ones after a second lookup
//! - **Plan**: operations in application order, plus planning failures
//! - **Connector**: the write side; [`DryRunConnector`] only records
//! - **Executor**: applies a plan, collecting a success/failure [`Report`]
//!
//! ## Example
//!
//! ```
//! use directory::{Account, Group, SourceDirectory, TargetDirectory};
//! use reconcile::{execute_simple, DryRunConnector, ExecuteOptions, GroupReconciler};
//!
//! let source = SourceDirectory::from_parts(
//!     [Account::new("a@example.com")],
//!     [Group::new("eng@example.com", "Engineering", "eng@example.com")
//!         .with_members([Account::new("a@example.com")])],
//! );
//! let target = TargetDirectory::new([Account::new("a@example.com")], Vec::new()).unwrap();
//!
//! let plan = GroupReconciler::new(&source, &target).reconcile_all(["eng@example.com"]);
//! let mut connector = DryRunConnector::new();
//! let summary = execute_simple(plan, &mut connector, &ExecuteOptions { dry_run: true }).unwrap();
//!
//! assert_eq!(summary.created, 2);
//! assert_eq!(connector.history().len(), 2);
//! ```
//!
//! ## Provider Traits
//!
//! - [`Connector`]: applies individual operations to the target
//! - [`ProgressCallback`]: receives progress updates
//! - [`ConfirmCallback`]: handles user confirmations

pub mod account;
pub mod connector;
pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod group;
pub mod planner;
pub mod report;
pub mod types;

// Re-export main types at crate root
pub use account::AccountReconciler;
pub use connector::{Connector, DryRunConnector};
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use diff::{group_by_name, PlanSummary};
pub use error::ReconcileError;
pub use executor::{execute, execute_simple};
pub use group::GroupReconciler;
pub use planner::Plan;
pub use report::Report;
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, GroupRef, Operation};
