//! # Directory
//!
//! Read-only snapshots of the two directories a sync run works with.
//!
//! ## Core Concepts
//!
//! - **Account** / **Group**: snapshot value types; accounts are keyed by email
//! - **DirectoryProvider**: raw, paginated client for the source directory
//! - **CachingResolver**: fetches each key at most once per run
//! - **GroupFlattener**: resolves nested and organisation-wide membership
//! - **SourceDirectory** / **TargetDirectory**: the snapshots reconciliation
//!   diffs against each other
//!
//! ## Example
//!
//! ```
//! use directory::provider::MockProvider;
//! use directory::{CachingResolver, RawGroup, RawMember, RawUser, SourceDirectory};
//!
//! let mut mock = MockProvider::new();
//! mock.add_user(RawUser::new("a@example.com", "Ann", "Lee"));
//! mock.add_group(RawGroup::new("03abc", "eng@example.com", "Engineering"));
//! mock.add_member("eng@example.com", RawMember::user("a@example.com"));
//!
//! let mut resolver = CachingResolver::new(mock);
//! let source = SourceDirectory::load(&mut resolver, &["eng@example.com"]).unwrap();
//! assert_eq!(source.group("03abc").unwrap().members.len(), 1);
//! ```

pub mod cache;
pub mod email;
pub mod error;
pub mod export;
pub mod flatten;
pub mod model;
pub mod provider;
pub mod source;
pub mod target;

pub use cache::CachingResolver;
pub use email::{EmailIndex, EmailKind, EmailResolver};
pub use error::{Error, ErrorCategory, Result};
pub use export::{SourceExport, TargetExport};
pub use flatten::GroupFlattener;
pub use model::{Account, Group, MemberKind, MemberSet, RawGroup, RawMember, RawUser};
pub use provider::{DirectoryProvider, MockProvider, Page, TargetProvider};
pub use source::SourceDirectory;
pub use target::TargetDirectory;
