//! # Teamapi
//!
//! Blocking client for the team admin API used as the sync target.
//!
//! - [`TeamClient`] implements [`directory::TargetProvider`], so a
//!   [`directory::TargetDirectory`] can be loaded straight from the API.
//! - [`TeamConnector`] implements [`reconcile::Connector`] for live runs.
//! - [`token`] finds the access token.

pub mod client;
pub mod connector;
pub mod error;
pub mod listing;
pub mod token;
pub mod types;

pub use client::{DEFAULT_API_BASE, TeamClient};
pub use connector::TeamConnector;
pub use error::{Error, Result};
pub use token::{TOKEN_ENV, resolve_token};
