//! Twitter resource reconciliation engine.
//!
//! Reconciles declared configuration for Twitter entities against the live
//! state of the API, producing idempotent create/read/update/delete
//! operations per resource type.
//!
//! ## Resources
//!
//! - [`resource::TweetResource`] - tweets (replace-only)
//! - [`resource::ListResource`] - lists (replace-only, `mode` defaults to public)
//! - [`resource::FollowResource`] - follow relationships (replace-only,
//!   eventual-consistency delete)
//! - [`resource::ProfileResource`] - the authenticated account's profile
//!   fields (mutable in place)
//! - [`resource::UserLookup`] / [`resource::TweetLookup`] - read-only lookups
//!
//! Every operation requires a configured [`session::ProviderSession`];
//! credentials resolve from explicit configuration or the `TWITTER_*`
//! environment variables.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod attr;
pub mod client;
pub mod config;
pub mod error;
mod oauth;
pub mod plan;
pub mod resource;
pub mod retry;
pub mod session;
pub mod types;
pub mod validate;

pub use attr::Attr;
pub use config::{ProviderConfig, RetryConfig};
pub use error::{ApiError, Diagnostic, ReconcileError};
pub use resource::{ReadOutcome, ResourceLifecycle};
pub use session::ProviderSession;
