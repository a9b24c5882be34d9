//! Resource lifecycle controllers.
//!
//! One controller per entity type, all implementing the same contract:
//! plan-time validation feeds a create/read/update/delete state machine
//! against the remote API. Read distinguishes drift correction from
//! absence detection: a remote payload that no longer satisfies the
//! resource's existence predicate (or a transport-level not-found) means
//! the tracked state should be removed, not that the operation failed.

mod follow;
mod list;
mod lookup;
mod profile;
mod tweet;

pub use follow::{FollowConfig, FollowResource, FollowState};
pub use list::{ListConfig, ListResource, ListState};
pub use lookup::{TweetLookup, UserLookup, UserQuery, UserState};
pub use profile::{ProfileConfig, ProfileResource, ProfileState};
pub use tweet::{TweetConfig, TweetResource, TweetState};

use async_trait::async_trait;

use crate::error::ReconcileError;


/// Result of refreshing tracked state from the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<S> {
    /// Fresh normalized state, fully overwriting the prior version.
    Refreshed(S),

    /// The entity no longer exists remotely; drop it from tracked state.
    Removed,
}

/// Uniform lifecycle contract across entity types.
#[async_trait]
pub trait ResourceLifecycle {
    type Config: Send + Sync;
    type State: Send + Sync;

    /// Create the remote entity from declared configuration.
    async fn create(&self, config: &Self::Config) -> Result<Self::State, ReconcileError>;

    /// Refresh tracked state from the remote, or detect absence.
    async fn read(&self, prior: &Self::State) -> Result<ReadOutcome<Self::State>, ReconcileError>;

    /// Change the remote entity in place.
    ///
    /// Replace-only resources reject this unconditionally; the only legal
    /// path to change their attributes is destroy and recreate.
    async fn update(
        &self,
        config: &Self::Config,
        prior: &Self::State,
    ) -> Result<Self::State, ReconcileError>;

    /// Destroy the remote entity.
    async fn delete(&self, prior: &Self::State) -> Result<(), ReconcileError>;
}
