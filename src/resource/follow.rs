//! Follow-relationship resource controller.
//!
//! The target identity is immutable, so the resource is replace-only.
//! Unfollow is eventually consistent on the remote side: delete is not
//! complete until a confirmation read stops reporting the relationship.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::attr::Attr;
use crate::client::UserRef;
use crate::error::{ApiError, ReconcileError};
use crate::resource::{ReadOutcome, ResourceLifecycle};
use crate::retry::{converge, Convergence, ConvergePolicy};
use crate::session::ProviderSession;
use crate::types::User;

/// Declared configuration for a follow relationship.
///
/// Exactly one of `screen_name` and `user_id` identifies the target.
#[derive(Debug, Clone, Default)]
pub struct FollowConfig {
    pub screen_name: Attr<String>,
    pub user_id: Attr<i64>,
}

impl FollowConfig {
    fn target(&self) -> Result<UserRef, ReconcileError> {
        match (self.screen_name.value(), self.user_id.value()) {
            (Some(name), None) => Ok(UserRef::ScreenName(name.clone())),
            (None, Some(id)) => Ok(UserRef::Id(*id)),
            _ => Err(ReconcileError::Validation {
                summary: "Could not follow user",
                detail: "Must specify either screen_name or user_id".into(),
            }),
        }
    }
}

/// Normalized follow-relationship state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowState {
    /// The followed user's id
    pub id: i64,
    pub screen_name: String,
    pub user_id: i64,
    /// Whether the follow is pending the target's approval
    pub pending: bool,
}

impl FollowState {
    fn from_remote(user: &User) -> Self {
        Self {
            id: user.id,
            screen_name: user.screen_name.clone(),
            user_id: user.id,
            pending: user.follow_request_sent.unwrap_or(false),
        }
    }
}

/// Controller for the follow resource.
pub struct FollowResource {
    session: Arc<ProviderSession>,
    converge_policy: ConvergePolicy,
    cancel: CancellationToken,
}

impl FollowResource {
    #[must_use]
    pub fn new(session: Arc<ProviderSession>) -> Self {
        Self {
            session,
            converge_policy: ConvergePolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the unfollow confirmation schedule.
    #[must_use]
    pub fn with_converge_policy(mut self, policy: ConvergePolicy) -> Self {
        self.converge_policy = policy;
        self
    }

    /// Attach a cancellation token checked between confirmation polls.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[async_trait]
impl ResourceLifecycle for FollowResource {
    type Config = FollowConfig;
    type State = FollowState;

    #[instrument(skip(self, config))]
    async fn create(&self, config: &Self::Config) -> Result<Self::State, ReconcileError> {
        let client = self.session.client()?;
        let target = config.target()?;

        let user = client.create_friendship(&target).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not follow user",
                detail: format!("Unable to follow user, got error {e}"),
                status,
            }
        })?;

        Ok(FollowState::from_remote(&user))
    }

    #[instrument(skip(self, prior), fields(user_id = prior.user_id))]
    async fn read(&self, prior: &Self::State) -> Result<ReadOutcome<Self::State>, ReconcileError> {
        let client = self.session.client()?;

        let user = match client.show_user(&UserRef::Id(prior.user_id)).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Ok(ReadOutcome::Removed),
            Err(e) => {
                let status = e.status();
                return Err(ReconcileError::Remote {
                    summary: "Could not read profile",
                    detail: format!("Unable to read profile, got error {e}"),
                    status,
                });
            }
        };

        // Neither following nor pending: the relationship is gone. This is
        // absence detection, not a failure.
        if !user.relationship_exists() {
            return Ok(ReadOutcome::Removed);
        }

        Ok(ReadOutcome::Refreshed(FollowState::from_remote(&user)))
    }

    async fn update(
        &self,
        _config: &Self::Config,
        _prior: &Self::State,
    ) -> Result<Self::State, ReconcileError> {
        Err(ReconcileError::UpdateNotSupported { resource: "follow" })
    }

    #[instrument(skip(self, prior), fields(user_id = prior.user_id))]
    async fn delete(&self, prior: &Self::State) -> Result<(), ReconcileError> {
        let client = self.session.client()?;
        let target = UserRef::Id(prior.user_id);

        client.destroy_friendship(&target).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not unfollow user",
                detail: format!("Unable to unfollow user, got error {e}"),
                status,
            }
        })?;

        // The remote may keep reporting the relationship for a while after
        // the destroy call; the delete only completes once a read confirms
        // it is gone.
        let outcome = converge(&self.converge_policy, &self.cancel, || {
            let client = Arc::clone(&client);
            let target = target.clone();
            async move {
                let user = client.show_user(&target).await?;
                Ok::<_, ApiError>(!user.relationship_exists())
            }
        })
        .await;

        match outcome {
            Convergence::Converged => Ok(()),
            Convergence::TimedOut => Err(ReconcileError::ConvergenceTimeout {
                summary: "Could not unfollow user",
            }),
            Convergence::Failed(e) => {
                let status = e.status();
                Err(ReconcileError::Remote {
                    summary: "Could not unfollow user",
                    detail: format!("Unable to unfollow user, got error {e}"),
                    status,
                })
            }
        }
    }
}
