//! List resource controller.
//!
//! Lists are replace-only: the slug-determining name and the mode are
//! changed by destroy-and-recreate. `mode` defaults to `public` when the
//! declaration leaves it unset.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::attr::Attr;
use crate::error::ReconcileError;
use crate::plan;
use crate::resource::{ReadOutcome, ResourceLifecycle};
use crate::session::ProviderSession;
use crate::types::TwitterList;
use crate::validate;

const DEFAULT_MODE: &str = "public";

/// Declared configuration for a list.
#[derive(Debug, Clone, Default)]
pub struct ListConfig {
    /// Name of the list; must start with a letter, 25 characters or fewer
    pub name: Attr<String>,

    /// `public` or `private`; defaults to `public`
    pub mode: Attr<String>,

    /// Free-form description
    pub description: Attr<String>,
}

/// Normalized list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub created_at: String,
    pub uri: String,
    pub subscriber_count: i64,
    pub member_count: i64,
    pub mode: String,
    pub full_name: String,
    pub description: String,
    pub user_id: i64,
}

impl ListState {
    /// The remote echoes list metadata back but may lag on the
    /// description, so the declared value is carried forward instead.
    fn from_remote(list: &TwitterList, description: String) -> Self {
        Self {
            id: list.id,
            slug: list.slug.clone(),
            name: list.name.clone(),
            created_at: list.created_at.clone(),
            uri: list.uri.clone(),
            subscriber_count: list.subscriber_count,
            member_count: list.member_count,
            mode: list.mode.clone(),
            full_name: list.full_name.clone(),
            description,
            user_id: list.user.as_ref().map_or(0, |u| u.id),
        }
    }
}

/// Controller for the list resource.
pub struct ListResource {
    session: Arc<ProviderSession>,
}

impl ListResource {
    #[must_use]
    pub const fn new(session: Arc<ProviderSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ResourceLifecycle for ListResource {
    type Config = ListConfig;
    type State = ListState;

    #[instrument(skip(self, config))]
    async fn create(&self, config: &Self::Config) -> Result<Self::State, ReconcileError> {
        let client = self.session.client()?;

        validate::list_name(&config.name)?;
        let Some(name) = config.name.value() else {
            return Err(ReconcileError::Validation {
                summary: "Missing required argument",
                detail: "name is required".into(),
            });
        };

        let mode = plan::string_default(config.mode.clone(), DEFAULT_MODE);
        let description = config.description.value().cloned();

        let list = client
            .create_list(name, mode.value().map(String::as_str), description.as_deref())
            .await
            .map_err(|e| {
                let status = e.status();
                ReconcileError::Remote {
                    summary: "Could not create list",
                    detail: format!("Could not create list, got error: {e}"),
                    status,
                }
            })?;

        let state = ListState::from_remote(&list, description.unwrap_or_default());
        debug!(user_id = state.user_id, "created list");
        Ok(state)
    }

    #[instrument(skip(self, prior), fields(id = prior.id))]
    async fn read(&self, prior: &Self::State) -> Result<ReadOutcome<Self::State>, ReconcileError> {
        let client = self.session.client()?;

        match client.show_list(prior.id).await {
            Ok(list) => Ok(ReadOutcome::Refreshed(ListState::from_remote(
                &list,
                prior.description.clone(),
            ))),
            Err(e) if e.is_not_found() => Ok(ReadOutcome::Removed),
            Err(e) => {
                let status = e.status();
                Err(ReconcileError::Remote {
                    summary: "Could not read list",
                    detail: format!("Could not read list, got error: {e}"),
                    status,
                })
            }
        }
    }

    async fn update(
        &self,
        _config: &Self::Config,
        _prior: &Self::State,
    ) -> Result<Self::State, ReconcileError> {
        Err(ReconcileError::UpdateNotSupported { resource: "list" })
    }

    #[instrument(skip(self, prior), fields(id = prior.id))]
    async fn delete(&self, prior: &Self::State) -> Result<(), ReconcileError> {
        let client = self.session.client()?;

        client.destroy_list(prior.id).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not delete list",
                detail: format!("Could not delete list, got error: {e}"),
                status,
            }
        })?;

        Ok(())
    }
}
