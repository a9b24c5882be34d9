//! Tweet resource controller.
//!
//! Tweets are replace-only: the text is immutable after create, so any
//! change is a destroy-and-recreate driven by the plan layer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::attr::Attr;
use crate::error::ReconcileError;
use crate::resource::{ReadOutcome, ResourceLifecycle};
use crate::session::ProviderSession;
use crate::types::Tweet;
use crate::validate;

/// Declared configuration for a tweet.
#[derive(Debug, Clone, Default)]
pub struct TweetConfig {
    /// UTF-8 text of the status update; 1 to 280 characters
    pub text: Attr<String>,
}

/// Normalized tweet state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetState {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub source: String,
    pub in_reply_to_status_id: i64,
    pub in_reply_to_user_id: i64,
    pub quoted_status_id: i64,
    pub quote_count: i64,
    pub reply_count: i64,
    pub retweet_count: i64,
    pub favorite_count: i64,
    pub possibly_sensitive: bool,
    pub lang: String,
}

impl TweetState {
    pub(crate) fn from_remote(tweet: &Tweet) -> Self {
        Self {
            id: tweet.id,
            text: tweet.text.clone(),
            user_id: tweet.user.as_ref().map_or(0, |u| u.id),
            source: tweet.source.clone(),
            in_reply_to_status_id: tweet.in_reply_to_status_id.unwrap_or(0),
            in_reply_to_user_id: tweet.in_reply_to_user_id.unwrap_or(0),
            quoted_status_id: tweet.quoted_status_id.unwrap_or(0),
            quote_count: tweet.quote_count,
            reply_count: tweet.reply_count,
            retweet_count: tweet.retweet_count,
            favorite_count: tweet.favorite_count,
            possibly_sensitive: tweet.possibly_sensitive.unwrap_or(false),
            lang: tweet.lang.clone().unwrap_or_default(),
        }
    }
}

/// Controller for the tweet resource.
pub struct TweetResource {
    session: Arc<ProviderSession>,
}

impl TweetResource {
    #[must_use]
    pub const fn new(session: Arc<ProviderSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ResourceLifecycle for TweetResource {
    type Config = TweetConfig;
    type State = TweetState;

    #[instrument(skip(self, config))]
    async fn create(&self, config: &Self::Config) -> Result<Self::State, ReconcileError> {
        let client = self.session.client()?;

        validate::tweet_length(&config.text)?;
        let Some(text) = config.text.value() else {
            return Err(ReconcileError::Validation {
                summary: "Missing required argument",
                detail: "text is required".into(),
            });
        };

        let tweet = client.post_tweet(text).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not create tweet",
                detail: format!("Unable to create tweet, got error {e}"),
                status,
            }
        })?;

        Ok(TweetState::from_remote(&tweet))
    }

    #[instrument(skip(self, prior), fields(id = prior.id))]
    async fn read(&self, prior: &Self::State) -> Result<ReadOutcome<Self::State>, ReconcileError> {
        let client = self.session.client()?;

        match client.show_tweet(prior.id).await {
            Ok(tweet) => Ok(ReadOutcome::Refreshed(TweetState::from_remote(&tweet))),
            Err(e) if e.is_not_found() => Ok(ReadOutcome::Removed),
            Err(e) => {
                let status = e.status();
                Err(ReconcileError::Remote {
                    summary: "Could not read tweet",
                    detail: format!("Unable to read tweet, got error: {e}"),
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
        Err(ReconcileError::UpdateNotSupported { resource: "tweet" })
    }

    #[instrument(skip(self, prior), fields(id = prior.id))]
    async fn delete(&self, prior: &Self::State) -> Result<(), ReconcileError> {
        let client = self.session.client()?;

        client.destroy_tweet(prior.id).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not delete tweet",
                detail: format!("Unable to delete tweet with ID {}, got error: {e}", prior.id),
                status,
            }
        })?;

        Ok(())
    }
}
