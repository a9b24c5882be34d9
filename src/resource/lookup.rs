//! Read-only lookups.
//!
//! Unlike the lifecycle resources these track no state: a lookup is a
//! single normalized read, and a transport failure is always an error.

use std::sync::Arc;

use tracing::instrument;

use crate::attr::Attr;
use crate::client::UserRef;
use crate::error::ReconcileError;
use crate::resource::tweet::TweetState;
use crate::session::ProviderSession;
use crate::types::User;

/// Query for a user lookup; one of `id` and `screen_name` is required.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub id: Attr<i64>,
    pub screen_name: Attr<String>,
}

/// Normalized user attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub id: i64,
    pub screen_name: String,
    pub name: String,
    pub location: String,
    pub url: String,
    pub description: String,
    pub protected: bool,
    pub verified: bool,
    pub followers_count: i64,
    pub friends_count: i64,
    pub statuses_count: i64,
    pub favorites_count: i64,
    pub profile_banner_url: String,
    pub profile_image_url: String,
    pub default_profile: bool,
    pub default_profile_image: bool,
}

impl UserState {
    fn from_remote(user: &User) -> Self {
        Self {
            id: user.id,
            screen_name: user.screen_name.clone(),
            name: user.name.clone(),
            location: user.location.clone().unwrap_or_default(),
            url: user.url.clone().unwrap_or_default(),
            description: user.description.clone().unwrap_or_default(),
            protected: user.protected,
            verified: user.verified,
            followers_count: user.followers_count,
            friends_count: user.friends_count,
            statuses_count: user.statuses_count,
            favorites_count: user.favourites_count,
            profile_banner_url: user.profile_banner_url.clone().unwrap_or_default(),
            profile_image_url: user.profile_image_url_https.clone().unwrap_or_default(),
            default_profile: user.default_profile,
            default_profile_image: user.default_profile_image,
        }
    }
}

/// Read-only user lookup.
pub struct UserLookup {
    session: Arc<ProviderSession>,
}

impl UserLookup {
    #[must_use]
    pub const fn new(session: Arc<ProviderSession>) -> Self {
        Self { session }
    }

    #[instrument(skip(self, query))]
    pub async fn read(&self, query: &UserQuery) -> Result<UserState, ReconcileError> {
        let client = self.session.client()?;

        let target = if let Some(id) = query.id.value() {
            UserRef::Id(*id)
        } else if let Some(name) = query.screen_name.value() {
            UserRef::ScreenName(name.clone())
        } else {
            return Err(ReconcileError::Validation {
                summary: "Missing required argument",
                detail: "Either a id or screen_name is required, but no definition was found."
                    .into(),
            });
        };

        let user = client.show_user(&target).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not read user",
                detail: format!("Unable to read user, got error: {e}"),
                status,
            }
        })?;

        Ok(UserState::from_remote(&user))
    }
}

/// Read-only tweet lookup.
pub struct TweetLookup {
    session: Arc<ProviderSession>,
}

impl TweetLookup {
    #[must_use]
    pub const fn new(session: Arc<ProviderSession>) -> Self {
        Self { session }
    }

    #[instrument(skip(self))]
    pub async fn read(&self, id: i64) -> Result<TweetState, ReconcileError> {
        let client = self.session.client()?;

        let tweet = client.show_tweet(id).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not read tweet",
                detail: format!("Unable to read tweet, got error: {e}"),
                status,
            }
        })?;

        Ok(TweetState::from_remote(&tweet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::testutil::{ready_session, unconfigured_session};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn user_lookup_requires_an_identity() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let lookup = UserLookup::new(ready_session(&mock_server).await);
        let err = lookup.read(&UserQuery::default()).await.unwrap_err();

        let diag = err.diagnostic();
        assert_eq!(diag.summary, "Missing required argument");
        assert!(diag.detail.contains("Either a id or screen_name is required"));
    }

    #[tokio::test]
    async fn user_lookup_normalizes_full_attribute_set() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1/users/show.json"))
            .and(query_param("screen_name", "gopher"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 7,
                "screen_name": "gopher",
                "name": "The Gopher",
                "location": "Underground",
                "url": "https://go.dev",
                "description": "mascot",
                "protected": false,
                "verified": true,
                "followers_count": 1000,
                "friends_count": 10,
                "statuses_count": 200,
                "favourites_count": 5,
                "profile_image_url_https": "https://img/avatar.png",
                "default_profile": true,
                "default_profile_image": false
            })))
            .mount(&mock_server)
            .await;

        let lookup = UserLookup::new(ready_session(&mock_server).await);
        let user = lookup
            .read(&UserQuery {
                screen_name: Attr::str("gopher"),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.name, "The Gopher");
        assert_eq!(user.favorites_count, 5);
        assert_eq!(user.profile_image_url, "https://img/avatar.png");
        assert!(user.verified);
        assert_eq!(user.profile_banner_url, "");
    }

    #[tokio::test]
    async fn tweet_lookup_reads_by_id() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1/statuses/show.json"))
            .and(query_param("id", "1001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1001,
                "text": "looked up",
                "user": {"id": 7},
                "retweet_count": 3
            })))
            .mount(&mock_server)
            .await;

        let lookup = TweetLookup::new(ready_session(&mock_server).await);
        let tweet = lookup.read(1001).await.unwrap();
        assert_eq!(tweet.text, "looked up");
        assert_eq!(tweet.retweet_count, 3);
    }

    #[tokio::test]
    async fn lookup_requires_configured_provider() {
        let lookup = TweetLookup::new(unconfigured_session());
        let err = lookup.read(1).await.unwrap_err();
        assert!(matches!(err, ReconcileError::NotConfigured));
    }
}
