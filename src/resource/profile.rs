//! Profile resource controller.
//!
//! The authenticated account's profile fields are freely mutable, so this
//! is the one resource updated in place. The remote returns profile URLs
//! in shortened form; after every write the URL is reconciled against the
//! declared value so auto-shortening does not show up as drift.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, StatusCode};
use tracing::{debug, instrument};

use crate::attr::Attr;
use crate::client::{ProfileUpdate, UserRef};
use crate::error::ReconcileError;
use crate::resource::{ReadOutcome, ResourceLifecycle};
use crate::session::ProviderSession;
use crate::types::User;
use crate::validate;

/// Declared configuration for the profile.
///
/// A null field is left untouched on the remote side. The name must be
/// non-blank; the URL, when present, must parse.
#[derive(Debug, Clone, Default)]
pub struct ProfileConfig {
    pub name: Attr<String>,
    pub url: Attr<String>,
    pub location: Attr<String>,
    pub description: Attr<String>,
}

impl ProfileConfig {
    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name.value().cloned(),
            url: self.url.value().cloned(),
            location: self.location.value().cloned(),
            description: self.description.value().cloned(),
        }
    }

    fn declared_url(&self) -> String {
        self.url.value_or(String::new())
    }
}

/// Normalized profile state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    /// The owning user's id
    pub id: i64,
    pub name: String,
    pub url: String,
    pub location: String,
    pub description: String,
}

impl ProfileState {
    fn from_remote(user: &User, url: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            url,
            location: user.location.clone().unwrap_or_default(),
            description: user.description.clone().unwrap_or_default(),
        }
    }
}

/// Controller for the profile resource.
pub struct ProfileResource {
    session: Arc<ProviderSession>,
}

impl ProfileResource {
    #[must_use]
    pub const fn new(session: Arc<ProviderSession>) -> Self {
        Self { session }
    }

    fn validate(config: &ProfileConfig) -> Result<(), ReconcileError> {
        validate::non_blank_name(&config.name)?;
        validate::valid_url(&config.url)
    }
}

/// Resolve the remote's rendering of the profile URL against the declared
/// value.
///
/// The remote echoes a shortened URL that 301-redirects to the real
/// target. When the redirect target is an extension of the declared URL,
/// the declared form is reported so the shortening never reads as drift;
/// any other redirect target is reported verbatim. Failures here degrade
/// to an empty URL and never block the surrounding operation.
async fn resolve_url(remote_url: &str, declared_url: &str) -> String {
    if remote_url.is_empty() {
        return String::new();
    }

    let Ok(probe) = Client::builder()
        .redirect(redirect::Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
    else {
        return String::new();
    };

    let Ok(response) = probe.get(remote_url).send().await else {
        debug!(remote_url, "profile URL probe failed");
        return String::new();
    };

    if response.status() != StatusCode::MOVED_PERMANENTLY {
        return remote_url.to_string();
    }

    match response.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
        Some(target) if !declared_url.is_empty() && target.starts_with(declared_url) => {
            declared_url.to_string()
        }
        Some(target) => target.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl ResourceLifecycle for ProfileResource {
    type Config = ProfileConfig;
    type State = ProfileState;

    #[instrument(skip(self, config))]
    async fn create(&self, config: &Self::Config) -> Result<Self::State, ReconcileError> {
        let client = self.session.client()?;
        Self::validate(config)?;

        let user = client.update_profile(&config.to_update()).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not update profile",
                detail: format!("Unable to update profile, got error {e}"),
                status,
            }
        })?;

        let url = resolve_url(
            user.url.as_deref().unwrap_or_default(),
            &config.declared_url(),
        )
        .await;
        Ok(ProfileState::from_remote(&user, url))
    }

    #[instrument(skip(self, prior), fields(id = prior.id))]
    async fn read(&self, prior: &Self::State) -> Result<ReadOutcome<Self::State>, ReconcileError> {
        let client = self.session.client()?;

        let user = match client
            .show_user(&UserRef::Id(prior.id))
            .await
        {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Ok(ReadOutcome::Removed),
            Err(e) => {
                let status = e.status();
                return Err(ReconcileError::Remote {
                    summary: "Could not read user",
                    detail: format!("Unable to read user, got error: {e}"),
                    status,
                });
            }
        };

        let url = resolve_url(user.url.as_deref().unwrap_or_default(), &prior.url).await;
        Ok(ReadOutcome::Refreshed(ProfileState::from_remote(&user, url)))
    }

    #[instrument(skip(self, config, prior), fields(id = prior.id))]
    async fn update(
        &self,
        config: &Self::Config,
        prior: &Self::State,
    ) -> Result<Self::State, ReconcileError> {
        let client = self.session.client()?;
        Self::validate(config)?;

        client.update_profile(&config.to_update()).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not update profile",
                detail: format!("Unable to update profile, got error {e}"),
                status,
            }
        })?;

        // The update response does not carry the redirect-resolved URL
        // entities, so refresh through the read endpoint and merge the
        // declared URL forward.
        let user = client
            .show_user(&UserRef::Id(prior.id))
            .await
            .map_err(|e| {
                let status = e.status();
                ReconcileError::Remote {
                    summary: "Could not read user",
                    detail: format!("Unable to read user, got error: {e}"),
                    status,
                }
            })?;

        let url = resolve_url(
            user.url.as_deref().unwrap_or_default(),
            &config.declared_url(),
        )
        .await;
        Ok(ProfileState::from_remote(&user, url))
    }

    #[instrument(skip(self, prior), fields(id = prior.id))]
    async fn delete(&self, prior: &Self::State) -> Result<(), ReconcileError> {
        let client = self.session.client()?;

        // Clearing the settable fields is the closest the API offers to
        // deleting a profile.
        let clear = ProfileUpdate {
            name: None,
            url: Some(String::new()),
            location: Some(String::new()),
            description: Some(String::new()),
        };

        client.update_profile(&clear).await.map_err(|e| {
            let status = e.status();
            ReconcileError::Remote {
                summary: "Could not delete profile",
                detail: format!("Unable to delete profile, got error {e}"),
                status,
            }
        })?;

        debug!(id = prior.id, "cleared profile fields");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::testutil::ready_session;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profile_body(url: Option<&str>, location: &str, description: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 42,
            "screen_name": "acc",
            "name": "acc name",
            "url": url,
            "location": location,
            "description": description
        })
    }

    #[tokio::test]
    async fn create_with_empty_url_reports_empty_url() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1.1/account/update_profile.json"))
            .and(query_param("location", "Goland"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(profile_body(None, "Goland", "bio")),
            )
            .mount(&mock_server)
            .await;

        let controller = ProfileResource::new(ready_session(&mock_server).await);
        let state = controller
            .create(&ProfileConfig {
                name: Attr::str("acc name"),
                location: Attr::str("Goland"),
                description: Attr::str("bio"),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(state.id, 42);
        assert_eq!(state.url, "");
        assert_eq!(state.location, "Goland");
    }

    #[tokio::test]
    async fn blank_name_rejected_before_any_network_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let controller = ProfileResource::new(ready_session(&mock_server).await);
        let err = controller
            .create(&ProfileConfig {
                name: Attr::str(""),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Name can't be blank."));
    }

    #[tokio::test]
    async fn invalid_url_rejected_before_any_network_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let controller = ProfileResource::new(ready_session(&mock_server).await);
        let err = controller
            .create(&ProfileConfig {
                name: Attr::str("acc"),
                url: Attr::str("invalid url"),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("The URL is not a valid URL"));
    }

    #[tokio::test]
    async fn update_rereads_and_reconciles() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1.1/account/update_profile.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(profile_body(None, "old", "old bio")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/users/show.json"))
            .and(query_param("user_id", "42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(profile_body(None, "Goland", "new bio")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = ProfileResource::new(ready_session(&mock_server).await);
        let prior = ProfileState {
            id: 42,
            name: "acc name".into(),
            url: String::new(),
            location: "old".into(),
            description: "old bio".into(),
        };

        let state = controller
            .update(
                &ProfileConfig {
                    name: Attr::str("acc name"),
                    location: Attr::str("Goland"),
                    description: Attr::str("new bio"),
                    ..Default::default()
                },
                &prior,
            )
            .await
            .unwrap();

        assert_eq!(state.location, "Goland");
        assert_eq!(state.description, "new bio");
        assert_eq!(state.url, "");
    }

    #[tokio::test]
    async fn delete_clears_settable_fields() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1.1/account/update_profile.json"))
            .and(query_param("url", ""))
            .and(query_param("location", ""))
            .and(query_param("description", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body(None, "", "")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = ProfileResource::new(ready_session(&mock_server).await);
        controller
            .delete(&ProfileState {
                id: 42,
                name: "acc name".into(),
                url: String::new(),
                location: "Goland".into(),
                description: "bio".into(),
            })
            .await
            .unwrap();
    }

    // ─────────────────────────────────────────────────────────────────────
    // URL reconciliation
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn redirect_onto_declared_url_reports_declared_form() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/short"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "http://declared/x"),
            )
            .mount(&mock_server)
            .await;

        let remote = format!("{}/short", mock_server.uri());
        assert_eq!(resolve_url(&remote, "http://declared").await, "http://declared");
    }

    #[tokio::test]
    async fn redirect_elsewhere_is_reported_verbatim() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/short"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "http://other"))
            .mount(&mock_server)
            .await;

        let remote = format!("{}/short", mock_server.uri());
        assert_eq!(resolve_url(&remote, "http://declared").await, "http://other");
    }

    #[tokio::test]
    async fn non_redirect_keeps_remote_url() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let remote = format!("{}/direct", mock_server.uri());
        assert_eq!(resolve_url(&remote, "http://declared").await, remote);
    }

    #[tokio::test]
    async fn probe_failure_degrades_to_empty_url() {
        // Nothing listens on this address; the probe must soft-fail.
        assert_eq!(resolve_url("http://127.0.0.1:1/short", "http://declared").await, "");
    }
}
