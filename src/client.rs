//! Twitter REST API client (v1.1).
//!
//! Every method issues one signed request and surfaces the HTTP status on
//! API failures so callers can distinguish not-found from other errors.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{Credentials, ProviderConfig};
use crate::error::ApiError;
use crate::oauth::{percent_encode, RequestSigner};
use crate::types::{Tweet, TwitterList, User};

/// Identity of a remote user, by id or screen name.
#[derive(Debug, Clone)]
pub enum UserRef {
    Id(i64),
    ScreenName(String),
}

impl UserRef {
    fn push_param(&self, params: &mut Vec<(String, String)>) {
        match self {
            Self::Id(id) => params.push(("user_id".into(), id.to_string())),
            Self::ScreenName(name) => params.push(("screen_name".into(), name.clone())),
        }
    }
}

/// Profile fields to send to `account/update_profile`.
///
/// `None` leaves the remote field untouched; an empty string clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Authenticated client for the Twitter v1.1 REST API.
#[derive(Debug)]
pub struct TwitterApiClient {
    http: Client,
    base_url: String,
    signer: RequestSigner,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl TwitterApiClient {
    /// Build a client from resolved credentials and provider configuration.
    pub fn new(credentials: Credentials, config: &ProviderConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("twitter-reconcile/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            signer: RequestSigner::new(credentials),
            max_attempts: config.retry.max_attempts,
            initial_delay: Duration::from_millis(config.retry.initial_delay_ms),
            max_delay: Duration::from_millis(config.retry.max_delay_ms),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        self.request("GET", endpoint, params).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        self.request("POST", endpoint, params).await
    }

    #[instrument(skip(self, params))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        // Parameters are percent-encoded with the OAuth set so the query
        // string matches the signature base string byte for byte.
        let full_url = if params.is_empty() {
            url.clone()
        } else {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{url}?{query}")
        };

        let mut delay = self.initial_delay;
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, method, endpoint, "Twitter API request");

            let auth_header = self.signer.authorization_header(method, &url, params)?;

            let req = match method {
                "POST" => self.http.post(&full_url),
                _ => self.http.get(&full_url),
            };

            let result = match req.header("Authorization", &auth_header).send().await {
                Ok(response) => Self::handle_response(response).await,
                Err(e) => Err(ApiError::Http(e)),
            };

            match result {
                Err(e) if e.is_retryable() && attempts < self.max_attempts => {
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Retrying Twitter API request"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.max_delay);
                }
                other => return other,
            }
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(ApiError::from);
        }

        // v1.1 error envelope: {"errors": [{"code": 34, "message": "..."}]}
        #[derive(serde::Deserialize, Default)]
        struct ErrorBody {
            #[serde(default)]
            errors: Vec<ErrorEntry>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorEntry {
            #[serde(default)]
            message: String,
        }

        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        let message = body
            .errors
            .into_iter()
            .map(|e| e.message)
            .find(|m| !m.is_empty())
            .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());

        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Statuses
    // ─────────────────────────────────────────────────────────────────────

    /// Post a new tweet.
    pub async fn post_tweet(&self, text: &str) -> Result<Tweet, ApiError> {
        let params = vec![
            ("status".to_string(), text.to_string()),
            ("trim_user".to_string(), "true".to_string()),
        ];
        self.post("/1.1/statuses/update.json", &params).await
    }

    /// Fetch a tweet by id.
    pub async fn show_tweet(&self, id: i64) -> Result<Tweet, ApiError> {
        let params = vec![
            ("id".to_string(), id.to_string()),
            ("trim_user".to_string(), "true".to_string()),
            ("include_entities".to_string(), "false".to_string()),
        ];
        self.get("/1.1/statuses/show.json", &params).await
    }

    /// Delete a tweet by id.
    pub async fn destroy_tweet(&self, id: i64) -> Result<Tweet, ApiError> {
        let params = vec![("trim_user".to_string(), "true".to_string())];
        self.post(&format!("/1.1/statuses/destroy/{id}.json"), &params)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Users and friendships
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch a user by id or screen name.
    pub async fn show_user(&self, target: &UserRef) -> Result<User, ApiError> {
        let mut params = vec![("include_entities".to_string(), "false".to_string())];
        target.push_param(&mut params);
        self.get("/1.1/users/show.json", &params).await
    }

    /// Follow a user.
    pub async fn create_friendship(&self, target: &UserRef) -> Result<User, ApiError> {
        let mut params = vec![("follow".to_string(), "true".to_string())];
        target.push_param(&mut params);
        self.post("/1.1/friendships/create.json", &params).await
    }

    /// Unfollow a user.
    pub async fn destroy_friendship(&self, target: &UserRef) -> Result<User, ApiError> {
        let mut params = Vec::new();
        target.push_param(&mut params);
        self.post("/1.1/friendships/destroy.json", &params).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lists
    // ─────────────────────────────────────────────────────────────────────

    /// Create a list.
    pub async fn create_list(
        &self,
        name: &str,
        mode: Option<&str>,
        description: Option<&str>,
    ) -> Result<TwitterList, ApiError> {
        let mut params = vec![("name".to_string(), name.to_string())];
        if let Some(mode) = mode {
            params.push(("mode".to_string(), mode.to_string()));
        }
        if let Some(description) = description {
            params.push(("description".to_string(), description.to_string()));
        }
        self.post("/1.1/lists/create.json", &params).await
    }

    /// Fetch a list by id.
    pub async fn show_list(&self, id: i64) -> Result<TwitterList, ApiError> {
        let params = vec![("list_id".to_string(), id.to_string())];
        self.get("/1.1/lists/show.json", &params).await
    }

    /// Delete a list by id.
    pub async fn destroy_list(&self, id: i64) -> Result<TwitterList, ApiError> {
        let params = vec![("list_id".to_string(), id.to_string())];
        self.post("/1.1/lists/destroy.json", &params).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Account
    // ─────────────────────────────────────────────────────────────────────

    /// Update the authenticated user's profile fields.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let mut params = Vec::new();
        if let Some(name) = &update.name {
            params.push(("name".to_string(), name.clone()));
        }
        if let Some(url) = &update.url {
            params.push(("url".to_string(), url.clone()));
        }
        if let Some(location) = &update.location {
            params.push(("location".to_string(), location.clone()));
        }
        if let Some(description) = &update.description {
            params.push(("description".to_string(), description.clone()));
        }
        self.post("/1.1/account/update_profile.json", &params).await
    }
}
