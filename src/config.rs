//! Provider configuration and credential resolution.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::attr::Attr;
use crate::error::{CredentialField, ReconcileError};

/// Environment variables consulted when a credential is not set explicitly.
pub const ENV_API_KEY: &str = "TWITTER_API_KEY";
pub const ENV_API_SECRET_KEY: &str = "TWITTER_API_SECRET_KEY";
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// Configuration for the provider session.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Twitter API key
    pub api_key: Attr<String>,

    /// Twitter API secret key
    pub api_secret_key: Attr<String>,

    /// Twitter access token
    pub access_token: Attr<String>,

    /// Twitter access token secret
    pub access_token_secret: Attr<String>,

    /// Base URL for the Twitter API (default: https://api.twitter.com)
    pub api_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Transport retry configuration
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: Attr::Null,
            api_secret_key: Attr::Null,
            access_token: Attr::Null,
            access_token_secret: Attr::Null,
            api_url: default_api_url(),
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Resolve the four credential fields.
    ///
    /// Each value is taken from explicit configuration when concretely
    /// set, otherwise from its environment variable. An empty result
    /// after both lookups is fatal.
    pub fn resolve_credentials(&self) -> Result<Credentials, ReconcileError> {
        Ok(Credentials {
            api_key: resolve(&self.api_key, ENV_API_KEY, CredentialField::ApiKey)?,
            api_secret_key: resolve(
                &self.api_secret_key,
                ENV_API_SECRET_KEY,
                CredentialField::ApiSecretKey,
            )?,
            access_token: resolve(
                &self.access_token,
                ENV_ACCESS_TOKEN,
                CredentialField::AccessToken,
            )?,
            access_token_secret: resolve(
                &self.access_token_secret,
                ENV_ACCESS_TOKEN_SECRET,
                CredentialField::AccessTokenSecret,
            )?,
        })
    }
}

fn resolve(
    value: &Attr<String>,
    env_var: &str,
    field: CredentialField,
) -> Result<String, ReconcileError> {
    let resolved = match value.value() {
        Some(v) => v.clone(),
        None => env::var(env_var).unwrap_or_default(),
    };

    if resolved.is_empty() {
        Err(ReconcileError::MissingCredential(field))
    } else {
        Ok(resolved)
    }
}

fn default_api_url() -> String {
    "https://api.twitter.com".into()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Resolved, non-empty credential values.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret_key: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Transport retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per request
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay between retries in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit_config() -> ProviderConfig {
        ProviderConfig {
            api_key: Attr::str("key"),
            api_secret_key: Attr::str("secret"),
            access_token: Attr::str("token"),
            access_token_secret: Attr::str("token_secret"),
            ..Default::default()
        }
    }

    #[test]
    fn explicit_values_win() {
        let creds = explicit_config().resolve_credentials().unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.access_token_secret, "token_secret");
    }

    #[test]
    fn missing_credential_is_fatal() {
        let config = ProviderConfig {
            api_secret_key: Attr::str(""),
            ..explicit_config()
        };

        let err = config.resolve_credentials().unwrap_err();
        let diag = err.diagnostic();
        assert_eq!(diag.summary, "Missing Twitter API secret key");
        assert!(diag.detail.contains("will not be able to function"));
    }

    #[test]
    fn environment_fills_null_credentials() {
        // Only this test touches the variable; the others resolve
        // explicit values and never consult the environment.
        env::set_var("TWITTER_ACCESS_TOKEN", "from-env");
        let config = ProviderConfig {
            access_token: Attr::Null,
            ..explicit_config()
        };

        let creds = config.resolve_credentials().unwrap();
        assert_eq!(creds.access_token, "from-env");
        env::remove_var("TWITTER_ACCESS_TOKEN");
    }
}
