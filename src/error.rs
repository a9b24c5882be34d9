//! Error types for the remote client and the reconciliation surface.
//!
//! Two layers, mirroring the transport/surface split: [`ApiError`] is what
//! the HTTP client produces, [`ReconcileError`] is what resource
//! operations surface to the host orchestrator. Every user-facing failure
//! carries a stable (summary, detail) pair via [`Diagnostic`].

use thiserror::Error;

/// Errors from the Twitter API client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// OAuth signature generation failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The API returned a non-success status
    #[error("Twitter API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// The HTTP status code, when the error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure is a transport-level not-found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is worth retrying at the transport layer.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// A credential field of the provider configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    ApiKey,
    ApiSecretKey,
    AccessToken,
    AccessTokenSecret,
}

impl CredentialField {
    /// Human-readable field name, as used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::ApiKey => "Twitter API key",
            Self::ApiSecretKey => "Twitter API secret key",
            Self::AccessToken => "Twitter access token",
            Self::AccessTokenSecret => "Twitter access secret",
        }
    }
}

/// Errors surfaced by resource operations.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Operation invoked before the provider session was configured
    #[error("Provider not configured")]
    NotConfigured,

    /// A credential resolved to an empty value
    #[error("Missing {}", .0.describe())]
    MissingCredential(CredentialField),

    /// Plan-time validation rejected an attribute value
    #[error("{summary}: {detail}")]
    Validation {
        summary: &'static str,
        detail: String,
    },

    /// A remote call failed or returned a non-success status
    #[error("{summary}: {detail}")]
    Remote {
        summary: &'static str,
        detail: String,
        status: Option<u16>,
    },

    /// Update invoked on a replace-only resource
    #[error("Update not supported for {resource} resource")]
    UpdateNotSupported { resource: &'static str },

    /// The convergence retrier exhausted its attempt budget
    #[error("{summary}: unable to confirm convergence")]
    ConvergenceTimeout { summary: &'static str },
}

impl ReconcileError {
    /// The (summary, detail) pair presented to the user.
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::NotConfigured => Diagnostic {
                summary: "Provider not configured".into(),
                detail: "The provider is not configured. Please configure the provider before using it.".into(),
            },
            Self::MissingCredential(field) => Diagnostic {
                summary: format!("Missing {}", field.describe()),
                detail: format!(
                    "The {} is not configured. The Twitter provider will not be able to function.",
                    field.describe()
                ),
            },
            Self::Validation { summary, detail } | Self::Remote { summary, detail, .. } => {
                Diagnostic {
                    summary: (*summary).into(),
                    detail: detail.clone(),
                }
            }
            Self::UpdateNotSupported { resource } => Diagnostic {
                summary: "Update not supported".into(),
                detail: format!("Update is not supported for {resource} resource"),
            },
            Self::ConvergenceTimeout { summary } => Diagnostic {
                summary: (*summary).into(),
                detail: "unable to confirm convergence".into(),
            },
        }
    }
}

/// A user-facing failure: stable summary plus underlying cause text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_status_and_retryability() {
        let not_found = ApiError::Api {
            status: 404,
            message: "Sorry, that page does not exist".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_retryable());

        let unavailable = ApiError::Api {
            status: 503,
            message: "over capacity".into(),
        };
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.status(), Some(503));
    }

    #[test]
    fn update_not_supported_message_is_stable() {
        let err = ReconcileError::UpdateNotSupported { resource: "tweet" };
        assert_eq!(err.to_string(), "Update not supported for tweet resource");

        let diag = err.diagnostic();
        assert_eq!(diag.summary, "Update not supported");
        assert_eq!(diag.detail, "Update is not supported for tweet resource");
    }

    #[test]
    fn not_configured_diagnostic() {
        let diag = ReconcileError::NotConfigured.diagnostic();
        assert_eq!(diag.summary, "Provider not configured");
        assert!(diag.detail.contains("configure the provider"));
    }

    #[test]
    fn convergence_timeout_hides_attempt_count() {
        let err = ReconcileError::ConvergenceTimeout {
            summary: "Could not unfollow user",
        };
        let diag = err.diagnostic();
        assert_eq!(diag.summary, "Could not unfollow user");
        assert_eq!(diag.detail, "unable to confirm convergence");
    }
}
