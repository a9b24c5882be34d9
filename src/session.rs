//! Provider session: the process-wide readiness gate.
//!
//! Credentials are resolved and the authenticated client constructed
//! exactly once; the readiness transition is monotonic and never reverts.
//! Every resource operation checks readiness first and fails fast with
//! "Provider not configured" otherwise.

use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::client::TwitterApiClient;
use crate::config::ProviderConfig;
use crate::error::ReconcileError;

/// Shared session handed to every resource controller.
///
/// Construct once, call [`ProviderSession::configure`] during host
/// initialization, then share via `Arc`. The internal write happens at
/// most once, so readers never need a lock.
#[derive(Debug, Default)]
pub struct ProviderSession {
    client: OnceLock<Arc<TwitterApiClient>>,
}

impl ProviderSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve credentials, build the authenticated client, and flip the
    /// session to ready.
    ///
    /// Fails when any credential resolves empty or the HTTP client cannot
    /// be constructed; a second call after success is a no-op.
    pub fn configure(&self, config: &ProviderConfig) -> Result<(), ReconcileError> {
        if self.client.get().is_some() {
            return Ok(());
        }

        let credentials = config.resolve_credentials()?;

        let client = TwitterApiClient::new(credentials, config).map_err(|e| {
            ReconcileError::Remote {
                summary: "Could not configure provider",
                detail: format!("Unable to construct API client, got error {e}"),
                status: None,
            }
        })?;

        info!(api_url = %config.api_url, "Configured Twitter provider");
        let _ = self.client.set(Arc::new(client));
        Ok(())
    }

    /// Whether the session has been configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.get().is_some()
    }

    /// The authenticated client, or the fail-fast configuration error.
    pub(crate) fn client(&self) -> Result<Arc<TwitterApiClient>, ReconcileError> {
        self.client
            .get()
            .cloned()
            .ok_or(ReconcileError::NotConfigured)
    }
}
