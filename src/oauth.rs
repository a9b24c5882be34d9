//! OAuth 1.0a request signing.
//!
//! The v1.1 API requires an HMAC-SHA1 signature over the request method,
//! base URL, and all query parameters for every user-context call.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

use crate::config::Credentials;
use crate::error::ApiError;

/// Everything except RFC 3986 unreserved characters gets escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string the way OAuth 1.0a signatures require.
pub(crate) fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Signs requests with the resolved provider credentials.
#[derive(Debug)]
pub(crate) struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub(crate) const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Produce the `Authorization: OAuth ...` header value for a request.
    ///
    /// `url` is the request URL without its query string; `params` are the
    /// query parameters that will be sent with it.
    pub(crate) fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> Result<String, ApiError> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| ApiError::OAuth(format!("system clock error: {e}")))?
            .as_secs()
            .to_string();
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let oauth_params = [
            ("oauth_consumer_key", self.credentials.api_key.as_str()),
            ("oauth_nonce", nonce.as_str()),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        // Signature base string covers oauth params and request params,
        // sorted by encoded key.
        let mut signed: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        for (k, v) in oauth_params {
            signed.insert(percent_encode(k), percent_encode(v));
        }

        let param_string = signed
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.credentials.api_secret_key),
            percent_encode(&self.credentials.access_token_secret)
        );

        let signature = hmac_sha1(&signing_key, &base_string)?;

        let mut header_params: Vec<(&str, String)> = oauth_params
            .iter()
            .map(|(k, v)| (*k, (*v).to_string()))
            .collect();
        header_params.push(("oauth_signature", signature));

        let header = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }
}

fn hmac_sha1(key: &str, data: &str) -> Result<String, ApiError> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| ApiError::OAuth(e.to_string()))?;
    mac.update(data.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
