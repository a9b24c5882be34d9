//! Plan-time attribute validators.
//!
//! Pure functions: no side effects, no network. An unknown value always
//! passes — validation only runs once a concrete value exists. Rejection
//! messages are stable strings that tests match on.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::attr::Attr;
use crate::error::ReconcileError;

const TWEET_MIN_LEN: usize = 1;
const TWEET_MAX_LEN: usize = 280;

/// A list's name must start with a letter and can consist only of 25 or
/// fewer letters, numbers, "-", or "_" characters.
static LIST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9 _-]{0,24}$").expect("static pattern")
});

/// Reject null or zero-length names.
pub fn non_blank_name(name: &Attr<String>) -> Result<(), ReconcileError> {
    if name.is_unknown() {
        return Ok(());
    }

    match name.value() {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ReconcileError::Validation {
            summary: "Invalid account name.",
            detail: "Name can't be blank.".into(),
        }),
    }
}

/// Reject tweet text outside the 1..=280 character bounds.
///
/// Null passes here; required-ness is the controller's concern.
pub fn tweet_length(text: &Attr<String>) -> Result<(), ReconcileError> {
    let Some(value) = text.value() else {
        return Ok(());
    };

    let len = value.chars().count();
    if len < TWEET_MIN_LEN || len > TWEET_MAX_LEN {
        return Err(ReconcileError::Validation {
            summary: "Invalid Tweet Length",
            detail: format!(
                "Tweet length must be between {TWEET_MIN_LEN} and {TWEET_MAX_LEN} characters, got: {len} characters."
            ),
        });
    }

    Ok(())
}

/// Reject strings that do not parse as an absolute URL with a host.
///
/// Null and unknown pass; the URL attribute is optional.
pub fn valid_url(url: &Attr<String>) -> Result<(), ReconcileError> {
    let Some(value) = url.value() else {
        return Ok(());
    };

    let ok = Url::parse(value)
        .map(|u| !u.scheme().is_empty() && u.host_str().is_some())
        .unwrap_or(false);

    if ok {
        Ok(())
    } else {
        Err(ReconcileError::Validation {
            summary: "Invalid URL.",
            detail: "The URL is not a valid URL".into(),
        })
    }
}

/// Reject list names that are blank or violate the naming pattern.
pub fn list_name(name: &Attr<String>) -> Result<(), ReconcileError> {
    if name.is_unknown() {
        return Ok(());
    }

    let Some(value) = name.value().filter(|v| !v.is_empty()) else {
        return Err(ReconcileError::Validation {
            summary: "Invalid list name.",
            detail: "Name can't be blank.".into(),
        });
    };

    if LIST_NAME.is_match(value) {
        Ok(())
    } else {
        Err(ReconcileError::Validation {
            summary: "Invalid list name.",
            detail: "A list's name must start with a letter and can consist only of 25 or fewer letters, numbers, \"-\", or \"_\" characters.".into(),
        })
    }
}
