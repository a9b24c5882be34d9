//! Twitter API v1.1 wire payloads.
//!
//! Only the fields the controllers normalize are modeled; everything the
//! API may omit or send as `null` is optional with a serde default.

use serde::{Deserialize, Serialize};

/// A v1.1 status object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    /// Remote-assigned identifier
    pub id: i64,

    /// UTF-8 text of the status update
    #[serde(default)]
    pub text: String,

    /// Posting user (trimmed to the id in most responses)
    #[serde(default)]
    pub user: Option<TweetAuthor>,

    /// Utility used to post, as an HTML-formatted string
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub in_reply_to_status_id: Option<i64>,

    #[serde(default)]
    pub in_reply_to_user_id: Option<i64>,

    #[serde(default)]
    pub quoted_status_id: Option<i64>,

    #[serde(default)]
    pub quote_count: i64,

    #[serde(default)]
    pub reply_count: i64,

    #[serde(default)]
    pub retweet_count: i64,

    #[serde(default)]
    pub favorite_count: i64,

    #[serde(default)]
    pub possibly_sensitive: Option<bool>,

    /// BCP 47 language identifier, `und` when undetected
    #[serde(default)]
    pub lang: Option<String>,
}

/// The `user` object embedded in a trimmed status payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetAuthor {
    pub id: i64,
}

/// A v1.1 user object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Remote-assigned identifier
    pub id: i64,

    #[serde(default)]
    pub screen_name: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub protected: bool,

    #[serde(default)]
    pub verified: bool,

    #[serde(default)]
    pub followers_count: i64,

    #[serde(default)]
    pub friends_count: i64,

    #[serde(default)]
    pub statuses_count: i64,

    /// v1.1 spelling
    #[serde(default)]
    pub favourites_count: i64,

    #[serde(default)]
    pub profile_banner_url: Option<String>,

    #[serde(default)]
    pub profile_image_url_https: Option<String>,

    #[serde(default)]
    pub default_profile: bool,

    #[serde(default)]
    pub default_profile_image: bool,

    /// Whether the authenticated user follows this user; null when the
    /// relationship is not applicable
    #[serde(default)]
    pub following: Option<bool>,

    /// Whether a follow request is pending approval
    #[serde(default)]
    pub follow_request_sent: Option<bool>,
}

impl User {
    /// The follow-relationship existence predicate: true while the
    /// authenticated user either follows this user or has a pending
    /// request.
    #[must_use]
    pub fn relationship_exists(&self) -> bool {
        self.following.unwrap_or(false) || self.follow_request_sent.unwrap_or(false)
    }
}

/// A v1.1 list object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterList {
    /// Remote-assigned identifier
    pub id: i64,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub uri: String,

    #[serde(default)]
    pub subscriber_count: i64,

    #[serde(default)]
    pub member_count: i64,

    /// `public` or `private`
    #[serde(default)]
    pub mode: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Owning user
    #[serde(default)]
    pub user: Option<ListOwner>,
}

/// The `user` object embedded in a list payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOwner {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_tolerates_trimmed_payload() {
        let tweet: Tweet = serde_json::from_value(serde_json::json!({
            "id": 1_050_118_621_198_921_728_i64,
            "text": "hello",
            "user": {"id": 42}
        }))
        .unwrap();

        assert_eq!(tweet.id, 1_050_118_621_198_921_728);
        assert_eq!(tweet.user.unwrap().id, 42);
        assert_eq!(tweet.retweet_count, 0);
        assert!(tweet.in_reply_to_status_id.is_none());
    }

    #[test]
    fn user_relationship_predicate() {
        let mut user: User = serde_json::from_value(serde_json::json!({
            "id": 7,
            "screen_name": "gopher",
            "following": false,
            "follow_request_sent": false
        }))
        .unwrap();
        assert!(!user.relationship_exists());

        user.follow_request_sent = Some(true);
        assert!(user.relationship_exists());

        user.follow_request_sent = None;
        user.following = Some(true);
        assert!(user.relationship_exists());
    }

    #[test]
    fn user_tolerates_null_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 7,
            "screen_name": "gopher",
            "url": null,
            "location": null,
            "following": null
        }))
        .unwrap();
        assert!(user.url.is_none());
        assert!(!user.relationship_exists());
    }
}
