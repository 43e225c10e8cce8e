//! # Domain Models
//!
//! These structs represent the core entities of PostHub.
//! Ids are numeric and assigned by the store on insert; `0` marks an entity that
//! has not been stored yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Something an [`EntitySet`](crate::ports::EntitySet) can hold.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Label used in resource-form NotFound errors (e.g. "Post").
    const RESOURCE: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// PHC-formatted hash produced by the configured `PasswordHasher`
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A blog post written by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A reply attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Case-insensitive email comparison; emails are stored as given.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

impl Entity for User {
    const RESOURCE: &'static str = "User";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Entity for Post {
    const RESOURCE: &'static str = "Post";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Entity for Comment {
    const RESOURCE: &'static str = "Comment";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Identity encoded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per RFC 7519
    pub sub: String,
    pub email: String,
    pub username: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// A freshly issued access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
