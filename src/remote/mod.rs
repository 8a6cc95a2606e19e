//! UserApi trait and the remote collection wire types.
//!
//! The store talks to the remote collection only through [`UserApi`], so
//! tests can swap the HTTP client for an in-memory double.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::FetchError;
use crate::models::{Gender, UserDraft, UserId, UserRecord};

pub use http::{ClientError, HttpUserApi};

/// A remote user collection.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /users`
    async fn list(&self) -> Result<Vec<WireUser>, FetchError>;

    /// `POST /users` with the draft as body.
    async fn create(&self, draft: &UserDraft) -> Result<WireUser, FetchError>;

    /// `PUT /users/{id}` with the full record as body.
    async fn update(&self, record: &UserRecord) -> Result<WireUser, FetchError>;

    /// `DELETE /users/{id}`
    async fn delete(&self, id: &UserId) -> Result<(), FetchError>;
}

/// A user as the remote collection returns it.
///
/// Only `id` is mandatory. `gender` is frequently absent (the placeholder
/// API has no such field) and is resolved by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireUser {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
}

impl WireUser {
    /// Convert to a record, using `fallback` when the payload carried no gender.
    pub fn into_record(self, fallback: Gender) -> UserRecord {
        UserRecord {
            id: self.id,
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            website: self.website,
            gender: self.gender.unwrap_or(fallback),
        }
    }
}

impl From<UserRecord> for WireUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            username: record.username,
            email: record.email,
            phone: record.phone,
            website: record.website,
            gender: Some(record.gender),
        }
    }
}

/// Unrecognised or null genders decode as absent rather than failing the
/// whole payload.
fn lenient_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}
