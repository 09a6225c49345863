//! Domain DTOs for the posts API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! integration tests catch drift. Timestamps stay opaque strings because the
//! client never interprets them.

use serde::{Deserialize, Serialize};

/// A post as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Partial payload for updating a post. Omitted fields are left unchanged
/// on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// The `{ "post": ... }` wrapper every write request uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope<T> {
    pub post: T,
}
