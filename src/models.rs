//! Core data models shared between the wire protocol and local state.
//!
//! These types mirror the backend's JSON shapes (camelCase on the wire)
//! and double as the serialized form of the durable local files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// An authenticated account as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Successful login payload: an opaque bearer token plus the account.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Who created a document, embedded in each [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub email: String,
    pub role: Role,
}

/// A titled, tagged text record owned by the backend.
///
/// The client never mutates a `Document` in place — every change goes
/// through a create/update request followed by a full list refetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Lowercased, deduplicated, insertion-ordered.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Author>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields submitted on create and update.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// A ranked hit from the search endpoint. Same shape as [`Document`]
/// plus an optional server-computed relevance score; never cached.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

/// Whether a transcript entry is the user's question or the assistant's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaKind {
    Question,
    Answer,
}

/// One entry in the Q&A transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaEntry {
    /// Request-local unique token.
    pub id: String,
    pub kind: QaKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Present on answer entries (possibly empty); absent on questions
    /// and on the fallback entry appended when the request fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

/// Successful Q&A payload.
#[derive(Debug, Clone, Deserialize)]
pub struct QaAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// List responses arrive either bare (`[…]`) or wrapped
/// (`{"documents": […]}`); both are accepted for documents and search hits.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { documents: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { documents } => documents,
        }
    }
}
