//! Backend access: the [`Backend`] trait and its HTTP implementation.
//!
//! Every remote operation the client performs is a method on [`Backend`].
//! [`HttpBackend`] is the production implementation: it builds requests
//! against the configured base URL, always sends
//! `Content-Type: application/json`, attaches `Authorization: Bearer <token>`
//! only when a token is held, parses JSON responses, and maps any non-2xx
//! status to [`ClientError::Http`] carrying the status text (or the
//! response's `message` field when the backend provides one).
//!
//! There are no retries and no special 401 handling — an expired token
//! surfaces like any other HTTP failure and the user logs in again.
//!
//! Session, document, search, and Q&A logic all take `&dyn Backend`,
//! which is also the seam the unit tests fake.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::models::{
    Document, DocumentDraft, ListEnvelope, LoginResponse, QaAnswer, SearchResult,
};

/// The remote surface of the knowledge-base service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/auth/login` — exchange credentials for a token + user.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError>;

    /// `POST /api/auth/register` — create an account. Does not authenticate;
    /// returns the backend's confirmation message when present.
    async fn register(&self, email: &str, password: &str)
        -> Result<Option<String>, ClientError>;

    /// `GET /api/documents` — the full document list.
    async fn list_documents(&self) -> Result<Vec<Document>, ClientError>;

    /// `GET /api/documents/:id`
    async fn get_document(&self, id: &str) -> Result<Document, ClientError>;

    /// `POST /api/documents`
    async fn create_document(&self, draft: &DocumentDraft) -> Result<Document, ClientError>;

    /// `PUT /api/documents/:id`
    async fn update_document(
        &self,
        id: &str,
        draft: &DocumentDraft,
    ) -> Result<Document, ClientError>;

    /// `DELETE /api/documents/:id`
    async fn delete_document(&self, id: &str) -> Result<(), ClientError>;

    /// `POST /api/documents/:id/summarize` — AI summary; returns the updated document.
    async fn summarize(&self, id: &str) -> Result<Document, ClientError>;

    /// `POST /api/documents/:id/generate-tags` — AI tagging; returns the updated document.
    async fn generate_tags(&self, id: &str) -> Result<Document, ClientError>;

    /// `POST /api/search` — ranked results; `semantic` selects the
    /// server-side ranking mode and is otherwise opaque to the client.
    async fn search(&self, query: &str, semantic: bool)
        -> Result<Vec<SearchResult>, ClientError>;

    /// `POST /api/qa` — one-shot question answering.
    async fn ask(&self, question: &str) -> Result<QaAnswer, ClientError>;
}

/// JSON-over-HTTP [`Backend`] backed by reqwest.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Build a client from configuration, optionally holding a bearer token.
    pub fn new(config: &ApiConfig, token: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(ref token) = self.token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ClientError::http(
                status.as_u16(),
                extract_error_message(status.as_u16(), &body_text),
            ));
        }

        let body_text = response.text().await?;
        if body_text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body_text)
            .map_err(|e| ClientError::Network(format!("invalid JSON response: {}", e)))
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let value = self.request(method, path, body).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::Network(format!("unexpected response shape: {}", e)))
    }
}

/// Error message for a non-2xx response: the body's `message` field when
/// present (auth endpoints set it), else the HTTP status text.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            if !message.trim().is_empty() {
                return message.to_string();
            }
        }
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.request_as(Method::POST, "/api/auth/login", Some(body))
            .await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<String>, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self
            .request(Method::POST, "/api/auth/register", Some(body))
            .await?;
        Ok(value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ClientError> {
        let envelope: ListEnvelope<Document> =
            self.request_as(Method::GET, "/api/documents", None).await?;
        Ok(envelope.into_items())
    }

    async fn get_document(&self, id: &str) -> Result<Document, ClientError> {
        self.request_as(Method::GET, &format!("/api/documents/{}", id), None)
            .await
    }

    async fn create_document(&self, draft: &DocumentDraft) -> Result<Document, ClientError> {
        let body = serde_json::to_value(draft)
            .map_err(|e| ClientError::Network(format!("failed to encode request: {}", e)))?;
        self.request_as(Method::POST, "/api/documents", Some(body))
            .await
    }

    async fn update_document(
        &self,
        id: &str,
        draft: &DocumentDraft,
    ) -> Result<Document, ClientError> {
        let body = serde_json::to_value(draft)
            .map_err(|e| ClientError::Network(format!("failed to encode request: {}", e)))?;
        self.request_as(Method::PUT, &format!("/api/documents/{}", id), Some(body))
            .await
    }

    async fn delete_document(&self, id: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, &format!("/api/documents/{}", id), None)
            .await?;
        Ok(())
    }

    async fn summarize(&self, id: &str) -> Result<Document, ClientError> {
        self.request_as(
            Method::POST,
            &format!("/api/documents/{}/summarize", id),
            None,
        )
        .await
    }

    async fn generate_tags(&self, id: &str) -> Result<Document, ClientError> {
        self.request_as(
            Method::POST,
            &format!("/api/documents/{}/generate-tags", id),
            None,
        )
        .await
    }

    async fn search(
        &self,
        query: &str,
        semantic: bool,
    ) -> Result<Vec<SearchResult>, ClientError> {
        let body = serde_json::json!({ "query": query, "semantic": semantic });
        let envelope: ListEnvelope<SearchResult> = self
            .request_as(Method::POST, "/api/search", Some(body))
            .await?;
        Ok(envelope.into_items())
    }

    async fn ask(&self, question: &str) -> Result<QaAnswer, ClientError> {
        let body = serde_json::json!({ "question": question });
        self.request_as(Method::POST, "/api/qa", Some(body)).await
    }
}
