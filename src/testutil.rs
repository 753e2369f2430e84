//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use crate::client::Backend;
use crate::error::ClientError;
use crate::models::{
    Author, Document, DocumentDraft, LoginResponse, QaAnswer, Role, SearchResult, User,
};

pub fn sample_user() -> User {
    User {
        id: "u1".to_string(),
        email: "dev@example.com".to_string(),
        role: Role::User,
    }
}

pub fn sample_document(id: &str, title: &str, content: &str, tags: &[&str]) -> Document {
    let at = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
    Document {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        summary: None,
        created_by: Some(Author {
            email: "dev@example.com".to_string(),
            role: Role::User,
        }),
        created_at: at,
        updated_at: at,
    }
}

/// In-memory [`Backend`] for unit tests. Records every call by name;
/// `fail` makes every operation fail with HTTP 500 after recording.
#[derive(Default)]
pub struct FakeBackend {
    pub fail: bool,
    pub documents: Mutex<Vec<Document>>,
    pub answer: Option<QaAnswer>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, name: &str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.fail {
            Err(ClientError::http(500, "Internal Server Error"))
        } else {
            Ok(())
        }
    }

    fn find(&self, id: &str) -> Result<Document, ClientError> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ClientError::http(404, "Not Found"))
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, ClientError> {
        self.record("login")?;
        Ok(LoginResponse {
            token: "fake-token".to_string(),
            user: User {
                id: "u1".to_string(),
                email: email.to_string(),
                role: Role::User,
            },
        })
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Option<String>, ClientError> {
        self.record("register")?;
        Ok(Some("User registered successfully".to_string()))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ClientError> {
        self.record("list_documents")?;
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn get_document(&self, id: &str) -> Result<Document, ClientError> {
        self.record("get_document")?;
        self.find(id)
    }

    async fn create_document(&self, draft: &DocumentDraft) -> Result<Document, ClientError> {
        self.record("create_document")?;
        let mut doc = sample_document(&Uuid::new_v4().to_string(), &draft.title, &draft.content, &[]);
        doc.tags = draft.tags.clone();
        self.documents.lock().unwrap().push(doc.clone());
        Ok(doc)
    }

    async fn update_document(
        &self,
        id: &str,
        draft: &DocumentDraft,
    ) -> Result<Document, ClientError> {
        self.record("update_document")?;
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ClientError::http(404, "Not Found"))?;
        doc.title = draft.title.clone();
        doc.content = draft.content.clone();
        doc.tags = draft.tags.clone();
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete_document(&self, id: &str) -> Result<(), ClientError> {
        self.record("delete_document")?;
        self.documents.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }

    async fn summarize(&self, id: &str) -> Result<Document, ClientError> {
        self.record("summarize")?;
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ClientError::http(404, "Not Found"))?;
        doc.summary = Some("A short summary.".to_string());
        Ok(doc.clone())
    }

    async fn generate_tags(&self, id: &str) -> Result<Document, ClientError> {
        self.record("generate_tags")?;
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ClientError::http(404, "Not Found"))?;
        if !doc.tags.iter().any(|t| t == "generated") {
            doc.tags.push("generated".to_string());
        }
        Ok(doc.clone())
    }

    async fn search(
        &self,
        query: &str,
        _semantic: bool,
    ) -> Result<Vec<SearchResult>, ClientError> {
        self.record("search")?;
        let needle = query.to_lowercase();
        let hits = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.title.to_lowercase().contains(&needle)
                    || d.content.to_lowercase().contains(&needle)
            })
            .enumerate()
            .map(|(i, d)| SearchResult {
                document: d.clone(),
                relevance_score: Some(0.9 - 0.1 * i as f64),
            })
            .collect();
        Ok(hits)
    }

    async fn ask(&self, _question: &str) -> Result<QaAnswer, ClientError> {
        self.record("ask")?;
        Ok(self.answer.clone().unwrap_or(QaAnswer {
            answer: "X is Y".to_string(),
            sources: vec!["doc1".to_string()],
        }))
    }
}
