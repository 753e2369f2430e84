//! Create/edit flow for a single document.
//!
//! The editor tracks a local tag set distinct from the persisted one;
//! tag adds and removes touch only local state until submit commits
//! them together with title and content in one request. Submit
//! validates before any network call, and an HTTP failure returns the
//! editor to the editing phase rather than ending the flow.

use anyhow::{Context, Result};

use crate::client::Backend;
use crate::config::Config;
use crate::documents::DocumentCache;
use crate::error::ClientError;
use crate::models::{Document, DocumentDraft};
use crate::session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Editing,
    Submitting,
    Done,
}

#[derive(Debug)]
pub struct DocumentEditor {
    id: Option<String>,
    title: String,
    content: String,
    tags: Vec<String>,
    phase: EditorPhase,
}

impl Default for DocumentEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEditor {
    /// Start a create flow with empty fields.
    pub fn new() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            phase: EditorPhase::Editing,
        }
    }

    /// Start an edit flow: fetch the document and populate the editable
    /// fields. A fetch failure ends the flow before it starts.
    pub async fn load(backend: &dyn Backend, id: &str) -> Result<Self, ClientError> {
        let doc = backend.get_document(id).await?;
        Ok(Self {
            id: Some(doc.id),
            title: doc.title,
            content: doc.content,
            tags: doc.tags,
            phase: EditorPhase::Editing,
        })
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Append the trimmed, lowercased tag unless it is empty or already
    /// present. Returns whether the tag was added.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim().to_lowercase();
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag, matching case-insensitively. Returns whether
    /// anything was removed.
    pub fn remove_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim().to_lowercase();
        let before = self.tags.len();
        self.tags.retain(|t| t != &tag);
        self.tags.len() != before
    }

    /// Submit the draft: create without an id, update with one.
    ///
    /// Empty trimmed title or content fails before any request is made.
    /// On success the flow is done; on HTTP failure the editor returns
    /// to the editing phase with its local state intact.
    pub async fn submit(&mut self, backend: &dyn Backend) -> Result<Document, ClientError> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(ClientError::Validation(
                "title and content must not be empty".to_string(),
            ));
        }

        self.phase = EditorPhase::Submitting;
        let draft = DocumentDraft {
            title,
            content,
            tags: self.tags.clone(),
        };

        let result = match self.id {
            Some(ref id) => backend.update_document(id, &draft).await,
            None => backend.create_document(&draft).await,
        };

        match result {
            Ok(doc) => {
                self.phase = EditorPhase::Done;
                Ok(doc)
            }
            Err(err) => {
                self.phase = EditorPhase::Editing;
                Err(err)
            }
        }
    }
}

// ============ CLI entry points ============

pub async fn run_create(
    config: &Config,
    title: String,
    content: String,
    tags: Vec<String>,
) -> Result<()> {
    let backend = session::require_backend(config)?;

    let mut editor = DocumentEditor::new();
    editor.set_title(title);
    editor.set_content(content);
    for tag in &tags {
        editor.add_tag(tag);
    }

    let doc = editor.submit(&backend).await.context("create failed")?;

    let mut cache = DocumentCache::new();
    cache
        .refresh(&backend)
        .await
        .context("failed to refresh documents")?;
    println!("Created {} ({} documents).", doc.id, cache.documents().len());
    Ok(())
}

pub async fn run_edit(
    config: &Config,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    add_tags: Vec<String>,
    remove_tags: Vec<String>,
) -> Result<()> {
    let backend = session::require_backend(config)?;

    let mut editor = DocumentEditor::load(&backend, id)
        .await
        .context("failed to load document")?;

    if let Some(title) = title {
        editor.set_title(title);
    }
    if let Some(content) = content {
        editor.set_content(content);
    }
    for tag in &remove_tags {
        editor.remove_tag(tag);
    }
    for tag in &add_tags {
        editor.add_tag(tag);
    }

    let doc = editor.submit(&backend).await.context("update failed")?;

    let mut cache = DocumentCache::new();
    cache
        .refresh(&backend)
        .await
        .context("failed to refresh documents")?;
    println!("Updated {}.", doc.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_document, FakeBackend};

    #[test]
    fn test_add_tag_trims_and_lowercases() {
        let mut editor = DocumentEditor::new();
        assert!(editor.add_tag("  Security  "));
        assert_eq!(editor.tags(), &["security"]);
    }

    #[test]
    fn test_add_tag_duplicate_is_a_no_op() {
        let mut editor = DocumentEditor::new();
        assert!(editor.add_tag("auth"));
        assert!(!editor.add_tag("AUTH"));
        assert!(!editor.add_tag(" auth "));
        assert_eq!(editor.tags(), &["auth"]);
    }

    #[test]
    fn test_add_tag_rejects_blank() {
        let mut editor = DocumentEditor::new();
        assert!(!editor.add_tag("   "));
        assert!(editor.tags().is_empty());
    }

    #[test]
    fn test_remove_tag_is_case_insensitive() {
        let mut editor = DocumentEditor::new();
        editor.add_tag("auth");
        assert!(editor.remove_tag("AUTH"));
        assert!(!editor.remove_tag("auth"));
        assert!(editor.tags().is_empty());
    }

    #[tokio::test]
    async fn test_submit_empty_fields_fails_without_network() {
        let backend = FakeBackend::default();
        let mut editor = DocumentEditor::new();
        editor.set_title("   ");
        editor.set_content("body");

        let err = editor.submit(&backend).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(backend.call_count(), 0);
        assert_eq!(editor.phase(), EditorPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_without_id_creates() {
        let backend = FakeBackend::default();
        let mut editor = DocumentEditor::new();
        editor.set_title("Auth Guide");
        editor.set_content("How login works.");
        editor.add_tag("auth");

        let doc = editor.submit(&backend).await.unwrap();
        assert_eq!(doc.title, "Auth Guide");
        assert_eq!(doc.tags, vec!["auth"]);
        assert_eq!(editor.phase(), EditorPhase::Done);
        assert_eq!(backend.documents.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tag_edits_stay_local_until_submit() {
        let backend = FakeBackend::with_documents(vec![sample_document(
            "d1",
            "Auth Guide",
            "body",
            &["auth"],
        )]);

        let mut editor = DocumentEditor::load(&backend, "d1").await.unwrap();
        editor.add_tag("security");
        editor.remove_tag("auth");

        // Backend still holds the original tag set.
        assert_eq!(backend.documents.lock().unwrap()[0].tags, vec!["auth"]);

        let doc = editor.submit(&backend).await.unwrap();
        assert_eq!(doc.tags, vec!["security"]);
        assert_eq!(
            backend.documents.lock().unwrap()[0].tags,
            vec!["security"]
        );
    }

    #[tokio::test]
    async fn test_submit_http_failure_returns_to_editing() {
        let backend = FakeBackend::failing();
        let mut editor = DocumentEditor::new();
        editor.set_title("T");
        editor.set_content("C");

        let err = editor.submit(&backend).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
        assert_eq!(editor.phase(), EditorPhase::Editing);
    }

    #[tokio::test]
    async fn test_load_failure_is_terminal() {
        let backend = FakeBackend::with_documents(vec![]);
        assert!(DocumentEditor::load(&backend, "missing").await.is_err());
    }
}
