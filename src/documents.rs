//! Document collection cache and client-side filtering.
//!
//! The client holds a read-through cache of the full document list,
//! replaced wholesale by [`DocumentCache::refresh`] and never patched in
//! place: every mutation (create, update, delete, summarize,
//! generate-tags) is followed by a full refetch. A failed refresh keeps
//! the previous contents.

use anyhow::{Context, Result};

use crate::client::Backend;
use crate::config::Config;
use crate::error::ClientError;
use crate::models::Document;
use crate::session;

#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: Vec<Document>,
    tags: Vec<String>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the full list, replace the cache, and recompute the
    /// distinct tag set. On failure the cache retains its previous
    /// contents — there is no partial overwrite.
    pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<(), ClientError> {
        let documents = backend.list_documents().await?;
        self.tags = distinct_tags(&documents);
        self.documents = documents;
        Ok(())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Union of all documents' tags, lowercased, deduplicated, sorted.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Pure filter over the cached list.
    ///
    /// Text match is a case-insensitive substring test against title OR
    /// content OR summary. Tag match requires every selected tag
    /// (intersection, AND). The two compose by AND; empty query and
    /// empty selection return the full cache in original order.
    pub fn filter(&self, query: &str, selected_tags: &[String]) -> Vec<&Document> {
        let needle = query.trim().to_lowercase();
        let selected: Vec<String> = selected_tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        self.documents
            .iter()
            .filter(|doc| matches_text(doc, &needle) && has_all_tags(doc, &selected))
            .collect()
    }
}

fn matches_text(doc: &Document, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    doc.title.to_lowercase().contains(needle)
        || doc.content.to_lowercase().contains(needle)
        || doc
            .summary
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(needle))
}

fn has_all_tags(doc: &Document, selected: &[String]) -> bool {
    selected
        .iter()
        .all(|tag| doc.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
}

fn distinct_tags(documents: &[Document]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for doc in documents {
        for tag in &doc.tags {
            let tag = tag.to_lowercase();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags.sort();
    tags
}

// ============ CLI entry points ============

pub async fn run_list(config: &Config, query: Option<String>, tags: Vec<String>) -> Result<()> {
    let backend = session::require_backend(config)?;
    let mut cache = DocumentCache::new();
    cache
        .refresh(&backend)
        .await
        .context("failed to load documents")?;

    let query = query.unwrap_or_default();
    let filtered = cache.filter(&query, &tags);

    if filtered.is_empty() {
        println!("No documents.");
        return Ok(());
    }

    for (i, doc) in filtered.iter().enumerate() {
        println!("{}. {}", i + 1, doc.title);
        if !doc.tags.is_empty() {
            println!("    tags: {}", doc.tags.join(", "));
        }
        println!("    updated: {}", doc.updated_at.format("%Y-%m-%d"));
        println!("    id: {}", doc.id);
        println!();
    }

    if !cache.tags().is_empty() {
        println!("tags in use: {}", cache.tags().join(", "));
    }

    Ok(())
}

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let backend = session::require_backend(config)?;
    let doc = backend
        .get_document(id)
        .await
        .context("failed to fetch document")?;
    print_document(&doc);
    Ok(())
}

pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    let backend = session::require_backend(config)?;
    backend
        .delete_document(id)
        .await
        .context("failed to delete document")?;

    let mut cache = DocumentCache::new();
    cache
        .refresh(&backend)
        .await
        .context("failed to refresh documents")?;
    println!("Deleted {}. {} documents remain.", id, cache.documents().len());
    Ok(())
}

pub async fn run_summarize(config: &Config, id: &str) -> Result<()> {
    let backend = session::require_backend(config)?;
    let doc = backend
        .summarize(id)
        .await
        .context("failed to summarize document")?;

    let mut cache = DocumentCache::new();
    cache
        .refresh(&backend)
        .await
        .context("failed to refresh documents")?;

    match doc.summary {
        Some(summary) => {
            println!("--- Summary: {} ---", doc.title);
            println!("{}", summary);
        }
        None => println!("No summary returned for {}.", doc.id),
    }
    Ok(())
}

pub async fn run_generate_tags(config: &Config, id: &str) -> Result<()> {
    let backend = session::require_backend(config)?;
    let doc = backend
        .generate_tags(id)
        .await
        .context("failed to generate tags")?;

    let mut cache = DocumentCache::new();
    cache
        .refresh(&backend)
        .await
        .context("failed to refresh documents")?;

    println!("{}: {}", doc.title, doc.tags.join(", "));
    Ok(())
}

fn print_document(doc: &Document) {
    println!("--- Document ---");
    println!("id:         {}", doc.id);
    println!("title:      {}", doc.title);
    if !doc.tags.is_empty() {
        println!("tags:       {}", doc.tags.join(", "));
    }
    if let Some(ref author) = doc.created_by {
        println!("created_by: {} ({})", author.email, author.role);
    }
    println!("created_at: {}", doc.created_at.format("%Y-%m-%dT%H:%M:%SZ"));
    println!("updated_at: {}", doc.updated_at.format("%Y-%m-%dT%H:%M:%SZ"));
    println!();

    if let Some(ref summary) = doc.summary {
        println!("--- Summary ---");
        println!("{}", summary);
        println!();
    }

    println!("--- Content ---");
    println!("{}", doc.content);
}
