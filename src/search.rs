//! One-shot search against the backend, plus the recent-search list.
//!
//! The `semantic` flag selects the server-side ranking mode and is
//! otherwise opaque to the client. Results live only for the duration of
//! one query — nothing is cached. Successful queries are remembered in a
//! bounded, deduplicated, most-recent-first list persisted to local
//! storage.

use anyhow::{Context, Result};

use crate::client::Backend;
use crate::config::Config;
use crate::models::Document;
use crate::session;
use crate::store::{StateDir, RECENT_SEARCHES_KEY};

pub const RECENT_SEARCH_CAP: usize = 5;

/// Move `query` to the front of the recent list, deduplicating and
/// keeping at most [`RECENT_SEARCH_CAP`] entries.
pub fn push_recent(recent: &mut Vec<String>, query: &str) {
    let query = query.trim();
    if query.is_empty() {
        return;
    }
    recent.retain(|q| q != query);
    recent.insert(0, query.to_string());
    recent.truncate(RECENT_SEARCH_CAP);
}

pub async fn run_search(config: &Config, query: &str, semantic: bool) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let backend = session::require_backend(config)?;
    let results = backend
        .search(query, semantic)
        .await
        .context("search failed")?;

    // Only a successful search updates the recent list.
    let state = StateDir::new(&config.storage.dir);
    let mut recent: Vec<String> = state.load_json(RECENT_SEARCHES_KEY).unwrap_or_default();
    push_recent(&mut recent, query);
    state.save_json(RECENT_SEARCHES_KEY, &recent)?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in results.iter().enumerate() {
        let score = hit
            .relevance_score
            .map(|s| format!("[{:.2}] ", s))
            .unwrap_or_default();
        println!("{}. {}{}", i + 1, score, hit.document.title);
        if !hit.document.tags.is_empty() {
            println!("    tags: {}", hit.document.tags.join(", "));
        }
        println!("    updated: {}", hit.document.updated_at.format("%Y-%m-%d"));
        println!("    excerpt: \"{}\"", excerpt(&hit.document));
        println!("    id: {}", hit.document.id);
        println!();
    }

    Ok(())
}

pub fn run_recent(config: &Config) -> Result<()> {
    let state = StateDir::new(&config.storage.dir);
    let recent: Vec<String> = state.load_json(RECENT_SEARCHES_KEY).unwrap_or_default();

    if recent.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    for (i, query) in recent.iter().enumerate() {
        println!("{}. {}", i + 1, query);
    }
    Ok(())
}

/// Summary when present, else the start of the content, flattened to one line.
fn excerpt(doc: &Document) -> String {
    let text = doc.summary.as_deref().unwrap_or(&doc.content);
    let flat = text.replace('\n', " ");
    let flat = flat.trim();
    if flat.chars().count() > 160 {
        let prefix: String = flat.chars().take(160).collect();
        format!("{}...", prefix.trim_end())
    } else {
        flat.to_string()
    }
}
