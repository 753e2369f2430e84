//! Q&A transcript: ask, history, clear.
//!
//! The transcript is an append-only ordered sequence persisted to local
//! storage after every append and restored in full (timestamps included)
//! on load. Each `ask` appends exactly one question entry and then
//! exactly one answer entry — the backend's answer on success, a fixed
//! fallback on failure — in that order. A second `ask` while one is in
//! flight is rejected, so answers land in request order, never
//! interleaved. The transcript is emptied only by an explicit clear,
//! which also erases the persisted copy.

use anyhow::{bail, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::client::Backend;
use crate::config::Config;
use crate::models::{QaEntry, QaKind};
use crate::session;
use crate::store::{StateDir, QA_HISTORY_KEY};

/// Answer text appended when the Q&A request fails.
pub const FALLBACK_ANSWER: &str =
    "Sorry, something went wrong while answering. Please try again.";

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<QaEntry>,
    in_flight: bool,
}

impl Transcript {
    /// Restore the persisted transcript; missing or corrupt contents
    /// read as empty.
    pub fn load(state: &StateDir) -> Self {
        Self {
            entries: state.load_json(QA_HISTORY_KEY).unwrap_or_default(),
            in_flight: false,
        }
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    /// Ask a question. The question entry is appended (and persisted)
    /// before the request resolves; the answer-or-fallback entry follows
    /// once it does. Returns the answer entry.
    pub async fn ask(
        &mut self,
        backend: &dyn Backend,
        state: &StateDir,
        question: &str,
    ) -> Result<QaEntry> {
        let question = question.trim();
        if question.is_empty() {
            bail!("question must not be empty");
        }
        if self.in_flight {
            bail!("another question is still in flight");
        }

        self.in_flight = true;
        let result = self.ask_inner(backend, state, question).await;
        self.in_flight = false;
        result
    }

    async fn ask_inner(
        &mut self,
        backend: &dyn Backend,
        state: &StateDir,
        question: &str,
    ) -> Result<QaEntry> {
        self.entries.push(QaEntry {
            id: Uuid::new_v4().to_string(),
            kind: QaKind::Question,
            text: question.to_string(),
            created_at: Utc::now(),
            sources: None,
        });
        state.save_json(QA_HISTORY_KEY, &self.entries)?;

        let entry = match backend.ask(question).await {
            Ok(answer) => QaEntry {
                id: Uuid::new_v4().to_string(),
                kind: QaKind::Answer,
                text: answer.answer,
                created_at: Utc::now(),
                sources: Some(answer.sources),
            },
            Err(err) => {
                eprintln!("Q&A request failed: {}", err);
                QaEntry {
                    id: Uuid::new_v4().to_string(),
                    kind: QaKind::Answer,
                    text: FALLBACK_ANSWER.to_string(),
                    created_at: Utc::now(),
                    sources: None,
                }
            }
        };

        self.entries.push(entry.clone());
        state.save_json(QA_HISTORY_KEY, &self.entries)?;
        Ok(entry)
    }

    /// Empty the transcript and erase its persisted copy. Idempotent.
    pub fn clear(&mut self, state: &StateDir) -> Result<()> {
        self.entries.clear();
        state.remove(QA_HISTORY_KEY)
    }
}

// ============ CLI entry points ============

pub async fn run_ask(config: &Config, question: &str) -> Result<()> {
    let backend = session::require_backend(config)?;
    let state = StateDir::new(&config.storage.dir);
    let mut transcript = Transcript::load(&state);

    let entry = transcript.ask(&backend, &state, question).await?;
    println!("{}", entry.text);
    if let Some(ref sources) = entry.sources {
        if !sources.is_empty() {
            println!();
            println!("sources: {}", sources.join(", "));
        }
    }
    Ok(())
}

pub fn run_history(config: &Config) -> Result<()> {
    let state = StateDir::new(&config.storage.dir);
    let transcript = Transcript::load(&state);

    if transcript.entries().is_empty() {
        println!("No questions asked yet.");
        return Ok(());
    }

    for entry in transcript.entries() {
        let who = match entry.kind {
            QaKind::Question => "you",
            QaKind::Answer => "assistant",
        };
        println!("[{}] {}:", entry.created_at.format("%Y-%m-%d %H:%M"), who);
        println!("{}", entry.text);
        if let Some(ref sources) = entry.sources {
            if !sources.is_empty() {
                println!("sources: {}", sources.join(", "));
            }
        }
        println!();
    }
    Ok(())
}

pub fn run_clear_history(config: &Config) -> Result<()> {
    let state = StateDir::new(&config.storage.dir);
    let mut transcript = Transcript::load(&state);
    transcript.clear(&state)?;
    println!("History cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QaAnswer;
    use crate::testutil::FakeBackend;

    fn state_in(tmp: &tempfile::TempDir) -> StateDir {
        StateDir::new(tmp.path().join("state"))
    }

    #[tokio::test]
    async fn test_ask_appends_question_then_answer_with_sources() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend {
            answer: Some(QaAnswer {
                answer: "X is Y".to_string(),
                sources: vec!["doc1".to_string()],
            }),
            ..Default::default()
        };

        let mut transcript = Transcript::load(&state);
        let entry = transcript
            .ask(&backend, &state, "What is X?")
            .await
            .unwrap();

        assert_eq!(entry.text, "X is Y");
        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, QaKind::Question);
        assert_eq!(entries[0].text, "What is X?");
        assert!(entries[0].sources.is_none());
        assert_eq!(entries[1].kind, QaKind::Answer);
        assert_eq!(entries[1].sources.as_deref(), Some(&["doc1".to_string()][..]));
    }

    #[tokio::test]
    async fn test_ask_failure_appends_question_plus_fallback() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend::failing();

        let mut transcript = Transcript::load(&state);
        let entry = transcript
            .ask(&backend, &state, "What is X?")
            .await
            .unwrap();

        assert_eq!(entry.text, FALLBACK_ANSWER);
        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, QaKind::Question);
        assert_eq!(entries[1].kind, QaKind::Answer);
        assert_eq!(entries[1].text, FALLBACK_ANSWER);
        assert!(entries[1].sources.is_none());
    }

    #[tokio::test]
    async fn test_every_ask_appends_exactly_two_entries_in_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend::default();

        let mut transcript = Transcript::load(&state);
        transcript.ask(&backend, &state, "first?").await.unwrap();
        transcript.ask(&backend, &state, "second?").await.unwrap();

        let kinds: Vec<QaKind> = transcript.entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![QaKind::Question, QaKind::Answer, QaKind::Question, QaKind::Answer]
        );
        assert_eq!(transcript.entries()[2].text, "second?");
    }

    #[tokio::test]
    async fn test_ask_rejected_while_in_flight() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend::default();

        let mut transcript = Transcript::load(&state);
        transcript.in_flight = true;

        let err = transcript
            .ask(&backend, &state, "too soon?")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("in flight"));
        assert!(transcript.entries().is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected_before_any_request() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend::default();

        let mut transcript = Transcript::load(&state);
        assert!(transcript.ask(&backend, &state, "   ").await.is_err());
        assert!(transcript.entries().is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transcript_persists_and_restores_across_loads() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend::default();

        let mut transcript = Transcript::load(&state);
        transcript.ask(&backend, &state, "What is X?").await.unwrap();

        let restored = Transcript::load(&state);
        assert_eq!(restored.entries().len(), 2);
        assert_eq!(restored.entries()[0].text, "What is X?");
        assert_eq!(
            restored.entries()[0].created_at,
            transcript.entries()[0].created_at
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent_and_erases_persisted_copy() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_in(&tmp);
        let backend = FakeBackend::default();

        let mut transcript = Transcript::load(&state);
        transcript.ask(&backend, &state, "What is X?").await.unwrap();
        assert!(state.read(QA_HISTORY_KEY).is_some());

        transcript.clear(&state).unwrap();
        assert!(transcript.entries().is_empty());
        assert!(state.read(QA_HISTORY_KEY).is_none());

        transcript.clear(&state).unwrap();
        assert!(transcript.entries().is_empty());
    }
}
