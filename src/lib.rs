//! # kbase
//!
//! A command-line client for a knowledge-base service.
//!
//! Users authenticate, create and tag text documents, search them
//! (keyword or semantic), and ask an AI assistant questions answered
//! from document content. All substantive work — persistence,
//! authentication, ranking, summarization, tagging, question answering —
//! happens in the backend, reached over JSON-HTTP. This crate is the
//! client: session lifecycle, document list synchronization and
//! filtering, the search/Q&A cycle, and the durable local state that
//! survives between invocations.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌───────────────┐
//! │ CLI (kb) │──▶│ Session store │──▶│ HTTP backend  │
//! └──────────┘   │ Documents     │   │ (reqwest)     │
//!                │ Search / Q&A  │   └───────────────┘
//!                └──────┬────────┘
//!                       ▼
//!                ┌──────────────┐
//!                │ Local state  │
//!                │ token, user, │
//!                │ history,     │
//!                │ recent       │
//!                └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kb register --email you@example.com --password secret
//! kb login --email you@example.com --password secret
//! kb create --title "Auth Guide" --content "How login works." --tag auth
//! kb search "authentication" --semantic
//! kb ask "How does login work?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and wire shapes |
//! | [`error`] | Client error taxonomy |
//! | [`client`] | [`client::Backend`] trait and its HTTP implementation |
//! | [`store`] | Durable local state files |
//! | [`session`] | Login/register/logout and session bootstrap |
//! | [`documents`] | Document list cache and client-side filtering |
//! | [`search`] | One-shot search and recent-search list |
//! | [`qa`] | Q&A transcript |
//! | [`editor`] | Create/edit flow for a single document |

pub mod client;
pub mod config;
pub mod documents;
pub mod editor;
pub mod error;
pub mod models;
pub mod qa;
pub mod search;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod testutil;
