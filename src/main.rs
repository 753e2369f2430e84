//! # Knowledge Base CLI (`kb`)
//!
//! The `kb` binary is the command-line interface to a knowledge-base
//! backend. It provides commands for session management, document CRUD,
//! AI summarization and tagging, search, and Q&A.
//!
//! ## Usage
//!
//! ```bash
//! kb --config ./config/kb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kb login` | Authenticate and persist the session |
//! | `kb register` | Create an account (then log in separately) |
//! | `kb logout` | Clear the stored session |
//! | `kb whoami` | Show the signed-in account |
//! | `kb list` | List documents with client-side filters |
//! | `kb get <id>` | Show one document in full |
//! | `kb create` | Create a document |
//! | `kb edit <id>` | Edit a document's title, content, or tags |
//! | `kb delete <id>` | Delete a document |
//! | `kb summarize <id>` | Generate an AI summary for a document |
//! | `kb generate-tags <id>` | Generate AI tags for a document |
//! | `kb search "<query>"` | Search documents (keyword or `--semantic`) |
//! | `kb recent` | Show recent search queries |
//! | `kb ask "<question>"` | Ask a question answered from documents |
//! | `kb history` | Show the Q&A transcript |
//! | `kb clear-history` | Empty the Q&A transcript |
//!
//! ## Examples
//!
//! ```bash
//! kb login --email you@example.com --password secret
//! kb create --title "Auth Guide" --content "How login works." --tag auth --tag security
//! kb list --query auth --tag security
//! kb search "token rotation" --semantic
//! kb ask "How do we rotate tokens?"
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kbase::{config, documents, editor, qa, search, session};

/// Knowledge Base CLI — a client for a knowledge-base service with
/// documents, tags, search, and Q&A.
///
/// All commands accept a `--config` flag pointing to a TOML
/// configuration file. See `config/kb.example.toml` for a full example;
/// when the file does not exist, built-in defaults are used
/// (backend at `http://localhost:5000`, state under `./data`).
#[derive(Parser)]
#[command(
    name = "kb",
    about = "Knowledge base client — documents, tags, search, and Q&A over a backend API",
    version,
    long_about = "kb talks to a knowledge-base backend over JSON-HTTP. It keeps your session, \
    Q&A history, and recent searches in a local state directory, and leaves all storage, \
    ranking, and AI work to the backend."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/kb.toml`. Backend URL and the local state
    /// directory are read from this file.
    #[arg(long, global = true, default_value = "./config/kb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Authenticate and persist the session.
    ///
    /// On success the bearer token and account record are stored in the
    /// local state directory and used by every subsequent command.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account.
    ///
    /// Registration does not log you in — run `kb login` afterwards.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Clear the stored session. Safe to run when already logged out.
    Logout,

    /// Show the signed-in account.
    Whoami,

    /// List documents, filtered client-side.
    ///
    /// Both filters compose: a document must match the query text AND
    /// carry every selected tag.
    List {
        /// Case-insensitive substring matched against title, content, and summary.
        #[arg(long)]
        query: Option<String>,

        /// Keep only documents carrying this tag (repeatable; AND semantics).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Show one document in full.
    Get {
        /// Document id.
        id: String,
    },

    /// Create a document.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,

        /// Tag the new document (repeatable; trimmed, lowercased, deduplicated).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit a document's title, content, or tags.
    ///
    /// Tag changes are applied locally and committed together with the
    /// other fields in a single update request.
    Edit {
        /// Document id.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,

        /// Add a tag (repeatable).
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,

        /// Remove a tag (repeatable).
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },

    /// Delete a document.
    Delete {
        /// Document id.
        id: String,
    },

    /// Ask the backend to generate an AI summary for a document.
    Summarize {
        /// Document id.
        id: String,
    },

    /// Ask the backend to generate AI tags for a document.
    GenerateTags {
        /// Document id.
        id: String,
    },

    /// Search documents.
    ///
    /// Keyword ranking by default; `--semantic` selects the backend's
    /// semantic ranking mode. Successful queries are remembered in the
    /// recent-search list.
    Search {
        /// The search query string.
        query: String,

        /// Use the backend's semantic ranking mode.
        #[arg(long)]
        semantic: bool,
    },

    /// Show recent search queries, most recent first.
    Recent,

    /// Ask a question answered from document content.
    Ask {
        /// The question to ask.
        question: String,
    },

    /// Show the Q&A transcript.
    History,

    /// Empty the Q&A transcript and erase its persisted copy.
    ClearHistory,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Login { email, password } => {
            session::run_login(&cfg, &email, &password).await?;
        }
        Commands::Register { email, password } => {
            session::run_register(&cfg, &email, &password).await?;
        }
        Commands::Logout => {
            session::run_logout(&cfg)?;
        }
        Commands::Whoami => {
            session::run_whoami(&cfg)?;
        }
        Commands::List { query, tags } => {
            documents::run_list(&cfg, query, tags).await?;
        }
        Commands::Get { id } => {
            documents::run_get(&cfg, &id).await?;
        }
        Commands::Create {
            title,
            content,
            tags,
        } => {
            editor::run_create(&cfg, title, content, tags).await?;
        }
        Commands::Edit {
            id,
            title,
            content,
            add_tags,
            remove_tags,
        } => {
            editor::run_edit(&cfg, &id, title, content, add_tags, remove_tags).await?;
        }
        Commands::Delete { id } => {
            documents::run_delete(&cfg, &id).await?;
        }
        Commands::Summarize { id } => {
            documents::run_summarize(&cfg, &id).await?;
        }
        Commands::GenerateTags { id } => {
            documents::run_generate_tags(&cfg, &id).await?;
        }
        Commands::Search { query, semantic } => {
            search::run_search(&cfg, &query, semantic).await?;
        }
        Commands::Recent => {
            search::run_recent(&cfg)?;
        }
        Commands::Ask { question } => {
            qa::run_ask(&cfg, &question).await?;
        }
        Commands::History => {
            qa::run_history(&cfg)?;
        }
        Commands::ClearHistory => {
            qa::run_clear_history(&cfg)?;
        }
    }

    Ok(())
}
