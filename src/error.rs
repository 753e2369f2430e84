//! Client error taxonomy.
//!
//! Every remote operation fails in one of three ways:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`ClientError::Network`] | The request never completed (connect, timeout, bad body) |
//! | [`ClientError::Http`] | The backend answered with a non-2xx status |
//! | [`ClientError::Validation`] | A client-side check failed before any request was made |
//!
//! All three are caught at the command boundary and turned into a
//! user-visible message; none are fatal to the process. Nothing retries —
//! a failed operation is re-run by the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not complete.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status. `message` carries the
    /// response's `message` field when present, else the status text.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A client-side check failed before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    /// Shorthand for a non-2xx failure.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ClientError::Http {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
