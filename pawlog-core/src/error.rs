//! Error type shared by the store and weather façades.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("{context} failed with status {status}: {body}")]
    Api {
        context: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The addressed document does not exist.
    #[error("document not found at '{0}'")]
    NotFound(String),

    /// The weather payload carried an empty condition list.
    #[error("weather response contained no condition entries")]
    NoConditions,

    /// The forecast payload carried a timezone offset or timestamp
    /// that does not denote a representable local time.
    #[error("forecast entry carried an invalid timestamp or timezone offset")]
    BadTimestamp,
}

impl Error {
    pub(crate) fn decode(context: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { context, source }
    }

    pub(crate) fn api(context: &'static str, status: reqwest::StatusCode, body: &str) -> Self {
        Error::Api {
            context,
            status,
            body: truncate_body(body),
        }
    }
}

/// Keep remote error bodies readable in logs and messages.
/// The cut must land on a char boundary; bodies are not guaranteed ASCII.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
