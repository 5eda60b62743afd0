// src/error.rs
// =============================================================================
// The error type shared by every module in the crate.
//
// Error kinds:
// - Network / Timeout: something went wrong talking to the remote host
// - Io: reading or writing a local file failed
// - Config: the URL list or a command-line option is unusable
// - Task: a pipeline task panicked or was cancelled
// - Encode: the JSON report could not be serialized
//
// Per-URL errors (Network, Timeout, Io, Task) are stored in that URL's
// result slot. Config errors are fatal to the whole run.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error for us
// - #[source]: links an error to the lower-level error that caused it
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while fetching and analyzing files.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection refused, DNS failure, or a non-2xx status.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The request timed out, or the global deadline passed first.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// A local file could not be read or written.
    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The URL source is missing or malformed, or an option is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The task processing this URL panicked or was cancelled.
    #[error("task for {url} did not complete: {message}")]
    Task { url: String, message: String },

    #[error("failed to encode report: {0}")]
    Encode(String),
}

impl Error {
    /// Builds an `Io` error, remembering which path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Converts a reqwest error into `Timeout` or `Network`.
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
            }
        } else {
            Error::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// This error followed by every underlying cause, joined with ": ".
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = std::error::Error::source(err);
        }
        message
    }

    /// True for errors caused by the remote side (including timeouts).
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
