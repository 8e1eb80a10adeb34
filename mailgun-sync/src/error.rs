//! Error types and error handling

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, rendering or publishing templates
#[derive(Debug, Error)]
pub enum SyncError {
    /// Filesystem error while reading templates or partials
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Template failed to compile or render
    #[error("failed to render template {template}: {message}")]
    Render {
        /// Template name
        template: String,
        /// Engine error message
        message: String,
    },

    /// Required credential or setting is not configured
    #[error("{0} is not set")]
    MissingCredential(&'static str),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        body: String,
    },

    /// Provider answered with a body we could not decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Create an I/O error for a path
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a render error for a template
    #[must_use]
    pub fn render(template: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Render {
            template: template.into(),
            message: message.to_string(),
        }
    }

    /// True when the provider reported the resource as missing
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<ureq::Error> for SyncError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => Self::Status {
                status,
                body: String::new(),
            },
            other => Self::Http(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

impl From<figment::Error> for SyncError {
    fn from(e: figment::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result alias for library operations
pub type SyncResult<T> = Result<T, SyncError>;
