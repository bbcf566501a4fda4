//! Cloud error types

use thiserror::Error;

/// Errors raised while orchestrating floating IP associations
#[derive(Error, Debug)]
pub enum CloudError {
    /// A floating IP address could not be mapped to exactly one id
    #[error("Unable to resolve floating IP {reference}: {reason}")]
    Resolution { reference: String, reason: String },

    /// A remote API call failed
    #[error("API error: {message}")]
    RemoteApi {
        /// HTTP status when the failure came from a response
        status: Option<u16>,
        message: String,
    },

    /// A failure wrapped with the identifiers of the operation
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CloudError>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        CloudError::RemoteApi {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::remote(Some(404), message)
    }

    /// Wrap this error with a context message
    pub fn context(self, context: impl Into<String>) -> Self {
        CloudError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// HTTP status of the innermost remote failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudError::RemoteApi { status, .. } => *status,
            CloudError::Context { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Attach context to a fallible call
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
