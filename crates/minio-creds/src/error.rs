//! Error types for minio-creds

use minio_creds_core::{ConfigError, StatementError, TemplateError};
use std::fmt;
use thiserror::Error;

/// Result type alias using minio-creds's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing configuration, or an unusable username template
    #[error("invalid configuration: {0}")]
    ConfigValidation(#[from] ConfigError),

    /// The admin endpoint could not be reached or rejected the root credential
    #[error("client test of login failed: {0}")]
    Connection(#[source] RemoteError),

    /// Zero, several, or undecodable creation statements
    #[error("unable to read creation_statements: {0}")]
    Statement(#[from] StatementError),

    /// The stored username template failed for this request
    #[error("unable to generate username: {0}")]
    Generation(#[source] TemplateError),

    /// The admin endpoint rejected an operation
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The request was cancelled while a remote call was in flight
    #[error("{operation}: request cancelled")]
    Cancelled { operation: RemoteOperation },

    /// The request deadline passed while a remote call was in flight
    #[error("{operation}: deadline exceeded")]
    DeadlineExceeded { operation: RemoteOperation },

    /// No configuration has been committed yet
    #[error("database has not been initialized")]
    NotConfigured,

    /// The database was closed
    #[error("database is closed")]
    Closed,

    /// Error whose message had secret values substituted
    #[error("{message}")]
    Sanitized { kind: ErrorKind, message: String },
}

impl Error {
    /// Classification that survives sanitization
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigValidation(_) => ErrorKind::ConfigValidation,
            Error::Connection(_) => ErrorKind::Connection,
            Error::Statement(_) => ErrorKind::Statement,
            Error::Generation(_) => ErrorKind::Generation,
            Error::Remote(_) => ErrorKind::Remote,
            Error::Cancelled { .. } | Error::DeadlineExceeded { .. } => ErrorKind::Cancelled,
            Error::NotConfigured => ErrorKind::NotConfigured,
            Error::Closed => ErrorKind::Closed,
            Error::Sanitized { kind, .. } => *kind,
        }
    }
}

/// Broad error classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigValidation,
    Connection,
    Statement,
    Generation,
    Remote,
    Cancelled,
    NotConfigured,
    Closed,
}

/// A remote step, with the user and policy it touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperation {
    Connect { endpoint: String },
    CreateUser { username: String },
    AttachPolicy { policy: String, username: String },
    UpdatePassword { username: String },
    DeleteUser { username: String },
    Probe,
}

impl RemoteOperation {
    /// The user this step addressed, if any
    pub fn username(&self) -> Option<&str> {
        match self {
            RemoteOperation::CreateUser { username }
            | RemoteOperation::AttachPolicy { username, .. }
            | RemoteOperation::UpdatePassword { username }
            | RemoteOperation::DeleteUser { username } => Some(username),
            RemoteOperation::Connect { .. } | RemoteOperation::Probe => None,
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::Connect { endpoint } => write!(f, "connect to {}", endpoint),
            RemoteOperation::CreateUser { username } => write!(f, "create user: {}", username),
            RemoteOperation::AttachPolicy { policy, username } => {
                write!(f, "set policy {} for user: {}", policy, username)
            }
            RemoteOperation::UpdatePassword { username } => {
                write!(f, "change password for user: {}", username)
            }
            RemoteOperation::DeleteUser { username } => write!(f, "delete user: {}", username),
            RemoteOperation::Probe => write!(f, "query server info"),
        }
    }
}

/// A remote step that failed
#[derive(Error, Debug)]
#[error("can't {operation}, {source}")]
pub struct RemoteError {
    pub operation: RemoteOperation,
    #[source]
    pub source: AdminError,
}

impl RemoteError {
    pub fn new(operation: RemoteOperation, source: AdminError) -> Self {
        Self { operation, source }
    }
}

/// Failures reported by an admin API implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// The server answered and refused the request
    #[error("{code}: {message}")]
    Rejected { code: String, message: String },

    /// The request never got an answer
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The configured URL does not name a usable endpoint
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl AdminError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
