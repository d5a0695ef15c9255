//! Error types for minio-creds-core

use thiserror::Error;

/// Result type alias for configuration handling
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required key absent from the configuration map
    #[error("{field:?} must be provided")]
    MissingField { field: String },

    /// Key present but not a string
    #[error("{field:?} must be a string")]
    NotAString { field: String },

    /// Key present but not a recognised boolean spelling
    #[error("{field:?} must be a boolean, got {value:?}")]
    InvalidBool { field: String, value: String },

    /// Username template failed to compile
    #[error("unable to initialize username template: {0}")]
    TemplateCompile(#[source] TemplateError),

    /// Username template compiled but could not produce a sample username
    #[error("invalid username template: {0}")]
    TemplateProbe(#[source] TemplateError),

    /// Configuration file could not be read
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse configuration file {path}: {message}")]
    Parse { path: String, message: String },
}

impl ConfigError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a wrong type error
    pub fn not_a_string(field: impl Into<String>) -> Self {
        Self::NotAString {
            field: field.into(),
        }
    }

    /// Create an invalid boolean error
    pub fn invalid_bool(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidBool {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a parse error
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Username template errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template source is not valid template syntax
    #[error("template syntax error: {message}")]
    Syntax { message: String },

    /// Template is syntactically valid but failed while rendering
    #[error("template execution failed: {message}")]
    Render { message: String },
}

impl TemplateError {
    pub(crate) fn syntax(err: &tera::Error) -> Self {
        Self::Syntax {
            message: describe(err),
        }
    }

    pub(crate) fn render(err: &tera::Error) -> Self {
        Self::Render {
            message: describe(err),
        }
    }
}

/// Tera keeps the useful part of a failure in the source chain
fn describe(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

/// Creation statement errors
#[derive(Error, Debug)]
pub enum StatementError {
    /// No statement was supplied for the role
    #[error("empty creation statements")]
    Empty,

    /// More than one statement was supplied for the role
    #[error("only 1 creation statement supported for creation, got {count}")]
    TooMany { count: usize },

    /// The statement is not a JSON policy binding
    #[error("unable to unmarshal {statement}: {source}")]
    Decode {
        statement: String,
        #[source]
        source: serde_json::Error,
    },

    /// The statement decoded but names no policy
    #[error("creation statement does not name a policy")]
    EmptyPolicy,
}
