//! # minio-creds-core
//!
//! Building blocks for issuing MinIO credentials:
//! - Root configuration validation and file loading
//! - Username template engine (Tera based)
//! - Creation statement parsing
//! - `SecureString` for password handling

pub mod config;
pub mod error;
pub mod secret;
pub mod statement;
pub mod template;

pub use config::{ConnectionConfig, RawConfig, RootConfig};
pub use error::{ConfigError, StatementError, TemplateError};
pub use secret::SecureString;
pub use statement::CreationStatement;
pub use template::{UsernameMetadata, UsernameTemplate, DEFAULT_USERNAME_TEMPLATE};
