//! Dynamic MinIO credentials
//!
//! This crate issues, rotates and revokes MinIO users on behalf of a
//! secrets-management host:
//! - **Lifecycle**: configuration commit, user creation with a policy,
//!   password rotation, revocation
//! - **Concurrency**: one read-write lock around the configuration and its
//!   username generator; credential requests only ever share it
//! - **Redaction**: configured secrets are replaced by placeholders before
//!   any error reaches the host
//! - **Cancellation**: every remote call honours the request's token and
//!   deadline
//!
//! No admin client ships with this crate. The host supplies an
//! [`AdminConnector`] that opens an [`AdminApi`] session for a
//! [`ClientConfig`]; [`new`] takes it and returns the database to serve.

pub mod client;
pub mod context;
pub mod database;
pub mod error;
pub mod security;
pub mod store;
pub mod types;

pub use client::{AccountStatus, AdminApi, AdminConnector, ClientConfig, MinioClient};
pub use context::RequestContext;
pub use database::{Database, MinioDatabase};
pub use error::{AdminError, Error, ErrorKind, RemoteError, RemoteOperation, Result};
pub use security::{ErrorSanitizer, RedactionTable};
pub use store::{ConfigStore, LifecycleState};
pub use types::{
    ChangePassword, DeleteUserRequest, DeleteUserResponse, InitializeRequest, InitializeResponse,
    NewUserRequest, NewUserResponse, Statements, UpdateUserRequest, UpdateUserResponse, TYPE_NAME,
};

pub use minio_creds_core::{
    CreationStatement, RawConfig, RootConfig, SecureString, UsernameMetadata, UsernameTemplate,
};

use std::sync::Arc;

/// Create the database as served to the host, wrapped so errors never
/// carry the root password
pub fn new(connector: Arc<dyn AdminConnector>) -> ErrorSanitizer<MinioDatabase> {
    ErrorSanitizer::new(MinioDatabase::new(connector))
}
