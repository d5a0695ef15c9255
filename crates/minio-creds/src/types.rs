//! Request and response types exchanged with the host

use chrono::{DateTime, Utc};
use minio_creds_core::{RawConfig, SecureString, UsernameMetadata};
use std::fmt;

/// Database type name reported to the host
pub const TYPE_NAME: &str = "minio";

#[derive(Clone, Default)]
pub struct InitializeRequest {
    pub config: RawConfig,
    /// Probe the endpoint with the root credential before committing
    pub verify_connection: bool,
}

#[derive(Clone, Default)]
pub struct InitializeResponse {
    /// The configuration as committed
    pub config: RawConfig,
}

// Configuration maps carry the root password, so only keys are printed
impl fmt::Debug for InitializeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializeRequest")
            .field("config_keys", &self.config.keys().collect::<Vec<_>>())
            .field("verify_connection", &self.verify_connection)
            .finish()
    }
}

impl fmt::Debug for InitializeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializeResponse")
            .field("config_keys", &self.config.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Role-defined statements, serialized as strings
#[derive(Debug, Clone, Default)]
pub struct Statements {
    pub commands: Vec<String>,
}

impl Statements {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUserRequest {
    pub username_config: UsernameMetadata,
    pub statements: Statements,
    pub password: SecureString,
    pub expiration: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserResponse {
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub new_password: SecureString,
}

#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub username: String,
    /// `None` leaves the password unchanged
    pub password: Option<ChangePassword>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserResponse {}

#[derive(Debug, Clone)]
pub struct DeleteUserRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteUserResponse {}
