//! Remote admin API seam
//!
//! The wire protocol of the MinIO admin endpoint lives behind [`AdminApi`].
//! [`MinioClient`] sequences those primitive calls into the operations the
//! credential lifecycle needs.

pub mod minio;

pub use minio::MinioClient;

use crate::error::AdminError;
use async_trait::async_trait;
use minio_creds_core::{ConnectionConfig, SecureString};
use std::sync::Arc;

/// Whether an account may authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Enabled,
    Disabled,
}

/// Primitive admin calls against the object-storage control plane
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Create an account with the given access key and secret
    async fn add_user(&self, access_key: &str, secret_key: &str) -> Result<(), AdminError>;

    /// Set the secret and status of an existing account
    async fn set_user(
        &self,
        access_key: &str,
        secret_key: &str,
        status: AccountStatus,
    ) -> Result<(), AdminError>;

    /// Attach a named policy to a user or group
    async fn set_policy(
        &self,
        policy: &str,
        entity: &str,
        is_group: bool,
    ) -> Result<(), AdminError>;

    /// Remove an account
    async fn remove_user(&self, access_key: &str) -> Result<(), AdminError>;

    /// Authenticated no-op used to verify connectivity
    async fn server_info(&self) -> Result<(), AdminError>;
}

/// Connection parameters for an admin session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host[:port]`, without scheme
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: SecureString,
    pub secure: bool,
}

impl ClientConfig {
    /// Derive admin session parameters from the root connection settings.
    ///
    /// `url` may be a bare `host[:port]` or carry a scheme and path; only
    /// the authority is kept.
    pub fn from_connection(connection: &ConnectionConfig) -> Result<Self, AdminError> {
        Ok(Self {
            endpoint: endpoint_from_url(&connection.url)?,
            access_key: connection.username.clone(),
            secret_key: connection.password.clone(),
            secure: connection.use_ssl,
        })
    }
}

fn endpoint_from_url(raw: &str) -> Result<String, AdminError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AdminError::invalid_endpoint(raw, "endpoint is empty"));
    }

    if !trimmed.contains("://") {
        return Ok(trimmed.trim_end_matches('/').to_string());
    }

    let parsed =
        url::Url::parse(trimmed).map_err(|e| AdminError::invalid_endpoint(raw, e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| AdminError::invalid_endpoint(raw, "URL has no host"))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Opens admin sessions
pub trait AdminConnector: Send + Sync {
    fn connect(&self, config: &ClientConfig) -> Result<Arc<dyn AdminApi>, AdminError>;
}

impl<F> AdminConnector for F
where
    F: Fn(&ClientConfig) -> Result<Arc<dyn AdminApi>, AdminError> + Send + Sync,
{
    fn connect(&self, config: &ClientConfig) -> Result<Arc<dyn AdminApi>, AdminError> {
        self(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(url: &str) -> ConnectionConfig {
        ConnectionConfig {
            username: "admin".to_string(),
            password: SecureString::new("s3cr3t"),
            url: url.to_string(),
            use_ssl: true,
        }
    }

    #[test]
    fn test_endpoint_with_scheme() {
        let config = ClientConfig::from_connection(&connection("https://store.local")).unwrap();
        assert_eq!(config.endpoint, "store.local");
        assert_eq!(config.access_key, "admin");
        assert!(config.secure);
    }

    #[test]
    fn test_endpoint_with_port_and_path() {
        let config =
            ClientConfig::from_connection(&connection("http://10.0.0.5:9000/minio/")).unwrap();
        assert_eq!(config.endpoint, "10.0.0.5:9000");
    }

    #[test]
    fn test_bare_endpoint_kept() {
        let config = ClientConfig::from_connection(&connection("store.local:9000")).unwrap();
        assert_eq!(config.endpoint, "store.local:9000");
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let err = ClientConfig::from_connection(&connection("  ")).unwrap_err();
        assert!(matches!(err, AdminError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = ClientConfig::from_connection(&connection("store.local")).unwrap();
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }
}
