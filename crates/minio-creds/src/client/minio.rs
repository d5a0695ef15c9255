//! Credential operations against a MinIO admin endpoint
//!
//! A `MinioClient` is built from the current root configuration for each
//! request. It only knows the handful of calls the lifecycle needs.

use super::{AccountStatus, AdminApi, AdminConnector, ClientConfig};
use crate::context::{Interrupt, RequestContext};
use crate::error::{AdminError, Error, RemoteError, RemoteOperation, Result};
use chrono::{DateTime, Utc};
use minio_creds_core::{ConnectionConfig, CreationStatement};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct MinioClient {
    api: Arc<dyn AdminApi>,
    config: ClientConfig,
}

impl MinioClient {
    /// Open an admin session for the given root connection settings
    pub fn build(connector: &dyn AdminConnector, connection: &ConnectionConfig) -> Result<Self> {
        let connect_failed = |source: AdminError| {
            RemoteError::new(
                RemoteOperation::Connect {
                    endpoint: connection.url.clone(),
                },
                source,
            )
        };

        let config = ClientConfig::from_connection(connection).map_err(connect_failed)?;
        let api = connector.connect(&config).map_err(connect_failed)?;

        debug!(endpoint = %config.endpoint, secure = config.secure, "Built admin client");
        Ok(Self { api, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a user, then attach its policy.
    ///
    /// The two calls are not atomic: when attaching the policy fails the
    /// user is left in place and the error names the policy step.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
        statement: &CreationStatement,
        expiration: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if let Some(expiration) = expiration {
            // The admin API has no per-user expiry; the host revokes on lease end
            debug!(username, %expiration, "Ignoring expiration hint");
        }

        self.call(
            ctx,
            RemoteOperation::CreateUser {
                username: username.to_string(),
            },
            self.api.add_user(username, password),
        )
        .await?;

        self.call(
            ctx,
            RemoteOperation::AttachPolicy {
                policy: statement.policy.clone(),
                username: username.to_string(),
            },
            self.api.set_policy(&statement.policy, username, false),
        )
        .await?;

        debug!(username, policy = %statement.policy, "Created user");
        Ok(())
    }

    /// Set a new password, keeping the account enabled
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<()> {
        self.call(
            ctx,
            RemoteOperation::UpdatePassword {
                username: username.to_string(),
            },
            self.api.set_user(username, password, AccountStatus::Enabled),
        )
        .await
    }

    pub async fn delete_user(&self, ctx: &RequestContext, username: &str) -> Result<()> {
        self.call(
            ctx,
            RemoteOperation::DeleteUser {
                username: username.to_string(),
            },
            self.api.remove_user(username),
        )
        .await
    }

    /// Check the endpoint answers and accepts the root credential
    pub async fn probe(&self, ctx: &RequestContext) -> Result<()> {
        self.call(ctx, RemoteOperation::Probe, self.api.server_info())
            .await
    }

    async fn call<F>(&self, ctx: &RequestContext, operation: RemoteOperation, fut: F) -> Result<()>
    where
        F: Future<Output = std::result::Result<(), AdminError>>,
    {
        match ctx.run(fut).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => {
                warn!(
                    endpoint = %self.config.endpoint,
                    operation = %operation,
                    error = %source,
                    "Admin call failed"
                );
                Err(RemoteError::new(operation, source).into())
            }
            Err(Interrupt::Cancelled) => Err(Error::Cancelled { operation }),
            Err(Interrupt::DeadlineExceeded) => Err(Error::DeadlineExceeded { operation }),
        }
    }
}
