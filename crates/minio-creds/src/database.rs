//! Credential lifecycle
//!
//! `MinioDatabase` is what the host drives: it validates and commits the
//! root configuration, then issues, rotates and revokes users on the admin
//! endpoint. Configuration changes take the store's write lock; every other
//! operation holds a shared read for its whole duration, so a request never
//! straddles two configurations and requests never wait on each other.

use crate::client::{AdminConnector, MinioClient};
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::security::RedactionTable;
use crate::store::{ConfigStore, LifecycleState};
use crate::types::{
    DeleteUserRequest, DeleteUserResponse, InitializeRequest, InitializeResponse, NewUserRequest,
    NewUserResponse, UpdateUserRequest, UpdateUserResponse, TYPE_NAME,
};
use async_trait::async_trait;
use minio_creds_core::{CreationStatement, RootConfig, UsernameTemplate};
use std::sync::Arc;
use tracing::{debug, info};

/// Operations the host invokes on a database plugin
#[async_trait]
pub trait Database: Send + Sync {
    /// Static type name
    fn type_name(&self) -> &'static str;

    /// Validate and commit a root configuration
    async fn initialize(
        &self,
        ctx: &RequestContext,
        req: InitializeRequest,
    ) -> Result<InitializeResponse>;

    /// Create a user for a role and return its generated name
    async fn new_user(&self, ctx: &RequestContext, req: NewUserRequest) -> Result<NewUserResponse>;

    /// Rotate a user's password
    async fn update_user(
        &self,
        ctx: &RequestContext,
        req: UpdateUserRequest,
    ) -> Result<UpdateUserResponse>;

    /// Remove a user
    async fn delete_user(
        &self,
        ctx: &RequestContext,
        req: DeleteUserRequest,
    ) -> Result<DeleteUserResponse>;

    /// Secret values of the current configuration and their placeholders
    async fn secret_values(&self) -> RedactionTable;

    async fn close(&self) -> Result<()>;
}

/// MinIO credential lifecycle manager
pub struct MinioDatabase {
    store: ConfigStore,
    connector: Arc<dyn AdminConnector>,
}

impl MinioDatabase {
    pub fn new(connector: Arc<dyn AdminConnector>) -> Self {
        Self {
            store: ConfigStore::new(),
            connector,
        }
    }

    pub async fn state(&self) -> LifecycleState {
        self.store.state().await
    }

    /// The configuration store backing this database
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }
}

#[async_trait]
impl Database for MinioDatabase {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn initialize(
        &self,
        ctx: &RequestContext,
        req: InitializeRequest,
    ) -> Result<InitializeResponse> {
        let config = RootConfig::from_raw(req.config)?;
        let generator = UsernameTemplate::compile_checked(config.username_template())?;

        if req.verify_connection {
            let client = MinioClient::build(self.connector.as_ref(), config.connection())
                .map_err(into_connection_error)?;
            client.probe(ctx).await.map_err(into_connection_error)?;
            debug!(endpoint = %client.config().endpoint, "Verified admin connection");
        }

        let response = InitializeResponse {
            config: config.raw().clone(),
        };

        let url = config.connection().url.clone();
        let use_ssl = config.connection().use_ssl;
        let custom_template = config.has_custom_template();
        self.store.configure(config, generator).await?;

        info!(
            url = %url,
            use_ssl,
            custom_template,
            "Initialized MinIO database"
        );
        Ok(response)
    }

    async fn new_user(&self, ctx: &RequestContext, req: NewUserRequest) -> Result<NewUserResponse> {
        let statement = CreationStatement::parse(&req.statements.commands)?;

        let committed = self.store.read().await?;

        let username = committed
            .generator
            .generate(&req.username_config)
            .map_err(Error::Generation)?;

        let client = MinioClient::build(self.connector.as_ref(), committed.config.connection())?;
        client
            .create_user(
                ctx,
                &username,
                req.password.expose(),
                &statement,
                req.expiration,
            )
            .await?;

        debug!(username = %username, policy = %statement.policy, "Issued credential");
        Ok(NewUserResponse { username })
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        req: UpdateUserRequest,
    ) -> Result<UpdateUserResponse> {
        let committed = self.store.read().await?;

        let Some(change) = req.password else {
            debug!(username = %req.username, "No password change requested");
            return Ok(UpdateUserResponse::default());
        };

        let client = MinioClient::build(self.connector.as_ref(), committed.config.connection())?;
        client
            .update_user(ctx, &req.username, change.new_password.expose())
            .await?;

        debug!(username = %req.username, "Rotated credential");
        Ok(UpdateUserResponse::default())
    }

    async fn delete_user(
        &self,
        ctx: &RequestContext,
        req: DeleteUserRequest,
    ) -> Result<DeleteUserResponse> {
        let committed = self.store.read().await?;

        let client = MinioClient::build(self.connector.as_ref(), committed.config.connection())?;
        client.delete_user(ctx, &req.username).await?;

        debug!(username = %req.username, "Revoked credential");
        Ok(DeleteUserResponse::default())
    }

    async fn secret_values(&self) -> RedactionTable {
        self.store.redaction_table().await
    }

    async fn close(&self) -> Result<()> {
        self.store.close().await;
        debug!("Closed MinIO database");
        Ok(())
    }
}

fn into_connection_error(err: Error) -> Error {
    match err {
        Error::Remote(remote) => Error::Connection(remote),
        other => other,
    }
}
