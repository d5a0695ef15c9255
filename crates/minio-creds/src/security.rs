//! Secret redaction
//!
//! Provides:
//! - `RedactionTable`, mapping configured secret values to placeholders
//! - `ErrorSanitizer`, a `Database` wrapper that scrubs those values from
//!   every error message before it leaves the plugin

use crate::context::RequestContext;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::types::{
    DeleteUserRequest, DeleteUserResponse, InitializeRequest, InitializeResponse, NewUserRequest,
    NewUserResponse, UpdateUserRequest, UpdateUserResponse,
};
use async_trait::async_trait;
use minio_creds_core::RootConfig;
use std::collections::HashMap;
use tracing::debug;

/// Secret value to display placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionTable {
    replacements: HashMap<String, String>,
}

impl RedactionTable {
    /// Build the table for a configuration's sensitive keys.
    ///
    /// A password of `0pen5e5ame` maps to `[password]`. Empty values are
    /// skipped since they would match everywhere.
    pub fn from_config(config: &RootConfig) -> Self {
        let replacements = config
            .secret_values()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (value.to_string(), format!("[{}]", key)))
            .collect();
        Self { replacements }
    }

    pub fn get(&self, secret: &str) -> Option<&str> {
        self.replacements.get(secret).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.replacements
            .iter()
            .map(|(secret, placeholder)| (secret.as_str(), placeholder.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.replacements
    }

    /// Replace every occurrence of every secret, longest secrets first
    pub fn apply(&self, text: &str) -> String {
        let mut secrets: Vec<_> = self.iter().collect();
        secrets.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        secrets
            .into_iter()
            .fold(text.to_string(), |acc, (secret, placeholder)| {
                acc.replace(secret, placeholder)
            })
    }
}

/// Wraps a database so no error message carries a configured secret
pub struct ErrorSanitizer<D> {
    inner: D,
}

impl<D: Database> ErrorSanitizer<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    async fn sanitize<T: Send>(&self, result: Result<T>) -> Result<T> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let table = self.inner.secret_values().await;
        let message = err.to_string();
        let redacted = table.apply(&message);
        if redacted == message {
            return Err(err);
        }

        debug!(kind = ?err.kind(), "Redacted secret from error message");
        Err(Error::Sanitized {
            kind: err.kind(),
            message: redacted,
        })
    }
}

#[async_trait]
impl<D: Database> Database for ErrorSanitizer<D> {
    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    async fn initialize(
        &self,
        ctx: &RequestContext,
        req: InitializeRequest,
    ) -> Result<InitializeResponse> {
        let result = self.inner.initialize(ctx, req).await;
        self.sanitize(result).await
    }

    async fn new_user(&self, ctx: &RequestContext, req: NewUserRequest) -> Result<NewUserResponse> {
        let result = self.inner.new_user(ctx, req).await;
        self.sanitize(result).await
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        req: UpdateUserRequest,
    ) -> Result<UpdateUserResponse> {
        let result = self.inner.update_user(ctx, req).await;
        self.sanitize(result).await
    }

    async fn delete_user(
        &self,
        ctx: &RequestContext,
        req: DeleteUserRequest,
    ) -> Result<DeleteUserResponse> {
        let result = self.inner.delete_user(ctx, req).await;
        self.sanitize(result).await
    }

    async fn secret_values(&self) -> RedactionTable {
        self.inner.secret_values().await
    }

    async fn close(&self) -> Result<()> {
        let result = self.inner.close().await;
        self.sanitize(result).await
    }
}
