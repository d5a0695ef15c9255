//! Configuration store
//!
//! Holds the root configuration and its compiled username template as one
//! value behind a single `RwLock`. Readers always see a pair committed by
//! the same `configure` call.

use crate::error::{Error, Result};
use crate::security::RedactionTable;
use minio_creds_core::{RootConfig, UsernameTemplate};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

/// Configuration and generator committed together
#[derive(Debug, Clone)]
pub struct Committed {
    pub config: RootConfig,
    pub generator: Arc<UsernameTemplate>,
}

/// Lifecycle position of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unconfigured,
    Configured,
    Closed,
}

#[derive(Debug)]
enum StoreState {
    Unconfigured,
    Configured(Committed),
    Closed,
}

#[derive(Debug)]
pub struct ConfigStore {
    state: RwLock<StoreState>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::Unconfigured),
        }
    }

    /// Replace configuration and generator under the write lock
    pub async fn configure(&self, config: RootConfig, generator: UsernameTemplate) -> Result<()> {
        let mut state = self.state.write().await;
        if matches!(*state, StoreState::Closed) {
            return Err(Error::Closed);
        }

        *state = StoreState::Configured(Committed {
            config,
            generator: Arc::new(generator),
        });
        debug!("Committed new configuration");
        Ok(())
    }

    /// Shared read of the committed pair.
    ///
    /// The guard keeps writers out until it is dropped, so an operation
    /// holding it runs entirely against one configuration.
    pub async fn read(&self) -> Result<RwLockReadGuard<'_, Committed>> {
        let guard = self.state.read().await;
        RwLockReadGuard::try_map(guard, |state| match state {
            StoreState::Configured(committed) => Some(committed),
            _ => None,
        })
        .map_err(|guard| match *guard {
            StoreState::Closed => Error::Closed,
            _ => Error::NotConfigured,
        })
    }

    /// Copy of the committed pair, if any
    pub async fn snapshot(&self) -> Option<Committed> {
        match &*self.state.read().await {
            StoreState::Configured(committed) => Some(committed.clone()),
            _ => None,
        }
    }

    /// Placeholders for the secrets of the current configuration
    pub async fn redaction_table(&self) -> RedactionTable {
        match &*self.state.read().await {
            StoreState::Configured(committed) => RedactionTable::from_config(&committed.config),
            _ => RedactionTable::default(),
        }
    }

    /// Enter the terminal state, dropping any configuration
    pub async fn close(&self) {
        *self.state.write().await = StoreState::Closed;
    }

    pub async fn state(&self) -> LifecycleState {
        match *self.state.read().await {
            StoreState::Unconfigured => LifecycleState::Unconfigured,
            StoreState::Configured(_) => LifecycleState::Configured,
            StoreState::Closed => LifecycleState::Closed,
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minio_creds_core::DEFAULT_USERNAME_TEMPLATE;
    use serde_json::json;
    use std::time::Duration;

    fn config(password: &str) -> RootConfig {
        let raw = json!({
            "username": "admin",
            "password": password,
            "url": "store.local:9000",
            "useSSL": "false",
        });
        match raw {
            serde_json::Value::Object(map) => RootConfig::from_raw(map).unwrap(),
            _ => unreachable!(),
        }
    }

    fn template(source: &str) -> UsernameTemplate {
        UsernameTemplate::compile(source).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_read_fails() {
        let store = ConfigStore::new();
        assert!(matches!(store.read().await, Err(Error::NotConfigured)));
        assert!(store.snapshot().await.is_none());
        assert!(store.redaction_table().await.is_empty());
        assert_eq!(store.state().await, LifecycleState::Unconfigured);
    }

    #[tokio::test]
    async fn test_snapshot_returns_committed_pair() {
        let store = ConfigStore::new();
        store
            .configure(config("first"), template(DEFAULT_USERNAME_TEMPLATE))
            .await
            .unwrap();
        store
            .configure(config("second"), template("{{ role_name }}"))
            .await
            .unwrap();

        let committed = store.snapshot().await.unwrap();
        assert_eq!(committed.config.connection().password.expose(), "second");
        assert_eq!(committed.generator.source(), "{{ role_name }}");
        assert_eq!(store.state().await, LifecycleState::Configured);
    }

    #[tokio::test]
    async fn test_writer_waits_for_reader() {
        let store = Arc::new(ConfigStore::new());
        store
            .configure(config("first"), template("{{ role_name }}"))
            .await
            .unwrap();

        let guard = store.read().await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .configure(config("second"), template("{{ display_name }}"))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!writer.is_finished());
        assert_eq!(guard.config.connection().password.expose(), "first");

        drop(guard);
        writer.await.unwrap().unwrap();
        let committed = store.snapshot().await.unwrap();
        assert_eq!(committed.config.connection().password.expose(), "second");
    }

    #[tokio::test]
    async fn test_closed_is_terminal() {
        let store = ConfigStore::new();
        store
            .configure(config("first"), template("{{ role_name }}"))
            .await
            .unwrap();
        store.close().await;

        assert!(matches!(store.read().await, Err(Error::Closed)));
        assert!(matches!(
            store
                .configure(config("again"), template("{{ role_name }}"))
                .await,
            Err(Error::Closed)
        ));
        assert_eq!(store.state().await, LifecycleState::Closed);
    }
}
