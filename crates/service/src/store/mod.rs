//! Record store abstractions
//!
//! The service only ever reads: a full scan and a point lookup by primary key.
//! Backends are picked at startup from `configs::StoreConfig` and shared as
//! `Arc<dyn RecordStore>` across requests.

pub mod dynamo;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use configs::{StoreBackend, StoreConfig};
use models::Record;
use tracing::info;

use crate::errors::StoreError;

pub use dynamo::DynamoDbRecordStore;
pub use memory::InMemoryRecordStore;

/// Read access to a key-value table of translations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record in the table, in whatever order the backend yields them.
    async fn scan(&self) -> Result<Vec<Record>, StoreError>;
    /// The record stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Record>, StoreError>;
}

/// Build the configured backend. Called once at process startup.
pub async fn connect(cfg: &StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    let store: Arc<dyn RecordStore> = match cfg.backend {
        StoreBackend::DynamoDb => Arc::new(DynamoDbRecordStore::connect(cfg).await),
        StoreBackend::Memory => {
            let store = match &cfg.seed_path {
                Some(path) => InMemoryRecordStore::from_json_file(path).await?,
                None => InMemoryRecordStore::default(),
            };
            Arc::new(store)
        }
    };
    info!(backend = %cfg.backend, "record store ready");
    Ok(store)
}

/// Stores with canned behaviour for tests and doc examples
pub mod mock {
    use super::*;

    /// Fails every call with the given message.
    #[derive(Debug, Clone)]
    pub struct FailingRecordStore {
        message: String,
    }

    impl FailingRecordStore {
        pub fn new(message: impl Into<String>) -> Self {
            Self { message: message.into() }
        }
    }

    #[async_trait]
    impl RecordStore for FailingRecordStore {
        async fn scan(&self) -> Result<Vec<Record>, StoreError> {
            Err(StoreError::Backend(self.message.clone()))
        }

        async fn get(&self, _key: &str) -> Result<Option<Record>, StoreError> {
            Err(StoreError::Backend(self.message.clone()))
        }
    }
}
