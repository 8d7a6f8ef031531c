use std::{collections::BTreeMap, path::Path, sync::Arc};

use async_trait::async_trait;
use models::Record;
use serde::Deserialize;
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::info;

use super::RecordStore;
use crate::errors::StoreError;

/// In-process record store for local runs and tests.
///
/// Scans return records ordered by key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<RwLock<BTreeMap<String, Record>>>,
}

/// Accepted seed file layouts: a list of `{key, value}` objects or a plain
/// `{ "<key>": <value> }` map.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    List(Vec<Record>),
    Map(serde_json::Map<String, Value>),
}

impl InMemoryRecordStore {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let map = records.into_iter().map(|r| (r.key.clone(), r)).collect();
        Self { inner: Arc::new(RwLock::new(map)) }
    }

    /// Load records from a JSON seed file.
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| StoreError::Seed(format!("cannot read {}: {e}", path.display())))?;
        let seed: SeedFile = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;
        let records: Vec<Record> = match seed {
            SeedFile::List(list) => list,
            SeedFile::Map(map) => map
                .into_iter()
                .map(|(key, value)| Record { key, value: Some(value) })
                .collect(),
        };
        info!(path = %path.display(), count = records.len(), "seeded in-memory store");
        Ok(Self::from_records(records))
    }

    #[cfg(test)]
    pub(crate) async fn insert(&self, record: Record) {
        let mut map = self.inner.write().await;
        map.insert(record.key.clone(), record);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn scan(&self) -> Result<Vec<Record>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.values().cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<Record>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }
}
