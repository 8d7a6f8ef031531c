use std::sync::Arc;

use models::Record;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::store::RecordStore;

/// Result of a unified query: either the whole table or a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    All(Vec<Record>),
    One(Value),
}

/// Read-side business rules on top of a `RecordStore`, independent of the web framework.
#[derive(Clone)]
pub struct TranslationService {
    store: Arc<dyn RecordStore>,
}

impl TranslationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All records; an empty table is `NotFound`.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Record>, ServiceError> {
        let records = self.store.scan().await?;
        if records.is_empty() {
            return Err(ServiceError::NotFound);
        }
        debug!(count = records.len(), "records listed");
        Ok(records)
    }

    /// The translation stored under `key`.
    ///
    /// A record that exists but carries no value is reported as `NotFound`,
    /// same as a missing record.
    #[instrument(skip(self))]
    pub async fn lookup(&self, key: &str) -> Result<Value, ServiceError> {
        self.store
            .get(key)
            .await?
            .and_then(Record::into_value)
            .ok_or(ServiceError::NotFound)
    }

    /// Scan when `key` is absent, look up otherwise. An empty key is still a lookup.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::Record;
    /// use service::store::InMemoryRecordStore;
    /// use service::translation::{QueryOutcome, TranslationService};
    ///
    /// let store = InMemoryRecordStore::from_records([Record::new("犬", "dog")]);
    /// let svc = TranslationService::new(Arc::new(store));
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// let one = rt.block_on(svc.query(Some("犬"))).unwrap();
    /// assert_eq!(one, QueryOutcome::One(serde_json::json!("dog")));
    /// assert!(rt.block_on(svc.query(Some(""))).unwrap_err().is_not_found());
    /// ```
    pub async fn query(&self, key: Option<&str>) -> Result<QueryOutcome, ServiceError> {
        match key {
            None => self.list_all().await.map(QueryOutcome::All),
            Some(key) => self.lookup(key).await.map(QueryOutcome::One),
        }
    }
}
