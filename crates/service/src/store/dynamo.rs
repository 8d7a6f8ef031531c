use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::AttributeValue,
    Client,
};
use configs::StoreConfig;
use models::Record;
use serde_json::{Map, Number, Value};
use tracing::{debug, info, instrument, warn};

use super::RecordStore;
use crate::errors::StoreError;

/// DynamoDB-backed record store.
///
/// Items are keyed by `key_attribute` (a string partition key); the
/// translation lives in `value_attribute`. Every other attribute is ignored.
#[derive(Debug, Clone)]
pub struct DynamoDbRecordStore {
    client: Client,
    table_name: String,
    key_attribute: String,
    value_attribute: String,
}

impl DynamoDbRecordStore {
    pub fn new(client: Client, cfg: &StoreConfig) -> Self {
        Self {
            client,
            table_name: cfg.table_name.clone(),
            key_attribute: cfg.key_attribute.clone(),
            value_attribute: cfg.value_attribute.clone(),
        }
    }

    /// Resolve credentials and region from the standard AWS chain and build a client.
    pub async fn connect(cfg: &StoreConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .load()
            .await;
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(url) = &cfg.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        let client = Client::from_conf(builder.build());
        info!(
            region = %cfg.region,
            table = %cfg.table_name,
            endpoint = cfg.endpoint_url.as_deref().unwrap_or("default"),
            "dynamodb client initialized"
        );
        Self::new(client, cfg)
    }
}

#[async_trait]
impl RecordStore for DynamoDbRecordStore {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn scan(&self) -> Result<Vec<Record>, StoreError> {
        let mut items = self
            .client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send();

        let mut records = Vec::new();
        while let Some(item) = items.next().await {
            let item = item.map_err(backend_error)?;
            if let Some(record) = record_from_item(item, &self.key_attribute, &self.value_attribute) {
                records.push(record);
            }
        }
        debug!(count = records.len(), "scan complete");
        Ok(records)
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get(&self, key: &str) -> Result<Option<Record>, StoreError> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(out
            .item
            .and_then(|item| record_from_item(item, &self.key_attribute, &self.value_attribute)))
    }
}

/// Prefer the service's own message (what callers of the table expect to
/// see); fall back to the full error chain for transport failures.
fn backend_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = err
        .as_service_error()
        .and_then(|e| e.message())
        .map(str::to_owned)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    StoreError::Backend(message)
}

/// Project a raw item onto `Record`, dropping every other attribute.
pub(crate) fn record_from_item(
    mut item: HashMap<String, AttributeValue>,
    key_attribute: &str,
    value_attribute: &str,
) -> Option<Record> {
    let key = match item.remove(key_attribute) {
        Some(AttributeValue::S(s)) => s,
        Some(AttributeValue::N(n)) => n,
        other => {
            warn!(attribute = key_attribute, found = ?other, "item without a usable key; skipped");
            return None;
        }
    };
    let value = item.remove(value_attribute).and_then(attribute_to_json);
    Some(Record { key, value })
}

/// Convert a DynamoDB attribute to JSON. Binary attributes have no JSON form
/// and come back as `None`.
pub(crate) fn attribute_to_json(attr: AttributeValue) -> Option<Value> {
    match attr {
        AttributeValue::S(s) => Some(Value::String(s)),
        AttributeValue::N(n) => Some(number_to_json(n)),
        AttributeValue::Bool(b) => Some(Value::Bool(b)),
        AttributeValue::Null(_) => Some(Value::Null),
        AttributeValue::L(items) => Some(Value::Array(
            items.into_iter().filter_map(attribute_to_json).collect(),
        )),
        AttributeValue::M(fields) => Some(Value::Object(
            fields
                .into_iter()
                .filter_map(|(k, v)| attribute_to_json(v).map(|v| (k, v)))
                .collect::<Map<String, Value>>(),
        )),
        AttributeValue::Ss(strings) => Some(Value::Array(strings.into_iter().map(Value::String).collect())),
        AttributeValue::Ns(numbers) => Some(Value::Array(numbers.into_iter().map(number_to_json).collect())),
        _ => None,
    }
}

// DynamoDB numbers travel as strings; keep the text if JSON cannot hold it.
fn number_to_json(n: String) -> Value {
    match n.parse::<Number>() {
        Ok(num) => Value::Number(num),
        Err(_) => Value::String(n),
    }
}
