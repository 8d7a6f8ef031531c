use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use models::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::QueryOutcome;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Present (even empty) selects a lookup; absent selects a scan.
    pub key: Option<String>,
}

/// Scan projection. `value` is always emitted, as `null` when the item has none.
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub key: String,
    pub value: Option<Value>,
}

impl From<Record> for RecordView {
    fn from(r: Record) -> Self {
        Self { key: r.key, value: r.value }
    }
}

/// Lookup projection; the key is not echoed back.
#[derive(Debug, Serialize)]
pub struct ValueView {
    pub value: Value,
}

pub async fn query(
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let outcome = state.translations.query(params.key.as_deref()).await?;
    let response = match outcome {
        QueryOutcome::All(records) => {
            let items: Vec<RecordView> = records.into_iter().map(RecordView::from).collect();
            Json(items).into_response()
        }
        QueryOutcome::One(value) => Json(ValueView { value }).into_response(),
    };
    Ok(response)
}
