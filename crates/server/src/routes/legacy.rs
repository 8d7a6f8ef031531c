//! Original `/kjtxts` and `/kjtxt` routes, kept for existing clients.
//!
//! Same store semantics as the unified endpoint, but with the table's own
//! field names (`skj` source text, `jkj` translation) and a required `skj`
//! parameter on the single-record route.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use models::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ApiError;
use crate::state::AppState;

pub const MISSING_SKJ_MESSAGE: &str = "Missing 'skj' parameter";

#[derive(Debug, Deserialize)]
pub struct KjtxtParams {
    pub skj: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KjtxtItem {
    pub skj: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jkj: Option<Value>,
}

impl From<Record> for KjtxtItem {
    fn from(r: Record) -> Self {
        Self { skj: r.key, jkj: r.value }
    }
}

#[derive(Debug, Serialize)]
pub struct KjtxtValue {
    pub jkj: Value,
}

/// Every record as `{skj, jkj}`.
pub async fn list_kjtxts(State(state): State<AppState>) -> Result<Json<Vec<KjtxtItem>>, ApiError> {
    let records = state.translations.list_all().await?;
    Ok(Json(records.into_iter().map(KjtxtItem::from).collect()))
}

/// The translation for `skj`; a missing or empty `skj` is a 400.
pub async fn get_kjtxt(
    State(state): State<AppState>,
    params: Result<Query<KjtxtParams>, QueryRejection>,
) -> Result<Json<KjtxtValue>, ApiError> {
    let Query(params) = params?;
    let skj = params
        .skj
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_SKJ_MESSAGE.into()))?;
    let jkj = state.translations.lookup(&skj).await?;
    Ok(Json(KjtxtValue { jkj }))
}
