use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod legacy;
pub mod query;

/// Unified query endpoint: scan without `key`, lookup with it.
pub const QUERY_PATH: &str = "/translations";

/// Liveness check for the load balancer.
pub async fn health() -> &'static str {
    "OK"
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(QUERY_PATH, get(query::query))
        .route("/kjtxts", get(legacy::list_kjtxts))
        .route("/kjtxt", get(legacy::get_kjtxt))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每个请求一个 INFO 级 span，记录方法与路径，不记录请求头
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应时记录状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 以 ERROR 级记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
