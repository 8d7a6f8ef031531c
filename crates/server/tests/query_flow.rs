use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use models::Record;
use serde_json::{json, Value};
use service::store::{mock::FailingRecordStore, InMemoryRecordStore};
use tower::ServiceExt;

use server::startup::build_app_with_store;

fn app_with(records: Vec<Record>) -> Router {
    build_app_with_store(Arc::new(InMemoryRecordStore::from_records(records)))
}

fn failing_app(message: &str) -> Router {
    build_app_with_store(Arc::new(FailingRecordStore::new(message)))
}

fn seeded() -> Vec<Record> {
    vec![
        Record::new("犬", "dog"),
        Record::new("猫", "cat"),
        Record::without_value("鳥"),
    ]
}

async fn get(app: Router, uri: &str) -> anyhow::Result<(StatusCode, Vec<u8>)> {
    let req = Request::builder().method("GET").uri(uri).body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, bytes.to_vec()))
}

async fn get_json(app: Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    let (status, body) = get(app, uri).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn health_is_plain_ok() -> anyhow::Result<()> {
    let (status, body) = get(app_with(vec![]), "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    // independent of store health
    let (status, body) = get(failing_app("down"), "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
    Ok(())
}

#[tokio::test]
async fn scan_returns_every_record_with_key_and_value_only() -> anyhow::Result<()> {
    let (status, body) = get_json(app_with(seeded()), "/translations").await?;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 3);
    for item in items {
        let obj = item.as_object().expect("object element");
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("key"));
        assert!(obj.contains_key("value"));
    }
    assert!(items.contains(&json!({ "key": "犬", "value": "dog" })));
    assert!(items.contains(&json!({ "key": "鳥", "value": null })));
    Ok(())
}

#[tokio::test]
async fn scan_of_empty_store_is_not_found() -> anyhow::Result<()> {
    let (status, body) = get_json(app_with(vec![]), "/translations").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("record not found"));
    Ok(())
}

#[tokio::test]
async fn lookup_returns_value_without_key() -> anyhow::Result<()> {
    let (status, body) = get_json(app_with(seeded()), "/translations?key=%E7%8A%AC").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value": "dog" }));
    Ok(())
}

#[tokio::test]
async fn lookup_of_missing_or_valueless_key_is_not_found() -> anyhow::Result<()> {
    for uri in ["/translations?key=missing", "/translations?key=%E9%B3%A5"] {
        let (status, body) = get_json(app_with(seeded()), uri).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!("record not found"));
    }
    Ok(())
}

#[tokio::test]
async fn empty_key_is_a_lookup_not_a_scan() -> anyhow::Result<()> {
    let (status, body) = get_json(app_with(seeded()), "/translations?key=").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("record not found"));

    let mut records = seeded();
    records.push(Record::new("", "blank"));
    let (status, body) = get_json(app_with(records), "/translations?key=").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value": "blank" }));
    Ok(())
}

#[tokio::test]
async fn non_string_values_pass_through() -> anyhow::Result<()> {
    let app = app_with(vec![Record::new("count", 3), Record::new("flag", true)]);
    let (status, body) = get_json(app.clone(), "/translations?key=count").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value": 3 }));
    let (_, body) = get_json(app, "/translations?key=flag").await?;
    assert_eq!(body, json!({ "value": true }));
    Ok(())
}

#[tokio::test]
async fn store_failure_is_internal_error_with_message() -> anyhow::Result<()> {
    let msg = "Requested resource not found";
    for uri in ["/translations", "/translations?key=犬", "/kjtxts", "/kjtxt?skj=犬"] {
        let (status, body) = get_json(failing_app(msg), &uri.replace('犬', "%E7%8A%AC")).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body, json!({ "error": msg }));
    }
    Ok(())
}

#[tokio::test]
async fn repeated_query_parameter_is_json_internal_error() -> anyhow::Result<()> {
    for uri in ["/translations?key=a&key=b", "/kjtxt?skj=a&skj=b"] {
        let (status, body) = get_json(app_with(seeded()), uri).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let obj = body.as_object().expect("object body");
        assert_eq!(obj.len(), 1);
        let msg = obj["error"].as_str().unwrap_or_default();
        assert!(msg.contains("duplicate field"), "{uri}: {msg}");
    }
    Ok(())
}

#[tokio::test]
async fn explicit_null_value_is_returned_not_missing() -> anyhow::Result<()> {
    let app = app_with(vec![Record::new("x", Value::Null)]);
    let (status, body) = get_json(app.clone(), "/translations?key=x").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value": null }));

    let (status, body) = get_json(app, "/kjtxts").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "skj": "x", "jkj": null }]));
    Ok(())
}

#[tokio::test]
async fn repeated_queries_are_identical() -> anyhow::Result<()> {
    let app = app_with(seeded());
    for uri in ["/translations", "/translations?key=%E7%8C%AB", "/translations?key=none"] {
        let first = get(app.clone(), uri).await?;
        let second = get(app.clone(), uri).await?;
        assert_eq!(first, second, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn legacy_routes_use_table_field_names() -> anyhow::Result<()> {
    let app = app_with(seeded());

    let (status, body) = get_json(app.clone(), "/kjtxts").await?;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 3);
    assert!(items.contains(&json!({ "skj": "猫", "jkj": "cat" })));
    assert!(items.contains(&json!({ "skj": "鳥" })));

    let (status, body) = get_json(app.clone(), "/kjtxt?skj=%E7%8C%AB").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "jkj": "cat" }));

    let (status, body) = get_json(app, "/kjtxt?skj=nothing").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("record not found"));
    Ok(())
}

#[tokio::test]
async fn legacy_lookup_requires_skj() -> anyhow::Result<()> {
    for uri in ["/kjtxt", "/kjtxt?skj="] {
        let (status, body) = get_json(app_with(seeded()), uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "error": "Missing 'skj' parameter" }));
    }

    let (status, _) = get_json(app_with(vec![]), "/kjtxts").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn cors_headers_are_present() -> anyhow::Result<()> {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .header("origin", "https://translator.example")
        .body(Body::empty())?;
    let resp = app_with(vec![]).oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
    Ok(())
}
