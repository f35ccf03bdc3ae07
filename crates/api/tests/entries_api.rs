//! Integration tests for `GET /entries` and its CORS preflight.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_bytes, body_json, build_test_app, get, options, seeded_store};
use crosswordcoach_db::memory::MemoryEntryStore;
use crosswordcoach_db::store::EntryStore;

const BASE: &str = "/entries?orderBy=_id&orderDirection=ASC&pageSize=10&page=0";

fn answers(json: &serde_json::Value) -> Vec<String> {
    json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["answer"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nyt_monday_returns_exactly_the_matching_entries_in_id_order() {
    let app = build_test_app(seeded_store().await, None);
    let response = get(app, &format!("{BASE}&source=NYT&dayOfWeek=1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(answers(&json), vec!["CAT", "DOG", "COW"]);
}

#[tokio::test]
async fn entries_without_explanation_omit_the_field() {
    let app = build_test_app(seeded_store().await, None);
    let json = body_json(get(app, &format!("{BASE}&source=WSJ")).await).await;

    assert_eq!(
        json,
        serde_json::json!({ "entries": [{ "clue": "Stable animal", "answer": "HORSE" }] })
    );
}

#[tokio::test]
async fn stored_explanation_is_included() {
    let store = seeded_store().await;
    store
        .set_explanation("Feline", "CAT", "Cats are felines.")
        .await
        .unwrap();
    let app = build_test_app(store, None);

    let json = body_json(get(app, &format!("{BASE}&source=NYT&dayOfWeek=1")).await).await;
    assert_eq!(json["entries"][0]["explanation"], "Cats are felines.");
    assert!(json["entries"][1].get("explanation").is_none());
}

#[tokio::test]
async fn descending_order_and_paging() {
    let store = seeded_store().await;

    let app = build_test_app(Arc::clone(&store), None);
    let json = body_json(
        get(app, "/entries?orderBy=_id&orderDirection=DESC&pageSize=3&page=0").await,
    )
    .await;
    assert_eq!(answers(&json), vec!["SPIDER", "BEE", "PIG"]);

    let app = build_test_app(Arc::clone(&store), None);
    let json = body_json(
        get(app, "/entries?orderBy=_id&orderDirection=DESC&pageSize=3&page=2").await,
    )
    .await;
    assert_eq!(answers(&json), vec!["CAT", "HORSE"]);

    let app = build_test_app(store, None);
    let json = body_json(
        get(app, "/entries?orderBy=_id&orderDirection=DESC&pageSize=3&page=3").await,
    )
    .await;
    assert!(answers(&json).is_empty());
}

#[tokio::test]
async fn answer_length_range_is_inclusive() {
    let app = build_test_app(seeded_store().await, None);
    let json = body_json(
        get(app, &format!("{BASE}&answerLengthMin=5&answerLengthMax=5")).await,
    )
    .await;
    assert_eq!(answers(&json), vec!["HORSE", "SHEEP"]);
}

#[tokio::test]
async fn sunday_is_day_zero() {
    let app = build_test_app(seeded_store().await, None);
    let json = body_json(get(app, &format!("{BASE}&source=LAT&dayOfWeek=0")).await).await;
    assert_eq!(answers(&json), vec!["BEE", "SPIDER"]);
}

#[tokio::test]
async fn empty_store_returns_empty_list() {
    let app = build_test_app(Arc::new(MemoryEntryStore::new()), None);
    let response = get(app, BASE).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "entries": [] }));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

async fn expect_400(uri: &str) -> String {
    let app = build_test_app(seeded_store().await, None);
    let response = get(app, uri).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    body_json(response).await["error"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn each_missing_required_parameter_is_named() {
    let full = [
        ("orderBy", "_id"),
        ("orderDirection", "ASC"),
        ("pageSize", "10"),
        ("page", "0"),
    ];
    for (omitted, _) in full {
        let query: Vec<String> = full
            .iter()
            .filter(|(name, _)| *name != omitted)
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let message = expect_400(&format!("/entries?{}", query.join("&"))).await;
        assert!(message.starts_with("Missing required"), "{message}");
        assert!(message.contains(omitted), "{message}");
    }
}

#[tokio::test]
async fn no_parameters_is_rejected() {
    assert_eq!(expect_400("/entries").await, "Missing query parameters");
}

#[tokio::test]
async fn unknown_parameters_only_report_the_required_ones() {
    let message = expect_400("/entries?foo=1").await;
    assert!(
        message.starts_with("Missing required GetEntriesOptions query parameters"),
        "{message}"
    );
    assert!(message.contains("orderBy"), "{message}");
}

#[tokio::test]
async fn order_direction_is_case_sensitive() {
    let message =
        expect_400("/entries?orderBy=_id&orderDirection=asc&pageSize=10&page=0").await;
    assert!(message.contains("orderDirection"), "{message}");
}

#[tokio::test]
async fn non_integer_page_size_is_rejected() {
    let message =
        expect_400("/entries?orderBy=_id&orderDirection=ASC&pageSize=ten&page=0").await;
    assert_eq!(message, "Invalid pageSize. Must be an integer");
}

#[tokio::test]
async fn day_of_week_requires_source() {
    let message = expect_400(&format!("{BASE}&dayOfWeek=3")).await;
    assert!(message.contains("requires source"), "{message}");
}

#[tokio::test]
async fn day_of_week_must_be_an_integer() {
    let message = expect_400(&format!("{BASE}&source=NYT&dayOfWeek=Monday")).await;
    assert_eq!(message, "Invalid dayOfWeek. Must be an integer");
}

#[tokio::test]
async fn answer_length_bounds_come_in_pairs() {
    let message = expect_400(&format!("{BASE}&answerLengthMin=3")).await;
    assert!(message.contains("together"), "{message}");
}

#[tokio::test]
async fn inverted_answer_length_is_rejected() {
    let message = expect_400(&format!("{BASE}&answerLengthMin=6&answerLengthMax=3")).await;
    assert!(message.contains("less than or equal"), "{message}");
}

#[tokio::test]
async fn unsupported_order_field_is_a_400() {
    let message =
        expect_400("/entries?orderBy=difficulty&orderDirection=ASC&pageSize=10&page=0").await;
    assert!(message.contains("difficulty"), "{message}");
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let app = build_test_app(seeded_store().await, None);
    let response = get(app, "/entries").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

// ---------------------------------------------------------------------------
// CORS preflight
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preflight_returns_204_with_headers_and_no_body() {
    let app = build_test_app(seeded_store().await, None);
    // Invalid parameters are not looked at.
    let response = options(app, "/entries?dayOfWeek=9").await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert!(body_bytes(response).await.is_empty());
}
