#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use crosswordcoach_core::types::{CrosswordPuzzle, Entry};
use crosswordcoach_db::handle::{StoreBackend, StoreHandle};
use crosswordcoach_db::memory::MemoryEntryStore;
use crosswordcoach_db::store::EntryStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crosswordcoach_api::config::ServerConfig;
use crosswordcoach_api::explainer::{Explainer, ExplainerError};
use crosswordcoach_api::router::build_app_router;
use crosswordcoach_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        store: StoreBackend::Memory,
        explainer: None,
    }
}

/// Build the full application router over `store`, exactly as `main.rs`
/// does.
pub fn build_test_app(
    store: Arc<MemoryEntryStore>,
    explainer: Option<Arc<dyn Explainer>>,
) -> Router {
    let config = test_config();
    let state = AppState {
        store: Arc::new(StoreHandle::with_store(store as Arc<dyn EntryStore>)),
        explainer,
    };
    build_app_router(state, &config)
}

/// A puzzle dated in January 2023; `day` is the day of week (2023-01-01 was
/// a Sunday).
pub fn puzzle(id: &str, source: &str, day: u32, entries: &[(&str, &str)]) -> CrosswordPuzzle {
    CrosswordPuzzle {
        id: id.to_string(),
        date: Utc.with_ymd_and_hms(2023, 1, day + 1, 12, 0, 0).unwrap(),
        source: source.to_string(),
        entries: entries.iter().map(|(c, a)| Entry::new(*c, *a)).collect(),
    }
}

/// Three NYT Monday entries plus five entries from other puzzles.
pub async fn seeded_store() -> Arc<MemoryEntryStore> {
    let store = Arc::new(MemoryEntryStore::new());
    let puzzles = [
        puzzle("wsj-mon", "WSJ", 1, &[("Stable animal", "HORSE")]),
        puzzle(
            "nyt-mon",
            "NYT",
            1,
            &[("Feline", "CAT"), ("Canine", "DOG"), ("Bovine", "COW")],
        ),
        puzzle("nyt-tue", "NYT", 2, &[("Ovine", "SHEEP"), ("Porcine", "PIG")]),
        puzzle("lat-sun", "LAT", 0, &[("Hive dweller", "BEE"), ("Web spinner", "SPIDER")]),
    ];
    for p in &puzzles {
        store.save_puzzle(p).await.unwrap();
    }
    store
}

/// Explainer that returns a fixed text and counts its calls.
#[derive(Default)]
pub struct FakeExplainer {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeExplainer {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Explainer for FakeExplainer {
    async fn explain(&self, clue: &str, answer: &str) -> Result<String, ExplainerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExplainerError::Network("connection refused".into()));
        }
        Ok(format!("{answer} fits \"{clue}\"."))
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn options(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
