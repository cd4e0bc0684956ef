//! HTTP routes.
//!
//! Demo endpoints only; they do not touch the world store.

use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Create all HTTP routes.
pub fn routes() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/items/{item_id}", get(read_item))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Greeting {
    pub message: String,
}

async fn root() -> Json<Greeting> {
    Json(Greeting {
        message: "Hello World".to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub item_id: i64,
    pub q: Option<String>,
}

async fn read_item(Path(item_id): Path<i64>, Query(query): Query<ItemQuery>) -> Json<Item> {
    Json(Item {
        item_id,
        q: query.q,
    })
}
