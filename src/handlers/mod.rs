pub mod extract;
pub mod fruits;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn home() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Fresh Fruit Inventory System" }))
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "fruit-inventory" })))
}
