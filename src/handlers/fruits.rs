use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    handlers::extract::{AppJson, AppQuery},
    models::{Fruit, FruitUpdate, NewFruit},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_fruits(State(state): State<AppState>) -> Json<Vec<Fruit>> {
    let fruits = state.store.read().await.list_available();

    info!(count = fruits.len(), "Listed available fruits");

    Json(fruits)
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_fruit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Fruit>> {
    let fruit = state.store.read().await.get(&id)?;

    debug!(id = %id, available = fruit.available, "Fetched fruit");

    Ok(Json(fruit))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_fruit(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewFruit>,
) -> AppResult<(StatusCode, Json<Fruit>)> {
    payload.validate()?;

    let mut store = state.store.write().await;
    let fruit = store.create(payload)?;
    let total = store.len();
    drop(store);

    info!(
        id = %fruit.id,
        name = %fruit.name,
        variety = %fruit.variety,
        total,
        "Created fruit"
    );

    Ok((StatusCode::CREATED, Json(fruit)))
}

// ── Partial update ────────────────────────────────────────────────────────────

/// Fields may arrive as query parameters, a JSON body, or both; the body wins per field.
pub async fn update_fruit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<FruitUpdate>,
    body: Bytes,
) -> AppResult<Json<Fruit>> {
    let update = parse_update_body(&body)?.or(query);
    update.validate()?;

    let fruit = state.store.write().await.update(&id, &update)?;

    if update.is_empty() {
        debug!(id = %id, "Empty update, record unchanged");
    } else {
        info!(
            id = %id,
            available = ?update.available,
            price = ?update.price,
            quantity = ?update.quantity,
            "Updated fruit"
        );
    }

    Ok(Json(fruit))
}

fn parse_update_body(body: &[u8]) -> AppResult<FruitUpdate> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FruitUpdate::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        AppError::Validation(format!("Failed to deserialize the JSON body: {}", e))
    })
}

// ── Soft delete ───────────────────────────────────────────────────────────────

pub async fn delete_fruit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.store.write().await.soft_delete(&id)?;

    info!(id = %id, "Marked fruit unavailable");

    Ok(Json(serde_json::json!({ "message": "Fruit removed from inventory" })))
}
