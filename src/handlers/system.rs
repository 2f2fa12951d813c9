use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::server::AppState;

/// GET / - service index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Catalog API (Rust)",
        "version": version,
        "description": "Product catalog REST API built with Rust (Axum)",
        "endpoints": {
            "attributes": "/attributes[/:attribute_id], /attributes/values/:attribute_id, /attributes/inProduct/:product_id",
            "products": "/products, /products/search, /products/:product_id, /products/inCategory/:category_id, /products/inDepartment/:department_id",
            "reviews": "/products/:product_id/reviews, POST /products/reviews",
            "departments": "/departments[/:department_id]",
            "categories": "/categories[/:category_id], /categories/inDepartment/:department_id, /categories/inProduct/:product_id",
            "health": "/health",
        }
    }))
}

/// GET /health - database connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.catalog.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
