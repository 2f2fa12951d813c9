use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{attributes, categories, departments, products, reviews, system};
use crate::services::CatalogService;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(attribute_routes())
        .merge(product_routes())
        .merge(department_routes())
        .merge(category_routes())
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn attribute_routes() -> Router<AppState> {
    Router::new()
        .route("/attributes", get(attributes::list))
        .route("/attributes/:attribute_id", get(attributes::get))
        .route("/attributes/values/:attribute_id", get(attributes::values))
        .route("/attributes/inProduct/:product_id", get(attributes::in_product))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/search", get(products::search))
        .route("/products/inCategory/:category_id", get(products::in_category))
        .route("/products/inDepartment/:department_id", get(products::in_department))
        .route("/products/reviews", post(reviews::create))
        .route("/products/:product_id", get(products::get))
        .route("/products/:product_id/reviews", get(reviews::list))
}

fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(departments::list))
        .route("/departments/:department_id", get(departments::get))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list))
        .route("/categories/:category_id", get(categories::get))
        .route("/categories/inDepartment/:department_id", get(categories::in_department))
        .route("/categories/inProduct/:product_id", get(categories::in_product))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(tower_http::cors::Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
