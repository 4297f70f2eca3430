use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use shared::PrizeCatalog;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::store::UserStore;

mod admin;
mod config;
mod error;
mod handlers;
mod logging;
mod store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<UserStore>,
    catalog: Arc<PrizeCatalog>,
    config: Arc<Config>,
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // The widget's assets change on every deploy, so always revalidate.
    let static_service = SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    )
    .layer(ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true));

    let api_routes = handlers::create_router()
        .nest("/admin", admin::create_router())
        .route("/health_check", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(static_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup();

    let config = Config::from_env()?;
    if config.admin_id.is_none() {
        warn!("ADMIN_ID is not set, admin endpoints are disabled");
    }
    if !config.static_dir.exists() {
        warn!("static dir {} does not exist, only the API is served", config.static_dir.display());
    }

    let state = AppState {
        store: Arc::new(UserStore::open(&config.data_file).await),
        catalog: Arc::new(PrizeCatalog::standard()),
        config: Arc::new(config.clone()),
    };

    let app = build_app(state);

    info!("listening on {} (max {} attempts per user)", config.bind_addr, config.max_attempts);
    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn test_state(max_attempts: u32, admin_id: Option<i64>) -> AppState {
        let data_file = std::env::temp_dir().join(format!("reel-api-{}.json", uuid::Uuid::new_v4()));
        let config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            data_file: data_file.clone(),
            max_attempts,
            admin_id,
            static_dir: std::env::temp_dir(),
        };
        AppState {
            store: Arc::new(UserStore::open(&data_file).await),
            catalog: Arc::new(PrizeCatalog::standard()),
            config: Arc::new(config),
        }
    }

    pub async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
