use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::AppConfig;
use crate::photos::{DocumentStore, LocalFileStorage};
use crate::web_pages;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<LocalFileStorage>,
    pub store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let storage = LocalFileStorage::new(config.upload_dir.clone());
        let store = DocumentStore::new(config.db_path(), config.collection_name.clone());
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            store: Arc::new(store),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(web_pages::gallery_page))
        .route("/photos/new", get(web_pages::upload_page))
        .route(
            "/photos/create",
            post(web_pages::create_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/photo/{id}", get(web_pages::show_photo))
        .nest_service("/uploads", ServeDir::new(state.storage.base_dir()))
        .fallback(web_pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
