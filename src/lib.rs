use crate::config::OfammConfig;
use crate::features::auth::middleware::require_admin;
use crate::features::site::render::SiteRenderer;
use crate::io::MediaStorage;
use crate::services::{AuthService, ContentService};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod cli;
pub mod config;
pub mod database;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod logging;
pub mod parser;
pub mod services;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub auth: Arc<AuthService>,
    pub media: Arc<dyn MediaStorage>,
    pub renderer: Arc<SiteRenderer>,
    pub config: Arc<OfammConfig>,
}

/// Composes the public site, login routes, the guarded admin area and static files.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.admin_body_limit();

    let protected = Router::new()
        .merge(features::admin::admin_pages_router())
        .nest("/api/admin", features::admin::admin_api_router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .merge(features::site::site_router())
        .merge(features::auth::auth_router())
        .merge(protected)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback(features::site::fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
