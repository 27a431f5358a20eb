pub mod collections;
pub mod uploads;

use crate::AppState;
use crate::domain::{
    AboutContent, BlogPost, COLLECTION_NAMES, CollectionItem, Content, Event, GalleryImage,
    Partner, Product, Service, SiteSettings, Slide,
};
use crate::error::AppResult;
use crate::features::auth::middleware::AdminSession;
use crate::features::extract::ApiJson;
use crate::features::site::not_found_page;
use crate::features::site::render::admin_context;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use collections::collection_router;
use serde::Serialize;

/// Client-rendered admin shells. Everything is loaded through the JSON API.
pub fn admin_pages_router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard_handler))
        .route("/admin/{section}", get(section_handler))
}

/// Mounted under `/api/admin`.
pub fn admin_api_router() -> Router<AppState> {
    Router::new()
        .route("/content", get(get_content_handler).put(replace_content_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/about", get(get_about_handler).put(update_about_handler))
        .route("/reload", post(reload_handler))
        .route("/upload", post(uploads::upload_handler))
        .route("/uploads", get(uploads::list_uploads_handler))
        .route("/uploads/{name}", delete(uploads::delete_upload_handler))
        .nest(&format!("/{}", Slide::NAME), collection_router::<Slide>())
        .nest(&format!("/{}", Service::NAME), collection_router::<Service>())
        .nest(&format!("/{}", Event::NAME), collection_router::<Event>())
        .nest(&format!("/{}", GalleryImage::NAME), collection_router::<GalleryImage>())
        .nest(&format!("/{}", Partner::NAME), collection_router::<Partner>())
        .nest(&format!("/{}", Product::NAME), collection_router::<Product>())
        .nest(&format!("/{}", BlogPost::NAME), collection_router::<BlogPost>())
}

#[derive(Serialize)]
struct SectionCount {
    name: &'static str,
    count: usize,
}

impl SectionCount {
    fn of<T: CollectionItem>(content: &Content) -> Self {
        Self {
            name: T::NAME,
            count: T::items(content).len(),
        }
    }
}

fn is_admin_section(section: &str) -> bool {
    matches!(section, "settings" | "about") || COLLECTION_NAMES.contains(&section)
}

async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut context = admin_context(&content.settings, "dashboard", &session.username);

    let counts = vec![
        SectionCount::of::<Slide>(&content),
        SectionCount::of::<Service>(&content),
        SectionCount::of::<Event>(&content),
        SectionCount::of::<GalleryImage>(&content),
        SectionCount::of::<Partner>(&content),
        SectionCount::of::<Product>(&content),
        SectionCount::of::<BlogPost>(&content),
    ];
    context.insert("counts", &counts);
    context.insert("backend", state.content.backend_name());

    let html = state.renderer.render("admin/dashboard.html", &context)?;
    Ok(Html(html).into_response())
}

async fn section_handler(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(section): Path<String>,
) -> AppResult<Response> {
    if !is_admin_section(&section) {
        return Ok(not_found_page(&state).await);
    }

    let settings = state.content.settings().await?;
    let context = admin_context(&settings, &section, &session.username);
    let html = state.renderer.render("admin/editor.html", &context)?;
    Ok(Html(html).into_response())
}

async fn get_content_handler(State(state): State<AppState>) -> AppResult<Json<Content>> {
    let content = state.content.content().await?;
    Ok(Json((*content).clone()))
}

async fn replace_content_handler(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    ApiJson(content): ApiJson<Content>,
) -> AppResult<Json<Content>> {
    let saved = state.content.replace(content).await?;
    tracing::info!(username = %session.username, "content replaced");
    Ok(Json((*saved).clone()))
}

async fn get_settings_handler(State(state): State<AppState>) -> AppResult<Json<SiteSettings>> {
    Ok(Json(state.content.settings().await?))
}

async fn update_settings_handler(
    State(state): State<AppState>,
    ApiJson(settings): ApiJson<SiteSettings>,
) -> AppResult<Json<SiteSettings>> {
    Ok(Json(state.content.update_settings(settings).await?))
}

async fn get_about_handler(State(state): State<AppState>) -> AppResult<Json<AboutContent>> {
    Ok(Json(state.content.about().await?))
}

async fn update_about_handler(
    State(state): State<AppState>,
    ApiJson(about): ApiJson<AboutContent>,
) -> AppResult<Json<AboutContent>> {
    Ok(Json(state.content.update_about(about).await?))
}

async fn reload_handler(State(state): State<AppState>) -> StatusCode {
    state.content.reload().await;
    StatusCode::NO_CONTENT
}
