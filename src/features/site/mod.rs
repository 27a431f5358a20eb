pub mod render;

use crate::AppState;
use crate::domain::Content;
use crate::error::AppResult;
use crate::parser::event_date::split_events;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use render::page_context;
use serde_json::json;

const HOME_SERVICES: usize = 3;
const HOME_EVENTS: usize = 3;
const HOME_POSTS: usize = 3;

pub fn site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/services", get(services_handler))
        .route("/events", get(events_handler))
        .route("/gallery", get(gallery_handler))
        .route("/partners", get(partners_handler))
        .route("/shop", get(shop_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/{slug}", get(blog_post_handler))
        .route("/api/content", get(public_content_handler))
        .route("/health", get(health_handler))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render(state: &AppState, template: &str, context: &tera::Context) -> AppResult<Response> {
    let html = state.renderer.render(template, context)?;
    Ok(Html(html).into_response())
}

/// Renders the 404 page with the site chrome. Falls back to plain text if that fails too.
pub async fn not_found_page(state: &AppState) -> Response {
    let settings = match state.content.settings().await {
        Ok(settings) => settings,
        Err(_) => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };
    let context = page_context(&settings, "", "Page not found");
    match state.renderer.render("404.html", &context) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "failed to render 404 page");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

pub async fn fallback_handler(State(state): State<AppState>) -> Response {
    not_found_page(&state).await
}

/// Context for the home page, with `today` injected so the event cut-off is testable.
pub fn home_context(content: &Content, today: NaiveDate) -> tera::Context {
    let (upcoming, _) = split_events(&content.events, today);
    let upcoming: Vec<_> = upcoming.into_iter().take(HOME_EVENTS).collect();
    let posts: Vec<_> = content
        .published_posts()
        .into_iter()
        .take(HOME_POSTS)
        .collect();
    let services: Vec<_> = content.services.iter().take(HOME_SERVICES).collect();

    let mut context = page_context(&content.settings, "/", &content.settings.site_name);
    context.insert("slides", &content.slides);
    context.insert("services", &services);
    context.insert("upcoming_events", &upcoming);
    context.insert("posts", &posts);
    context.insert("partners", &content.partners);
    context
}

async fn home_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    render(&state, "home.html", &home_context(&content, today()))
}

async fn about_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut context = page_context(&content.settings, "/about", &content.about.title);
    context.insert("about", &content.about);
    render(&state, "about.html", &context)
}

async fn services_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut context = page_context(&content.settings, "/services", "Services");
    context.insert("services", &content.services);
    render(&state, "services.html", &context)
}

pub fn events_context(content: &Content, today: NaiveDate) -> tera::Context {
    let (upcoming, past) = split_events(&content.events, today);
    let mut context = page_context(&content.settings, "/events", "Events");
    context.insert("upcoming_events", &upcoming);
    context.insert("past_events", &past);
    context
}

async fn events_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    render(&state, "events.html", &events_context(&content, today()))
}

async fn gallery_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut categories: Vec<&str> = content
        .gallery
        .iter()
        .map(|g| g.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    categories.sort_unstable();
    categories.dedup();

    let mut context = page_context(&content.settings, "/gallery", "Gallery");
    context.insert("images", &content.gallery);
    context.insert("categories", &categories);
    render(&state, "gallery.html", &context)
}

async fn partners_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut context = page_context(&content.settings, "/partners", "Partners");
    context.insert("partners", &content.partners);
    render(&state, "partners.html", &context)
}

async fn shop_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut context = page_context(&content.settings, "/shop", "Shop");
    context.insert("products", &content.products);
    render(&state, "shop.html", &context)
}

async fn blog_index_handler(State(state): State<AppState>) -> AppResult<Response> {
    let content = state.content.content().await?;
    let mut context = page_context(&content.settings, "/blog", "Blog");
    context.insert("posts", &content.published_posts());
    render(&state, "blog.html", &context)
}

async fn blog_post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let content = state.content.content().await?;
    let Some(post) = content.published_post_by_slug(&slug) else {
        return Ok(not_found_page(&state).await);
    };

    let mut context = page_context(&content.settings, "/blog", &post.title);
    context.insert("post", post);
    render(&state, "blog_post.html", &context)
}

async fn public_content_handler(State(state): State<AppState>) -> AppResult<Json<Content>> {
    let content = state.content.content().await?;
    Ok(Json(content.public_view()))
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "backend": state.content.backend_name() }))
}
