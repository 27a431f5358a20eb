pub mod middleware;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::features::extract::ApiJson;
use crate::features::site::render::admin_context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite, time::Duration};
use middleware::session_from_headers;
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "ofamm_admin";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
}

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_page_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/session", get(session_handler))
}

/// `Set-Cookie` value for the admin session. `max_age` 0 expires it.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .secure(secure)
        .build()
        .to_string()
}

// only same-site admin paths, so the login form cannot be used as an open redirect
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with("/admin") && !path.starts_with("//") => path,
        _ => "/admin",
    }
}

async fn login_page_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginPageQuery>,
) -> AppResult<Response> {
    let next = safe_next(query.next.as_deref());
    if session_from_headers(&state, &headers).is_some() {
        return Ok(Redirect::to(next).into_response());
    }

    let settings = state.content.settings().await?;
    let mut context = admin_context(&settings, "login", "");
    context.insert("next", next);
    let html = state.renderer.render("admin/login.html", &context)?;
    Ok(Html(html).into_response())
}

async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Response> {
    if !state
        .auth
        .verify_credentials(payload.username.trim(), &payload.password)
    {
        tracing::warn!(username = %payload.username, "failed admin login");
        return Err(AppError::Unauthorized);
    }

    let token = state
        .auth
        .issue_token(payload.username.trim())
        .map_err(|e| AppError::Internal(e.into()))?;
    let cookie = session_cookie(
        &token,
        state.auth.token_ttl().num_seconds(),
        state.config.cookie_secure,
    );

    tracing::info!(username = %payload.username.trim(), "admin logged in");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { success: true }),
    )
        .into_response())
}

async fn logout_handler(State(state): State<AppState>) -> Response {
    let cookie = session_cookie("", 0, state.config.cookie_secure);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { success: true }),
    )
        .into_response()
}

async fn session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let session = session_from_headers(&state, &headers);
    Json(SessionResponse {
        authenticated: session.is_some(),
        username: session.map(|s| s.username),
    })
}
