use crate::AppState;
use crate::features::auth::SESSION_COOKIE;
use axum::{
    Json,
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::Cookie;
use http::{HeaderMap, StatusCode, header};
use serde_json::json;

/// Attached to request extensions once the session cookie checks out.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

/// Every value sent under `name`, in header order. A browser may hold several
/// cookies with the same name for different paths and sends all of them.
pub fn read_cookies(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .filter(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .collect()
}

/// Returns the session when any admin cookie on the request checks out.
pub fn session_from_headers(state: &AppState, headers: &HeaderMap) -> Option<AdminSession> {
    for token in read_cookies(headers, SESSION_COOKIE) {
        match state.auth.verify_token(&token) {
            Ok(claims) => {
                return Some(AdminSession {
                    username: claims.sub,
                });
            }
            Err(e) => tracing::debug!(error = %e, "rejected admin session cookie"),
        }
    }
    None
}

/// Guards `/admin/*` pages and `/api/admin/*` endpoints. Pages bounce to the
/// login form, API calls get a 401.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(session) = session_from_headers(&state, req.headers()) {
        req.extensions_mut().insert(session);
        return next.run(req).await;
    }

    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if path.starts_with("/api/") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication required" })),
        )
            .into_response();
    }

    Redirect::to(&format!("/admin/login?next={path}")).into_response()
}
