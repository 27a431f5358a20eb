use crate::config::UploadMode;
use crate::features::auth::{SESSION_COOKIE, session_cookie};
use crate::tests::common::{
    ADMIN_USER, TestApp, body_json, body_text, get, id, json_request, sample_content, send_empty,
};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use cookie::{Cookie, SameSite, time::Duration};
use serde_json::json;

#[tokio::test]
async fn test_admin_api_requires_session() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);

    for uri in ["/api/admin/content", "/api/admin/events", "/api/admin/settings"] {
        let response = app.send(get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
        assert_eq!(body_json(response).await["error"], "Authentication required");
    }

    let response = app
        .send(json_request("POST", "/api/admin/events", None, json!({ "title": "x", "date": "TBA" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // a cookie that does not verify is the same as none
    let bogus = format!("{SESSION_COOKIE}=not-a-token");
    let response = app.send(get("/api/admin/content", Some(&bogus))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_pages_redirect_to_login() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);

    let response = app.send(get("/admin/events", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/admin/login?next=/admin/events"
    );

    let response = app.send(get("/admin/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("login-form"));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": ADMIN_USER, "password": "nope" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_session_and_logout() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));

    let session = body_json(app.send(get("/api/auth/session", Some(&cookie))).await).await;
    assert_eq!(session["authenticated"], true);
    assert_eq!(session["username"], ADMIN_USER);

    let anonymous = body_json(app.send(get("/api/auth/session", None)).await).await;
    assert_eq!(anonymous["authenticated"], false);

    // already signed in, the login page forwards to the admin area
    let response = app.send(get("/admin/login?next=/admin/posts", Some(&cookie))).await;
    assert_eq!(response.headers()[header::LOCATION], "/admin/posts");
    // and never off-site
    let response = app.send(get("/admin/login?next=//evil.test", Some(&cookie))).await;
    assert_eq!(response.headers()[header::LOCATION], "/admin");

    let response = app.send(send_empty("POST", "/api/auth/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[test]
fn test_session_cookie_attributes() {
    let cookie = Cookie::parse(session_cookie("abc", 3600, false)).unwrap();
    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));
    assert_ne!(cookie.secure(), Some(true));

    let secure = Cookie::parse(session_cookie("abc", 3600, true)).unwrap();
    assert_eq!(secure.secure(), Some(true));

    let cleared = Cookie::parse(session_cookie("", 0, false)).unwrap();
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(Duration::ZERO));
}

#[tokio::test]
async fn test_session_survives_stale_and_quoted_cookies() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let login = app.login_cookie().await;
    let token = login.trim_start_matches(&format!("{SESSION_COOKIE}=")).to_string();

    // an expired cookie from another path arrives first
    let header = format!("theme=dark; {SESSION_COOKIE}=stale-token; {SESSION_COOKIE}={token}");
    let response = app.send(get("/api/auth/session", Some(&header))).await;
    assert_eq!(body_json(response).await["authenticated"], true);

    let response = app.send(get("/api/admin/events", Some(&header))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let quoted = format!("{SESSION_COOKIE}=\"{token}\"");
    let response = app.send(get("/api/auth/session", Some(&quoted))).await;
    assert_eq!(body_json(response).await["authenticated"], true);

    let only_stale = format!("{SESSION_COOKIE}=stale-token");
    let response = app.send(get("/api/admin/events", Some(&only_stale))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_pages_render_for_signed_in_user() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;

    let response = app.send(get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Dashboard"));
    assert!(html.contains("<strong>json</strong>"));

    let response = app.send(get("/admin/products", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("data-section=\"products\""));

    let response = app.send(get("/admin/nonsense", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_crud_round_trip() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;

    // create
    let response = app
        .send(json_request(
            "POST",
            "/api/admin/events",
            Some(&cookie),
            json!({ "title": "Open day", "date": "May 1, 2030", "location": "Hall" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let new_id = created["id"].as_str().unwrap().to_string();
    assert_ne!(new_id, uuid::Uuid::nil().to_string());

    // list
    let list = body_json(app.send(get("/api/admin/events", Some(&cookie))).await).await;
    assert_eq!(list.as_array().unwrap().len(), 3);

    // update
    let uri = format!("/api/admin/events/{new_id}");
    let response = app
        .send(json_request(
            "PUT",
            &uri,
            Some(&cookie),
            json!({ "title": "Open day (moved)", "date": "May 2, 2030" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(app.send(get(&uri, Some(&cookie))).await).await;
    assert_eq!(fetched["title"], "Open day (moved)");
    assert_eq!(fetched["id"], new_id.as_str());

    // the change is on disk, not just in the cache
    let on_disk = std::fs::read_to_string(&app.state.config.content_file).unwrap();
    assert!(on_disk.contains("Open day (moved)"));

    // and visible on the public site
    let html = body_text(app.send(get("/events", None)).await).await;
    assert!(html.contains("Open day (moved)"));

    // delete
    let response = app.send(send_empty("DELETE", &uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.send(get(&uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.send(send_empty("DELETE", &uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_errors_name_the_field() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;

    let response = app
        .send(json_request("POST", "/api/admin/events", Some(&cookie), json!({ "title": "No date" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["field"], "date");

    // same slug as the existing post
    let response = app
        .send(json_request("POST", "/api/admin/posts", Some(&cookie), json!({ "title": "Hello World" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["field"], "slug");

    // not a uuid at all
    let response = app.send(get("/api/admin/events/42", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_error(response).await;

    // wrong field type never reaches validation
    let response = app
        .send(json_request("POST", "/api/admin/events", Some(&cookie), json!({ "title": 5 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_error(response).await;

    let response = app
        .send(json_request("PUT", "/api/admin/settings", Some(&cookie), json!(["not", "an", "object"])))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_error(response).await;
}

#[tokio::test]
async fn test_oversized_json_body_is_payload_too_large() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;
    let limit = app.state.config.admin_body_limit();

    let about = json!({ "title": "Big", "body": "x".repeat(limit + 1) });
    let response = app.send(json_request("PUT", "/api/admin/about", Some(&cookie), about)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"], "Request body too large");

    // nothing was written
    let about = body_json(app.send(get("/api/admin/about", Some(&cookie))).await).await;
    assert_ne!(about["title"], "Big");
}

#[tokio::test]
async fn test_malformed_login_body_is_a_json_error() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": \"admin\""))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_error(response).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::from("username=admin"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_error(response).await;
}

async fn assert_json_error(response: axum::response::Response) {
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"), "got {content_type}");
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "got {body}");
}

#[tokio::test]
async fn test_singletons_and_full_document() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;

    let mut settings = body_json(app.send(get("/api/admin/settings", Some(&cookie))).await).await;
    settings["tagline"] = json!("Families first");
    let response = app
        .send(json_request("PUT", "/api/admin/settings", Some(&cookie), settings))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let about = json!({ "title": "Who we are", "body": "Since **2015**." });
    let response = app.send(json_request("PUT", "/api/admin/about", Some(&cookie), about)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(app.send(get("/about", None)).await).await;
    assert!(html.contains("Who we are"));
    assert!(html.contains("<strong>2015</strong>"));
    assert!(html.contains("Families first"));

    // the full document includes drafts, unlike the public one
    let mut content = body_json(app.send(get("/api/admin/content", Some(&cookie))).await).await;
    assert_eq!(content["posts"].as_array().unwrap().len(), 2);

    content["partners"] = json!([]);
    let response = app
        .send(json_request("PUT", "/api/admin/content", Some(&cookie), content))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let partners = body_json(app.send(get("/api/admin/partners", Some(&cookie))).await).await;
    assert!(partners.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reload_picks_up_external_edits() {
    let app = TestApp::new(&sample_content(), UploadMode::Inline);
    let cookie = app.login_cookie().await;

    // fill the cache, then edit the file by hand
    app.send(get("/", None)).await;
    let mut content = sample_content();
    content.services[0].title = "Edited on disk".into();
    std::fs::write(
        &app.state.config.content_file,
        serde_json::to_string(&content).unwrap(),
    )
    .unwrap();

    let html = body_text(app.send(get("/services", None)).await).await;
    assert!(!html.contains("Edited on disk"));

    let response = app.send(send_empty("POST", "/api/admin/reload", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let service = body_json(
        app.send(get(&format!("/api/admin/services/{}", id(10)), Some(&cookie)))
            .await,
    )
    .await;
    assert_eq!(service["title"], "Edited on disk");
}
