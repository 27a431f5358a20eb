use crate::config::{LogFormat, OfammConfig, UploadMode};
use crate::database::{ContentStore, JsonFileContentStore};
use crate::domain::{
    AboutContent, BlogPost, Content, Event, GalleryImage, Partner, Product, Service, SiteSettings,
    Slide,
};
use crate::features::site::render::SiteRenderer;
use crate::io::{InlineMediaStorage, LocalMediaStorage, MediaStorage};
use crate::services::{AuthService, ContentService};
use crate::{AppState, build_router};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "an-hs256-test-secret-of-at-least-32-bytes";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "correct horse battery staple";

pub fn template_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

// config as the env loader would build it, pointed at `dir`
pub fn test_config(dir: &Path, upload_mode: UploadMode) -> OfammConfig {
    OfammConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        use_database: false,
        database_url: None,
        max_connections: 1,
        content_file: dir.join("content.json"),
        template_dir: template_dir(),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        upload_dir: dir.join("uploads"),
        upload_mode,
        max_upload_bytes: 64 * 1024,
        admin_username: ADMIN_USER.into(),
        admin_password: Some(ADMIN_PASS.into()),
        admin_password_hash: None,
        jwt_secret: TEST_SECRET.into(),
        token_ttl_hours: 1,
        cookie_secure: false,
        log_format: LogFormat::Text,
    }
}

// --- Manual Mock: ContentStore ---
// keeps the "database" in memory and counts round trips, so tests can see
// when the service cache is used instead of the store
#[derive(Clone, Default)]
pub struct MockContentStore {
    pub content: Arc<Mutex<Content>>,
    pub loads: Arc<AtomicUsize>,
    pub saves: Arc<AtomicUsize>,
    pub fail_saves: Arc<AtomicBool>,
}

impl MockContentStore {
    pub fn with_content(content: Content) -> Self {
        Self {
            content: Arc::new(Mutex::new(content)),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Content {
        self.content.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn get_content(&self) -> Result<Content> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.content.lock().unwrap().clone())
    }

    async fn save_content(&self, content: &Content) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("mock store refused the write");
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.content.lock().unwrap() = content.clone();
        Ok(())
    }

    async fn has_content(&self) -> Result<bool> {
        Ok(*self.content.lock().unwrap() != Content::default())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn event(n: u128, title: &str, date: &str) -> Event {
    Event {
        id: id(n),
        title: title.into(),
        date: date.into(),
        location: "Community Hall".into(),
        ..Event::default()
    }
}

pub fn post(n: u128, title: &str, published_on: Option<NaiveDate>, published: bool) -> BlogPost {
    BlogPost {
        id: id(n),
        slug: crate::domain::slugify(title),
        title: title.into(),
        excerpt: format!("{title} excerpt"),
        body: format!("# {title}\n\nSome **bold** text."),
        published_on,
        published,
        ..BlogPost::default()
    }
}

// a small site with something in every section
pub fn sample_content() -> Content {
    Content {
        settings: SiteSettings {
            site_name: "O'FAMM".into(),
            tagline: "Supporting families".into(),
            contact_email: "hello@ofamm.test".into(),
            ..SiteSettings::default()
        },
        about: AboutContent {
            title: "About O'FAMM".into(),
            intro: "Who we are".into(),
            body: "We *help* families.".into(),
            mission: "Support every family".into(),
            ..AboutContent::default()
        },
        slides: vec![Slide {
            id: id(1),
            title: "Welcome slide".into(),
            cta_label: "Learn more".into(),
            cta_link: "/about".into(),
            ..Slide::default()
        }],
        services: vec![Service {
            id: id(10),
            title: "Family counselling".into(),
            summary: "Confidential sessions".into(),
            ..Service::default()
        }],
        events: vec![
            event(20, "Spring picnic 2001", "15 March 2001"),
            event(21, "Gala 2999", "March 15, 2999"),
        ],
        gallery: vec![GalleryImage {
            id: id(30),
            title: "Picnic".into(),
            image: "/uploads/picnic.png".into(),
            category: "Events".into(),
            ..GalleryImage::default()
        }],
        partners: vec![Partner {
            id: id(40),
            name: "Springfield Council".into(),
            website: "https://example.org".into(),
            ..Partner::default()
        }],
        products: vec![Product {
            id: id(50),
            name: "Tote bag".into(),
            price_cents: 1250,
            currency: "USD".into(),
            ..Product::default()
        }],
        posts: vec![
            post(60, "Hello world", Some(date(2025, 1, 10)), true),
            post(61, "Secret draft", None, false),
        ],
    }
}

pub struct TestApp {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    /// App backed by a real JSON file in a temp dir, seeded with `content`.
    pub fn new(content: &Content, upload_mode: UploadMode) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), upload_mode);
        std::fs::write(
            &config.content_file,
            serde_json::to_string_pretty(content).unwrap(),
        )
        .unwrap();

        let store: Box<dyn ContentStore> = Box::new(JsonFileContentStore::new(&config.content_file));
        let media: Arc<dyn MediaStorage> = match upload_mode {
            UploadMode::Inline => Arc::new(InlineMediaStorage),
            UploadMode::Disk => Arc::new(LocalMediaStorage::new(&config.upload_dir)),
        };

        let state = AppState {
            content: Arc::new(ContentService::new(store)),
            auth: Arc::new(AuthService::new(&config)),
            media,
            renderer: Arc::new(SiteRenderer::new(&config.template_dir).unwrap()),
            config: Arc::new(config),
        };

        Self { state, dir }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Logs in through the API and returns the `name=value` cookie pair.
    pub async fn login_cookie(&self) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                serde_json::json!({ "username": ADMIN_USER, "password": ADMIN_PASS }),
            ))
            .await;
        assert!(response.status().is_success(), "login failed: {}", response.status());
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login sets a cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn send_empty(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
