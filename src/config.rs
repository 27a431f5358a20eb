use anyhow::{Context, Result, bail};
use derive_more::Display;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum UploadMode {
    // store the bytes in the content itself as a data url
    #[display("inline")]
    Inline,
    // write to UPLOAD_DIR, served under /uploads
    #[display("disk")]
    Disk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum LogFormat {
    #[display("text")]
    Text,
    #[display("json")]
    Json,
}

#[derive(Clone, Debug)]
pub struct OfammConfig {
    pub bind_addr: SocketAddr,
    pub use_database: bool,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub content_file: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub upload_mode: UploadMode,
    pub max_upload_bytes: usize,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub admin_password_hash: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cookie_secure: bool,
    pub log_format: LogFormat,
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag(key: &str) -> bool {
    matches!(
        var(key).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "1" | "yes")
    )
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}")),
        None => Ok(default),
    }
}

impl OfammConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = parsed("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let use_database = flag("USE_DATABASE");
        let database_url = var("DATABASE_URL");
        if use_database && database_url.is_none() {
            bail!("USE_DATABASE=true requires DATABASE_URL");
        }

        let upload_mode = match var("UPLOAD_MODE").as_deref() {
            None | Some("disk") => UploadMode::Disk,
            Some("inline") => UploadMode::Inline,
            Some(other) => bail!("Invalid UPLOAD_MODE '{other}', expected 'inline' or 'disk'"),
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let token_ttl_hours = parsed("TOKEN_TTL_HOURS", 24_i64)?;
        if token_ttl_hours <= 0 {
            bail!("TOKEN_TTL_HOURS must be positive");
        }

        Ok(Self {
            bind_addr,
            use_database,
            database_url,
            max_connections: parsed("MAX_CONNECTIONS", 5)?,
            content_file: PathBuf::from(
                var("CONTENT_FILE").unwrap_or_else(|| "./data/content.json".to_string()),
            ),
            template_dir: PathBuf::from(
                var("TEMPLATE_DIR").unwrap_or_else(|| "./templates".to_string()),
            ),
            static_dir: PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "./static".to_string())),
            upload_dir: PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
            upload_mode,
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            admin_username: var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_password: var("ADMIN_PASSWORD"),
            admin_password_hash: var("ADMIN_PASSWORD_HASH"),
            jwt_secret,
            token_ttl_hours,
            cookie_secure: flag("COOKIE_SECURE"),
            log_format,
        })
    }

    /// Request body cap for the admin area. Inline uploads land in PUT bodies
    /// as base64, so leave room for a few of them.
    pub fn admin_body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_mul(4).max(2 * 1024 * 1024)
    }
}
