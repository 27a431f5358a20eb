use crate::config::OfammConfig;
use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

// every table the content store touches, created on boot if missing
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS site_settings (
        id SMALLINT PRIMARY KEY DEFAULT 1,
        site_name TEXT NOT NULL DEFAULT '',
        tagline TEXT NOT NULL DEFAULT '',
        contact_email TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL DEFAULT '',
        address TEXT NOT NULL DEFAULT '',
        facebook_url TEXT NOT NULL DEFAULT '',
        instagram_url TEXT NOT NULL DEFAULT '',
        twitter_url TEXT NOT NULL DEFAULT '',
        youtube_url TEXT NOT NULL DEFAULT '',
        footer_text TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS about (
        id SMALLINT PRIMARY KEY DEFAULT 1,
        title TEXT NOT NULL DEFAULT '',
        intro TEXT NOT NULL DEFAULT '',
        body TEXT NOT NULL DEFAULT '',
        mission TEXT NOT NULL DEFAULT '',
        vision TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS slides (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL DEFAULT '',
        cta_label TEXT NOT NULL DEFAULT '',
        cta_link TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS services (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        title TEXT NOT NULL,
        summary TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS events (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        title TEXT NOT NULL,
        "date" TEXT NOT NULL DEFAULT '',
        "time" TEXT NOT NULL DEFAULT '',
        location TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL DEFAULT '',
        registration_link TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS gallery_images (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL,
        caption TEXT NOT NULL DEFAULT '',
        category TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS partners (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        name TEXT NOT NULL,
        logo TEXT NOT NULL DEFAULT '',
        website TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price_cents BIGINT NOT NULL DEFAULT 0,
        currency TEXT NOT NULL DEFAULT 'USD',
        image TEXT NOT NULL DEFAULT '',
        in_stock BOOLEAN NOT NULL DEFAULT TRUE,
        purchase_link TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS blog_posts (
        id UUID PRIMARY KEY,
        "position" INTEGER NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        excerpt TEXT NOT NULL DEFAULT '',
        body TEXT NOT NULL DEFAULT '',
        cover_image TEXT NOT NULL DEFAULT '',
        author TEXT NOT NULL DEFAULT '',
        published_on DATE,
        tags TEXT[] NOT NULL DEFAULT '{}',
        published BOOLEAN NOT NULL DEFAULT TRUE
    )"#,
];

pub async fn connect(config: &OfammConfig) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("USE_DATABASE is set but DATABASE_URL is missing")?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .context("Failed to connect to the content database")
}

/// Creates any missing content tables. Safe to run on every boot.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to bootstrap content schema")?;
    }
    tracing::info!(tables = SCHEMA.len(), "content schema ready");
    Ok(())
}
