use crate::database::ContentStore;
use crate::domain::{
    AboutContent, BlogPost, Content, Event, GalleryImage, Partner, Product, Service, SiteSettings,
    Slide,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresContentStore {
    pool: PgPool,
}

impl PostgresContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// `position` is the index in the collection, so reads come back in editor order
fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

async fn clear(tx: &mut Transaction<'_, Postgres>, table: &str) -> Result<()> {
    sqlx::query(&format!("DELETE FROM {table}"))
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to clear {table}"))?;
    Ok(())
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn get_content(&self) -> Result<Content> {
        let settings = sqlx::query_as::<_, SiteSettings>(
            r#"SELECT site_name, tagline, contact_email, phone, address, facebook_url,
                      instagram_url, twitter_url, youtube_url, footer_text
               FROM site_settings WHERE id = 1"#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load site settings")?
        .unwrap_or_default();

        let about = sqlx::query_as::<_, AboutContent>(
            "SELECT title, intro, body, mission, vision, image FROM about WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load about content")?
        .unwrap_or_default();

        let slides = sqlx::query_as::<_, Slide>(
            r#"SELECT id, title, description, image, cta_label, cta_link
               FROM slides ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load slides")?;

        let services = sqlx::query_as::<_, Service>(
            r#"SELECT id, title, summary, description, image FROM services ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load services")?;

        let events = sqlx::query_as::<_, Event>(
            r#"SELECT id, title, "date", "time", location, description, image, registration_link
               FROM events ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load events")?;

        let gallery = sqlx::query_as::<_, GalleryImage>(
            r#"SELECT id, title, image, caption, category FROM gallery_images ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load gallery")?;

        let partners = sqlx::query_as::<_, Partner>(
            r#"SELECT id, name, logo, website, description FROM partners ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load partners")?;

        let products = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, description, price_cents, currency, image, in_stock, purchase_link
               FROM products ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load products")?;

        let posts = sqlx::query_as::<_, BlogPost>(
            r#"SELECT id, slug, title, excerpt, body, cover_image, author, published_on, tags,
                      published
               FROM blog_posts ORDER BY "position""#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load blog posts")?;

        Ok(Content {
            settings,
            about,
            slides,
            services,
            events,
            gallery,
            partners,
            products,
            posts,
        })
    }

    // delete-all-then-reinsert per table, all inside one transaction
    async fn save_content(&self, content: &Content) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start content transaction")?;

        clear(&mut tx, "site_settings").await?;
        let s = &content.settings;
        sqlx::query(
            r#"INSERT INTO site_settings (id, site_name, tagline, contact_email, phone, address,
                   facebook_url, instagram_url, twitter_url, youtube_url, footer_text)
               VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(&s.site_name)
        .bind(&s.tagline)
        .bind(&s.contact_email)
        .bind(&s.phone)
        .bind(&s.address)
        .bind(&s.facebook_url)
        .bind(&s.instagram_url)
        .bind(&s.twitter_url)
        .bind(&s.youtube_url)
        .bind(&s.footer_text)
        .execute(&mut *tx)
        .await
        .context("Failed to save site settings")?;

        clear(&mut tx, "about").await?;
        let a = &content.about;
        sqlx::query(
            r#"INSERT INTO about (id, title, intro, body, mission, vision, image)
               VALUES (1, $1, $2, $3, $4, $5, $6)"#,
        )
        .bind(&a.title)
        .bind(&a.intro)
        .bind(&a.body)
        .bind(&a.mission)
        .bind(&a.vision)
        .bind(&a.image)
        .execute(&mut *tx)
        .await
        .context("Failed to save about content")?;

        clear(&mut tx, "slides").await?;
        for (i, slide) in content.slides.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO slides (id, "position", title, description, image, cta_label, cta_link)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
            )
            .bind(slide.id)
            .bind(position(i))
            .bind(&slide.title)
            .bind(&slide.description)
            .bind(&slide.image)
            .bind(&slide.cta_label)
            .bind(&slide.cta_link)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save slide {}", slide.id))?;
        }

        clear(&mut tx, "services").await?;
        for (i, service) in content.services.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO services (id, "position", title, summary, description, image)
                   VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(service.id)
            .bind(position(i))
            .bind(&service.title)
            .bind(&service.summary)
            .bind(&service.description)
            .bind(&service.image)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save service {}", service.id))?;
        }

        clear(&mut tx, "events").await?;
        for (i, event) in content.events.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO events (id, "position", title, "date", "time", location,
                       description, image, registration_link)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
            )
            .bind(event.id)
            .bind(position(i))
            .bind(&event.title)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.description)
            .bind(&event.image)
            .bind(&event.registration_link)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save event {}", event.id))?;
        }

        clear(&mut tx, "gallery_images").await?;
        for (i, image) in content.gallery.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO gallery_images (id, "position", title, image, caption, category)
                   VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(image.id)
            .bind(position(i))
            .bind(&image.title)
            .bind(&image.image)
            .bind(&image.caption)
            .bind(&image.category)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save gallery image {}", image.id))?;
        }

        clear(&mut tx, "partners").await?;
        for (i, partner) in content.partners.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO partners (id, "position", name, logo, website, description)
                   VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(partner.id)
            .bind(position(i))
            .bind(&partner.name)
            .bind(&partner.logo)
            .bind(&partner.website)
            .bind(&partner.description)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save partner {}", partner.id))?;
        }

        clear(&mut tx, "products").await?;
        for (i, product) in content.products.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO products (id, "position", name, description, price_cents, currency,
                       image, in_stock, purchase_link)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
            )
            .bind(product.id)
            .bind(position(i))
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price_cents)
            .bind(&product.currency)
            .bind(&product.image)
            .bind(product.in_stock)
            .bind(&product.purchase_link)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save product {}", product.id))?;
        }

        clear(&mut tx, "blog_posts").await?;
        for (i, post) in content.posts.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO blog_posts (id, "position", slug, title, excerpt, body, cover_image,
                       author, published_on, tags, published)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
            )
            .bind(post.id)
            .bind(position(i))
            .bind(&post.slug)
            .bind(&post.title)
            .bind(&post.excerpt)
            .bind(&post.body)
            .bind(&post.cover_image)
            .bind(&post.author)
            .bind(post.published_on)
            .bind(&post.tags)
            .bind(post.published)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save blog post {}", post.slug))?;
        }

        tx.commit()
            .await
            .context("Failed to commit content transaction")?;

        tracing::debug!("content saved to postgres");
        Ok(())
    }

    async fn has_content(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM site_settings)")
            .fetch_one(&self.pool)
            .await
            .context("Failed to check site_settings")?;
        Ok(exists)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
