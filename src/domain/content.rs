use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub twitter_url: String,
    pub youtube_url: String,
    pub footer_text: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "O'FAMM".to_string(),
            tagline: String::new(),
            contact_email: String::new(),
            phone: String::new(),
            address: String::new(),
            facebook_url: String::new(),
            instagram_url: String::new(),
            twitter_url: String::new(),
            youtube_url: String::new(),
            footer_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub title: String,
    pub intro: String,
    // markdown
    pub body: String,
    pub mission: String,
    pub vision: String,
    pub image: String,
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            title: "About us".to_string(),
            intro: String::new(),
            body: String::new(),
            mission: String::new(),
            vision: String::new(),
            image: String::new(),
        }
    }
}

/// A hero-carousel entry on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Slide {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub cta_label: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// Free text as typed by the editor, e.g. "15 March 2025" or "March 15-17, 2025".
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub image: String,
    pub registration_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryImage {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub caption: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub logo: String,
    pub website: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    // minor units, so 1250 is 12.50
    pub price_cents: i64,
    pub currency: String,
    pub image: String,
    pub in_stock: bool,
    pub purchase_link: String,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            description: String::new(),
            price_cents: 0,
            currency: "USD".to_string(),
            image: String::new(),
            in_stock: true,
            purchase_link: String::new(),
        }
    }
}

impl Product {
    /// Renders the price as `"USD 12.50"`.
    pub fn display_price(&self) -> String {
        format_price(self.price_cents, &self.currency)
    }
}

pub fn format_price(price_cents: i64, currency: &str) -> String {
    let sign = if price_cents < 0 { "-" } else { "" };
    let abs = price_cents.unsigned_abs();
    let amount = format!("{sign}{}.{:02}", abs / 100, abs % 100);
    if currency.is_empty() {
        amount
    } else {
        format!("{currency} {amount}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    // markdown
    pub body: String,
    pub cover_image: String,
    pub author: String,
    pub published_on: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub published: bool,
}

impl Default for BlogPost {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            slug: String::new(),
            title: String::new(),
            excerpt: String::new(),
            body: String::new(),
            cover_image: String::new(),
            author: String::new(),
            published_on: None,
            tags: Vec::new(),
            published: true,
        }
    }
}

/// Everything the site renders. One `Content` is one snapshot of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    pub settings: SiteSettings,
    pub about: AboutContent,
    pub slides: Vec<Slide>,
    pub services: Vec<Service>,
    pub events: Vec<Event>,
    pub gallery: Vec<GalleryImage>,
    pub partners: Vec<Partner>,
    pub products: Vec<Product>,
    pub posts: Vec<BlogPost>,
}

impl Content {
    /// Published posts, newest first. Undated posts sort last.
    pub fn published_posts(&self) -> Vec<&BlogPost> {
        let mut posts: Vec<&BlogPost> = self.posts.iter().filter(|p| p.published).collect();
        posts.sort_by(|a, b| match (a.published_on, b.published_on) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        posts
    }

    pub fn published_post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.published && p.slug == slug)
    }

    /// Copy with unpublished posts removed, for the public JSON endpoint.
    pub fn public_view(&self) -> Content {
        let mut content = self.clone();
        content.posts.retain(|p| p.published);
        content
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes. Accented and other
/// non-ASCII letters are transliterated first, so "Fête" becomes "fete".
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
