//! Tera setup for every server-rendered page, public and admin.

use crate::domain::{COLLECTION_NAMES, SiteSettings, format_price};
use crate::parser::markdown::render_markdown;
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tera::Tera;

/// Top navigation, in display order: (path, label).
pub const NAV_LINKS: [(&str, &str); 8] = [
    ("/", "Home"),
    ("/about", "About"),
    ("/services", "Services"),
    ("/events", "Events"),
    ("/gallery", "Gallery"),
    ("/partners", "Partners"),
    ("/shop", "Shop"),
    ("/blog", "Blog"),
];

#[derive(Serialize)]
struct NavLink {
    path: &'static str,
    label: &'static str,
    active: bool,
}

pub struct SiteRenderer {
    tera: Tera,
}

impl SiteRenderer {
    /// Loads every `*.html` under `template_dir`.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::register_filters(&mut tera);

        let count = tera.get_template_names().count();
        tracing::debug!(count, dir = %template_dir.display(), "loaded templates");

        Ok(Self { tera })
    }

    fn register_filters(tera: &mut Tera) {
        // {{ post.body | markdown | safe }}
        tera.register_filter(
            "markdown",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let text = tera::try_get_value!("markdown", "value", String, value);
                Ok(tera::Value::String(render_markdown(&text)))
            },
        );

        // {{ product.priceCents | price(currency=product.currency) }}
        tera.register_filter(
            "price",
            |value: &tera::Value, args: &HashMap<String, tera::Value>| {
                let cents = tera::try_get_value!("price", "value", i64, value);
                let currency = args.get("currency").and_then(|v| v.as_str()).unwrap_or("");
                Ok(tera::Value::String(format_price(cents, currency)))
            },
        );
    }

    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render {template}"))
    }
}

/// Context every public page starts from: settings, navigation and footer data.
pub fn page_context(settings: &SiteSettings, active_path: &str, title: &str) -> tera::Context {
    let nav: Vec<NavLink> = NAV_LINKS
        .iter()
        .map(|&(path, label)| NavLink {
            path,
            label,
            active: path == active_path,
        })
        .collect();

    let mut context = tera::Context::new();
    context.insert("settings", settings);
    context.insert("nav", &nav);
    context.insert("page_title", title);
    context.insert("year", &Local::now().year());
    context
}

/// Context for admin shells: section list for the sidebar.
pub fn admin_context(settings: &SiteSettings, section: &str, username: &str) -> tera::Context {
    let mut sections = vec!["settings", "about"];
    sections.extend(COLLECTION_NAMES);

    let mut context = tera::Context::new();
    context.insert("settings", settings);
    context.insert("sections", &sections);
    context.insert("section", section);
    context.insert("username", username);
    context
}
