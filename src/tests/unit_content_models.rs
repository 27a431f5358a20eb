use crate::domain::{
    BlogPost, Content, Product, SiteSettings, Slide, format_price, normalize_collection,
    normalize_content, slugify,
};
use crate::tests::common::{date, id, post, sample_content};
use uuid::Uuid;

#[test]
fn test_slugify() {
    assert_eq!(slugify("Hello, World!  2025"), "hello-world-2025");
    assert_eq!(slugify("  Leading and trailing  "), "leading-and-trailing");
    assert_eq!(slugify("already-a-slug"), "already-a-slug");
    assert_eq!(slugify("Café crème"), "cafe-creme");
    assert_eq!(slugify("Fête des mères"), "fete-des-meres");
    assert_eq!(slugify("Año Nuevo: ¡fiesta!"), "ano-nuevo-fiesta");
    assert_eq!(slugify(" -- !! "), "");
}

#[test]
fn test_format_price() {
    assert_eq!(format_price(1250, "USD"), "USD 12.50");
    assert_eq!(format_price(5, "EUR"), "EUR 0.05");
    assert_eq!(format_price(100_000, ""), "1000.00");
    assert_eq!(format_price(-150, "USD"), "USD -1.50");

    let product = Product {
        price_cents: 999,
        currency: "GBP".into(),
        ..Product::default()
    };
    assert_eq!(product.display_price(), "GBP 9.99");
}

#[test]
fn test_published_posts_order_and_visibility() {
    let content = Content {
        posts: vec![
            post(1, "Undated", None, true),
            post(2, "Old", Some(date(2024, 1, 1)), true),
            post(3, "Draft", Some(date(2026, 1, 1)), false),
            post(4, "New", Some(date(2025, 6, 1)), true),
        ],
        ..Content::default()
    };

    let titles: Vec<&str> = content
        .published_posts()
        .iter()
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(titles, vec!["New", "Old", "Undated"]);

    assert!(content.published_post_by_slug("new").is_some());
    assert!(content.published_post_by_slug("draft").is_none());
    assert_eq!(content.public_view().posts.len(), 3);
}

#[test]
fn test_content_deserializes_with_defaults() {
    let content: Content = serde_json::from_str(
        r#"{"settings": {"siteName": "X"}, "products": [{"name": "Mug", "priceCents": 800}]}"#,
    )
    .unwrap();

    assert_eq!(content.settings.site_name, "X");
    assert_eq!(content.about.title, "About us");
    assert_eq!(content.products[0].currency, "USD");
    assert!(content.products[0].in_stock);
    assert!(content.products[0].id.is_nil());
    assert!(content.posts.is_empty());

    let json = serde_json::to_value(&content).unwrap();
    assert!(json["products"][0].get("priceCents").is_some());
    assert!(json["settings"].get("contactEmail").is_some());
}

#[test]
fn test_normalize_assigns_ids_and_trims() {
    let mut content = Content {
        products: vec![Product {
            name: "  Mug ".into(),
            currency: " eur".into(),
            ..Product::default()
        }],
        posts: vec![BlogPost {
            title: "Our First Post!".into(),
            tags: vec![" news ".into(), "".into()],
            ..BlogPost::default()
        }],
        ..Content::default()
    };

    normalize_content(&mut content).unwrap();

    let product = &content.products[0];
    assert!(!product.id.is_nil());
    assert_eq!(product.name, "Mug");
    assert_eq!(product.currency, "EUR");

    let post = &content.posts[0];
    assert_eq!(post.slug, "our-first-post");
    assert_eq!(post.tags, vec!["news".to_string()]);
}

#[test]
fn test_normalize_rejects_invalid_items() {
    let mut content = Content {
        settings: SiteSettings {
            site_name: "   ".into(),
            ..SiteSettings::default()
        },
        ..Content::default()
    };
    assert_eq!(normalize_content(&mut content).unwrap_err().field, "siteName");

    let mut slides = vec![Slide {
        title: "Hero".into(),
        cta_label: "Go".into(),
        ..Slide::default()
    }];
    assert_eq!(normalize_collection(&mut slides).unwrap_err().field, "ctaLink");

    let mut products = vec![Product {
        name: "Refund".into(),
        price_cents: -1,
        ..Product::default()
    }];
    assert_eq!(normalize_collection(&mut products).unwrap_err().field, "priceCents");

    let mut posts = vec![BlogPost {
        title: "!!!".into(),
        ..BlogPost::default()
    }];
    assert_eq!(normalize_collection(&mut posts).unwrap_err().field, "slug");
}

#[test]
fn test_normalize_rejects_duplicates() {
    let mut posts = vec![post(1, "Same title", None, true), post(2, "Same Title", None, true)];
    let err = normalize_collection(&mut posts).unwrap_err();
    assert_eq!(err.field, "slug");

    let mut posts = vec![post(1, "One", None, true), post(1, "Two", None, true)];
    let err = normalize_collection(&mut posts).unwrap_err();
    assert_eq!(err.field, "id");
}

#[test]
fn test_sample_content_is_valid() {
    let mut content = sample_content();
    let before = content.clone();
    normalize_content(&mut content).unwrap();
    assert_eq!(content, before);
    assert_ne!(content.slides[0].id, Uuid::nil());
    assert_eq!(content.slides[0].id, id(1));
}
