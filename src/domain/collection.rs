use crate::domain::content::{
    BlogPost, Content, Event, GalleryImage, Partner, Product, Service, Slide, slugify,
};
use crate::domain::ValidationError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use uuid::Uuid;

/// A list-shaped section of the content store that the admin area edits item by item.
pub trait CollectionItem: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name used in admin URLs and logs.
    const NAME: &'static str;

    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);

    fn items(content: &Content) -> &Vec<Self>;
    fn items_mut(content: &mut Content) -> &mut Vec<Self>;

    /// Trims fields and rejects items that cannot be rendered.
    fn normalize(&mut self) -> Result<(), ValidationError>;

    /// Uniqueness rules between two items of the same collection.
    fn conflicts_with(&self, _other: &Self) -> Option<ValidationError> {
        None
    }
}

/// Names of every collection, in admin menu order.
pub const COLLECTION_NAMES: [&str; 7] = [
    Slide::NAME,
    Service::NAME,
    Event::NAME,
    GalleryImage::NAME,
    Partner::NAME,
    Product::NAME,
    BlogPost::NAME,
];

fn trim(field: &mut String) {
    let trimmed = field.trim();
    if trimmed.len() != field.len() {
        *field = trimmed.to_string();
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Assigns ids to new items, normalizes each one and checks pairwise rules.
pub fn normalize_collection<T: CollectionItem>(items: &mut [T]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();

    for item in items.iter_mut() {
        if item.id().is_nil() {
            item.set_id(Uuid::new_v4());
        }
        if !seen.insert(item.id()) {
            return Err(ValidationError::new(
                "id",
                format!("duplicate id {} in {}", item.id(), T::NAME),
            ));
        }
        item.normalize()?;
    }

    for (i, item) in items.iter().enumerate() {
        for other in &items[i + 1..] {
            if let Some(err) = item.conflicts_with(other) {
                return Err(err);
            }
        }
    }

    Ok(())
}

/// Normalizes every section of `content` in place.
pub fn normalize_content(content: &mut Content) -> Result<(), ValidationError> {
    trim(&mut content.settings.site_name);
    require("siteName", &content.settings.site_name)?;
    trim(&mut content.about.title);

    normalize_collection(&mut content.slides)?;
    normalize_collection(&mut content.services)?;
    normalize_collection(&mut content.events)?;
    normalize_collection(&mut content.gallery)?;
    normalize_collection(&mut content.partners)?;
    normalize_collection(&mut content.products)?;
    normalize_collection(&mut content.posts)?;
    Ok(())
}

impl CollectionItem for Slide {
    const NAME: &'static str = "slides";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.slides
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.slides
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.title);
        trim(&mut self.cta_label);
        trim(&mut self.cta_link);
        require("title", &self.title)?;
        // a label without a target renders as a dead button
        if !self.cta_label.is_empty() && self.cta_link.is_empty() {
            return Err(ValidationError::new(
                "ctaLink",
                "required when a call-to-action label is set",
            ));
        }
        Ok(())
    }
}

impl CollectionItem for Service {
    const NAME: &'static str = "services";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.services
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.services
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.title);
        trim(&mut self.summary);
        require("title", &self.title)
    }
}

impl CollectionItem for Event {
    const NAME: &'static str = "events";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.events
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.events
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.title);
        trim(&mut self.date);
        trim(&mut self.time);
        trim(&mut self.location);
        require("title", &self.title)?;
        require("date", &self.date)
    }
}

impl CollectionItem for GalleryImage {
    const NAME: &'static str = "gallery";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.gallery
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.gallery
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.title);
        trim(&mut self.image);
        trim(&mut self.category);
        require("image", &self.image)
    }
}

impl CollectionItem for Partner {
    const NAME: &'static str = "partners";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.partners
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.partners
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.name);
        trim(&mut self.website);
        require("name", &self.name)
    }
}

impl CollectionItem for Product {
    const NAME: &'static str = "products";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.products
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.products
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.name);
        self.currency = self.currency.trim().to_ascii_uppercase();
        if self.currency.is_empty() {
            self.currency = "USD".to_string();
        }
        require("name", &self.name)?;
        if self.price_cents < 0 {
            return Err(ValidationError::new("priceCents", "must not be negative"));
        }
        Ok(())
    }
}

impl CollectionItem for BlogPost {
    const NAME: &'static str = "posts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn items(content: &Content) -> &Vec<Self> {
        &content.posts
    }

    fn items_mut(content: &mut Content) -> &mut Vec<Self> {
        &mut content.posts
    }

    fn normalize(&mut self) -> Result<(), ValidationError> {
        trim(&mut self.title);
        trim(&mut self.author);
        require("title", &self.title)?;

        self.slug = if self.slug.trim().is_empty() {
            slugify(&self.title)
        } else {
            slugify(&self.slug)
        };
        require("slug", &self.slug)?;

        self.tags = self
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(())
    }

    fn conflicts_with(&self, other: &Self) -> Option<ValidationError> {
        if self.id != other.id && self.slug == other.slug {
            return Some(ValidationError::new(
                "slug",
                format!("'{}' is already used by another post", self.slug),
            ));
        }
        None
    }
}
