//! Catalog products.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;
use super::validation::{ValidationError, require_text};

const fn default_active() -> bool {
    true
}

/// A product in the catalog.
///
/// Serialized with camelCase keys to match the persisted document
/// (`imageUrl`, not `image_url`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, immutable product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Category this product is listed under. Not checked against the
    /// category collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    /// Image URL shown in the catalog.
    #[serde(default)]
    pub image_url: String,
    /// Whether the product is highlighted on the home page.
    #[serde(default)]
    pub featured: bool,
    /// View counter.
    #[serde(default)]
    pub views: u64,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inactive products are hidden from public listings.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Payload for creating a product.
///
/// Fields are kept loosely typed (`f64`, `String`) so that bad values
/// surface as [`ValidationError`]s rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
    pub views: Option<u64>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl ProductInput {
    /// Validate the input and build a product.
    ///
    /// A missing id is replaced by a generated UUID.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty name, a bad id or category
    /// id, or a negative or non-finite price.
    pub fn into_product(self) -> Result<Product, ValidationError> {
        require_text("name", &self.name)?;
        let id = match self.id.as_deref() {
            Some(id) => ProductId::parse(id)?,
            None => ProductId::generate(),
        };
        let price = Price::from_f64(self.price)?;
        let category = self.category.as_deref().map(CategoryId::parse).transpose()?;

        Ok(Product {
            id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            price,
            category,
            image_url: self.image_url.unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
            views: self.views.unwrap_or(0),
            tags: self.tags.unwrap_or_default(),
            active: self.active.unwrap_or(true),
        })
    }
}

/// Partial update for a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    /// Accepted only when equal to the current id.
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// `null` clears the category; an absent key leaves it unchanged.
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
    pub views: Option<u64>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl ProductPatch {
    /// Apply the patch to `product`.
    ///
    /// Every field is validated before anything is written, so a rejected
    /// patch leaves the product untouched.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ImmutableId` if the patch names a different
    /// id, or the same errors as [`ProductInput::into_product`].
    pub fn apply(self, product: &mut Product) -> Result<(), ValidationError> {
        if let Some(requested) = self.id {
            if requested != product.id.as_str() {
                return Err(ValidationError::ImmutableId {
                    current: product.id.to_string(),
                    requested,
                });
            }
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        let price = self.price.map(Price::from_f64).transpose()?;
        let category = match self.category {
            Some(Some(raw)) => Some(Some(CategoryId::parse(&raw)?)),
            Some(None) => Some(None),
            None => None,
        };

        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = price {
            product.price = price;
        }
        if let Some(category) = category {
            product.category = category;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(views) = self.views {
            product.views = views;
        }
        if let Some(tags) = self.tags {
            product.tags = tags;
        }
        if let Some(active) = self.active {
            product.active = active;
        }
        Ok(())
    }
}

/// Deserialize a key that is present, keeping `null` distinct from absent.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
