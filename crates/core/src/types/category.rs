//! Catalog categories.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::validation::{ValidationError, require_text};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique, immutable category id (a slug such as `buques`).
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
}

/// Payload for creating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    /// Explicit id. Derived from `name` when absent.
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

impl CategoryInput {
    /// Validate the input and build a category.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty name or an invalid id
    /// (including a name that slugifies to nothing).
    pub fn into_category(self) -> Result<Category, ValidationError> {
        require_text("name", &self.name)?;
        let id = match self.id.as_deref() {
            Some(id) => CategoryId::parse(id)?,
            None => CategoryId::parse(&slugify(&self.name))?,
        };
        Ok(Category {
            id,
            name: self.name,
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    /// Accepted only when equal to the current id.
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    /// Apply the patch to `category`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ImmutableId` if the patch names a different
    /// id, or `ValidationError::EmptyField` for an empty name.
    pub fn apply(self, category: &mut Category) -> Result<(), ValidationError> {
        if let Some(requested) = self.id {
            if requested != category.id.as_str() {
                return Err(ValidationError::ImmutableId {
                    current: category.id.to_string(),
                    requested,
                });
            }
        }
        if let Some(name) = self.name {
            require_text("name", &name)?;
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        Ok(())
    }
}

/// Derive a URL-safe id from a display name.
///
/// Lowercases, folds common Portuguese accents to ASCII, and joins the
/// remaining alphanumeric runs with `-` ("Buquês Especiais" -> "buques-especiais").
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
