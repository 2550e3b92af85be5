//! Catalog service: products, categories, settings and orders.

use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use flore_core::{
    Category, CategoryInput, CategoryPatch, Order, Product, ProductInput, ProductPatch, Settings,
    StoreDocument, ValidationError,
};

use crate::store::{DocumentStore, StorageBackend, StoreError};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No entity with the given id.
    #[error("{0} not found")]
    NotFound(String),

    /// An entity with the given id already exists.
    #[error("{0} already exists")]
    Conflict(String),

    /// The store could not persist the change.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Who is looking at the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Storefront visitors: active products only.
    Public,
    /// Authenticated admin: everything.
    Admin,
}

impl Visibility {
    const fn shows(self, product: &Product) -> bool {
        matches!(self, Self::Admin) || product.active
    }
}

/// Catalog service.
pub struct CatalogService<'a, B: StorageBackend> {
    store: &'a DocumentStore<B>,
}

impl<'a, B: StorageBackend> CatalogService<'a, B> {
    /// Create a catalog service over `store`.
    #[must_use]
    pub const fn new(store: &'a DocumentStore<B>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Products visible to `visibility`, in store order.
    pub async fn list_products(&self, visibility: Visibility) -> Vec<Product> {
        self.store
            .read(|doc| {
                doc.products
                    .iter()
                    .filter(|p| visibility.shows(p))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// One product, if visible to `visibility`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product is missing or hidden.
    pub async fn get_product(&self, id: &str, visibility: Visibility) -> Result<Product, CatalogError> {
        self.store
            .read(|doc| {
                doc.product(id)
                    .filter(|p| visibility.shows(p))
                    .cloned()
                    .ok_or_else(|| product_not_found(id))
            })
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input,
    /// `CatalogError::Conflict` for a duplicate id, or `CatalogError::Store`.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let product = input.into_product()?;
        let created = self
            .store
            .mutate(|doc| {
                if doc.product(product.id.as_str()).is_some() {
                    return Err(CatalogError::Conflict(format!("product '{}'", product.id)));
                }
                doc.products.push(product.clone());
                Ok(product)
            })
            .await?;
        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound`, `CatalogError::Validation`, or
    /// `CatalogError::Store`.
    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product, CatalogError> {
        self.store
            .mutate(|doc| {
                let product = product_mut(doc, id)?;
                patch.apply(product)?;
                Ok(product.clone())
            })
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` or `CatalogError::Store`.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        self.store
            .mutate(|doc| {
                let index = doc
                    .products
                    .iter()
                    .position(|p| p.id == *id)
                    .ok_or_else(|| product_not_found(id))?;
                doc.products.remove(index);
                Ok::<_, CatalogError>(())
            })
            .await?;
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories, in store order.
    pub async fn list_categories(&self) -> Vec<Category> {
        self.store.read(|doc| doc.categories.clone()).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input,
    /// `CatalogError::Conflict` for a duplicate id, or `CatalogError::Store`.
    #[instrument(skip(self, input))]
    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, CatalogError> {
        let category = input.into_category()?;
        self.store
            .mutate(|doc| {
                if doc.category(category.id.as_str()).is_some() {
                    return Err(CatalogError::Conflict(format!("category '{}'", category.id)));
                }
                doc.categories.push(category.clone());
                Ok(category)
            })
            .await
    }

    /// Apply a partial update to a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound`, `CatalogError::Validation`, or
    /// `CatalogError::Store`.
    #[instrument(skip(self, patch))]
    pub async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Category, CatalogError> {
        self.store
            .mutate(|doc| {
                let category = doc
                    .categories
                    .iter_mut()
                    .find(|c| c.id == *id)
                    .ok_or_else(|| category_not_found(id))?;
                patch.apply(category)?;
                Ok(category.clone())
            })
            .await
    }

    /// Delete a category. Products referencing it keep their category id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` or `CatalogError::Store`.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &str) -> Result<(), CatalogError> {
        self.store
            .mutate(|doc| {
                let index = doc
                    .categories
                    .iter()
                    .position(|c| c.id == *id)
                    .ok_or_else(|| category_not_found(id))?;
                doc.categories.remove(index);
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Settings & orders
    // =========================================================================

    /// The settings object, verbatim.
    pub async fn settings(&self) -> Settings {
        self.store.read(|doc| doc.settings.clone()).await
    }

    /// Shallow-merge `patch` into the settings and return the result.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `patch` is not an object, or
    /// `CatalogError::Store`.
    #[instrument(skip(self, patch))]
    pub async fn update_settings(&self, patch: Value) -> Result<Settings, CatalogError> {
        self.store
            .mutate(|doc| {
                doc.settings.merge(patch)?;
                Ok(doc.settings.clone())
            })
            .await
    }

    /// All orders, in store order.
    pub async fn orders(&self) -> Vec<Order> {
        self.store.read(|doc| doc.orders.clone()).await
    }
}

fn product_mut<'d>(doc: &'d mut StoreDocument, id: &str) -> Result<&'d mut Product, CatalogError> {
    doc.products
        .iter_mut()
        .find(|p| p.id == *id)
        .ok_or_else(|| product_not_found(id))
}

fn product_not_found(id: &str) -> CatalogError {
    CatalogError::NotFound(format!("product '{id}'"))
}

fn category_not_found(id: &str) -> CatalogError {
    CatalogError::NotFound(format!("category '{id}'"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use flore_core::AdminCredential;

    use super::*;
    use crate::store::MemoryBackend;

    async fn store() -> DocumentStore<MemoryBackend> {
        let (store, _) = DocumentStore::open(MemoryBackend::new(), || {
            Ok(StoreDocument::with_defaults(AdminCredential::new(String::new())))
        })
        .await
        .unwrap();
        store
    }

    fn input(value: Value) -> ProductInput {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_inactive_products_hidden_from_public() {
        let store = store().await;
        let catalog = CatalogService::new(&store);
        catalog
            .update_product("2", ProductPatch { active: Some(false), ..Default::default() })
            .await
            .unwrap();

        let public: Vec<_> = catalog.list_products(Visibility::Public).await;
        let admin: Vec<_> = catalog.list_products(Visibility::Admin).await;

        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id.as_str(), "1");
        assert_eq!(admin.len(), 2);
        assert!(matches!(
            catalog.get_product("2", Visibility::Public).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(catalog.get_product("2", Visibility::Admin).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_product_defaults_and_generated_id() {
        let store = store().await;
        let catalog = CatalogService::new(&store);

        let created = catalog
            .create_product(input(json!({ "name": "Orquídea", "price": 120.5 })))
            .await
            .unwrap();

        assert!(!created.id.as_str().is_empty());
        assert_eq!(created.views, 0);
        assert!(created.active);
        assert!(!created.featured);
        assert!(created.tags.is_empty());
        let listed = catalog.list_products(Visibility::Public).await;
        assert_eq!(listed.last().unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_create_product_duplicate_id_conflicts() {
        let store = store().await;
        let catalog = CatalogService::new(&store);
        let writes = store.backend().write_count();

        let result = catalog
            .create_product(input(json!({ "id": "1", "name": "Outro", "price": 1.0 })))
            .await;

        assert!(matches!(result, Err(CatalogError::Conflict(_))));
        assert_eq!(store.backend().write_count(), writes);
    }

    #[tokio::test]
    async fn test_create_product_validation() {
        let store = store().await;
        let catalog = CatalogService::new(&store);

        for bad in [
            json!({ "name": "", "price": 1.0 }),
            json!({ "name": "Rosa", "price": -1.0 }),
            json!({ "id": "a/b", "name": "Rosa", "price": 1.0 }),
        ] {
            let result = catalog.create_product(input(bad.clone())).await;
            assert!(matches!(result, Err(CatalogError::Validation(_))), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_update_product_rejects_id_change() {
        let store = store().await;
        let catalog = CatalogService::new(&store);
        let patch: ProductPatch = serde_json::from_value(json!({ "id": "99", "name": "X" })).unwrap();

        let result = catalog.update_product("1", patch).await;

        assert!(matches!(
            result,
            Err(CatalogError::Validation(ValidationError::ImmutableId { .. }))
        ));
        let unchanged = catalog.get_product("1", Visibility::Admin).await.unwrap();
        assert_eq!(unchanged.name, "Buquê de Rosas Vermelhas");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let store = store().await;
        let catalog = CatalogService::new(&store);
        assert!(matches!(
            catalog.update_product("nope", ProductPatch::default()).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.delete_product("nope").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_category_keeps_product_reference() {
        let store = store().await;
        let catalog = CatalogService::new(&store);

        catalog.delete_category("buques").await.unwrap();

        assert_eq!(catalog.list_categories().await.len(), 1);
        let product = catalog.get_product("1", Visibility::Public).await.unwrap();
        assert_eq!(product.category.unwrap().as_str(), "buques");
    }

    #[tokio::test]
    async fn test_create_category_slug_and_conflict() {
        let store = store().await;
        let catalog = CatalogService::new(&store);

        let created = catalog
            .create_category(CategoryInput {
                name: "Cestas de Café".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.id.as_str(), "cestas-de-cafe");

        let duplicate = catalog
            .create_category(CategoryInput {
                name: "Buquês".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(duplicate, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_settings_merges() {
        let store = store().await;
        let catalog = CatalogService::new(&store);

        let merged = catalog
            .update_settings(json!({ "whatsapp": "5511000000000" }))
            .await
            .unwrap();

        assert_eq!(merged.get("whatsapp"), Some(&json!("5511000000000")));
        assert_eq!(merged.get("siteName"), Some(&json!("Florê")));
        assert_eq!(catalog.settings().await, merged);
    }

    #[tokio::test]
    async fn test_update_settings_rejects_non_object() {
        let store = store().await;
        let catalog = CatalogService::new(&store);
        let before = catalog.settings().await;

        let result = catalog.update_settings(json!(["whatsapp"])).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(catalog.settings().await, before);
    }
}
