//! Product catalog queries and admin management.
//!
//! Reads fetch the full product list from the remote and filter in memory,
//! the way the storefront does. Mutations are reserved for admin identities.

use tracing::info;

use crate::auth::Role;
use crate::error::{AgriosError, Result};
use crate::models::{NewProduct, Product};
use crate::AgriosSdk;

/// Catalog interface bound to an [`AgriosSdk`] client.
///
/// Obtained via [`AgriosSdk::catalog()`].
pub struct Catalog<'a> {
    sdk: &'a AgriosSdk,
}

impl<'a> Catalog<'a> {
    pub(crate) fn new(sdk: &'a AgriosSdk) -> Self {
        Self { sdk }
    }

    /// Fetch all products.
    pub async fn list(&self) -> Result<Vec<Product>> {
        self.sdk.backend.fetch_products().await
    }

    /// Products whose name contains `name`, case-insensitively.
    pub async fn search(&self, name: &str) -> Result<Vec<Product>> {
        let name_lower = name.to_lowercase();
        let products = self.list().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&name_lower))
            .collect())
    }

    /// Products in the given category.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>> {
        let products = self.list().await?;
        Ok(products
            .into_iter()
            .filter(|p| {
                p.category
                    .as_deref()
                    .map(|c| c.eq_ignore_ascii_case(category))
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Fetch a single product by id.
    pub async fn get(&self, product_id: &str) -> Result<Product> {
        let products = self.list().await?;
        products
            .into_iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AgriosError::NotFound(format!("product {product_id}")))
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    // -- Admin operations --------------------------------------------------

    /// Create a product. Admin only.
    pub async fn create(&self, product: &NewProduct) -> Result<Product> {
        self.require_admin()?;
        let created = self.sdk.backend.create_product(product).await?;
        info!(product_id = %created.id, "product created");
        Ok(created)
    }

    /// Update a product's details. Admin only.
    pub async fn update(&self, product_id: &str, product: &NewProduct) -> Result<Product> {
        self.require_admin()?;
        let updated = self.sdk.backend.update_product(product_id, product).await?;
        info!(product_id, "product updated");
        Ok(updated)
    }

    /// Delete a product. Admin only.
    pub async fn delete(&self, product_id: &str) -> Result<()> {
        self.require_admin()?;
        self.sdk.backend.delete_product(product_id).await?;
        info!(product_id, "product deleted");
        Ok(())
    }

    fn require_admin(&self) -> Result<()> {
        let identity = self.sdk.require_identity()?;
        if identity.role != Role::Admin {
            return Err(AgriosError::Forbidden(
                "catalog management requires an admin account".to_string(),
            ));
        }
        Ok(())
    }
}
