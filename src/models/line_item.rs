//! Cart line items and the denormalized product snapshot they carry.

use serde::{Deserialize, Serialize};

use crate::models::Product;

// ---------------------------------------------------------------------------
// ProductSnapshot
// ---------------------------------------------------------------------------

/// Point-in-time copy of the product fields a cart line needs for display
/// and total computation.
///
/// Every field is optional at the wire level: the storefront API populates
/// the product reference inside each cart line, and that reference can come
/// back partially populated (deleted product, failed join). A snapshot is
/// only usable when [`is_valid()`](Self::is_valid) holds. Snapshots are not
/// refreshed against the live catalog after fetch, so price and name may go
/// stale relative to the product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductSnapshot {
    /// A snapshot is structurally valid when id, name and price are present.
    pub fn is_valid(&self) -> bool {
        self.id.is_some() && self.name.is_some() && self.price.is_some()
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: Some(product.name.clone()),
            price: Some(product.price),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// CartLineItem
// ---------------------------------------------------------------------------

/// One product-and-quantity pair within a cart.
///
/// On the wire the snapshot arrives under `productId` (the backend populates
/// the product reference in place).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "productId")]
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(product: ProductSnapshot, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product id this line is keyed on, when the snapshot carries one.
    pub fn product_id(&self) -> Option<&str> {
        self.product.id.as_deref()
    }

    /// Quantity times unit price, or `None` for a malformed snapshot.
    pub fn line_total(&self) -> Option<f64> {
        self.product.price.map(|price| price * self.quantity as f64)
    }
}
