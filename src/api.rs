//! The remote storefront API contract and its HTTP implementation.
//!
//! The backend is an external collaborator: the single source of truth for
//! carts and products. [`CartBackend`] captures exactly the calls the SDK
//! makes; [`HttpBackend`] speaks the storefront's REST wire format with
//! `reqwest`. Tests substitute an in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config;
use crate::error::Result;
use crate::models::{CartLineItem, NewProduct, Product};

// ---------------------------------------------------------------------------
// CartBackend
// ---------------------------------------------------------------------------

/// Remote cart/product API as consumed by the SDK.
///
/// Update semantics follow the storefront contract: an update with
/// `quantity == 0` deletes the line (upsert-or-delete). The backend keeps no
/// ordering or transaction discipline across calls; callers must tolerate
/// last-write-wins.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Fetch the cart for a user. Lines arrive with the product reference
    /// populated in place, possibly only partially.
    async fn fetch_cart(&self, user_id: &str) -> Result<Vec<CartLineItem>>;

    /// Create a new cart line.
    async fn add_item(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<()>;

    /// Set a line's quantity; `0` deletes the line.
    async fn update_item(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<()>;

    async fn fetch_products(&self) -> Result<Vec<Product>>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product>;

    async fn update_product(&self, product_id: &str, product: &NewProduct) -> Result<Product>;

    async fn delete_product(&self, product_id: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRequest<'a> {
    user_id: &'a str,
    product_id: &'a str,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct CartEnvelope {
    cart: Vec<CartLineItem>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: Product,
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// [`CartBackend`] over the storefront's REST API.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a backend against the given API base URL (no trailing slash),
    /// e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CartBackend for HttpBackend {
    async fn fetch_cart(&self, user_id: &str) -> Result<Vec<CartLineItem>> {
        let envelope: CartEnvelope = self
            .http
            .get(self.url(config::CART_PATH))
            .query(&[("userId", user_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.cart)
    }

    async fn add_item(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<()> {
        self.http
            .post(self.url(config::CART_ADD_PATH))
            .json(&CartItemRequest {
                user_id,
                product_id,
                quantity,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update_item(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<()> {
        self.http
            .put(self.url(config::CART_UPDATE_PATH))
            .json(&CartItemRequest {
                user_id,
                product_id,
                quantity,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let envelope: ProductsEnvelope = self
            .http
            .get(self.url(config::PRODUCTS_PATH))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.products)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let envelope: ProductEnvelope = self
            .http
            .post(self.url(config::PRODUCTS_PATH))
            .json(product)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.product)
    }

    async fn update_product(&self, product_id: &str, product: &NewProduct) -> Result<Product> {
        let envelope: ProductEnvelope = self
            .http
            .put(format!(
                "{}/{}",
                self.url(config::PRODUCTS_PATH),
                product_id
            ))
            .json(product)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.product)
    }

    async fn delete_product(&self, product_id: &str) -> Result<()> {
        self.http
            .delete(format!(
                "{}/{}",
                self.url(config::PRODUCTS_PATH),
                product_id
            ))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
