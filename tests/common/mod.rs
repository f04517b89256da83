//! Shared test fixtures for the Agrios SDK integration tests.
//!
//! Provides an in-memory [`MockBackend`] that plays the remote storefront
//! API, with failure injection and call recording, plus helpers that build
//! an [`AgriosSdk`] against it for customer, admin, and guest identities.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use agrios_sdk::api::CartBackend;
use agrios_sdk::error::{AgriosError, Result};
use agrios_sdk::models::{CartLineItem, NewProduct, Product, ProductSnapshot};
use agrios_sdk::{AgriosSdk, AuthProvider, Identity, StaticAuth};

pub const USER: &str = "user-1";

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockState {
    products: Vec<Product>,
    carts: HashMap<String, Vec<(String, u32)>>,
    extra_lines: Vec<CartLineItem>,
    fail_fetch_cart: bool,
    fail_add: bool,
    fail_update_for: HashSet<String>,
    update_delay: Option<Duration>,
    update_calls: Vec<(String, u32)>,
    next_id: u32,
}

/// In-memory stand-in for the remote storefront API.
///
/// Carts are stored as `(product_id, quantity)` pairs per user and joined
/// against the product list when fetched, so a cart entry for an unknown
/// product comes back as a partially-populated reference, just like the
/// real backend on a failed join.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            state: Mutex::new(MockState {
                products,
                ..MockState::default()
            }),
        }
    }

    pub fn seed_cart(&self, user_id: &str, product_id: &str, quantity: u32) {
        let mut state = self.state.lock().unwrap();
        state
            .carts
            .entry(user_id.to_string())
            .or_default()
            .push((product_id.to_string(), quantity));
    }

    /// Append a raw line to every cart fetch, bypassing the product join.
    pub fn push_raw_line(&self, line: CartLineItem) {
        self.state.lock().unwrap().extra_lines.push(line);
    }

    pub fn cart_of(&self, user_id: &str) -> Vec<(String, u32)> {
        self.state
            .lock()
            .unwrap()
            .carts
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_fail_fetch_cart(&self, fail: bool) {
        self.state.lock().unwrap().fail_fetch_cart = fail;
    }

    pub fn set_fail_add(&self, fail: bool) {
        self.state.lock().unwrap().fail_add = fail;
    }

    /// Make every update for the given product fail.
    pub fn fail_update_for(&self, product_id: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_update_for
            .insert(product_id.to_string());
    }

    /// Delay every update call, to widen in-flight windows.
    pub fn set_update_delay(&self, delay: Duration) {
        self.state.lock().unwrap().update_delay = Some(delay);
    }

    /// Every `(product_id, quantity)` pair passed to `update_item`, in order.
    pub fn update_calls(&self) -> Vec<(String, u32)> {
        self.state.lock().unwrap().update_calls.clone()
    }
}

#[async_trait]
impl CartBackend for MockBackend {
    async fn fetch_cart(&self, user_id: &str) -> Result<Vec<CartLineItem>> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch_cart {
            return Err(AgriosError::Fetch("simulated remote failure".to_string()));
        }
        let entries = state.carts.get(user_id).cloned().unwrap_or_default();
        let mut lines: Vec<CartLineItem> = entries
            .into_iter()
            .map(|(product_id, quantity)| {
                let snapshot = match state.products.iter().find(|p| p.id == product_id) {
                    Some(product) => ProductSnapshot::from(product),
                    // Failed join: only the id survives.
                    None => ProductSnapshot {
                        id: Some(product_id),
                        name: None,
                        price: None,
                        image_url: None,
                        description: None,
                    },
                };
                CartLineItem::new(snapshot, quantity)
            })
            .collect();
        lines.extend(state.extra_lines.iter().cloned());
        Ok(lines)
    }

    async fn add_item(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_add {
            return Err(AgriosError::Mutation("simulated remote failure".to_string()));
        }
        let cart = state.carts.entry(user_id.to_string()).or_default();
        match cart.iter_mut().find(|(id, _)| id == product_id) {
            Some((_, existing)) => *existing += quantity,
            None => cart.push((product_id.to_string(), quantity)),
        }
        Ok(())
    }

    async fn update_item(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<()> {
        let delay = self.state.lock().unwrap().update_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state
            .update_calls
            .push((product_id.to_string(), quantity));
        if state.fail_update_for.contains(product_id) {
            return Err(AgriosError::Mutation("simulated remote failure".to_string()));
        }
        let cart = state.carts.entry(user_id.to_string()).or_default();
        if quantity == 0 {
            cart.retain(|(id, _)| id != product_id);
        } else {
            match cart.iter_mut().find(|(id, _)| id == product_id) {
                Some((_, existing)) => *existing = quantity,
                None => cart.push((product_id.to_string(), quantity)),
            }
        }
        Ok(())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        Ok(self.state.lock().unwrap().products.clone())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Product {
            id: format!("prod-new-{}", state.next_id),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            stock: None,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, product_id: &str, product: &NewProduct) -> Result<Product> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AgriosError::NotFound(format!("product {product_id}")))?;
        existing.name = product.name.clone();
        existing.price = product.price;
        existing.description = product.description.clone();
        existing.image_url = product.image_url.clone();
        existing.category = product.category.clone();
        Ok(existing.clone())
    }

    async fn delete_product(&self, product_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state.products.retain(|p| p.id != product_id);
        if state.products.len() == before {
            return Err(AgriosError::NotFound(format!("product {product_id}")));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ToggleAuth — an AuthProvider whose identity can change mid-test
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ToggleAuth {
    identity: Mutex<Option<Identity>>,
}

impl ToggleAuth {
    pub fn logged_in(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
        }
    }

    pub fn set(&self, identity: Option<Identity>) {
        *self.identity.lock().unwrap() = identity;
    }
}

impl AuthProvider for ToggleAuth {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn product(id: &str, name: &str, price: f64, category: Option<&str>) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: Some(format!("{name} from a local farm supplier")),
        image_url: Some(format!("/images/{id}.jpg")),
        category: category.map(str::to_string),
        stock: Some(25),
    }
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product("prod-tomato", "Tomato Seeds", 40.0, Some("seeds")),
        product("prod-fertilizer", "Organic Fertilizer", 90.0, Some("supplies")),
        product("prod-watering-can", "Watering Can", 150.0, Some("tools")),
    ]
}

pub fn build_sdk(backend: Arc<MockBackend>, auth: impl AuthProvider + 'static) -> AgriosSdk {
    AgriosSdk::builder()
        .backend(backend)
        .auth(auth)
        .payment_delay(Duration::from_millis(10))
        .display_delay(Duration::from_millis(10))
        .build()
        .unwrap()
}

/// SDK logged in as a regular customer, with the sample catalog and an
/// empty cart.
pub fn customer_sdk() -> (AgriosSdk, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::with_products(sample_products()));
    let sdk = build_sdk(
        backend.clone(),
        StaticAuth::logged_in(Identity::customer(USER)),
    );
    (sdk, backend)
}

pub fn admin_sdk() -> (AgriosSdk, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::with_products(sample_products()));
    let sdk = build_sdk(
        backend.clone(),
        StaticAuth::logged_in(Identity::admin("admin-1")),
    );
    (sdk, backend)
}

pub fn guest_sdk() -> (AgriosSdk, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::with_products(sample_products()));
    let sdk = build_sdk(backend.clone(), StaticAuth::guest());
    (sdk, backend)
}

/// Look up a sample product by id.
pub fn sample_product(id: &str) -> Product {
    sample_products()
        .into_iter()
        .find(|p| p.id == id)
        .expect("unknown sample product id")
}
