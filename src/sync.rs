//! Cart sync engine: translates cart intents into remote calls and keeps the
//! local mirror consistent with the server.
//!
//! The server is the source of truth. Quantity updates are applied
//! optimistically for instant feedback and rolled back if the remote call
//! fails; adds and removals mutate the mirror only after the remote
//! confirms. A per-product in-flight guard rejects overlapping updates for
//! the same line, so a slow response can never clobber a newer one.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{error, info};

use crate::error::{AgriosError, Result};
use crate::models::{CartLineItem, Product, ProductSnapshot};
use crate::AgriosSdk;

// ---------------------------------------------------------------------------
// Pending-operation tracking
// ---------------------------------------------------------------------------

/// Which operations are currently awaiting the remote.
///
/// Mirrors the per-item and per-action pending flags the storefront UI keys
/// its controls on: one update in flight per product, plus coarse add and
/// checkout flags. There is no global lock; independent items may be
/// mutated concurrently.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    adding: AtomicBool,
    processing: AtomicBool,
    in_flight: Mutex<HashSet<String>>,
}

impl Pending {
    /// Claim the in-flight slot for a product, or fail with `ItemBusy`.
    fn begin_item(&self, product_id: &str) -> Result<ItemGuard<'_>> {
        let mut set = lock(&self.in_flight);
        if !set.insert(product_id.to_string()) {
            return Err(AgriosError::ItemBusy(product_id.to_string()));
        }
        Ok(ItemGuard {
            pending: self,
            product_id: product_id.to_string(),
        })
    }

    pub(crate) fn is_item_pending(&self, product_id: &str) -> bool {
        lock(&self.in_flight).contains(product_id)
    }

    pub(crate) fn is_adding(&self) -> bool {
        self.adding.load(Ordering::SeqCst)
    }

    pub(crate) fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub(crate) fn begin_processing(&self) -> FlagGuard<'_> {
        FlagGuard::raise(&self.processing)
    }

    fn begin_adding(&self) -> FlagGuard<'_> {
        FlagGuard::raise(&self.adding)
    }
}

/// Releases a product's in-flight slot on drop, so early returns and errors
/// can't leave a line stuck busy.
struct ItemGuard<'a> {
    pending: &'a Pending,
    product_id: String,
}

impl Drop for ItemGuard<'_> {
    fn drop(&mut self) {
        lock(&self.pending.in_flight).remove(&self.product_id);
    }
}

pub(crate) struct FlagGuard<'a>(&'a AtomicBool);

impl<'a> FlagGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Lock a mutex, recovering from poisoning. No lock is held across an await,
/// so a poisoned mirror is still structurally sound.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// CartSync
// ---------------------------------------------------------------------------

/// Cart operations bound to an [`AgriosSdk`] client.
///
/// Obtained via [`AgriosSdk::cart()`]. Every mutation requires an
/// authenticated identity from the configured auth provider.
pub struct CartSync<'a> {
    sdk: &'a AgriosSdk,
}

impl<'a> CartSync<'a> {
    pub(crate) fn new(sdk: &'a AgriosSdk) -> Self {
        Self { sdk }
    }

    /// Fetch the current user's cart from the remote and replace the local
    /// mirror with it.
    ///
    /// On failure the mirror keeps its previous contents; a transient fetch
    /// error never wipes the user's view of the cart.
    pub async fn load(&self) -> Result<Vec<CartLineItem>> {
        let identity = self.sdk.require_identity()?;

        let lines = self
            .sdk
            .backend
            .fetch_cart(&identity.user_id)
            .await
            .map_err(|e| {
                error!(user_id = %identity.user_id, error = %e, "cart fetch failed");
                AgriosError::Fetch(e.to_string())
            })?;

        let mut store = self.sdk.store_lock();
        store.replace_all(lines);
        info!(
            user_id = %identity.user_id,
            items = store.len(),
            "cart loaded"
        );
        Ok(store.items().to_vec())
    }

    /// Add a product to the cart.
    ///
    /// If the product already has a line, its quantity is incremented by
    /// `quantity` (remote first, mirror after confirmation). Otherwise a new
    /// line is created remotely and the server-confirmed line is inserted
    /// into the mirror. Nothing is mutated locally on failure.
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<CartLineItem> {
        let identity = self.sdk.require_identity()?;
        if quantity == 0 {
            return Err(AgriosError::InvalidArgument(
                "quantity must be at least 1".to_string(),
            ));
        }

        let _adding = self.sdk.pending.begin_adding();

        let existing_quantity = self
            .sdk
            .store_lock()
            .get(&product.id)
            .map(|line| line.quantity);

        match existing_quantity {
            Some(current) => {
                let new_quantity = current + quantity;
                self.sdk
                    .backend
                    .update_item(&identity.user_id, &product.id, new_quantity)
                    .await
                    .map_err(|e| {
                        error!(product_id = %product.id, error = %e, "add to cart failed");
                        AgriosError::Mutation(e.to_string())
                    })?;

                let mut store = self.sdk.store_lock();
                store.set_quantity_local(&product.id, new_quantity);
                info!(product_id = %product.id, quantity = new_quantity, "cart line incremented");
                store
                    .get(&product.id)
                    .cloned()
                    .ok_or_else(|| AgriosError::NotFound(format!("product {}", product.id)))
            }
            None => {
                self.sdk
                    .backend
                    .add_item(&identity.user_id, &product.id, quantity)
                    .await
                    .map_err(|e| {
                        error!(product_id = %product.id, error = %e, "add to cart failed");
                        AgriosError::Mutation(e.to_string())
                    })?;

                let line = CartLineItem::new(ProductSnapshot::from(product), quantity);
                self.sdk.store_lock().upsert_local(line.clone());
                info!(product_id = %product.id, quantity, "product added to cart");
                Ok(line)
            }
        }
    }

    /// Set a line's quantity. Any `new_quantity` below 1, zero or negative,
    /// is a removal, not an error.
    ///
    /// The mirror is mutated optimistically before the remote call and
    /// rolled back if it fails. Only one update may be in flight per product;
    /// an overlapping call fails with `ItemBusy`.
    pub async fn update_quantity(&self, product_id: &str, new_quantity: i64) -> Result<()> {
        if new_quantity < 1 {
            return self.remove_from_cart(product_id).await;
        }
        let identity = self.sdk.require_identity()?;
        let quantity = u32::try_from(new_quantity)
            .map_err(|_| AgriosError::InvalidArgument(format!("quantity {new_quantity} out of range")))?;

        let _guard = self.sdk.pending.begin_item(product_id)?;

        // Optimistic mutation; keep the prior line for rollback.
        let prior = self
            .sdk
            .store_lock()
            .set_quantity_local(product_id, quantity)
            .ok_or_else(|| AgriosError::NotFound(format!("product {product_id} is not in the cart")))?;

        let result = self
            .sdk
            .backend
            .update_item(&identity.user_id, product_id, quantity)
            .await;

        match result {
            Ok(()) => {
                info!(product_id, quantity, "cart quantity updated");
                Ok(())
            }
            Err(e) => {
                error!(product_id, error = %e, "quantity update failed; rolling back");
                self.sdk.store_lock().upsert_local(prior);
                Err(AgriosError::Mutation(e.to_string()))
            }
        }
    }

    /// Remove a product from the cart by setting its remote quantity to zero.
    ///
    /// The mirror is only touched after the remote confirms. Removing a
    /// product that is not in the cart is an idempotent success.
    pub async fn remove_from_cart(&self, product_id: &str) -> Result<()> {
        let identity = self.sdk.require_identity()?;

        let _guard = self.sdk.pending.begin_item(product_id)?;

        self.sdk
            .backend
            .update_item(&identity.user_id, product_id, 0)
            .await
            .map_err(|e| {
                error!(product_id, error = %e, "cart removal failed");
                AgriosError::Mutation(e.to_string())
            })?;

        self.sdk.store_lock().remove_local(product_id);
        info!(product_id, "item removed from cart");
        Ok(())
    }
}
