//! In-memory mirror of the current user's cart.
//!
//! The remote store is the source of truth; this mirror is authoritative for
//! the session and is what totals and summaries are computed from. Mutations
//! here are purely local; the sync engine decides when to apply them
//! (optimistically or after remote confirmation) and when to roll them back.

use tracing::warn;

use crate::models::CartLineItem;

/// Insertion-ordered cart contents for one user.
///
/// Invariants: no two lines share a product id, and every line has
/// `quantity >= 1`. Absence of a line is the only representation of zero
/// quantity. [`replace_all`](Self::replace_all) enforces both on data
/// arriving from the remote; the local mutators uphold them by construction.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<CartLineItem>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == Some(product_id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the entire cart with lines fetched from the remote.
    ///
    /// Lines with a structurally invalid snapshot, a zero quantity, or a
    /// product id already seen (first occurrence wins) are dropped, so the
    /// resulting cart always satisfies the store invariants.
    pub fn replace_all(&mut self, lines: Vec<CartLineItem>) {
        let mut items: Vec<CartLineItem> = Vec::with_capacity(lines.len());
        for line in lines {
            if !line.product.is_valid() {
                warn!(product = ?line.product, "dropping cart line with incomplete product reference");
                continue;
            }
            if line.quantity == 0 {
                warn!(product_id = ?line.product_id(), "dropping cart line with zero quantity");
                continue;
            }
            if items
                .iter()
                .any(|existing: &CartLineItem| existing.product_id() == line.product_id())
            {
                warn!(product_id = ?line.product_id(), "dropping duplicate cart line");
                continue;
            }
            items.push(line);
        }
        self.items = items;
    }

    /// Insert a line, or replace the line with the same product id.
    pub fn upsert_local(&mut self, item: CartLineItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id() == item.product_id())
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Remove a line, returning it if present.
    pub fn remove_local(&mut self, product_id: &str) -> Option<CartLineItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id() == Some(product_id))?;
        Some(self.items.remove(index))
    }

    /// Set a line's quantity, returning the line as it was before the change
    /// (for rollback). `None` if the product is not in the cart.
    pub fn set_quantity_local(&mut self, product_id: &str, quantity: u32) -> Option<CartLineItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_id() == Some(product_id))?;
        let prior = item.clone();
        item.quantity = quantity;
        Some(prior)
    }

    pub fn clear_local(&mut self) {
        self.items.clear();
    }

    /// Cart subtotal: Σ quantity × unit price over all lines.
    ///
    /// Lines with a structurally invalid snapshot are skipped rather than
    /// failing the whole computation.
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| item.product.is_valid())
            .filter_map(|item| item.line_total())
            .sum()
    }
}
