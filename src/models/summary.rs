use serde::Serialize;

use crate::config;

/// Order summary derived from the current cart at read time; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub subtotal: f64,
    /// Always zero; shipping is free.
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

impl CheckoutSummary {
    /// Derive a summary from a cart subtotal using the fixed tax rate.
    pub fn compute(subtotal: f64) -> Self {
        let tax = subtotal * config::TAX_RATE;
        Self {
            subtotal,
            shipping: config::SHIPPING,
            tax,
            total: subtotal + tax,
        }
    }
}
