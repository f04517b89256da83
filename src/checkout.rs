//! Checkout simulator.
//!
//! Computes an order summary from the current cart, simulates a payment
//! gateway round trip with a fixed delay, then empties the cart: remotely
//! item by item (best effort) and locally in one sweep. There is no real
//! payment integration; the delay is a deliberate placeholder.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{AgriosError, Result};
use crate::models::CheckoutSummary;
use crate::AgriosSdk;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Progress of one checkout attempt.
///
/// ```text
/// Idle -> Summary -> Processing -> Success | SuccessWithWarning -> Idle
/// ```
///
/// `close()` returns to `Idle` from any state. `Success` is entered before
/// the remote cart is cleared; a per-item clear failure downgrades it to
/// `SuccessWithWarning` without failing the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Summary,
    Processing,
    Success,
    SuccessWithWarning,
}

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

/// Outcome of clearing one cart line after payment.
#[derive(Debug)]
pub struct ItemClearOutcome {
    pub product_id: String,
    /// `None` when the line was cleared remotely; otherwise the error that
    /// was tolerated.
    pub error: Option<AgriosError>,
}

/// What the user walks away with after a confirmed checkout.
///
/// `cleared` reports the remote clear per item rather than as a single
/// boolean, so callers can see exactly which lines were left behind on the
/// server when the clear was only partially successful.
#[derive(Debug)]
pub struct OrderReceipt {
    pub summary: CheckoutSummary,
    pub cleared: Vec<ItemClearOutcome>,
}

impl OrderReceipt {
    pub fn fully_cleared(&self) -> bool {
        self.cleared.iter().all(|outcome| outcome.error.is_none())
    }
}

// ---------------------------------------------------------------------------
// CheckoutSimulator
// ---------------------------------------------------------------------------

/// One checkout attempt over the current cart.
///
/// Obtained via [`AgriosSdk::checkout()`]; create a fresh simulator per
/// attempt.
pub struct CheckoutSimulator<'a> {
    sdk: &'a AgriosSdk,
    state: CheckoutState,
}

impl<'a> CheckoutSimulator<'a> {
    pub(crate) fn new(sdk: &'a AgriosSdk) -> Self {
        Self {
            sdk,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Open the order summary. Fails with `EmptyCart` when there is nothing
    /// to check out.
    pub fn open(&mut self) -> Result<CheckoutSummary> {
        if self.state != CheckoutState::Idle {
            return Err(AgriosError::InvalidState(format!(
                "cannot open summary from {:?}",
                self.state
            )));
        }
        let store = self.sdk.store_lock();
        if store.is_empty() {
            return Err(AgriosError::EmptyCart);
        }
        let summary = CheckoutSummary::compute(store.total());
        drop(store);
        self.state = CheckoutState::Summary;
        Ok(summary)
    }

    /// Confirm payment: run the simulated gateway round trip, then clear the
    /// cart.
    ///
    /// The success state is entered before any clearing happens. The remote
    /// clear is best effort (each line is deleted individually and a failure
    /// on one line never aborts the rest), so the receipt can report partial
    /// failure while the checkout itself still succeeds. The local mirror is
    /// emptied unconditionally.
    pub async fn confirm(&mut self) -> Result<OrderReceipt> {
        if self.state != CheckoutState::Summary {
            return Err(AgriosError::InvalidState(format!(
                "cannot confirm payment from {:?}",
                self.state
            )));
        }
        let identity = self.sdk.require_identity()?;

        let _processing = self.sdk.pending.begin_processing();
        self.state = CheckoutState::Processing;

        // Simulated payment gateway round trip.
        sleep(self.sdk.payment_delay).await;

        let items = self.sdk.store_lock().items().to_vec();
        let summary = CheckoutSummary::compute(self.sdk.store_lock().total());

        self.state = CheckoutState::Success;

        let mut cleared = Vec::with_capacity(items.len());
        for item in &items {
            let Some(product_id) = item.product_id() else {
                continue;
            };
            match self
                .sdk
                .backend
                .update_item(&identity.user_id, product_id, 0)
                .await
            {
                Ok(()) => cleared.push(ItemClearOutcome {
                    product_id: product_id.to_string(),
                    error: None,
                }),
                Err(e) => {
                    warn!(product_id, error = %e, "failed to clear cart line after payment");
                    cleared.push(ItemClearOutcome {
                        product_id: product_id.to_string(),
                        error: Some(e),
                    });
                }
            }
        }

        self.sdk.store_lock().clear_local();

        let receipt = OrderReceipt { summary, cleared };
        if receipt.fully_cleared() {
            info!(total = summary.total, "payment successful, cart cleared");
        } else {
            self.state = CheckoutState::SuccessWithWarning;
            warn!(
                total = summary.total,
                "payment successful, but some cart lines could not be cleared remotely"
            );
        }
        Ok(receipt)
    }

    /// Dismiss the checkout and return to `Idle`, whatever the state.
    pub fn close(&mut self) {
        self.state = CheckoutState::Idle;
    }

    /// Auto-dismiss a finished checkout after the configured display delay.
    pub async fn auto_close(&mut self) -> Result<()> {
        match self.state {
            CheckoutState::Success | CheckoutState::SuccessWithWarning => {
                sleep(self.sdk.display_delay).await;
                self.state = CheckoutState::Idle;
                Ok(())
            }
            other => Err(AgriosError::InvalidState(format!(
                "cannot auto-close from {other:?}"
            ))),
        }
    }
}
