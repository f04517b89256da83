//! Agrios SDK for Rust.
//!
//! Client-side core of the Agrios agricultural marketplace storefront:
//! a local cart mirror kept consistent with the remote cart API, a checkout
//! simulator, and product catalog access. The remote API is the source of
//! truth; the SDK applies optimistic updates for responsiveness and
//! reconciles (or rolls back) based on server responses.
//!
//! # Quick start
//!
//! ```no_run
//! use agrios_sdk::{AgriosSdk, Identity, StaticAuth};
//!
//! # async fn example() -> agrios_sdk::Result<()> {
//! let sdk = AgriosSdk::builder()
//!     .base_url("https://agrios.example.com/api")
//!     .auth(StaticAuth::logged_in(Identity::customer("user-1")))
//!     .build()?;
//!
//! // Load the cart, add a product, check out.
//! sdk.cart().load().await?;
//! let tomato = sdk.catalog().get("prod-tomato").await?;
//! sdk.cart().add_to_cart(&tomato, 1).await?;
//!
//! let mut checkout = sdk.checkout();
//! let summary = checkout.open()?;
//! println!("total: {:.2}", summary.total);
//! let receipt = checkout.confirm().await?;
//! assert!(receipt.fully_cleared());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod sync;

pub use api::{CartBackend, HttpBackend};
pub use auth::{AuthProvider, Identity, Role, StaticAuth};
pub use catalog::Catalog;
pub use checkout::{CheckoutSimulator, CheckoutState, ItemClearOutcome, OrderReceipt};
pub use error::{AgriosError, Result};
pub use models::{CartLineItem, CheckoutSummary, NewProduct, Product, ProductSnapshot};
pub use store::CartStore;
pub use sync::CartSync;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use sync::Pending;

// ---------------------------------------------------------------------------
// AgriosSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AgriosSdk`] instance.
///
/// Use [`AgriosSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](AgriosSdkBuilder::build) to create the SDK.
pub struct AgriosSdkBuilder {
    base_url: String,
    timeout: Duration,
    payment_delay: Duration,
    display_delay: Duration,
    backend: Option<Arc<dyn CartBackend>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl Default for AgriosSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            payment_delay: config::DEFAULT_PAYMENT_DELAY,
            display_delay: config::DEFAULT_DISPLAY_DELAY,
            backend: None,
            auth: None,
        }
    }
}

impl AgriosSdkBuilder {
    /// Set the storefront API base URL (no trailing slash).
    ///
    /// Defaults to the local development server,
    /// `http://localhost:3000/api`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the simulated payment round-trip delay. Defaults to 2 seconds.
    pub fn payment_delay(mut self, delay: Duration) -> Self {
        self.payment_delay = delay;
        self
    }

    /// Set how long a finished checkout waits before auto-dismissing.
    /// Defaults to 3 seconds.
    pub fn display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    /// Use a custom backend instead of the HTTP one.
    ///
    /// Mainly for tests and embedding; `base_url`/`timeout` are ignored when
    /// a backend is supplied.
    pub fn backend(mut self, backend: Arc<dyn CartBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the authentication provider supplying the current identity.
    ///
    /// Defaults to a guest provider, under which every cart mutation fails
    /// with [`AgriosError::AuthRequired`].
    pub fn auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    /// Build the SDK.
    pub fn build(self) -> Result<AgriosSdk> {
        let backend: Arc<dyn CartBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(HttpBackend::new(self.base_url, self.timeout)?),
        };
        let auth = self
            .auth
            .unwrap_or_else(|| Arc::new(StaticAuth::guest()));
        Ok(AgriosSdk {
            backend,
            auth,
            store: Mutex::new(CartStore::new()),
            pending: Pending::default(),
            payment_delay: self.payment_delay,
            display_delay: self.display_delay,
        })
    }
}

// ---------------------------------------------------------------------------
// AgriosSdk
// ---------------------------------------------------------------------------

/// The main entry point for the Agrios SDK.
///
/// Owns the local [`CartStore`] mirror, the remote backend, and the auth
/// seam, and exposes the domain interfaces as lightweight borrowing
/// wrappers. Safe to share across tasks; independent cart lines can be
/// mutated concurrently.
///
/// Created via [`AgriosSdk::builder()`].
pub struct AgriosSdk {
    pub(crate) backend: Arc<dyn CartBackend>,
    pub(crate) auth: Arc<dyn AuthProvider>,
    pub(crate) store: Mutex<CartStore>,
    pub(crate) pending: Pending,
    pub(crate) payment_delay: Duration,
    pub(crate) display_delay: Duration,
}

impl AgriosSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> AgriosSdkBuilder {
        AgriosSdkBuilder::default()
    }

    // -- Domain interfaces -------------------------------------------------

    /// Access the cart sync engine.
    pub fn cart(&self) -> CartSync<'_> {
        CartSync::new(self)
    }

    /// Start a checkout attempt over the current cart.
    pub fn checkout(&self) -> CheckoutSimulator<'_> {
        CheckoutSimulator::new(self)
    }

    /// Access the product catalog.
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(self)
    }

    // -- Cart mirror reads -------------------------------------------------

    /// Snapshot of the current cart lines, in insertion order.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.store_lock().items().to_vec()
    }

    /// Current cart subtotal.
    pub fn total(&self) -> f64 {
        self.store_lock().total()
    }

    // -- Pending-operation flags -------------------------------------------

    /// Whether an update or removal is in flight for the given product.
    pub fn is_item_pending(&self, product_id: &str) -> bool {
        self.pending.is_item_pending(product_id)
    }

    /// Whether an add-to-cart call is in flight.
    pub fn is_adding(&self) -> bool {
        self.pending.is_adding()
    }

    /// Whether a checkout payment is being processed.
    pub fn is_processing(&self) -> bool {
        self.pending.is_processing()
    }

    // -- Internal ----------------------------------------------------------

    pub(crate) fn store_lock(&self) -> MutexGuard<'_, CartStore> {
        sync::lock(&self.store)
    }

    pub(crate) fn require_identity(&self) -> Result<Identity> {
        self.auth.current_identity().ok_or(AgriosError::AuthRequired)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AgriosSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store_lock();
        write!(
            f,
            "AgriosSdk(items={}, subtotal={:.2})",
            store.len(),
            store.total()
        )
    }
}
