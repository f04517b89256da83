use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

pub const CART_PATH: &str = "/cart";
pub const CART_ADD_PATH: &str = "/cart/add";
pub const CART_UPDATE_PATH: &str = "/cart/update";
pub const PRODUCTS_PATH: &str = "/products";

/// Flat tax rate applied on top of the cart subtotal at checkout.
pub const TAX_RATE: f64 = 0.10;

/// Shipping is always free; kept as a named constant so order summaries
/// can report it explicitly.
pub const SHIPPING: f64 = 0.0;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Duration of the simulated payment gateway round trip.
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_secs(2);

/// How long a finished checkout stays visible before auto-dismissing.
pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_secs(3);
