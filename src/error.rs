#[derive(Debug, thiserror::Error)]
pub enum AgriosError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Failed to load cart: {0}")]
    Fetch(String),

    #[error("Cart mutation failed: {0}")]
    Mutation(String),

    #[error("An update is already in flight for product {0}")]
    ItemBusy(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid checkout state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AgriosError>;
