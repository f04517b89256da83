//! Identity seam between the SDK and the external authentication provider.
//!
//! The SDK never performs authentication itself; it asks an injected
//! [`AuthProvider`] for the current identity before every cart mutation.
//! A missing identity is a hard precondition failure
//! ([`AuthRequired`](crate::AgriosError::AuthRequired)), never silently
//! tolerated.

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

/// The authenticated user as seen by the SDK. Opaque beyond its id and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn customer(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Customer,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }
}

// ---------------------------------------------------------------------------
// AuthProvider
// ---------------------------------------------------------------------------

/// Source of the current user identity.
///
/// Implementations typically bridge to whatever session mechanism the host
/// application uses. Returning `None` means "not logged in".
pub trait AuthProvider: Send + Sync {
    fn current_identity(&self) -> Option<Identity>;
}

/// An [`AuthProvider`] that always reports the same identity (or none).
///
/// Useful as the default guest provider and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    identity: Option<Identity>,
}

impl StaticAuth {
    pub fn logged_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn guest() -> Self {
        Self { identity: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

impl<T: AuthProvider + ?Sized> AuthProvider for std::sync::Arc<T> {
    fn current_identity(&self) -> Option<Identity> {
        self.as_ref().current_identity()
    }
}
