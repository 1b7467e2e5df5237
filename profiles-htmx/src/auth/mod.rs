//! Authentication seam
//!
//! Accounts and login live in the surrounding application. Upstream
//! middleware marks a request as authenticated by inserting a
//! [`SessionUser`] extension; [`Authenticated`] turns that into the
//! requesting [`crate::store::User`].

pub mod extractors;

pub use extractors::{login_redirect_url, Authenticated, AuthenticationError};

/// Marker placed in request extensions by authentication middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    /// Authenticated user's primary key
    pub user_id: i64,
}

impl SessionUser {
    /// Mark `user_id` as the authenticated user
    #[must_use]
    pub const fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
