//! Authentication extractors for Axum handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use profiles_htmx::auth::Authenticated;
//!
//! async fn protected_handler(Authenticated(user): Authenticated) -> String {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

use super::SessionUser;
use crate::error::ProfilesError;
use crate::middleware::is_htmx_request;
use crate::state::ProfilesState;
use crate::store::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

/// The authenticated user making the request
///
/// Rejects unauthenticated requests:
/// - For HTMX requests: 401 Unauthorized with an `HX-Redirect` to the login page
/// - For regular requests: 303 redirect to the login page
///
/// Both carry the requested path as `next`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    ProfilesState: FromRef<S>,
{
    type Rejection = AuthenticationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ProfilesState::from_ref(state);
        let is_htmx = is_htmx_request(&parts.headers);
        let next = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
        let login_url = login_redirect_url(&state.settings().login_path, next);

        let Some(session) = parts.extensions.get::<SessionUser>().copied() else {
            return Err(AuthenticationError::not_authenticated(is_htmx, login_url));
        };

        let user = state
            .users()
            .find_user(session.user_id)
            .await
            .map_err(AuthenticationError::Store)?;

        user.map(Self).ok_or_else(|| {
            tracing::debug!(user_id = session.user_id, "session user no longer exists");
            AuthenticationError::not_authenticated(is_htmx, login_url)
        })
    }
}

/// Authentication errors for extractors
#[derive(Debug)]
pub enum AuthenticationError {
    /// Not authenticated (HTMX request)
    NotAuthenticatedHtmx {
        /// Login page including `next`
        login_url: String,
    },

    /// Not authenticated (regular request)
    NotAuthenticated {
        /// Login page including `next`
        login_url: String,
    },

    /// Loading the user failed
    Store(ProfilesError),
}

impl AuthenticationError {
    /// Create a "not authenticated" error appropriate for the request type
    #[must_use]
    pub const fn not_authenticated(is_htmx: bool, login_url: String) -> Self {
        if is_htmx {
            Self::NotAuthenticatedHtmx { login_url }
        } else {
            Self::NotAuthenticated { login_url }
        }
    }
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticatedHtmx { login_url } => (
                StatusCode::UNAUTHORIZED,
                HxRedirect::from(login_url.as_str()),
                "Unauthorized",
            )
                .into_response(),
            Self::NotAuthenticated { login_url } => Redirect::to(&login_url).into_response(),
            Self::Store(err) => err.into_response(),
        }
    }
}

/// Login page URL carrying `next` as a query parameter
#[must_use]
pub fn login_redirect_url(login_path: &str, next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => {
            let separator = if login_path.contains('?') { '&' } else { '?' };
            format!("{login_path}{separator}{query}")
        }
        Err(_) => login_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_request_redirects_to_login() {
        let error = AuthenticationError::not_authenticated(false, "/login?next=%2Fp%2Fedit%2F".into());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/login?next=%2Fp%2Fedit%2F"
        );
    }

    #[test]
    fn test_htmx_request_gets_401_with_hx_redirect() {
        let error = AuthenticationError::not_authenticated(true, "/login?next=%2F".into());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get("hx-redirect").unwrap(), "/login?next=%2F");
    }

    #[test]
    fn test_store_error_is_server_error() {
        let error = AuthenticationError::Store(ProfilesError::Config("boom".into()));
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_redirect_url() {
        assert_eq!(
            login_redirect_url("/accounts/login/", "/profiles/create/"),
            "/accounts/login/?next=%2Fprofiles%2Fcreate%2F"
        );
        assert_eq!(
            login_redirect_url("/login?theme=dark", "/p/edit/?a=1"),
            "/login?theme=dark&next=%2Fp%2Fedit%2F%3Fa%3D1"
        );
    }
}
