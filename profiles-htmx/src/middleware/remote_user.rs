//! Reverse-proxy authentication
//!
//! When a trusted proxy authenticates users and forwards the username in a
//! header, this middleware looks the user up and marks the request with a
//! [`SessionUser`]. Only enable it behind a proxy that strips the header
//! from client requests.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, Router};
//! use profiles_htmx::middleware::remote_user;
//! use profiles_htmx::state::ProfilesState;
//!
//! fn app(state: ProfilesState) -> Router {
//!     Router::new()
//!         .layer(middleware::from_fn_with_state(state.clone(), remote_user))
//!         .with_state(state)
//! }
//! ```

use crate::auth::SessionUser;
use crate::state::ProfilesState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Insert a [`SessionUser`] for the user named by the trusted header
///
/// Requests without the header, or naming an unknown user, pass through
/// unauthenticated. An already present [`SessionUser`] is left alone.
pub async fn remote_user(
    State(state): State<ProfilesState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(header) = state.remote_user_header() else {
        return next.run(request).await;
    };
    if request.extensions().get::<SessionUser>().is_some() {
        return next.run(request).await;
    }

    let username = request
        .headers()
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    if let Some(username) = username {
        match state.users().find_user_by_username(&username).await {
            Ok(Some(user)) => {
                tracing::trace!(user_id = user.id, "authenticated from remote user header");
                request.extensions_mut().insert(SessionUser::new(user.id));
            }
            Ok(None) => {
                tracing::debug!(%username, "remote user header names an unknown user");
            }
            Err(err) => return err.into_response(),
        }
    }

    next.run(request).await
}
