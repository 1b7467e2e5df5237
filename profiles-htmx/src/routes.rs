//! Router for the profile views
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::Router;
//! use profiles_htmx::routes::ProfileRoutes;
//! use profiles_htmx::state::ProfilesState;
//! use profiles_htmx::views::ProfileViewOptions;
//!
//! fn app(state: ProfilesState) -> Router {
//!     let profiles = ProfileRoutes::new(state)
//!         .create_options(ProfileViewOptions::default().success_url("/welcome/"))
//!         .into_router();
//!
//!     Router::new().merge(profiles)
//! }
//! ```

use crate::auth::Authenticated;
use crate::error::ProfilesResult;
use crate::forms::FormData;
use crate::middleware::remote_user;
use crate::state::ProfilesState;
use crate::views::{
    create_profile, edit_profile, profile_detail, DetailOptions, ProfileViewOptions, Submission,
};
use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
    Extension, Router,
};
use axum_htmx::HxRequest;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

#[derive(Debug, Default)]
struct RouteOptions {
    create: ProfileViewOptions,
    edit: ProfileViewOptions,
    detail: DetailOptions,
}

type SharedOptions = Extension<Arc<RouteOptions>>;

/// Builder for the profile router
#[derive(Debug)]
pub struct ProfileRoutes {
    state: ProfilesState,
    options: RouteOptions,
}

impl ProfileRoutes {
    /// Routes over `state` with default view options
    #[must_use]
    pub fn new(state: ProfilesState) -> Self {
        Self {
            state,
            options: RouteOptions::default(),
        }
    }

    /// Options for the create view
    #[must_use]
    pub fn create_options(mut self, options: ProfileViewOptions) -> Self {
        self.options.create = options;
        self
    }

    /// Options for the edit view
    #[must_use]
    pub fn edit_options(mut self, options: ProfileViewOptions) -> Self {
        self.options.edit = options;
        self
    }

    /// Options for the detail view
    #[must_use]
    pub fn detail_options(mut self, options: DetailOptions) -> Self {
        self.options.detail = options;
        self
    }

    /// Build the router
    ///
    /// Create and edit require an authenticated user; detail is public.
    #[must_use]
    pub fn into_router(self) -> Router {
        let urls = self.state.urls().clone();

        Router::new()
            .route(&urls.create(), get(create_get).post(create_post))
            .route(&urls.edit(), get(edit_get).post(edit_post))
            .route(&urls.detail_pattern(), get(detail_get))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(Extension(Arc::new(self.options)))
                    .layer(from_fn_with_state(self.state.clone(), remote_user)),
            )
            .with_state(self.state)
    }
}

/// Profile router with default view options
#[must_use]
pub fn profile_routes(state: ProfilesState) -> Router {
    ProfileRoutes::new(state).into_router()
}

async fn create_get(
    State(state): State<ProfilesState>,
    Extension(options): SharedOptions,
    HxRequest(is_htmx): HxRequest,
    Authenticated(user): Authenticated,
) -> ProfilesResult<Response> {
    let outcome = create_profile(&state, &user, Submission::Get, &options.create).await?;
    Ok(outcome.into_response_for(is_htmx))
}

async fn create_post(
    State(state): State<ProfilesState>,
    Extension(options): SharedOptions,
    HxRequest(is_htmx): HxRequest,
    Authenticated(user): Authenticated,
    data: FormData,
) -> ProfilesResult<Response> {
    let outcome = create_profile(&state, &user, Submission::Post(data), &options.create).await?;
    Ok(outcome.into_response_for(is_htmx))
}

async fn edit_get(
    State(state): State<ProfilesState>,
    Extension(options): SharedOptions,
    HxRequest(is_htmx): HxRequest,
    Authenticated(user): Authenticated,
) -> ProfilesResult<Response> {
    let outcome = edit_profile(&state, &user, Submission::Get, &options.edit).await?;
    Ok(outcome.into_response_for(is_htmx))
}

async fn edit_post(
    State(state): State<ProfilesState>,
    Extension(options): SharedOptions,
    HxRequest(is_htmx): HxRequest,
    Authenticated(user): Authenticated,
    data: FormData,
) -> ProfilesResult<Response> {
    let outcome = edit_profile(&state, &user, Submission::Post(data), &options.edit).await?;
    Ok(outcome.into_response_for(is_htmx))
}

async fn detail_get(
    State(state): State<ProfilesState>,
    Extension(options): SharedOptions,
    Path(username): Path<String>,
) -> ProfilesResult<Response> {
    let outcome = profile_detail(&state, &username, &options.detail).await?;
    Ok(outcome.into_response_for(false))
}
