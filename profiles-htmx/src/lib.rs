//! profiles-htmx: per-user profile pages for axum HTMX applications
//!
//! Each user may own one profile, an instance of a model the application
//! registers and names in configuration (`profiles.model =
//! "accounts.UserProfile"`). The crate provides:
//!
//! - a resolver turning that setting into a [`model::ModelSchema`]
//! - a form synthesized from the model, minus the owner field
//! - create, edit, and detail views plus a ready-made router
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use profiles_htmx::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     profiles_htmx::observability::init()?;
//!     let config = ProfilesConfig::load_for_service("profiles")?;
//!
//!     let registry = ModelRegistry::new().with_model(
//!         ModelSchema::new("accounts", "UserProfile")
//!             .field(FieldDescriptor::char("display_name", 50))
//!             .field(FieldDescriptor::text("bio").optional()),
//!     )?;
//!
//!     let store = PgStore::connect(&config.database.url, config.database.max_connections).await?;
//!     store.migrate().await?;
//!
//!     let state = ProfilesState::from_config(&config, registry, store)?;
//!     let app = axum::Router::new().merge(profile_routes(state));
//!
//!     let listener = tokio::net::TcpListener::bind(&config.service.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! The create and edit views need a logged-in user. Put a [`auth::SessionUser`]
//! into the request extensions from your own session layer, or enable the
//! trusted-header seam with `auth.remote_user_header`.

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod model;
pub mod observability;
pub mod routes;
pub mod state;
pub mod store;
pub mod template;
pub mod urls;
pub mod views;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use profiles_htmx::prelude::*;
    //! ```

    // Model resolution
    pub use crate::model::{
        resolve_profile_model, Choice, FieldDescriptor, FieldType, FieldValue, FieldValues,
        ModelRegistry, ModelSchema,
    };

    // Form handling
    pub use crate::forms::{
        form_for_instance, form_for_model, FormData, FormMarkup, ProfileForm, ProfileFormClass,
        ValidationErrors,
    };

    // Views and routing
    pub use crate::routes::{profile_routes, ProfileRoutes};
    pub use crate::views::{
        create_profile, edit_profile, profile_detail, DetailOptions, ProfileViewOptions,
        Submission, ViewOutcome,
    };

    // Authentication
    pub use crate::auth::{Authenticated, SessionUser};

    // Persistence
    pub use crate::store::{MemoryStore, PgStore, ProfileStore, User, UserStore};

    // Configuration, state and errors
    pub use crate::config::{ProfileSettings, ProfilesConfig};
    pub use crate::error::{ProfilesError, ProfilesResult};
    pub use crate::state::ProfilesState;
    pub use crate::urls::ProfileUrls;

    // Re-export key dependencies
    pub use axum;
    pub use minijinja;
}
