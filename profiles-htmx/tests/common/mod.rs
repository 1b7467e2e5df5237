//! Shared fixtures for the integration tests

#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use profiles_htmx::config::ProfileSettings;
use profiles_htmx::model::{Choice, FieldDescriptor, ModelRegistry, ModelSchema};
use profiles_htmx::routes::{profile_routes, ProfileRoutes};
use profiles_htmx::state::ProfilesState;
use profiles_htmx::store::MemoryStore;

/// Trusted header the test state authenticates from
pub const REMOTE_USER: &str = "x-remote-user";

pub fn remote_user() -> HeaderName {
    HeaderName::from_static(REMOTE_USER)
}

pub fn hx_request() -> HeaderName {
    HeaderName::from_static("hx-request")
}

pub fn user_profile_model() -> ModelSchema {
    ModelSchema::new("accounts", "UserProfile")
        .field(FieldDescriptor::char("display_name", 30))
        .field(FieldDescriptor::text("bio").optional())
        .field(FieldDescriptor::integer("age").optional())
        .field(FieldDescriptor::boolean("newsletter").optional())
        .field(
            FieldDescriptor::many_to_many(
                "interests",
                vec![Choice::new("rust", "Rust"), Choice::new("htmx", "HTMX")],
            )
            .optional(),
        )
}

pub fn state(store: &MemoryStore) -> ProfilesState {
    let registry = ModelRegistry::new()
        .with_model(user_profile_model())
        .unwrap();
    ProfilesState::builder(registry)
        .settings(ProfileSettings {
            model: Some("accounts.UserProfile".into()),
            ..ProfileSettings::default()
        })
        .store(store.clone())
        .remote_user_header(REMOTE_USER)
        .build()
        .unwrap()
}

/// Test server over the default profile routes, and its store
pub fn server() -> (TestServer, MemoryStore) {
    let store = MemoryStore::new();
    let server = TestServer::new(profile_routes(state(&store))).unwrap();
    (server, store)
}

/// Test server over customized profile routes
pub fn server_with(
    configure: impl FnOnce(ProfileRoutes) -> ProfileRoutes,
) -> (TestServer, MemoryStore) {
    let store = MemoryStore::new();
    let routes = configure(ProfileRoutes::new(state(&store)));
    let server = TestServer::new(routes.into_router()).unwrap();
    (server, store)
}

pub fn as_user(username: &'static str) -> HeaderValue {
    HeaderValue::from_static(username)
}
