//! Standalone profile server
//!
//! Serves the profile routes for an `accounts.UserProfile` model backed by
//! PostgreSQL. Users are expected to be authenticated by a reverse proxy
//! (`auth.remote_user_header`); `--create-user <name>` adds an account.

use anyhow::Context;
use clap::Parser;
use profiles_htmx::config::ProfilesConfig;
use profiles_htmx::model::{Choice, FieldDescriptor, ModelRegistry, ModelSchema};
use profiles_htmx::routes::profile_routes;
use profiles_htmx::state::ProfilesState;
use profiles_htmx::store::PgStore;

#[derive(Parser)]
#[command(name = "profiles-server")]
#[command(version)]
#[command(about = "Serve per-user profile pages", long_about = None)]
struct Args {
    /// Create an account with this username and exit
    #[arg(long, value_name = "USERNAME")]
    create_user: Option<String>,
}

fn user_profile_model() -> ModelSchema {
    ModelSchema::new("accounts", "UserProfile")
        .field(FieldDescriptor::char("display_name", 50))
        .field(FieldDescriptor::text("bio").optional())
        .field(FieldDescriptor::url("website").optional())
        .field(FieldDescriptor::date("birth_date").optional().label("Date of birth"))
        .field(
            FieldDescriptor::choice(
                "visibility",
                vec![Choice::new("public", "Public"), Choice::new("private", "Private")],
            )
            .help("Who can see your profile"),
        )
        .field(
            FieldDescriptor::many_to_many(
                "interests",
                vec![
                    Choice::new("rust", "Rust"),
                    Choice::new("htmx", "HTMX"),
                    Choice::new("databases", "Databases"),
                ],
            )
            .optional(),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    profiles_htmx::observability::init()?;

    let config = ProfilesConfig::load_for_service("profiles")
        .context("failed to load configuration")?;

    let store = PgStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to connect to database")?;
    store.migrate().await?;

    if let Some(username) = args.create_user {
        let user = store.create_user(&username).await?;
        tracing::info!(user_id = user.id, username = %user.username, "user created");
        return Ok(());
    }

    let registry = ModelRegistry::new().with_model(user_profile_model())?;
    let state = ProfilesState::from_config(&config, registry, store)?;
    let app = profile_routes(state);

    let listener = tokio::net::TcpListener::bind(&config.service.bind_addr).await?;
    tracing::info!("Starting {} on {}", config.service.name, config.service.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
