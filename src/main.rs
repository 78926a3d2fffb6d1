// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use dotenvy::dotenv;
use ecosnap::config::Config;
use ecosnap::models::user::Role;
use ecosnap::routes;
use ecosnap::state::AppState;
use ecosnap::store::{MemStore, NewChallenge, NewUser, Storage};
use ecosnap::utils::hash::hash_password;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize the in-memory storage engine
    let store: Arc<MemStore> = Arc::new(MemStore::new());

    // Make sure the upload directory exists before the first upload arrives
    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        tracing::error!("Failed to create upload dir '{}': {}", config.upload_dir, e);
    }

    // Seed Admin User
    if let Err(e) = seed_admin_user(store.as_ref(), &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    // Seed the sample weekly challenge
    seed_weekly_challenge(store.as_ref()).await;

    // Create AppState
    let state = AppState {
        store: store.clone(),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("ecosnap listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

async fn seed_admin_user(
    store: &dyn Storage,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        if store.get_user_by_username(username).await.is_none() {
            tracing::info!("Seeding admin user: {}", username);
            let hashed_password = hash_password(password)?;

            store
                .create_user(NewUser {
                    username: username.clone(),
                    password: hashed_password,
                    display_name: username.clone(),
                    bio: None,
                    profile_image: None,
                    role: Role::Admin,
                })
                .await?;
            tracing::info!("Admin user created successfully.");
        }
    }
    Ok(())
}

/// The in-memory store starts empty on every boot; seed the sample weekly
/// challenge so the feed has an active campaign from the start.
async fn seed_weekly_challenge(store: &dyn Storage) {
    let now = Utc::now();
    let challenge = store
        .create_challenge(NewChallenge {
            title: "Weekly Challenge 🌟".to_string(),
            description: "Show us your plastic-free grocery haul!".to_string(),
            start_date: now,
            end_date: now + Duration::days(7),
            topic: "waste".to_string(),
            is_active: true,
        })
        .await;
    tracing::info!("Seeded challenge '{}'", challenge.title);
}
