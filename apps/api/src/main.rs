use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use civictrack_api::api::{router, AppState};
use civictrack_api::config::Config;
use civictrack_api::infrastructure::uploads::FileStore;
use civictrack_api::services::bootstrap::ensure_admin;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("civictrack_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database connected and migrated");

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");
    let uploads = FileStore::new(&config.upload_dir, config.max_upload_bytes);

    let state = AppState::postgres(pool, uploads, &config.jwt_secret);

    if let Some(admin) = &config.admin {
        match ensure_admin(state.users.as_ref(), &admin.email, &admin.password).await {
            Ok(true) => {}
            Ok(false) => tracing::info!(email = %admin.email, "Administrator account already exists"),
            Err(e) => tracing::error!(error = %e, "Failed to create administrator account"),
        }
    }

    let app = router(state);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
