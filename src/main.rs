use shareit_booking::{
    adapters::{
        clock::SystemClock,
        mock::{ItemCatalog as MockItemCatalog, UserDirectory as MockUserDirectory},
        postgres::PostgresBookingStore,
    },
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    config::Config,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    // Users and items live in other services; in-memory directories stand in for them here.
    let booking_store = Arc::new(PostgresBookingStore::new(pool));
    let user_directory = Arc::new(MockUserDirectory::new());
    let item_catalog = Arc::new(MockItemCatalog::new());
    let clock = Arc::new(SystemClock);

    // Create service dependencies
    let service_deps = ServiceDependencies {
        booking_store,
        user_directory,
        item_catalog,
        clock,
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
