use member_query_api::api;
use member_query_api::config::Config;
use member_query_api::infrastructure::{database, seed};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

    // Connect to database
    let pool = database::connect(&config.database_url, config.max_connections)
        .await
        .expect("Failed to connect to database");

    database::migrate(&pool)
        .await
        .expect("Failed to apply migrations");

    if config.seed_sample_data {
        seed::seed_sample_data(&pool)
            .await
            .expect("Failed to create sample data");
    }

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(pool)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
