// API layer module (adapters for controllers)

pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use handlers::{health, members, teams};

/// Builds the application router over `pool`
pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Member search
        .route("/v1/members", get(members::search_members))
        .route("/v2/members", get(members::search_members_page_simple))
        .route("/v3/members", get(members::search_members_page_optimized))
        // Member routes
        .route("/api/members", post(members::create_member))
        .route(
            "/api/members/:id",
            get(members::get_member).delete(members::delete_member),
        )
        // Team routes
        .route("/api/teams", post(teams::create_team))
        .route(
            "/api/teams/:id",
            get(teams::get_team).delete(teams::delete_team),
        )
        .with_state(pool)
}
