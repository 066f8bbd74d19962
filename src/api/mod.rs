// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;

use self::handlers::{members, teams};

/// Builds the application router over a connection pool
pub fn router(pool: PgPool) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Member routes
        .route("/api/members", post(members::create_member))
        .route("/api/members", get(members::list_members))
        .route("/api/members/search", get(members::search_members))
        .route("/api/members/search/page", get(members::search_members_page))
        .route("/api/members/:id", get(members::get_member))
        .route("/api/members/:id", delete(members::delete_member))
        // Team routes
        .route("/api/teams", post(teams::create_team))
        .route("/api/teams", get(teams::list_teams))
        .route("/api/teams/:id", get(teams::get_team))
        // Shared state
        .with_state(pool)
}
