//! # nikoo_api
//!
//! HTTP API library for the Nikoo support chat backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::routing::{get, patch, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{auth, conversations, health, messages, ui};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: config::ApiConfig,
    /// Shared outbound HTTP client for assistant calls.
    pub http: reqwest::Client,
}

/// Run embedded database migrations.
///
/// Delegates to `nikoo_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    nikoo_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no identity required)
    let public = Router::new()
        .route("/", get(health::welcome))
        .route("/ui", get(ui::chat_page))
        .route("/api/health", get(health::health))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .route("/api/auth/logout", post(auth::logout_handler));

    // Chat routes (behind the identity guard: JWT bearer or anonymous)
    let chat = Router::new()
        .route(
            "/api/conversations",
            get(conversations::list_conversations_handler)
                .post(conversations::create_conversation_handler),
        )
        .route(
            "/api/conversations/{id}",
            patch(conversations::rename_conversation_handler)
                .delete(conversations::delete_conversation_handler),
        )
        .route(
            "/api/conversations/{id}/messages",
            get(messages::list_messages_handler).post(messages::send_message_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::resolve_identity,
        ));

    Router::new()
        .merge(public)
        .merge(chat)
        .layer(cors)
        .with_state(state)
}
