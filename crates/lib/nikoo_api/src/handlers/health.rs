//! Root and health endpoints.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{HealthResponse, WelcomeResponse};

/// `GET /` — API welcome message.
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the App Support Chatbot API!".to_string(),
    })
}

/// `GET /api/health` — verifies core lib, DB connection, and assistant config.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    // Check PostgreSQL connectivity.
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Ok(Json(HealthResponse {
        greeting: format!("Hello from nikoo_core v{}", nikoo_core::version()),
        db_connected,
        assistant_configured: state.config.assistant.api_key.is_some(),
    }))
}
