//! Identity middleware — Bearer token verification with anonymous fallback.
//!
//! Chat routes work in two modes: an authenticated user presents
//! `Authorization: Bearer <jwt>`, while the public in-app chatbot sends no
//! credentials and is served as the seeded anonymous user. A present-but-bad
//! token is always a 401; the fallback only covers the absent header.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use nikoo_core::auth::jwt::verify_access_token;
use nikoo_core::models::auth::{ANONYMOUS_USER_ID, ANONYMOUS_USERNAME};

use crate::AppState;
use crate::error::AppError;

/// Resolved caller identity, stored in request extensions.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

/// Axum middleware: resolves the caller identity and injects [`Identity`]
/// into request extensions.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match request.headers().get(AUTHORIZATION) {
        Some(value) => {
            let header = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".into()))?;

            let token = header
                .strip_prefix("Bearer ")
                .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

            let claims = verify_access_token(token, state.config.jwt_secret.as_bytes())
                .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

            let user_id = claims
                .sub
                .parse::<Uuid>()
                .map_err(|_| AppError::Unauthorized("Invalid token subject".into()))?;

            Identity {
                user_id,
                username: claims.username,
            }
        }
        None if state.config.allow_anonymous => Identity {
            user_id: ANONYMOUS_USER_ID,
            username: ANONYMOUS_USERNAME.to_string(),
        },
        None => {
            return Err(AppError::Unauthorized(
                "Missing authorization header".into(),
            ));
        }
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
