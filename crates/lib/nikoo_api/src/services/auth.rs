//! Authentication service — login/register flows delegating to `nikoo_core::auth`.

use chrono::{Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, LogoutResponse, TokenResponse};

/// Access token lifetime: 24 hours.
const ACCESS_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// Refresh token lifetime: 30 days.
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Password hashing (delegate to nikoo_core)
// ---------------------------------------------------------------------------

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> AppResult<String> {
    nikoo_core::auth::password::hash_password(password).map_err(AppError::from)
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    nikoo_core::auth::password::verify_password(password, hash).map_err(AppError::from)
}

// ---------------------------------------------------------------------------
// Refresh token generation & hashing
// ---------------------------------------------------------------------------

/// Generate a cryptographically random refresh token (64 alphanumeric chars).
fn generate_refresh_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a refresh token for storage.
fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// JWT generation (delegate to nikoo_core)
// ---------------------------------------------------------------------------

/// Generate a signed JWT access token (HS256, 24 h expiry).
pub fn generate_access_token(user_id: &Uuid, username: &str, secret: &[u8]) -> AppResult<String> {
    nikoo_core::auth::jwt::generate_access_token(&user_id.to_string(), username, secret)
        .map_err(AppError::from)
}

/// Build a `TokenResponse` from user data plus a fresh token pair.
fn build_token_response(
    user_id: &Uuid,
    username: &str,
    access_token: String,
    refresh_token: String,
) -> TokenResponse {
    TokenResponse {
        access_token,
        refresh_token,
        expires_in: ACCESS_TOKEN_EXPIRY_SECS,
        token_type: "Bearer".to_string(),
        user: AuthUser {
            id: *user_id,
            username: username.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Public auth operations
// ---------------------------------------------------------------------------

/// Authenticate with username + password.
pub async fn login(
    pool: &PgPool,
    username: &str,
    password: &str,
    jwt_secret: &[u8],
) -> AppResult<TokenResponse> {
    let row = nikoo_core::auth::queries::find_user_by_username(pool, username).await?;

    // Generic error for wrong username
    let (user_id, pw_hash) = match row {
        None => return Err(AppError::Unauthorized("Invalid credentials".into())),
        Some(r) => r,
    };

    // The anonymous user carries no hash and can never log in.
    let pw_hash = match pw_hash {
        None => return Err(AppError::Unauthorized("Invalid credentials".into())),
        Some(h) => h,
    };

    // Generic error for wrong password
    if !verify_password(password, &pw_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let access_token = generate_access_token(&user_id, username, jwt_secret)?;
    let refresh_token = generate_refresh_token();
    let token_hash = hash_refresh_token(&refresh_token);

    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);
    nikoo_core::auth::queries::store_refresh_token(pool, &token_hash, &user_id, expires_at).await?;

    Ok(build_token_response(
        &user_id,
        username,
        access_token,
        refresh_token,
    ))
}

/// Register a new user account.
pub async fn register(
    pool: &PgPool,
    username: &str,
    password: &str,
    jwt_secret: &[u8],
) -> AppResult<TokenResponse> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    // Check duplicate username
    if nikoo_core::auth::queries::username_exists(pool, username).await? {
        return Err(AppError::Validation("Username already registered".into()));
    }

    let pw_hash = hash_password(password)?;

    let user_id = nikoo_core::auth::queries::create_user(pool, username, &pw_hash).await?;
    info!(username, "registered new user");

    let access_token = generate_access_token(&user_id, username, jwt_secret)?;
    let refresh_token = generate_refresh_token();
    let token_hash = hash_refresh_token(&refresh_token);

    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);
    nikoo_core::auth::queries::store_refresh_token(pool, &token_hash, &user_id, expires_at).await?;

    Ok(build_token_response(
        &user_id,
        username,
        access_token,
        refresh_token,
    ))
}

/// Refresh an access token using a refresh token (single-use rotation).
pub async fn refresh(
    pool: &PgPool,
    refresh_token: &str,
    jwt_secret: &[u8],
) -> AppResult<TokenResponse> {
    let token_hash = hash_refresh_token(refresh_token);

    // Find valid, non-revoked, non-expired token
    let row = nikoo_core::auth::queries::find_valid_refresh_token(pool, &token_hash).await?;

    let (token_id, user_id) = match row {
        None => return Err(AppError::Unauthorized("Invalid refresh token".into())),
        Some(r) => r,
    };

    // Revoke old token
    nikoo_core::auth::queries::revoke_refresh_token(pool, &token_id).await?;

    // Fetch user
    let user = nikoo_core::auth::queries::get_user_by_id(pool, &user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    // Issue new token pair
    let access_token = generate_access_token(&user_id, &user.username, jwt_secret)?;
    let new_refresh = generate_refresh_token();
    let new_hash = hash_refresh_token(&new_refresh);

    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);
    nikoo_core::auth::queries::store_refresh_token(pool, &new_hash, &user_id, expires_at).await?;

    Ok(build_token_response(
        &user_id,
        &user.username,
        access_token,
        new_refresh,
    ))
}

/// Logout — revoke a specific refresh token.
pub async fn logout(pool: &PgPool, refresh_token: Option<&str>) -> AppResult<LogoutResponse> {
    if let Some(token) = refresh_token {
        let token_hash = hash_refresh_token(token);
        nikoo_core::auth::queries::revoke_refresh_token_by_hash(pool, &token_hash).await?;
    }
    Ok(LogoutResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_tokens_are_unique_and_long() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn refresh_token_hash_is_stable_hex() {
        let hash = hash_refresh_token("token");
        assert_eq!(hash, hash_refresh_token("token"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
