//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API wire models
//! (which have `#[serde(rename)]` for camelCase etc.).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed ID of the seeded anonymous user backing the public chatbot flow.
pub const ANONYMOUS_USER_ID: Uuid = Uuid::from_u128(1);

/// Username of the seeded anonymous user.
pub const ANONYMOUS_USERNAME: &str = "anonymous";

/// Domain user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// Username, echoed for display without a user lookup.
    pub username: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_user_id_is_stable() {
        assert_eq!(
            ANONYMOUS_USER_ID.to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }
}
