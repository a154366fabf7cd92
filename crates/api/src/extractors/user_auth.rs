//! Authentication extractor.
//!
//! Validates the JWT carried in the `x-auth-token` header and resolves it
//! to a user id before any handler logic runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the access token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated caller identity resolved from the token.
#[derive(Debug, Clone, Copy)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("No token, authorization denied".to_string())
            })?;

        let claims = state
            .jwt
            .validate_token(token)
            .map_err(|_| ApiError::Unauthorized("Token is not valid".to_string()))?;

        let user_id = shared::jwt::extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Token is not valid".to_string()))?;

        Ok(UserAuth { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_is_copy() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
        };
        let copied = auth;
        assert_eq!(auth.user_id, copied.user_id);
    }

    #[test]
    fn test_header_name() {
        assert_eq!(AUTH_TOKEN_HEADER, "x-auth-token");
    }
}
