use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    Json,
};

use crate::{
    auth::jwt::{Claims, JwtKeys, TokenError},
    dto::ApiMessage,
    state::AppState,
};

/// Extracts and validates the bearer token, exposing its claims.
///
/// Missing credentials are a 401; a token that is present but invalid or
/// expired is a 403.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, Json<ApiMessage>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .ok_or(TokenError::Missing);

        let claims = token.and_then(|t| keys.verify(t)).map_err(|e| {
            let status = match e {
                TokenError::Missing => StatusCode::UNAUTHORIZED,
                TokenError::Invalid | TokenError::Expired => StatusCode::FORBIDDEN,
            };
            (status, Json(ApiMessage::fail(e.to_string())))
        })?;

        Ok(AuthUser(claims))
    }
}
