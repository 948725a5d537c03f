use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{context::Authentication, jwt::JwtKeys};
use crate::{error::AppError, state::AppState};

pub const LOGIN_REQUIRED: &str = "未登录或登录已过期，请重新登录";

/// Identity of the caller, rebuilt from the bearer token on every request.
pub struct Authenticated(pub Authentication);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Authentication(LOGIN_REQUIRED.into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Authentication(LOGIN_REQUIRED.into()))?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Authentication(LOGIN_REQUIRED.into())
        })?;

        // The account may have been removed or replaced since the token was issued.
        let user = match state.auth.find_by_username(&claims.sub).await? {
            Some(u) if u.id == claims.uid => u,
            _ => {
                warn!(user_id = claims.uid, "token subject no longer exists");
                return Err(AppError::Authentication(LOGIN_REQUIRED.into()));
            }
        };

        Ok(Authenticated(Authentication::new(user)))
    }
}
