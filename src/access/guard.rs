use std::marker::PhantomData;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::{info, warn};

use crate::{
    auth::{context::Authentication, extractors::Authenticated, repo_types::Role},
    error::{AppError, ACCESS_DENIED},
    state::AppState,
};

/// Set of roles allowed through a route.
pub trait AccessPolicy: Send + Sync + 'static {
    const ALLOWED: &'static [Role];
}

/// Any signed-in user.
pub struct AnyRole;

impl AccessPolicy for AnyRole {
    const ALLOWED: &'static [Role] = &[Role::User, Role::Admin];
}

pub struct AdminOnly;

impl AccessPolicy for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

pub fn check_access(authentication: &Authentication, allowed: &[Role]) -> Result<(), AppError> {
    if authentication.has_any_role(allowed) {
        Ok(())
    } else {
        Err(AppError::AccessDenied(ACCESS_DENIED.into()))
    }
}

/// Caller identity that has passed the role check of `P`. Extraction fails
/// before the handler body runs: 401 without a valid token, 403 on a role
/// mismatch.
pub struct Authorized<P: AccessPolicy> {
    pub authentication: Authentication,
    _policy: PhantomData<P>,
}

#[async_trait]
impl<P: AccessPolicy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(authentication) = Authenticated::from_request_parts(parts, state).await?;
        let user = &authentication.principal;

        if let Err(e) = check_access(&authentication, P::ALLOWED) {
            warn!(
                user_id = user.id,
                role = %user.role,
                path = %parts.uri.path(),
                "insufficient role"
            );
            return Err(e);
        }
        info!(user_id = user.id, role = %user.role, "access granted");

        Ok(Self {
            authentication,
            _policy: PhantomData,
        })
    }
}
