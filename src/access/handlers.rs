use axum::{routing::get, Json, Router};
use tracing::instrument;

use super::guard::{AdminOnly, AnyRole, Authorized};
use crate::{
    auth::{dto::UserProfileResponse, repo_types::User},
    response::ApiResponse,
    state::AppState,
};

pub fn test_routes() -> Router<AppState> {
    Router::new()
        .route("/test/public", get(all_access))
        .route("/test/user", get(user_access))
        .route("/test/admin", get(admin_access))
        .route("/test/profile", get(current_user))
}

pub async fn all_access() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("这是一个公共接口，无需认证即可访问"))
}

/// Echoes the caller's identity. `User` never serializes its password hash.
#[instrument(skip_all)]
pub async fn user_access(auth: Authorized<AnyRole>) -> Json<ApiResponse<User>> {
    let user = auth.authentication.principal;
    Json(ApiResponse::success(
        format!("欢迎 {}！这是需要认证的用户接口", user.username),
        user,
    ))
}

#[instrument(skip_all)]
pub async fn admin_access(_auth: Authorized<AdminOnly>) -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("这是管理员专用接口"))
}

#[instrument(skip_all)]
pub async fn current_user(auth: Authorized<AnyRole>) -> Json<ApiResponse<UserProfileResponse>> {
    let profile = UserProfileResponse::from(&auth.authentication.principal);
    Json(ApiResponse::success("获取用户信息成功", profile))
}
