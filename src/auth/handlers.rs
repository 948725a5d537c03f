use axum::{
    extract::{FromRef, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        context::SecurityContext,
        dto::{
            Availability, EmailQuery, LoginRequest, LoginResponse, RegisterRequest,
            UserProfileResponse, UsernameQuery,
        },
        jwt::JwtKeys,
    },
    error::AppError,
    response::ApiResponse,
    state::AppState,
};

pub const LOGGED_IN: &str = "登录成功！";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/check-username", get(check_username))
        .route("/auth/check-email", get(check_email))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let payload = payload.normalize()?;
    let message = state.auth.register_user(payload).await?;
    Ok(Json(ApiResponse::message(message)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let payload = payload.normalize()?;

    let mut context = SecurityContext::new();
    state.auth.authenticate_user(&mut context, payload).await?;
    let Some(principal) = context.principal() else {
        return Err(AppError::bad_credentials());
    };

    let token = JwtKeys::from_ref(&state).sign(principal)?;
    info!(user_id = principal.id, "token issued");

    Ok(Json(ApiResponse::success(
        LOGGED_IN,
        LoginResponse {
            token,
            token_type: "Bearer",
            user: UserProfileResponse::from(principal),
        },
    )))
}

#[instrument(skip(state))]
pub async fn check_username(
    State(state): State<AppState>,
    Query(q): Query<UsernameQuery>,
) -> Result<Json<ApiResponse<Availability>>, AppError> {
    let taken = state.auth.find_by_username(q.username.trim()).await?.is_some();
    let message = if taken { "用户名已被使用" } else { "用户名可用" };
    Ok(Json(ApiResponse::success(message, Availability { available: !taken })))
}

#[instrument(skip(state))]
pub async fn check_email(
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> Result<Json<ApiResponse<Availability>>, AppError> {
    let email = q.email.trim().to_lowercase();
    let taken = state.auth.find_by_email(&email).await?.is_some();
    let message = if taken { "邮箱已被使用" } else { "邮箱可用" };
    Ok(Json(ApiResponse::success(message, Availability { available: !taken })))
}
