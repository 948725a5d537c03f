use crate::state::AppState;
use axum::Router;

mod claims;
pub mod context;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod manager;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
