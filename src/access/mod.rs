use crate::state::AppState;
use axum::Router;

pub mod guard;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::test_routes())
}
