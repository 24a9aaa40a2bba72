use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod products;

/// The `/api/v1` tree; state is attached by the caller.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/category", categories::router())
        .nest("/product", products::router())
        .nest("/auth", auth::router())
}
