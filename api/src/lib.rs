pub mod auth;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{
    Router,
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::cors::CorsLayer;

use crate::auth::middleware::log_request;
use crate::state::AppState;

/// The full application: `/api` over HTTP, `/ws` for live feeds.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::routes(state.clone()))
        .nest("/ws", ws::ws_routes(state.clone()))
        .with_state(state)
        .layer(from_fn(log_request))
        .layer(cors)
}
