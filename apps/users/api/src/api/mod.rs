use axum::Router;

pub mod health;
pub mod users;

/// Versioned API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest("/v1/users", users::router(state))
}

/// `/ready`, which pings the database. Served at the root next to `/health`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
