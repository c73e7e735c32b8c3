use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::handlers::{health, storage, users};
use crate::state::AppState;

/// Assemble the full application router. `/` and `/health` stay outside the
/// identity layer; everything else requires a caller identity.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Identity-guarded relay routes
        .merge(data_routes(state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn data_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/users/:user_id",
            get(users::user_get)
                .post(users::user_post)
                .put(users::user_put)
                .delete(users::user_delete),
        )
        .route("/storage/upload", post(storage::upload))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::identity_middleware,
        ))
        .with_state(state)
}
