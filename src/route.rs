use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/todos", get(get_todos).post(create_todo))
        .route("/todos/:id/toggle", put(toggle_todo))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/", get(health_checker_handler))
        .with_state(app_state);
    app
}
