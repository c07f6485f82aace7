use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{health, news, quotes};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", quotes::router().merge(news::router()))
        .layer(cors)
        .with_state(state)
}
