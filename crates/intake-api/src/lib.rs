//! intake-api
//!
//! HTTP surface over the intake form: editing sessions, document export,
//! submission and the stored forms. Runs on Lambda or a local listener.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod submission;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Schema
        .route("/schema", get(routes::schema::get_schema))
        .route(
            "/schema/fields/{name}/dependents",
            get(routes::schema::get_dependents),
        )
        .route("/instruments", get(routes::instruments::list_instruments))
        .route(
            "/instruments/{id}",
            get(routes::instruments::get_instrument_detail),
        )
        // Sessions
        .route("/sessions", post(routes::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route(
            "/sessions/{id}/fields/{name}",
            put(routes::sessions::set_field),
        )
        .route(
            "/sessions/{id}/slots/{name}/{index}",
            put(routes::sessions::set_slot),
        )
        .route("/sessions/{id}/derived", get(routes::sessions::get_derived))
        .route("/sessions/{id}/export", post(routes::sessions::export_session))
        .route("/sessions/{id}/submit", post(routes::sessions::submit_session))
        // Whole records and stored submissions
        .route("/forms/export", post(routes::forms::export_record))
        .route(
            "/forms",
            get(routes::forms::list_forms).post(routes::forms::submit_record),
        )
        .route("/forms/{id}", get(routes::forms::get_form))
        .route("/forms/{id}/notify", post(routes::forms::notify_form))
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors),
        )
        .with_state(state)
}
