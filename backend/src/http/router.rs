//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderValue, Method,
    },
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::error::AppError;
use super::handlers;
use super::state::AppState;

/// Path of the students resource.
pub const STUDENTS_PATH: &str = "/api/students";
/// Legacy path kept for clients of the PHP deployment.
pub const STUDENTS_LEGACY_PATH: &str = "/api/students.php";

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

fn students_routes() -> MethodRouter<AppState> {
    get(handlers::list_or_get_students)
        .post(handlers::create_student)
        .put(handlers::update_student)
        .delete(handlers::delete_student)
        .options(handlers::options)
        // GET would otherwise answer HEAD as well.
        .head(handlers::method_not_allowed)
        .fallback(handlers::method_not_allowed)
}

async fn unknown_route() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(STUDENTS_PATH, students_routes())
        .route(STUDENTS_LEGACY_PATH, students_routes())
        .fallback(unknown_route)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Outermost, so preflights answered by the CORS layer and error
        // envelopes carry the same headers as regular responses.
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}
