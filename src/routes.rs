// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{exam, flightplan, questions, session},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (exams, sessions, flight plan, questions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool + validated scenario table).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let exam_routes = Router::new()
        .route("/generate", post(exam::generate_exam))
        .route("/{id}", get(exam::get_exam));

    let session_routes = Router::new()
        .route("/start", post(session::start_session))
        .route(
            "/{slot}",
            get(session::get_session).delete(session::clear_session),
        )
        .route("/{slot}/answer", post(session::answer))
        .route("/{slot}/navigate", post(session::navigate))
        .route("/{slot}/tick", post(session::tick))
        .route("/{slot}/complete", post(session::complete))
        .route("/{slot}/results", get(session::results));

    let flightplan_routes = Router::new()
        .route("/recompute", post(flightplan::recompute))
        .route("/capability", get(flightplan::capability));

    let question_routes = Router::new()
        .route("/", post(questions::create_question))
        .route("/stats", get(questions::stats));

    Router::new()
        .route("/api/scenarios", get(exam::list_scenarios))
        .nest("/api/exams", exam_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/flightplan", flightplan_routes)
        .nest("/api/questions", question_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
