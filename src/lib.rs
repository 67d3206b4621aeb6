use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(shift_routes())
        .merge(availability_routes())
        .merge(pay_stub_routes())
        .merge(punch_routes())
        // Global middleware
        .layer(axum::middleware::from_fn(middleware::csrf::csrf_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use handlers::auth;

    Router::new()
        // Account creation and sign-in
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // External provider sign-in
        .route("/auth/oauth/:provider", get(auth::oauth_start))
        .route("/signin-google", get(auth::google_callback))
        .route("/signin-facebook", get(auth::facebook_callback))
        // Session management for authenticated employees
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/session", delete(auth::logout))
        .route("/api/auth/account", delete(auth::delete_account))
}

fn shift_routes() -> Router {
    use handlers::shifts;

    Router::new()
        .route("/api/shifts", get(shifts::list).post(shifts::create))
        .route("/api/shifts/new", get(shifts::new_form))
        .route(
            "/api/shifts/:id",
            get(shifts::details).put(shifts::update).delete(shifts::destroy),
        )
        .route("/api/shifts/:id/edit", get(shifts::edit_form))
        .route("/api/shifts/:id/delete", get(shifts::delete_confirm))
}

fn availability_routes() -> Router {
    use handlers::availabilities;

    Router::new()
        .route(
            "/api/availabilities",
            get(availabilities::list).post(availabilities::create),
        )
        .route("/api/availabilities/new", get(availabilities::new_form))
        .route(
            "/api/availabilities/:id",
            get(availabilities::details)
                .put(availabilities::update)
                .delete(availabilities::destroy),
        )
        .route("/api/availabilities/:id/edit", get(availabilities::edit_form))
        .route("/api/availabilities/:id/delete", get(availabilities::delete_confirm))
}

fn pay_stub_routes() -> Router {
    use handlers::pay_stubs;

    Router::new()
        .route("/api/pay_stubs", get(pay_stubs::list).post(pay_stubs::create))
        .route("/api/pay_stubs/new", get(pay_stubs::new_form))
        .route(
            "/api/pay_stubs/:id",
            get(pay_stubs::details).put(pay_stubs::update).delete(pay_stubs::destroy),
        )
        .route("/api/pay_stubs/:id/edit", get(pay_stubs::edit_form))
        .route("/api/pay_stubs/:id/delete", get(pay_stubs::delete_confirm))
}

fn punch_routes() -> Router {
    use handlers::punches;

    Router::new()
        .route("/api/punches", get(punches::list).post(punches::create))
        .route("/api/punches/new", get(punches::new_form))
        .route(
            "/api/punches/:id",
            get(punches::details).put(punches::update).delete(punches::destroy),
        )
        .route("/api/punches/:id/edit", get(punches::edit_form))
        .route("/api/punches/:id/delete", get(punches::delete_confirm))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "shift-scheduler-api",
        "version": env!("CARGO_PKG_VERSION"),
        "entities": ["shifts", "availabilities", "pay_stubs", "punches"]
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    match database::Database::health_check().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            Json(json!({ "status": "ok" })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
