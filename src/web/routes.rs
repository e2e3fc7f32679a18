// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, mw_auth, student_handlers, tracking_handlers, upload_handlers},
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/register", post(auth_handlers::handle_register))
        .route("/api/login", post(auth_handlers::handle_login))
        .route("/api/logout", post(auth_handlers::handle_logout));

    let student_routes = Router::new()
        .route(
            "/",
            get(student_handlers::handle_list_students).post(student_handlers::handle_create_student),
        )
        .route("/stats", get(student_handlers::handle_student_stats))
        .route(
            "/{id}",
            get(student_handlers::handle_get_student)
                .put(student_handlers::handle_update_student)
                .delete(student_handlers::handle_delete_student),
        )
        .route(
            "/{id}/alerts",
            get(tracking_handlers::handle_list_alerts).post(tracking_handlers::handle_create_alert),
        )
        .route(
            "/{id}/interventions",
            get(tracking_handlers::handle_list_interventions)
                .post(tracking_handlers::handle_create_intervention),
        )
        .route(
            "/{id}/score-history",
            get(tracking_handlers::handle_score_history).post(tracking_handlers::handle_add_score),
        )
        .route(
            "/{id}/attendance-history",
            get(tracking_handlers::handle_attendance_history)
                .post(tracking_handlers::handle_add_attendance),
        );

    // Limite do body aplicado só aos uploads
    let upload_routes = Router::new()
        .route("/csv", post(upload_handlers::handle_upload_csv))
        .route("/csv/preview", post(upload_handlers::handle_preview_csv))
        .layer(DefaultBodyLimit::max(app_state.max_upload_bytes));

    // --- Rotas Autenticadas ---
    let authenticated_routes = Router::new()
        .route("/api/auth/user", get(auth_handlers::handle_current_user))
        .nest("/api/students", student_routes)
        .nest("/api/upload", upload_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
