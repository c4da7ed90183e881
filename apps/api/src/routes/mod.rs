pub mod health;

use axum::{
    http::header,
    routing::{get, post, put},
    Router,
};

use crate::chat::handlers as chat;
use crate::notifications::handlers as notifications;
use crate::profile::handlers as profile;
use crate::progress::handlers as progress;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;
use crate::study_plan::handlers as study_plan;

/// `Cache-Control` header for a publicly cacheable response.
pub fn cache_control(max_age: u32) -> [(header::HeaderName, String); 1] {
    [(
        header::CACHE_CONTROL,
        format!("public, max-age={max_age}, s-maxage={max_age}"),
    )]
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users and profiles
        .route("/api/auth/create-user", post(profile::handle_create_user))
        .route(
            "/api/profile",
            get(profile::handle_get_profile).post(profile::handle_save_profile),
        )
        // Roadmaps
        .route(
            "/api/generate-roadmap",
            post(roadmap::handle_generate_roadmap),
        )
        .route(
            "/api/generate-next-roadmap",
            post(roadmap::handle_generate_next_roadmap),
        )
        .route("/api/roadmap", get(roadmap::handle_get_roadmap))
        // Progress
        .route("/api/complete-step", put(progress::handle_complete_step))
        .route("/api/steps/:id", put(progress::handle_toggle_step))
        .route(
            "/api/mark-task-completed",
            post(progress::handle_mark_task_completed),
        )
        .route("/api/progress", get(progress::handle_get_progress))
        .route(
            "/api/generate-feedback",
            post(progress::handle_generate_feedback),
        )
        // Study plans
        .route(
            "/api/generate-study-plan",
            post(study_plan::handle_generate_study_plan),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::handle_list).post(notifications::handle_create),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::handle_read_all),
        )
        .route(
            "/api/notifications/:id",
            put(notifications::handle_mark_read).delete(notifications::handle_delete),
        )
        // Chat
        .route(
            "/api/chat",
            get(chat::handle_history).post(chat::handle_chat),
        )
        .with_state(state)
}
