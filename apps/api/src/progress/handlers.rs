//! Axum route handlers for step completion, task progress, progress
//! lookup and feedback.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::{optional_id, parse_id, required, AppError};
use crate::identity::resolve_user;
use crate::models::roadmap::ProgressRow;
use crate::models::user::Profile;
use crate::progress::feedback::generate_feedback;
use crate::progress::reconcile::{
    complete_step, record_task_completion, set_step_completion, StepUpdate, TaskCompletion,
    TaskCompletionInput, Tally,
};
use crate::roadmap::history::{current_roadmap, owned_roadmap};
use crate::routes::cache_control;
use crate::state::AppState;

const PROGRESS_MAX_AGE: u32 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteStepRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub step_id: Option<String>,
    pub step_title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpdateResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub update: StepUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStepRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletedRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub day: Option<String>,
    pub task_index: Option<u32>,
    pub focus_area: Option<String>,
    pub completed_tasks_count: Option<u32>,
    pub total_tasks_count: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletedResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub completion: TaskCompletion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub roadmap_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressWithPercentage {
    #[serde(flatten)]
    pub progress: ProgressRow,
    pub percentage: i32,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: ProgressWithPercentage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub completed_steps: u32,
    #[serde(default)]
    pub current_progress: i32,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub roadmap_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
    pub saved: bool,
}

/// PUT /api/complete-step
///
/// Resolves the step by id or title and marks it complete.
pub async fn handle_complete_step(
    State(state): State<AppState>,
    Json(request): Json<CompleteStepRequest>,
) -> Result<Json<StepUpdateResponse>, AppError> {
    let user_id = required(request.user_id.as_deref(), "userId")?;
    let step_id = request.step_id.as_deref().filter(|s| !s.trim().is_empty());
    let step_title = request.step_title.as_deref().filter(|s| !s.trim().is_empty());
    if step_id.is_none() && step_title.is_none() {
        return Err(AppError::Validation(
            "stepId or stepTitle is required".to_string(),
        ));
    }

    let user = resolve_user(state.store.as_ref(), user_id, request.email.as_deref()).await?;
    let update = complete_step(state.store.as_ref(), &user.id, step_id, step_title).await?;

    Ok(Json(StepUpdateResponse {
        success: true,
        message: "Step marked as completed".to_string(),
        update,
    }))
}

/// PUT /api/steps/:id
pub async fn handle_toggle_step(
    State(state): State<AppState>,
    Path(step_id): Path<String>,
    Json(request): Json<ToggleStepRequest>,
) -> Result<Json<StepUpdateResponse>, AppError> {
    let step_id = parse_id(&step_id, "step id")?;
    let user_id = required(request.user_id.as_deref(), "userId")?;
    let completed = request
        .completed
        .ok_or_else(|| AppError::Validation("completed is required".to_string()))?;

    let user = resolve_user(state.store.as_ref(), user_id, request.email.as_deref()).await?;
    let update = set_step_completion(state.store.as_ref(), &user.id, step_id, completed).await?;

    let message = if completed {
        "Step marked as completed"
    } else {
        "Step marked as not completed"
    };
    Ok(Json(StepUpdateResponse {
        success: true,
        message: message.to_string(),
        update,
    }))
}

/// POST /api/mark-task-completed
///
/// Records a study-plan task and moves the matching step's progress.
pub async fn handle_mark_task_completed(
    State(state): State<AppState>,
    Json(request): Json<TaskCompletedRequest>,
) -> Result<Json<TaskCompletedResponse>, AppError> {
    let user_id = required(request.user_id.as_deref(), "userId")?;
    let day = required(request.day.as_deref(), "day")?;
    let (Some(task_index), Some(completed_tasks), Some(total_tasks)) = (
        request.task_index,
        request.completed_tasks_count,
        request.total_tasks_count,
    ) else {
        return Err(AppError::Validation(
            "taskIndex, completedTasksCount and totalTasksCount are required".to_string(),
        ));
    };

    let user = resolve_user(state.store.as_ref(), user_id, request.email.as_deref()).await?;
    let completion = record_task_completion(
        state.store.as_ref(),
        &user.id,
        TaskCompletionInput {
            day: day.to_string(),
            task_index,
            focus_area: request.focus_area.unwrap_or_default(),
            completed_tasks,
            total_tasks,
        },
    )
    .await?;

    Ok(Json(TaskCompletedResponse {
        success: true,
        message: "Task marked as completed and progress updated".to_string(),
        completion,
    }))
}

/// GET /api/progress?userId=&email=&roadmapId=
///
/// Without `roadmapId` the user's current roadmap is used.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = required(query.user_id.as_deref(), "userId")?;
    let store = state.store.as_ref();
    let user = resolve_user(store, user_id, query.email.as_deref()).await?;

    let roadmap = match optional_id(query.roadmap_id.as_deref(), "roadmapId")? {
        Some(id) => owned_roadmap(store, &user.id, id).await?,
        None => current_roadmap(store, &user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No roadmap found".to_string()))?,
    };

    let progress = store
        .get_progress(&user.id, roadmap.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Progress record not found".to_string()))?;
    let percentage = Tally {
        total: progress.total_steps,
        completed: progress.completed_steps,
    }
    .percentage();

    Ok((
        cache_control(PROGRESS_MAX_AGE),
        Json(ProgressResponse {
            progress: ProgressWithPercentage {
                progress,
                percentage,
            },
        }),
    ))
}

/// POST /api/generate-feedback
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let feedback = generate_feedback(
        state.llm.as_ref(),
        &request.profile,
        request.completed_steps,
        request.current_progress,
    )
    .await;

    let user_id = request.user_id.as_deref().filter(|u| !u.trim().is_empty());
    let roadmap_id = optional_id(request.roadmap_id.as_deref(), "roadmapId")?;
    let saved = match (user_id, roadmap_id) {
        (Some(user_id), Some(roadmap_id)) => {
            let store = state.store.as_ref();
            let user = resolve_user(store, user_id, request.email.as_deref()).await?;
            let roadmap = owned_roadmap(store, &user.id, roadmap_id).await?;
            store.save_feedback(&user.id, roadmap.id, &feedback).await?;
            true
        }
        _ => false,
    };

    Ok(Json(FeedbackResponse { feedback, saved }))
}
