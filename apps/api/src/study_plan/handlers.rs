use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{optional_id, AppError};
use crate::identity::resolve_user;
use crate::models::study_plan::StudyPlan;
use crate::models::user::Profile;
use crate::notifications::{notify, study_plan_ready};
use crate::roadmap::history::owned_roadmap;
use crate::state::AppState;
use crate::study_plan::generator::{generate_study_plan, CurrentStep, PlanSource};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    #[serde(default)]
    pub profile: Profile,
    pub current_step: Option<CurrentStep>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub roadmap_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanResponse {
    pub study_plan: StudyPlan,
    pub source: PlanSource,
    pub saved: bool,
}

/// POST /api/generate-study-plan
///
/// The week starts today. With `userId` and `roadmapId` the plan is stored
/// on the roadmap's progress record.
pub async fn handle_generate_study_plan(
    State(state): State<AppState>,
    Json(request): Json<StudyPlanRequest>,
) -> Result<Json<StudyPlanResponse>, AppError> {
    let step = request
        .current_step
        .filter(|s| !s.title.trim().is_empty())
        .ok_or_else(|| AppError::Validation("currentStep with a title is required".to_string()))?;

    let today = Utc::now().date_naive();
    let (study_plan, source) =
        generate_study_plan(state.llm.as_ref(), &request.profile, &step, today).await;

    let user_id = request.user_id.as_deref().filter(|u| !u.trim().is_empty());
    let roadmap_id = optional_id(request.roadmap_id.as_deref(), "roadmapId")?;
    let saved = match (user_id, roadmap_id) {
        (Some(user_id), Some(roadmap_id)) => {
            let store = state.store.as_ref();
            let user = resolve_user(store, user_id, request.email.as_deref()).await?;
            let roadmap = owned_roadmap(store, &user.id, roadmap_id).await?;
            store.save_study_plan(&user.id, roadmap.id, &study_plan).await?;
            notify(store, &user.id, study_plan_ready(&step.title, &study_plan)).await;
            true
        }
        _ => false,
    };

    Ok(Json(StudyPlanResponse {
        study_plan,
        source,
        saved,
    }))
}
