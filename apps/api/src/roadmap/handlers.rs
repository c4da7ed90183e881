//! Axum route handlers for the Roadmap API.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{optional_id, required, AppError};
use crate::identity::resolve_user;
use crate::models::roadmap::{RoadmapDraft, RoadmapRow, RoadmapView};
use crate::models::user::Profile;
use crate::roadmap::generator::{
    generate_initial, generate_next, CompletedRoadmap, DraftSource, GeneratedRoadmap,
};
use crate::roadmap::history::{current_roadmap, owned_roadmap, save_initial, save_next, with_steps};
use crate::routes::cache_control;
use crate::state::AppState;

const ACTIVE_MAX_AGE: u32 = 30;
const COMPLETED_MAX_AGE: u32 = 3600;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoadmapRequest {
    #[serde(default)]
    pub profile: Profile,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNextRoadmapRequest {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub completed_roadmap: CompletedRoadmap,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// A stored roadmap, or a draft that could not be (or was not asked to be) saved.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RoadmapPayload {
    Saved(RoadmapView),
    Unsaved(RoadmapDraft),
}

#[derive(Debug, Serialize)]
pub struct GeneratedRoadmapResponse {
    pub roadmap: RoadmapPayload,
    pub saved: bool,
    pub source: DraftSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapQuery {
    pub user_id: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub history: bool,
    pub include_steps: Option<bool>,
    pub roadmap_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: RoadmapView,
}

#[derive(Debug, Serialize)]
pub struct RoadmapHistoryResponse {
    pub roadmaps: Vec<RoadmapView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn respond(
    generated: GeneratedRoadmap,
    saved: Option<RoadmapView>,
) -> Json<GeneratedRoadmapResponse> {
    let (roadmap, saved) = match saved {
        Some(view) => (RoadmapPayload::Saved(view), true),
        None => (RoadmapPayload::Unsaved(generated.draft.reset_progress()), false),
    };
    Json(GeneratedRoadmapResponse {
        roadmap,
        saved,
        source: generated.source,
    })
}

/// POST /api/generate-roadmap
///
/// Generates a first roadmap. With a resolvable `userId` it replaces the
/// user's active roadmap; otherwise the draft is returned unsaved.
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Json(request): Json<GenerateRoadmapRequest>,
) -> Result<Json<GeneratedRoadmapResponse>, AppError> {
    let generated = generate_initial(state.llm.as_ref(), &request.profile).await;

    let Some(user_id) = request.user_id.as_deref().filter(|u| !u.trim().is_empty()) else {
        return Ok(respond(generated, None));
    };

    let store = state.store.as_ref();
    let saved = match resolve_user(store, user_id, request.email.as_deref()).await {
        Ok(user) => match save_initial(store, &user.id, &generated.draft).await {
            Ok(view) => Some(view),
            Err(e) => {
                warn!("Failed to save roadmap for user {}: {e:#}", user.id);
                None
            }
        },
        Err(e) => {
            warn!("Not saving roadmap for {user_id}: {e}");
            None
        }
    };

    Ok(respond(generated, saved))
}

/// POST /api/generate-next-roadmap
///
/// Generates the follow-up roadmap. When saved, the finished roadmap is
/// marked completed and the new one is appended to the user's history.
pub async fn handle_generate_next_roadmap(
    State(state): State<AppState>,
    Json(request): Json<GenerateNextRoadmapRequest>,
) -> Result<Json<GeneratedRoadmapResponse>, AppError> {
    let completed = &request.completed_roadmap;
    let generated = generate_next(state.llm.as_ref(), &request.profile, completed).await;

    let Some(user_id) = request.user_id.as_deref().filter(|u| !u.trim().is_empty()) else {
        return Ok(respond(generated, None));
    };

    let store = state.store.as_ref();
    let saved = match resolve_user(store, user_id, request.email.as_deref()).await {
        Ok(user) => {
            match save_next(store, &user.id, completed.stored_id(), &generated.draft).await {
                Ok(view) => Some(view),
                Err(e) => {
                    warn!("Failed to save next roadmap for user {}: {e:#}", user.id);
                    None
                }
            }
        }
        Err(e) => {
            warn!("Not saving next roadmap for {user_id}: {e}");
            None
        }
    };

    Ok(respond(generated, saved))
}

fn max_age(roadmap: &RoadmapRow) -> u32 {
    if roadmap.is_active() {
        ACTIVE_MAX_AGE
    } else {
        COMPLETED_MAX_AGE
    }
}

/// GET /api/roadmap?userId=&email=&history=&includeSteps=&roadmapId=
///
/// `history=true` lists every roadmap by order; `roadmapId` fetches one the
/// user owns; otherwise the current roadmap is returned.
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Query(query): Query<RoadmapQuery>,
) -> Result<axum::response::Response, AppError> {
    let user_id = required(query.user_id.as_deref(), "userId")?;
    let store = state.store.as_ref();
    let user = resolve_user(store, user_id, query.email.as_deref()).await?;
    let include_steps = query.include_steps.unwrap_or(true);

    if query.history {
        let roadmaps = store.list_roadmaps(&user.id).await?;
        let mut views = Vec::with_capacity(roadmaps.len());
        for roadmap in roadmaps {
            views.push(with_steps(store, roadmap, include_steps).await?);
        }
        info!("Returning {} roadmaps for user {}", views.len(), user.id);
        return Ok(Json(RoadmapHistoryResponse { roadmaps: views }).into_response());
    }

    let roadmap = match optional_id(query.roadmap_id.as_deref(), "roadmapId")? {
        Some(id) => owned_roadmap(store, &user.id, id).await?,
        None => current_roadmap(store, &user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Roadmap not found".to_string()))?,
    };

    let age = max_age(&roadmap);
    let view = with_steps(store, roadmap, include_steps).await?;
    Ok((cache_control(age), Json(RoadmapResponse { roadmap: view })).into_response())
}
