//! A user's roadmap sequence: which one is current, and how new roadmaps
//! join the history.

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::{RoadmapDraft, RoadmapRow, RoadmapView};
use crate::notifications::{notify, roadmap_unlocked};
use crate::store::Store;

/// Latest active roadmap by order, else the most recent one.
pub fn pick_current(roadmaps: Vec<RoadmapRow>) -> Option<RoadmapRow> {
    let latest_active = roadmaps
        .iter()
        .filter(|r| r.is_active())
        .max_by_key(|r| r.roadmap_order)
        .cloned();
    latest_active.or_else(|| roadmaps.into_iter().max_by_key(|r| r.roadmap_order))
}

pub async fn current_roadmap(store: &dyn Store, user_id: &str) -> Result<Option<RoadmapRow>> {
    Ok(pick_current(store.list_roadmaps(user_id).await?))
}

/// The roadmap with `roadmap_id`, provided it belongs to `user_id`.
pub async fn owned_roadmap(
    store: &dyn Store,
    user_id: &str,
    roadmap_id: Uuid,
) -> Result<RoadmapRow, AppError> {
    store
        .get_roadmap(roadmap_id)
        .await?
        .filter(|r| r.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("Roadmap not found".to_string()))
}

pub async fn with_steps(
    store: &dyn Store,
    roadmap: RoadmapRow,
    include_steps: bool,
) -> Result<RoadmapView> {
    let steps = if include_steps {
        Some(store.list_steps(roadmap.id).await?)
    } else {
        None
    };
    Ok(RoadmapView { roadmap, steps })
}

/// Replaces the user's active roadmaps with `draft`. Completed roadmaps are
/// kept as history and the new one is appended after them.
pub async fn save_initial(
    store: &dyn Store,
    user_id: &str,
    draft: &RoadmapDraft,
) -> Result<RoadmapView> {
    let roadmaps = store.list_roadmaps(user_id).await?;
    let mut next_order = 1;
    for roadmap in roadmaps {
        if roadmap.is_active() {
            store.delete_roadmap(roadmap.id).await?;
            info!("Deleted active roadmap {} for user {user_id}", roadmap.id);
        } else {
            next_order = next_order.max(roadmap.roadmap_order + 1);
        }
    }

    let view = store.insert_roadmap(user_id, draft, next_order).await?;
    let total = view.steps.as_ref().map_or(0, Vec::len) as i32;
    store
        .upsert_progress(user_id, view.roadmap.id, total, 0)
        .await?;
    info!(
        "Saved roadmap {} (order {next_order}, {total} steps) for user {user_id}",
        view.roadmap.id
    );
    Ok(view)
}

/// Marks the finished roadmap completed and appends `draft` after the
/// user's highest order. `finished_id` is used only when the user owns it;
/// otherwise the latest active roadmap is the one marked.
pub async fn save_next(
    store: &dyn Store,
    user_id: &str,
    finished_id: Option<Uuid>,
    draft: &RoadmapDraft,
) -> Result<RoadmapView> {
    let roadmaps = store.list_roadmaps(user_id).await?;

    let finished = finished_id
        .and_then(|id| roadmaps.iter().find(|r| r.id == id))
        .or_else(|| {
            roadmaps
                .iter()
                .filter(|r| r.is_active())
                .max_by_key(|r| r.roadmap_order)
        })
        .cloned();

    if let Some(finished) = finished.as_ref().filter(|r| r.is_active()) {
        store.set_roadmap_completed(finished.id, Utc::now()).await?;
        info!("Marked roadmap {} completed for user {user_id}", finished.id);
    }

    let next_order = roadmaps
        .iter()
        .map(|r| r.roadmap_order)
        .max()
        .unwrap_or(0)
        + 1;
    let view = store.insert_roadmap(user_id, draft, next_order).await?;
    let total = view.steps.as_ref().map_or(0, Vec::len) as i32;
    store
        .upsert_progress(user_id, view.roadmap.id, total, 0)
        .await?;

    let finished_path = finished
        .as_ref()
        .map(|r| r.career_path.as_str())
        .unwrap_or("your previous roadmap");
    notify(
        store,
        user_id,
        roadmap_unlocked(finished_path, &view.roadmap.career_path, view.roadmap.id),
    )
    .await;

    info!(
        "Saved next roadmap {} (order {next_order}) for user {user_id}",
        view.roadmap.id
    );
    Ok(view)
}
