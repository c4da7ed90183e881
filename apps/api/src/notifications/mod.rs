//! Per-user notification log. Notifications raised as side effects of
//! progress changes go through `notify`, which never fails the caller.

use chrono::Utc;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::models::notification::{NewNotification, NotificationRow};
use crate::models::study_plan::StudyPlan;
use crate::store::Store;

pub mod handlers;

pub const KIND_STEP_COMPLETION: &str = "step_completion";
pub const KIND_TASK_COMPLETION: &str = "task_completion";
pub const KIND_MILESTONE: &str = "milestone";
pub const KIND_STUDY_PLAN: &str = "study_plan";

/// Appends a notification; a storage failure is logged and swallowed.
pub async fn notify(
    store: &dyn Store,
    user_id: &str,
    notification: NewNotification,
) -> Option<NotificationRow> {
    match store.insert_notification(user_id, &notification).await {
        Ok(row) => Some(row),
        Err(e) => {
            warn!(
                "Failed to create {} notification for user {user_id}: {e:#}",
                notification.kind
            );
            None
        }
    }
}

pub fn step_completed(step_id: Uuid, step_title: &str, progress_percentage: i32) -> NewNotification {
    NewNotification {
        kind: KIND_STEP_COMPLETION.to_string(),
        title: "Step Completed! 🌟".to_string(),
        message: format!(
            "Congratulations! You've completed \"{step_title}\". You're making great progress!"
        ),
        metadata: Some(json!({
            "stepId": step_id,
            "stepTitle": step_title,
            "progressPercentage": progress_percentage,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    }
}

pub fn task_completed(
    day: &str,
    task_index: u32,
    focus_area: &str,
    completed_count: u32,
    total_count: u32,
) -> NewNotification {
    NewNotification {
        kind: KIND_TASK_COMPLETION.to_string(),
        title: "Great Job! Task Completed 🎉".to_string(),
        message: format!(
            "You've completed a task in your study plan for \"{focus_area}\". Keep up the momentum!"
        ),
        metadata: Some(json!({
            "day": day,
            "taskIndex": task_index,
            "focusArea": focus_area,
            "completedCount": completed_count,
            "totalCount": total_count,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    }
}

pub fn roadmap_finished(roadmap_id: Uuid, career_path: &str) -> NewNotification {
    NewNotification {
        kind: KIND_MILESTONE.to_string(),
        title: "Roadmap Complete! 🏆".to_string(),
        message: format!(
            "You've finished every step of \"{career_path}\". Generate your next roadmap to keep going."
        ),
        metadata: Some(json!({ "roadmapId": roadmap_id })),
    }
}

pub fn roadmap_unlocked(
    finished_career_path: &str,
    next_career_path: &str,
    roadmap_id: Uuid,
) -> NewNotification {
    NewNotification {
        kind: KIND_MILESTONE.to_string(),
        title: "🎉 New Roadmap Unlocked!".to_string(),
        message: format!(
            "Congratulations on completing \"{finished_career_path}\"! Your next roadmap \"{next_career_path}\" is ready."
        ),
        metadata: Some(json!({ "roadmapId": roadmap_id })),
    }
}

pub fn study_plan_ready(step_title: &str, plan: &StudyPlan) -> NewNotification {
    NewNotification {
        kind: KIND_STUDY_PLAN.to_string(),
        title: "Your Weekly Study Plan is Ready!".to_string(),
        message: format!(
            "A personalized study plan for \"{step_title}\" is ready. Check your daily schedules to get started!"
        ),
        metadata: Some(json!({
            "focusArea": plan.focus_area,
            "weekStart": plan.week_start,
        })),
    }
}
