//! Step mutations and the progress record derived from them.
//!
//! The progress record is always recomputed from the full step list after a
//! mutation, never incremented. Notifications are side effects via `notify`.

use anyhow::Result;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::NotificationRow;
use crate::models::roadmap::{ProgressRow, StepRow};
use crate::notifications::{notify, roadmap_finished, step_completed, task_completed};
use crate::progress::resolution::{match_by_title, match_focus_area, parse_step_id, MatchRule};
use crate::roadmap::history::current_roadmap;
use crate::store::Store;

/// Highest progress a step can reach through study-plan tasks alone.
pub const TASK_PROGRESS_CAP: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub total: i32,
    pub completed: i32,
}

impl Tally {
    pub fn of(steps: &[StepRow]) -> Self {
        Tally {
            total: steps.len() as i32,
            completed: steps.iter().filter(|s| s.completed).count() as i32,
        }
    }

    pub fn percentage(&self) -> i32 {
        percentage(self.completed as u32, self.total as u32)
    }

    pub fn all_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// `round(done / total * 100)`, 0 when `total` is 0.
pub fn percentage(done: u32, total: u32) -> i32 {
    if total == 0 {
        return 0;
    }
    (f64::from(done) / f64::from(total) * 100.0).round() as i32
}

/// Step progress derived from study-plan tasks. Never reaches 100.
pub fn task_progress(done: u32, total: u32) -> i32 {
    percentage(done, total).clamp(0, TASK_PROGRESS_CAP)
}

/// Recomputes and stores the progress record for one roadmap.
pub async fn refresh_progress(
    store: &dyn Store,
    user_id: &str,
    roadmap_id: Uuid,
) -> Result<(Vec<StepRow>, ProgressRow, Tally)> {
    let steps = store.list_steps(roadmap_id).await?;
    let tally = Tally::of(&steps);
    let progress = store
        .upsert_progress(user_id, roadmap_id, tally.total, tally.completed)
        .await?;
    Ok((steps, progress, tally))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpdate {
    pub step: StepRow,
    pub progress: ProgressRow,
    pub percentage: i32,
    pub roadmap_completed: bool,
}

/// A step the user owns, looked up by stored id.
async fn owned_step(store: &dyn Store, user_id: &str, step_id: Uuid) -> Result<Option<StepRow>> {
    let Some(step) = store.get_step(step_id).await? else {
        return Ok(None);
    };
    let owned = store
        .get_roadmap(step.roadmap_id)
        .await?
        .is_some_and(|r| r.user_id == user_id);
    Ok(owned.then_some(step))
}

/// Id lookup across the user's roadmaps, then title rules over the
/// current roadmap.
pub async fn find_step(
    store: &dyn Store,
    user_id: &str,
    step_id: Option<&str>,
    step_title: Option<&str>,
) -> Result<Option<(StepRow, MatchRule)>> {
    if let Some(id) = parse_step_id(step_id) {
        if let Some(step) = owned_step(store, user_id, id).await? {
            return Ok(Some((step, MatchRule::Id)));
        }
    }

    let Some(title) = step_title else {
        return Ok(None);
    };
    let Some(roadmap) = current_roadmap(store, user_id).await? else {
        return Ok(None);
    };
    let steps = store.list_steps(roadmap.id).await?;
    Ok(match_by_title(&steps, title).map(|(step, rule)| (step.clone(), rule)))
}

/// Marks the resolved step complete. Completing an already-completed step
/// only refreshes the progress record.
pub async fn complete_step(
    store: &dyn Store,
    user_id: &str,
    step_id: Option<&str>,
    step_title: Option<&str>,
) -> Result<StepUpdate, AppError> {
    let (step, rule) = find_step(store, user_id, step_id, step_title)
        .await?
        .ok_or_else(|| AppError::NotFound("No matching step found".to_string()))?;
    info!(
        "Resolved step {} ({:?}) for user {user_id}: {}",
        step.id, rule, step.title
    );

    let was_completed = step.completed;
    let step = if was_completed {
        step
    } else {
        store
            .update_step_state(step.id, true, 100)
            .await?
            .ok_or_else(|| AppError::NotFound("Step not found".to_string()))?
    };

    let (_, progress, tally) = refresh_progress(store, user_id, step.roadmap_id).await?;
    info!(
        "Progress for roadmap {}: {}/{}",
        step.roadmap_id, tally.completed, tally.total
    );

    if !was_completed {
        notify(
            store,
            user_id,
            step_completed(step.id, &step.title, tally.percentage()),
        )
        .await;
        if tally.all_complete() {
            let career_path = store
                .get_roadmap(step.roadmap_id)
                .await?
                .map(|r| r.career_path)
                .unwrap_or_default();
            notify(store, user_id, roadmap_finished(step.roadmap_id, &career_path)).await;
        }
    }

    Ok(StepUpdate {
        step,
        progress,
        percentage: tally.percentage(),
        roadmap_completed: tally.all_complete(),
    })
}

/// Sets a step's completion flag directly; progress follows the flag.
pub async fn set_step_completion(
    store: &dyn Store,
    user_id: &str,
    step_id: Uuid,
    completed: bool,
) -> Result<StepUpdate, AppError> {
    owned_step(store, user_id, step_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Step not found".to_string()))?;

    let progress_value = if completed { 100 } else { 0 };
    let step = store
        .update_step_state(step_id, completed, progress_value)
        .await?
        .ok_or_else(|| AppError::NotFound("Step not found".to_string()))?;

    let (_, progress, tally) = refresh_progress(store, user_id, step.roadmap_id).await?;
    info!(
        "Step {step_id} set completed={completed}; roadmap {} at {}/{}",
        step.roadmap_id, tally.completed, tally.total
    );

    Ok(StepUpdate {
        step,
        progress,
        percentage: tally.percentage(),
        roadmap_completed: tally.all_complete(),
    })
}

#[derive(Debug, Clone)]
pub struct TaskCompletionInput {
    pub day: String,
    pub task_index: u32,
    pub focus_area: String,
    pub completed_tasks: u32,
    pub total_tasks: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub percentage: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub progress: TaskProgress,
    pub step: Option<StepRow>,
    pub notification: Option<NotificationRow>,
}

/// Applies study-plan task progress to the step matching the focus area.
/// A completed step is left alone; no match only records the notification.
pub async fn record_task_completion(
    store: &dyn Store,
    user_id: &str,
    input: TaskCompletionInput,
) -> Result<TaskCompletion, AppError> {
    if input.total_tasks == 0 {
        return Err(AppError::Validation(
            "totalTasksCount must be greater than 0".to_string(),
        ));
    }
    if input.completed_tasks > input.total_tasks {
        return Err(AppError::Validation(
            "completedTasksCount cannot exceed totalTasksCount".to_string(),
        ));
    }

    let mut updated = None;
    if let Some(roadmap) = current_roadmap(store, user_id).await? {
        let steps = store.list_steps(roadmap.id).await?;
        match match_focus_area(&steps, &input.focus_area) {
            Some(step) if !step.completed => {
                let value = task_progress(input.completed_tasks, input.total_tasks);
                updated = store.update_step_state(step.id, false, value).await?;
                refresh_progress(store, user_id, roadmap.id).await?;
                info!("Step \"{}\" task progress {value}%", step.title);
            }
            Some(step) => {
                updated = Some(step.clone());
            }
            None => {
                info!(
                    "No step matches focus area \"{}\" for user {user_id}",
                    input.focus_area
                );
            }
        }
    }

    let notification = notify(
        store,
        user_id,
        task_completed(
            &input.day,
            input.task_index,
            &input.focus_area,
            input.completed_tasks,
            input.total_tasks,
        ),
    )
    .await;

    Ok(TaskCompletion {
        progress: TaskProgress {
            completed_tasks: input.completed_tasks,
            total_tasks: input.total_tasks,
            percentage: percentage(input.completed_tasks, input.total_tasks),
        },
        step: updated,
        notification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roadmap::{RoadmapDraft, StepDraft, WeeklySchedule};
    use crate::progress::resolution::fixtures;
    use crate::roadmap::history::save_initial;
    use crate::store::MemoryStore;

    fn draft(titles: &[&str]) -> RoadmapDraft {
        RoadmapDraft {
            career_path: "Backend Developer".to_string(),
            overview: String::new(),
            estimated_timeframe: "3 Months".to_string(),
            steps: titles
                .iter()
                .map(|t| StepDraft {
                    id: String::new(),
                    title: t.to_string(),
                    description: String::new(),
                    duration: String::new(),
                    resources: vec![],
                    skills: vec![],
                    milestones: vec![],
                    completed: false,
                    progress: 0,
                })
                .collect(),
            weekly_schedule: WeeklySchedule::default(),
        }
    }

    async fn seeded(titles: &[&str]) -> (MemoryStore, Vec<StepRow>) {
        let store = MemoryStore::new();
        store.upsert_user("u1", None, None).await.unwrap();
        let view = save_initial(&store, "u1", &draft(titles)).await.unwrap();
        (store, view.steps.unwrap())
    }

    fn task(focus: &str, done: u32, total: u32) -> TaskCompletionInput {
        TaskCompletionInput {
            day: "monday".to_string(),
            task_index: 0,
            focus_area: focus.to_string(),
            completed_tasks: done,
            total_tasks: total,
        }
    }

    #[test]
    fn test_tally_and_percentage() {
        let mut steps = fixtures::steps(&["a", "b", "c"]);
        steps[0].completed = true;
        let tally = Tally::of(&steps);
        assert_eq!(tally, Tally { total: 3, completed: 1 });
        assert_eq!(tally.percentage(), 33);
        assert!(!tally.all_complete());
        assert_eq!(Tally::of(&[]).percentage(), 0);
        assert!(!Tally::of(&[]).all_complete());
    }

    #[test]
    fn test_task_progress_is_capped() {
        assert_eq!(task_progress(1, 3), 33);
        assert_eq!(task_progress(2, 3), 67);
        assert_eq!(task_progress(5, 5), TASK_PROGRESS_CAP);
        assert_eq!(task_progress(1, 0), 0);
    }

    #[tokio::test]
    async fn test_complete_step_by_id_updates_progress_and_notifies() {
        let (store, steps) = seeded(&["Git", "SQL"]).await;
        let id = steps[0].id.to_string();
        let update = complete_step(&store, "u1", Some(&id), None).await.unwrap();

        assert!(update.step.completed);
        assert_eq!(update.step.progress, 100);
        assert_eq!(update.progress.completed_steps, 1);
        assert_eq!(update.progress.total_steps, 2);
        assert_eq!(update.percentage, 50);
        assert!(!update.roadmap_completed);

        let notifications = store.list_notifications("u1").await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "step_completion");
        let metadata = notifications[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["progressPercentage"], 50);
        assert_eq!(metadata["stepTitle"], "Git");
    }

    #[tokio::test]
    async fn test_step_id_beats_matching_title() {
        let (store, steps) = seeded(&["HTML Basics", "CSS Layout"]).await;
        let id = steps[1].id.to_string();

        let (found, rule) = find_step(&store, "u1", Some(&id), Some("HTML Basics"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, steps[1].id);
        assert_eq!(rule, MatchRule::Id);

        let update = complete_step(&store, "u1", Some(&id), Some("HTML Basics"))
            .await
            .unwrap();
        assert_eq!(update.step.id, steps[1].id);
        assert!(update.step.completed);
        let html = store.get_step(steps[0].id).await.unwrap().unwrap();
        assert!(!html.completed);
    }

    #[tokio::test]
    async fn test_template_step_id_falls_through_to_title() {
        let (store, steps) = seeded(&["HTML Basics", "CSS Layout"]).await;
        let (found, rule) = find_step(&store, "u1", Some("step-2"), Some("css layout"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, steps[1].id);
        assert_eq!(rule, MatchRule::ExactTitle);
    }

    #[tokio::test]
    async fn test_unknown_step_id_without_title_is_none() {
        let (store, _) = seeded(&["Git"]).await;
        let id = Uuid::new_v4().to_string();
        let found = find_step(&store, "u1", Some(&id), None).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_complete_step_is_idempotent() {
        let (store, steps) = seeded(&["Git", "SQL"]).await;
        let id = steps[1].id.to_string();
        complete_step(&store, "u1", Some(&id), None).await.unwrap();
        let again = complete_step(&store, "u1", Some(&id), None).await.unwrap();

        assert_eq!(again.progress.completed_steps, 1);
        assert_eq!(store.list_notifications("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_complete_last_step_reports_roadmap_completed() {
        let (store, _) = seeded(&["Git", "SQL"]).await;
        complete_step(&store, "u1", None, Some("git")).await.unwrap();
        let last = complete_step(&store, "u1", Some("step-2"), Some("SQL"))
            .await
            .unwrap();

        assert!(last.roadmap_completed);
        assert_eq!(last.percentage, 100);
        let kinds: Vec<String> = store
            .list_notifications("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(kinds, vec!["milestone", "step_completion", "step_completion"]);
    }

    #[tokio::test]
    async fn test_complete_step_unknown_is_not_found() {
        let (store, _) = seeded(&["Git"]).await;
        let err = complete_step(&store, "u1", None, Some("Kubernetes"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_complete_step_ignores_other_users_step_id() {
        let (store, steps) = seeded(&["Git"]).await;
        store.upsert_user("u2", None, None).await.unwrap();
        let id = steps[0].id.to_string();
        let err = complete_step(&store, "u2", Some(&id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_off_resets_progress() {
        let (store, steps) = seeded(&["Git", "SQL"]).await;
        set_step_completion(&store, "u1", steps[0].id, true)
            .await
            .unwrap();
        let update = set_step_completion(&store, "u1", steps[0].id, false)
            .await
            .unwrap();

        assert!(!update.step.completed);
        assert_eq!(update.step.progress, 0);
        assert_eq!(update.progress.completed_steps, 0);
        assert!(store.list_notifications("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_completion_never_completes_step() {
        let (store, steps) = seeded(&["Node.js & Express Backend", "Databases"]).await;
        let result = record_task_completion(&store, "u1", task("express", 4, 4))
            .await
            .unwrap();

        let step = result.step.unwrap();
        assert_eq!(step.id, steps[0].id);
        assert!(!step.completed);
        assert_eq!(step.progress, TASK_PROGRESS_CAP);
        assert_eq!(result.progress.percentage, 100);

        let progress = store
            .get_progress("u1", steps[0].roadmap_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(progress.completed_steps, 0);
        assert_eq!(result.notification.unwrap().kind, "task_completion");
    }

    #[tokio::test]
    async fn test_task_completion_leaves_completed_step() {
        let (store, steps) = seeded(&["Databases"]).await;
        set_step_completion(&store, "u1", steps[0].id, true)
            .await
            .unwrap();
        let result = record_task_completion(&store, "u1", task("databases", 1, 4))
            .await
            .unwrap();
        let step = result.step.unwrap();
        assert!(step.completed);
        assert_eq!(step.progress, 100);
    }

    #[tokio::test]
    async fn test_task_completion_without_match_still_notifies() {
        let (store, _) = seeded(&["Git"]).await;
        let result = record_task_completion(&store, "u1", task("Kubernetes", 1, 2))
            .await
            .unwrap();
        assert!(result.step.is_none());
        assert!(result.notification.is_some());
    }

    #[tokio::test]
    async fn test_task_completion_validates_counts() {
        let (store, _) = seeded(&["Git"]).await;
        let zero = record_task_completion(&store, "u1", task("Git", 0, 0)).await;
        assert!(matches!(zero, Err(AppError::Validation(_))));
        let over = record_task_completion(&store, "u1", task("Git", 5, 4)).await;
        assert!(matches!(over, Err(AppError::Validation(_))));
    }
}
