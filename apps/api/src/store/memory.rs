//! In-process document store. Each collection sits behind its own
//! `tokio::sync::RwLock`, the same shape a document database gives the
//! handlers: independent reads and writes with no cross-collection atomicity.

use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::chat::{ChatMessageRow, ChatRole};
use crate::models::notification::{NewNotification, NotificationRow};
use crate::models::roadmap::{ProgressRow, RoadmapDraft, RoadmapRow, RoadmapView, StepRow};
use crate::models::study_plan::StudyPlan;
use crate::models::user::{Profile, User};
use crate::store::Store;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    roadmaps: RwLock<HashMap<Uuid, RoadmapRow>>,
    steps: RwLock<HashMap<Uuid, StepRow>>,
    progress: RwLock<HashMap<(String, Uuid), ProgressRow>>,
    // insertion order doubles as creation order
    notifications: RwLock<Vec<NotificationRow>>,
    chat_messages: RwLock<Vec<ChatMessageRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn progress_entry<F>(&self, user_id: &str, roadmap_id: Uuid, apply: F) -> ProgressRow
    where
        F: FnOnce(&mut ProgressRow),
    {
        // a row created here starts from the roadmap's actual step counts
        let (total_steps, completed_steps) = {
            let steps = self.steps.read().await;
            steps
                .values()
                .filter(|s| s.roadmap_id == roadmap_id)
                .fold((0, 0), |(total, done), s| (total + 1, done + i32::from(s.completed)))
        };

        let mut progress = self.progress.write().await;
        let row = progress
            .entry((user_id.to_string(), roadmap_id))
            .or_insert_with(|| ProgressRow {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                roadmap_id,
                total_steps,
                completed_steps,
                feedback: None,
                study_plan: None,
                updated_at: Utc::now(),
            });
        apply(row);
        row.updated_at = Utc::now();
        row.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| {
                u.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .min_by_key(|u| u.created_at)
            .cloned())
    }

    async fn upsert_user(
        &self,
        id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        let now = Utc::now();
        let user = users.entry(id.to_string()).or_insert_with(|| User {
            id: id.to_string(),
            email: None,
            name: None,
            profile: None,
            created_at: now,
            updated_at: now,
        });
        if let Some(email) = email {
            user.email = Some(email.to_string());
        }
        if let Some(name) = name {
            user.name = Some(name.to_string());
        }
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(user_id) else {
            bail!("user {user_id} does not exist");
        };
        user.profile = Some(Json(profile.clone()));
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_roadmap(
        &self,
        user_id: &str,
        draft: &RoadmapDraft,
        order: i32,
    ) -> Result<RoadmapView> {
        if !self.users.read().await.contains_key(user_id) {
            bail!("user {user_id} does not exist");
        }

        let roadmap = RoadmapRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            career_path: draft.career_path.clone(),
            overview: draft.overview.clone(),
            estimated_timeframe: draft.estimated_timeframe.clone(),
            weekly_schedule: Json(draft.weekly_schedule.clone()),
            roadmap_order: order,
            completed_at: None,
            created_at: Utc::now(),
        };
        self.roadmaps
            .write()
            .await
            .insert(roadmap.id, roadmap.clone());

        let steps: Vec<StepRow> = draft
            .steps
            .iter()
            .enumerate()
            .map(|(position, step)| StepRow {
                id: Uuid::new_v4(),
                roadmap_id: roadmap.id,
                position: position as i32,
                title: step.title.clone(),
                description: step.description.clone(),
                duration: step.duration.clone(),
                skills: Json(step.skills.clone()),
                resources: Json(step.resources.clone()),
                milestones: Json(step.milestones.clone()),
                completed: false,
                progress: 0,
            })
            .collect();
        {
            let mut stored = self.steps.write().await;
            for step in &steps {
                stored.insert(step.id, step.clone());
            }
        }

        Ok(RoadmapView {
            roadmap,
            steps: Some(steps),
        })
    }

    async fn list_roadmaps(&self, user_id: &str) -> Result<Vec<RoadmapRow>> {
        let mut roadmaps: Vec<RoadmapRow> = self
            .roadmaps
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        roadmaps.sort_by_key(|r| (r.roadmap_order, r.created_at));
        Ok(roadmaps)
    }

    async fn get_roadmap(&self, roadmap_id: Uuid) -> Result<Option<RoadmapRow>> {
        Ok(self.roadmaps.read().await.get(&roadmap_id).cloned())
    }

    async fn delete_roadmap(&self, roadmap_id: Uuid) -> Result<()> {
        self.roadmaps.write().await.remove(&roadmap_id);
        self.steps
            .write()
            .await
            .retain(|_, s| s.roadmap_id != roadmap_id);
        self.progress
            .write()
            .await
            .retain(|(_, id), _| *id != roadmap_id);
        Ok(())
    }

    async fn set_roadmap_completed(&self, roadmap_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        if let Some(roadmap) = self.roadmaps.write().await.get_mut(&roadmap_id) {
            roadmap.completed_at = Some(at);
        }
        Ok(())
    }

    async fn list_steps(&self, roadmap_id: Uuid) -> Result<Vec<StepRow>> {
        let mut steps: Vec<StepRow> = self
            .steps
            .read()
            .await
            .values()
            .filter(|s| s.roadmap_id == roadmap_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.position);
        Ok(steps)
    }

    async fn get_step(&self, step_id: Uuid) -> Result<Option<StepRow>> {
        Ok(self.steps.read().await.get(&step_id).cloned())
    }

    async fn update_step_state(
        &self,
        step_id: Uuid,
        completed: bool,
        progress: i32,
    ) -> Result<Option<StepRow>> {
        let mut steps = self.steps.write().await;
        Ok(steps.get_mut(&step_id).map(|step| {
            step.completed = completed;
            step.progress = progress;
            step.clone()
        }))
    }

    async fn get_progress(&self, user_id: &str, roadmap_id: Uuid) -> Result<Option<ProgressRow>> {
        Ok(self
            .progress
            .read()
            .await
            .get(&(user_id.to_string(), roadmap_id))
            .cloned())
    }

    async fn upsert_progress(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        total_steps: i32,
        completed_steps: i32,
    ) -> Result<ProgressRow> {
        Ok(self
            .progress_entry(user_id, roadmap_id, |row| {
                row.total_steps = total_steps;
                row.completed_steps = completed_steps;
            })
            .await)
    }

    async fn save_feedback(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        feedback: &str,
    ) -> Result<ProgressRow> {
        Ok(self
            .progress_entry(user_id, roadmap_id, |row| {
                row.feedback = Some(feedback.to_string());
            })
            .await)
    }

    async fn save_study_plan(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        plan: &StudyPlan,
    ) -> Result<ProgressRow> {
        Ok(self
            .progress_entry(user_id, roadmap_id, |row| {
                row.study_plan = Some(Json(plan.clone()));
            })
            .await)
    }

    async fn insert_notification(
        &self,
        user_id: &str,
        notification: &NewNotification,
    ) -> Result<NotificationRow> {
        let now = Utc::now();
        let row = NotificationRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind: notification.kind.clone(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            metadata: notification.metadata.clone(),
            read: false,
            created_at: now,
            updated_at: now,
        };
        self.notifications.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<NotificationRow>> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_notification(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn set_notification_read(&self, id: Uuid, read: bool) -> Result<Option<NotificationRow>> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.iter_mut().find(|n| n.id == id).map(|n| {
            n.read = read;
            n.updated_at = Utc::now();
            n.clone()
        }))
    }

    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64> {
        let mut notifications = self.notifications.write().await;
        let now = Utc::now();
        let mut flipped = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            n.read = true;
            n.updated_at = now;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn delete_notification(&self, id: Uuid) -> Result<()> {
        self.notifications.write().await.retain(|n| n.id != id);
        Ok(())
    }

    async fn append_chat_message(
        &self,
        user_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessageRow> {
        let row = ChatMessageRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            role: role.as_str().to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.chat_messages.write().await.push(row.clone());
        Ok(row)
    }

    async fn recent_chat_messages(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessageRow>> {
        let messages = self.list_chat_messages(user_id).await?;
        let keep = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let skip = messages.len().saturating_sub(keep);
        Ok(messages.into_iter().skip(skip).collect())
    }

    async fn list_chat_messages(&self, user_id: &str) -> Result<Vec<ChatMessageRow>> {
        Ok(self
            .chat_messages
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }
}
