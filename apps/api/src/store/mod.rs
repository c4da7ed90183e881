//! Persistence seam. Two interchangeable backends implement `Store`:
//! `PgStore` (PostgreSQL via sqlx) and `MemoryStore` (in-process documents).
//!
//! Writes are issued one statement at a time; nothing here spans a
//! transaction, so concurrent writers to one roadmap are last-write-wins.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::chat::{ChatMessageRow, ChatRole};
use crate::models::notification::{NewNotification, NotificationRow};
use crate::models::roadmap::{ProgressRow, RoadmapDraft, RoadmapRow, RoadmapView, StepRow};
use crate::models::study_plan::StudyPlan;
use crate::models::user::{Profile, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> &'static str;

    // Users

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates the user, or merges the provided (non-None) fields into it.
    async fn upsert_user(&self, id: &str, email: Option<&str>, name: Option<&str>)
        -> Result<User>;

    async fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()>;

    // Roadmaps and steps

    /// Inserts a roadmap and its steps in draft order. Draft step ids are discarded.
    async fn insert_roadmap(
        &self,
        user_id: &str,
        draft: &RoadmapDraft,
        order: i32,
    ) -> Result<RoadmapView>;

    /// All of a user's roadmaps, ordered by `roadmap_order` ascending.
    async fn list_roadmaps(&self, user_id: &str) -> Result<Vec<RoadmapRow>>;

    async fn get_roadmap(&self, roadmap_id: Uuid) -> Result<Option<RoadmapRow>>;

    /// Deletes a roadmap together with its steps and progress record.
    async fn delete_roadmap(&self, roadmap_id: Uuid) -> Result<()>;

    async fn set_roadmap_completed(&self, roadmap_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// Steps of one roadmap ordered by position.
    async fn list_steps(&self, roadmap_id: Uuid) -> Result<Vec<StepRow>>;

    async fn get_step(&self, step_id: Uuid) -> Result<Option<StepRow>>;

    async fn update_step_state(
        &self,
        step_id: Uuid,
        completed: bool,
        progress: i32,
    ) -> Result<Option<StepRow>>;

    // Progress

    async fn get_progress(&self, user_id: &str, roadmap_id: Uuid) -> Result<Option<ProgressRow>>;

    async fn upsert_progress(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        total_steps: i32,
        completed_steps: i32,
    ) -> Result<ProgressRow>;

    async fn save_feedback(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        feedback: &str,
    ) -> Result<ProgressRow>;

    async fn save_study_plan(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        plan: &StudyPlan,
    ) -> Result<ProgressRow>;

    // Notifications

    async fn insert_notification(
        &self,
        user_id: &str,
        notification: &NewNotification,
    ) -> Result<NotificationRow>;

    /// Newest first.
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<NotificationRow>>;

    async fn get_notification(&self, id: Uuid) -> Result<Option<NotificationRow>>;

    async fn set_notification_read(&self, id: Uuid, read: bool) -> Result<Option<NotificationRow>>;

    /// Returns how many notifications flipped from unread to read.
    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64>;

    async fn delete_notification(&self, id: Uuid) -> Result<()>;

    // Chat

    async fn append_chat_message(
        &self,
        user_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessageRow>;

    /// The last `limit` messages, oldest first.
    async fn recent_chat_messages(&self, user_id: &str, limit: i64)
        -> Result<Vec<ChatMessageRow>>;

    /// Full history, oldest first.
    async fn list_chat_messages(&self, user_id: &str) -> Result<Vec<ChatMessageRow>>;
}
