use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::chat::{ChatMessageRow, ChatRole};
use crate::models::notification::{NewNotification, NotificationRow};
use crate::models::roadmap::{ProgressRow, RoadmapDraft, RoadmapRow, RoadmapView, StepRow};
use crate::models::study_plan::StudyPlan;
use crate::models::user::{Profile, User};
use crate::store::Store;

/// PostgreSQL backend.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE lower(email) = lower($1) ORDER BY created_at LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_user(
        &self,
        id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET email = COALESCE(EXCLUDED.email, users.email),
                name = COALESCE(EXCLUDED.name, users.name),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET profile = $2, updated_at = now() WHERE id = $1")
                .bind(user_id)
                .bind(Json(profile))
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            bail!("user {user_id} does not exist");
        }
        Ok(())
    }

    async fn insert_roadmap(
        &self,
        user_id: &str,
        draft: &RoadmapDraft,
        order: i32,
    ) -> Result<RoadmapView> {
        let roadmap = sqlx::query_as::<_, RoadmapRow>(
            r#"
            INSERT INTO roadmaps
                (id, user_id, career_path, overview, estimated_timeframe, weekly_schedule, roadmap_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&draft.career_path)
        .bind(&draft.overview)
        .bind(&draft.estimated_timeframe)
        .bind(Json(&draft.weekly_schedule))
        .bind(order)
        .fetch_one(&self.pool)
        .await?;

        let mut steps = Vec::with_capacity(draft.steps.len());
        for (position, step) in draft.steps.iter().enumerate() {
            let row = sqlx::query_as::<_, StepRow>(
                r#"
                INSERT INTO steps
                    (id, roadmap_id, position, title, description, duration,
                     skills, resources, milestones, completed, progress)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, 0)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(roadmap.id)
            .bind(position as i32)
            .bind(&step.title)
            .bind(&step.description)
            .bind(&step.duration)
            .bind(Json(&step.skills))
            .bind(Json(&step.resources))
            .bind(Json(&step.milestones))
            .fetch_one(&self.pool)
            .await?;
            steps.push(row);
        }

        info!(
            "Inserted roadmap {} (order {}) with {} steps for user {}",
            roadmap.id,
            order,
            steps.len(),
            user_id
        );

        Ok(RoadmapView {
            roadmap,
            steps: Some(steps),
        })
    }

    async fn list_roadmaps(&self, user_id: &str) -> Result<Vec<RoadmapRow>> {
        Ok(sqlx::query_as::<_, RoadmapRow>(
            "SELECT * FROM roadmaps WHERE user_id = $1 ORDER BY roadmap_order ASC, created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_roadmap(&self, roadmap_id: Uuid) -> Result<Option<RoadmapRow>> {
        Ok(
            sqlx::query_as::<_, RoadmapRow>("SELECT * FROM roadmaps WHERE id = $1")
                .bind(roadmap_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn delete_roadmap(&self, roadmap_id: Uuid) -> Result<()> {
        // steps and progress rows go with it (ON DELETE CASCADE)
        sqlx::query("DELETE FROM roadmaps WHERE id = $1")
            .bind(roadmap_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_roadmap_completed(&self, roadmap_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE roadmaps SET completed_at = $2 WHERE id = $1")
            .bind(roadmap_id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_steps(&self, roadmap_id: Uuid) -> Result<Vec<StepRow>> {
        Ok(sqlx::query_as::<_, StepRow>(
            "SELECT * FROM steps WHERE roadmap_id = $1 ORDER BY position ASC",
        )
        .bind(roadmap_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_step(&self, step_id: Uuid) -> Result<Option<StepRow>> {
        Ok(sqlx::query_as::<_, StepRow>("SELECT * FROM steps WHERE id = $1")
            .bind(step_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_step_state(
        &self,
        step_id: Uuid,
        completed: bool,
        progress: i32,
    ) -> Result<Option<StepRow>> {
        Ok(sqlx::query_as::<_, StepRow>(
            "UPDATE steps SET completed = $2, progress = $3 WHERE id = $1 RETURNING *",
        )
        .bind(step_id)
        .bind(completed)
        .bind(progress)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_progress(&self, user_id: &str, roadmap_id: Uuid) -> Result<Option<ProgressRow>> {
        Ok(sqlx::query_as::<_, ProgressRow>(
            "SELECT * FROM progress WHERE user_id = $1 AND roadmap_id = $2",
        )
        .bind(user_id)
        .bind(roadmap_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_progress(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        total_steps: i32,
        completed_steps: i32,
    ) -> Result<ProgressRow> {
        Ok(sqlx::query_as::<_, ProgressRow>(
            r#"
            INSERT INTO progress (id, user_id, roadmap_id, total_steps, completed_steps)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, roadmap_id) DO UPDATE
            SET total_steps = EXCLUDED.total_steps,
                completed_steps = EXCLUDED.completed_steps,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(roadmap_id)
        .bind(total_steps)
        .bind(completed_steps)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn save_feedback(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        feedback: &str,
    ) -> Result<ProgressRow> {
        Ok(sqlx::query_as::<_, ProgressRow>(
            r#"
            INSERT INTO progress (id, user_id, roadmap_id, total_steps, completed_steps, feedback)
            SELECT $1, $2, $3, COUNT(*)::int, (COUNT(*) FILTER (WHERE completed))::int, $4
            FROM steps WHERE roadmap_id = $3
            ON CONFLICT (user_id, roadmap_id) DO UPDATE
            SET feedback = EXCLUDED.feedback, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(roadmap_id)
        .bind(feedback)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn save_study_plan(
        &self,
        user_id: &str,
        roadmap_id: Uuid,
        plan: &StudyPlan,
    ) -> Result<ProgressRow> {
        Ok(sqlx::query_as::<_, ProgressRow>(
            r#"
            INSERT INTO progress (id, user_id, roadmap_id, total_steps, completed_steps, study_plan)
            SELECT $1, $2, $3, COUNT(*)::int, (COUNT(*) FILTER (WHERE completed))::int, $4
            FROM steps WHERE roadmap_id = $3
            ON CONFLICT (user_id, roadmap_id) DO UPDATE
            SET study_plan = EXCLUDED.study_plan, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(roadmap_id)
        .bind(Json(plan))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_notification(
        &self,
        user_id: &str,
        notification: &NewNotification,
    ) -> Result<NotificationRow> {
        Ok(sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.metadata)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<NotificationRow>> {
        Ok(sqlx::query_as::<_, NotificationRow>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_notification(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        Ok(
            sqlx::query_as::<_, NotificationRow>("SELECT * FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn set_notification_read(&self, id: Uuid, read: bool) -> Result<Option<NotificationRow>> {
        Ok(sqlx::query_as::<_, NotificationRow>(
            "UPDATE notifications SET read = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = true, updated_at = now() WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_notification(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn append_chat_message(
        &self,
        user_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessageRow> {
        Ok(sqlx::query_as::<_, ChatMessageRow>(
            r#"
            INSERT INTO chat_messages (id, user_id, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn recent_chat_messages(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessageRow>> {
        Ok(sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT * FROM (
                SELECT * FROM chat_messages
                WHERE user_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_chat_messages(&self, user_id: &str) -> Result<Vec<ChatMessageRow>> {
        Ok(sqlx::query_as::<_, ChatMessageRow>(
            "SELECT * FROM chat_messages WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
