use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::study_plan::StudyPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Course,
    Book,
    Tutorial,
    Project,
    Documentation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Resource {
    pub fn new(title: &str, kind: ResourceKind, description: &str) -> Self {
        Self {
            title: title.to_string(),
            kind,
            url: None,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRow {
    pub id: Uuid,
    pub user_id: String,
    pub career_path: String,
    pub overview: String,
    pub estimated_timeframe: String,
    pub weekly_schedule: Json<WeeklySchedule>,
    #[serde(rename = "order")]
    pub roadmap_order: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RoadmapRow {
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StepRow {
    pub id: Uuid,
    pub roadmap_id: Uuid,
    pub position: i32,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub skills: Json<Vec<String>>,
    pub resources: Json<Vec<Resource>>,
    pub milestones: Json<Vec<String>>,
    pub completed: bool,
    pub progress: i32,
}

/// Denormalized completed/total counts for one roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRow {
    pub id: Uuid,
    pub user_id: String,
    pub roadmap_id: Uuid,
    pub total_steps: i32,
    pub completed_steps: i32,
    pub feedback: Option<String>,
    pub study_plan: Option<Json<StudyPlan>>,
    pub updated_at: DateTime<Utc>,
}

/// A roadmap as returned to clients, optionally with its steps.
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapView {
    #[serde(flatten)]
    pub roadmap: RoadmapRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepRow>>,
}

/// A roadmap that has been generated (LLM or template) but not stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapDraft {
    pub career_path: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub estimated_timeframe: String,
    pub steps: Vec<StepDraft>,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
}

impl RoadmapDraft {
    /// Clears any completion state so the draft starts fresh.
    pub fn reset_progress(mut self) -> Self {
        for step in &mut self.steps {
            step.completed = false;
            step.progress = 0;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDraft {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub progress: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_resource_kind_maps_to_other() {
        let resource: Resource = serde_json::from_value(serde_json::json!({
            "title": "Intro video",
            "type": "video",
            "description": "Watch it"
        }))
        .unwrap();
        assert_eq!(resource.kind, ResourceKind::Other);
        assert!(resource.url.is_none());
    }

    #[test]
    fn test_step_draft_tolerates_missing_lists() {
        let step: StepDraft = serde_json::from_value(serde_json::json!({
            "id": "step-1",
            "title": "Foundations"
        }))
        .unwrap();
        assert!(step.skills.is_empty());
        assert!(!step.completed);
    }

    #[test]
    fn test_roadmap_row_serializes_order_and_camel_case() {
        let row = RoadmapRow {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            career_path: "Web".to_string(),
            overview: String::new(),
            estimated_timeframe: "3 Months".to_string(),
            weekly_schedule: Json(WeeklySchedule::default()),
            roadmap_order: 2,
            completed_at: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(RoadmapView {
            roadmap: row,
            steps: None,
        })
        .unwrap();
        assert_eq!(value["order"], 2);
        assert_eq!(value["careerPath"], "Web");
        assert!(value["completedAt"].is_null());
        assert!(value.get("steps").is_none());
        assert!(value["weeklySchedule"]["monday"].is_string());
    }

    #[test]
    fn test_reset_progress_clears_steps() {
        let draft = RoadmapDraft {
            career_path: "x".to_string(),
            overview: String::new(),
            estimated_timeframe: String::new(),
            steps: vec![StepDraft {
                id: "step-1".to_string(),
                title: "a".to_string(),
                description: String::new(),
                duration: String::new(),
                resources: vec![],
                skills: vec![],
                milestones: vec![],
                completed: true,
                progress: 100,
            }],
            weekly_schedule: WeeklySchedule::default(),
        }
        .reset_progress();
        assert!(!draft.steps[0].completed);
        assert_eq!(draft.steps[0].progress, 0);
    }
}
