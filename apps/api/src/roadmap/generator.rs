//! Roadmap drafting: ask the model first, fall back to a template.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, REAL_RESOURCES_INSTRUCTION};
use crate::llm_client::{call_json, LanguageModel, LlmError};
use crate::models::roadmap::RoadmapDraft;
use crate::models::user::Profile;
use crate::roadmap::prompts::{
    NEXT_ROADMAP_PROMPT_TEMPLATE, ROADMAP_JSON_SCHEMA, ROADMAP_PROMPT_TEMPLATE,
};
use crate::roadmap::templates::{next_level, template_roadmap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSource {
    Llm,
    Template,
}

#[derive(Debug, Clone)]
pub struct GeneratedRoadmap {
    pub draft: RoadmapDraft,
    pub source: DraftSource,
}

/// The finished roadmap as the client describes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRoadmap {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub career_path: String,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub steps: Vec<CompletedStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletedStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CompletedRoadmap {
    /// Stored id, if the client sent one that parses.
    pub fn stored_id(&self) -> Option<Uuid> {
        self.id.as_deref().and_then(|id| Uuid::parse_str(id.trim()).ok())
    }

    pub fn topics(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.title.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn skills(&self) -> String {
        self.steps
            .iter()
            .flat_map(|s| s.skills.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rejects drafts the rest of the service cannot work with.
fn usable(draft: RoadmapDraft) -> Result<RoadmapDraft, LlmError> {
    if draft.steps.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(draft.reset_progress())
}

async fn draft_from_model(llm: &dyn LanguageModel, prompt: &str) -> Result<RoadmapDraft, LlmError> {
    let prompt = format!("{prompt}\n\n{REAL_RESOURCES_INSTRUCTION}");
    let draft: RoadmapDraft = call_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;
    usable(draft)
}

pub fn initial_prompt(profile: &Profile) -> String {
    ROADMAP_PROMPT_TEMPLATE
        .replace("{interests}", profile.interests())
        .replace("{education_level}", profile.education_level())
        .replace("{career_goal}", profile.career_goal())
        .replace("{skill_level}", profile.skill_level())
        .replace("{learning_style}", profile.learning_style())
        .replace("{study_time}", profile.study_time())
        .replace("{schema}", ROADMAP_JSON_SCHEMA)
}

pub fn next_prompt(profile: &Profile, completed: &CompletedRoadmap) -> String {
    NEXT_ROADMAP_PROMPT_TEMPLATE
        .replace("{career_goal}", profile.career_goal())
        .replace("{skill_level}", profile.skill_level())
        .replace("{learning_style}", profile.learning_style())
        .replace("{study_time}", profile.study_time())
        .replace("{completed_path}", &completed.career_path)
        .replace("{completed_topics}", &completed.topics())
        .replace("{completed_skills}", &completed.skills())
        .replace("{schema}", ROADMAP_JSON_SCHEMA)
}

/// First roadmap for a profile.
pub async fn generate_initial(llm: &dyn LanguageModel, profile: &Profile) -> GeneratedRoadmap {
    match draft_from_model(llm, &initial_prompt(profile)).await {
        Ok(draft) => {
            info!(
                "Generated roadmap \"{}\" with {} steps via {}",
                draft.career_path,
                draft.steps.len(),
                llm.name()
            );
            GeneratedRoadmap {
                draft,
                source: DraftSource::Llm,
            }
        }
        Err(e) => {
            warn!("Roadmap generation failed, using template: {e}");
            GeneratedRoadmap {
                draft: template_roadmap(profile, 1),
                source: DraftSource::Template,
            }
        }
    }
}

/// Roadmap that follows `completed`, one level harder.
pub async fn generate_next(
    llm: &dyn LanguageModel,
    profile: &Profile,
    completed: &CompletedRoadmap,
) -> GeneratedRoadmap {
    match draft_from_model(llm, &next_prompt(profile, completed)).await {
        Ok(draft) => {
            info!(
                "Generated next roadmap \"{}\" after \"{}\"",
                draft.career_path, completed.career_path
            );
            GeneratedRoadmap {
                draft,
                source: DraftSource::Llm,
            }
        }
        Err(e) => {
            let level = next_level(completed.order.unwrap_or(1));
            warn!("Next roadmap generation failed, using level {level} template: {e}");
            GeneratedRoadmap {
                draft: template_roadmap(profile, level),
                source: DraftSource::Template,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ScriptedModel;

    const MODEL_ROADMAP: &str = r#"```json
{
  "careerPath": "Frontend Developer",
  "overview": "From zero to React.",
  "estimatedTimeframe": "4 Months",
  "steps": [
    {"id": "step-1", "title": "HTML", "description": "Markup", "duration": "2 Weeks",
     "skills": ["HTML"], "resources": [{"title": "MDN", "type": "documentation", "description": "Docs"}],
     "milestones": ["Build a page"], "completed": true, "progress": 80}
  ],
  "weeklySchedule": {"monday": "Study (1h)"}
}
```"#;

    fn web_profile() -> Profile {
        Profile {
            career_goal: Some("Frontend Developer".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_model_draft_is_used_and_reset() {
        let llm = ScriptedModel::new(vec![Some(MODEL_ROADMAP)]);
        let generated = generate_initial(&llm, &web_profile()).await;

        assert_eq!(generated.source, DraftSource::Llm);
        assert_eq!(generated.draft.career_path, "Frontend Developer");
        assert!(!generated.draft.steps[0].completed);
        assert_eq!(generated.draft.steps[0].progress, 0);
        assert_eq!(generated.draft.weekly_schedule.monday, "Study (1h)");
        assert_eq!(generated.draft.weekly_schedule.tuesday, "");
    }

    #[tokio::test]
    async fn test_model_failure_uses_level_one_template() {
        let llm = ScriptedModel::new(vec![None]);
        let generated = generate_initial(&llm, &web_profile()).await;
        assert_eq!(generated.source, DraftSource::Template);
        assert_eq!(generated.draft.career_path, "Frontend Developer");
        assert_eq!(generated.draft.steps[0].title, "HTML & CSS Foundations");
    }

    #[tokio::test]
    async fn test_zero_step_reply_is_rejected() {
        let llm = ScriptedModel::new(vec![Some(r#"{"careerPath": "X", "steps": []}"#)]);
        let generated = generate_initial(&llm, &web_profile()).await;
        assert_eq!(generated.source, DraftSource::Template);
    }

    #[tokio::test]
    async fn test_next_template_level_follows_completed_order() {
        let llm = ScriptedModel::new(vec![Some("not json")]);
        let completed = CompletedRoadmap {
            career_path: "Frontend Developer - Intermediate".to_string(),
            order: Some(2),
            ..Default::default()
        };
        let generated = generate_next(&llm, &web_profile(), &completed).await;
        assert_eq!(generated.source, DraftSource::Template);
        assert_eq!(generated.draft.career_path, "Frontend Developer - Advanced");
    }

    #[test]
    fn test_next_prompt_lists_completed_topics_and_skills() {
        let completed = CompletedRoadmap {
            id: Some("not-a-uuid".to_string()),
            career_path: "Web Developer".to_string(),
            order: Some(1),
            steps: vec![
                CompletedStep {
                    title: "HTML".to_string(),
                    skills: vec!["HTML5".to_string()],
                },
                CompletedStep {
                    title: "CSS".to_string(),
                    skills: vec!["Flexbox".to_string(), "Grid".to_string()],
                },
            ],
        };
        let prompt = next_prompt(&Profile::default(), &completed);
        assert!(prompt.contains("Topics already mastered: HTML, CSS"));
        assert!(prompt.contains("Skills already learned: HTML5, Flexbox, Grid"));
        assert!(prompt.contains("Career goal: Software Developer"));
        assert!(completed.stored_id().is_none());
    }

    #[test]
    fn test_initial_prompt_fills_every_placeholder() {
        let prompt = initial_prompt(&web_profile());
        assert!(!prompt.contains("{career_goal}"));
        assert!(!prompt.contains("{schema}"));
        assert!(prompt.contains("Available Study Time: 5-10 hours per week"));
    }
}
