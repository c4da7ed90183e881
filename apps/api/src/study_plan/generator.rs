use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LanguageModel, LlmError};
use crate::models::study_plan::StudyPlan;
use crate::models::user::Profile;
use crate::study_plan::prompts::STUDY_PLAN_PROMPT_TEMPLATE;
use crate::study_plan::templates::template_study_plan;

/// The step the plan is for, as the client sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Llm,
    Template,
}

pub fn study_plan_prompt(profile: &Profile, step: &CurrentStep, week_start: NaiveDate) -> String {
    let week_end = week_start + Duration::days(6);
    STUDY_PLAN_PROMPT_TEMPLATE
        .replace("{step_title}", &step.title)
        .replace("{step_description}", &step.description)
        .replace("{skills}", &step.skills.join(", "))
        .replace("{skill_level}", profile.skill_level())
        .replace("{learning_style}", profile.learning_style())
        .replace("{study_time}", profile.study_time())
        .replace("{week_start}", &week_start.format("%Y-%m-%d").to_string())
        .replace("{week_end}", &week_end.format("%Y-%m-%d").to_string())
}

async fn plan_from_model(
    llm: &dyn LanguageModel,
    profile: &Profile,
    step: &CurrentStep,
    week_start: NaiveDate,
) -> Result<StudyPlan, LlmError> {
    let prompt = study_plan_prompt(profile, step, week_start);
    let plan: StudyPlan = call_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;
    if plan.daily_plans.total_tasks() == 0 {
        return Err(LlmError::EmptyContent);
    }
    Ok(plan)
}

/// Weekly plan for `step` starting on `week_start`.
pub async fn generate_study_plan(
    llm: &dyn LanguageModel,
    profile: &Profile,
    step: &CurrentStep,
    week_start: NaiveDate,
) -> (StudyPlan, PlanSource) {
    match plan_from_model(llm, profile, step, week_start).await {
        Ok(plan) => {
            info!(
                "Generated study plan for \"{}\" with {} tasks",
                step.title,
                plan.daily_plans.total_tasks()
            );
            (plan, PlanSource::Llm)
        }
        Err(e) => {
            warn!("Study plan generation failed, using template: {e}");
            (
                template_study_plan(profile, step, week_start),
                PlanSource::Template,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ScriptedModel;
    use crate::models::study_plan::TaskKind;

    fn step() -> CurrentStep {
        CurrentStep {
            title: "React Essentials".to_string(),
            description: "Components and hooks".to_string(),
            skills: vec!["React".to_string(), "Hooks".to_string()],
            milestones: vec![],
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    #[tokio::test]
    async fn test_model_plan_is_used() {
        let reply = r#"{
            "weekStart": "2026-05-04", "weekEnd": "2026-05-10", "focusArea": "React",
            "dailyPlans": {"monday": [{"time": "7:00 PM", "task": "Read the docs", "duration": "1h", "type": "learning"}]},
            "weeklyGoals": ["Build a counter"], "tips": []
        }"#;
        let llm = ScriptedModel::new(vec![Some(reply)]);
        let (plan, source) = generate_study_plan(&llm, &Profile::default(), &step(), monday()).await;
        assert_eq!(source, PlanSource::Llm);
        assert_eq!(plan.daily_plans.monday[0].kind, TaskKind::Learning);
        assert!(plan.daily_plans.sunday.is_empty());
    }

    #[tokio::test]
    async fn test_empty_plan_falls_back_to_template() {
        let reply = r#"{"weekStart": "x", "weekEnd": "y", "focusArea": "z", "dailyPlans": {}}"#;
        let llm = ScriptedModel::new(vec![Some(reply)]);
        let (plan, source) = generate_study_plan(&llm, &Profile::default(), &step(), monday()).await;
        assert_eq!(source, PlanSource::Template);
        assert_eq!(plan.focus_area, "React Essentials");
        assert_eq!(plan.week_start, "2026-05-04");
    }

    #[test]
    fn test_prompt_includes_skills_and_week() {
        let prompt = study_plan_prompt(&Profile::default(), &step(), monday());
        assert!(prompt.contains("Skills to Learn: React, Hooks"));
        assert!(prompt.contains("from 2026-05-04 to 2026-05-10"));
        assert!(prompt.contains("Learning Style: visual"));
    }
}
