use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

pub const DEFAULT_CAREER_GOAL: &str = "Software Developer";
pub const DEFAULT_SKILL_LEVEL: &str = "beginner";
pub const DEFAULT_LEARNING_STYLE: &str = "visual";
pub const DEFAULT_STUDY_TIME: &str = "5-10";

/// A user record. `id` is the uid issued by the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile: Option<Json<Profile>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref().map(|p| &p.0)
    }
}

/// Learning preferences collected by the onboarding form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub career_goal: Option<String>,
    #[serde(default)]
    pub current_skill_level: Option<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub study_time: Option<String>,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

impl Profile {
    pub fn career_goal(&self) -> &str {
        or_default(&self.career_goal, DEFAULT_CAREER_GOAL)
    }

    pub fn skill_level(&self) -> &str {
        or_default(&self.current_skill_level, DEFAULT_SKILL_LEVEL)
    }

    pub fn learning_style(&self) -> &str {
        or_default(&self.learning_style, DEFAULT_LEARNING_STYLE)
    }

    pub fn study_time(&self) -> &str {
        or_default(&self.study_time, DEFAULT_STUDY_TIME)
    }

    pub fn interests(&self) -> &str {
        or_default(&self.interests, "not specified")
    }

    pub fn education_level(&self) -> &str {
        or_default(&self.education_level, "not specified")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_apply_to_blank_fields() {
        let profile = Profile {
            career_goal: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.career_goal(), DEFAULT_CAREER_GOAL);
        assert_eq!(profile.skill_level(), "beginner");
        assert_eq!(profile.study_time(), "5-10");
    }

    #[test]
    fn test_profile_deserializes_camel_case() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "careerGoal": "Data Scientist",
            "learningStyle": "hands-on"
        }))
        .unwrap();
        assert_eq!(profile.career_goal(), "Data Scientist");
        assert_eq!(profile.learning_style(), "hands-on");
        assert!(profile.interests.is_none());
    }
}
