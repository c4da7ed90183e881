use tracing::warn;

use crate::llm_client::{call_text, LanguageModel};
use crate::models::user::Profile;
use crate::progress::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM};

/// Mentor feedback on the student's progress. Falls back to a fixed
/// message when the model fails.
pub async fn generate_feedback(
    llm: &dyn LanguageModel,
    profile: &Profile,
    completed_steps: u32,
    current_progress: i32,
) -> String {
    let prompt = FEEDBACK_PROMPT_TEMPLATE
        .replace("{career_goal}", profile.career_goal())
        .replace("{skill_level}", profile.skill_level())
        .replace("{completed_steps}", &completed_steps.to_string())
        .replace("{current_progress}", &current_progress.to_string());

    match call_text(llm, &prompt, FEEDBACK_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Feedback generation via {} failed, using template: {e}", llm.name());
            template_feedback(profile, completed_steps, current_progress)
        }
    }
}

pub fn template_feedback(profile: &Profile, completed_steps: u32, current_progress: i32) -> String {
    let opener = match (completed_steps, current_progress) {
        (0, _) => "Every journey starts with a first step, and you've already set yours in motion.".to_string(),
        (_, p) if p >= 100 => format!(
            "You've completed your entire roadmap. That is a real achievement on the way to becoming a {}.",
            profile.career_goal()
        ),
        (n, p) => format!(
            "You've completed {n} step{} and you're {p}% of the way through your roadmap. That consistency is what gets people to {}.",
            if n == 1 { "" } else { "s" },
            profile.career_goal()
        ),
    };

    format!(
        "{opener}\n\n\
        Next, keep your focus on the current step and finish one milestone before starting another. \
        Build something small with each new skill, review what you learned at the end of every week, \
        and share your work to get feedback early.\n\n\
        Keep going. Steady progress at your own pace beats bursts of effort."
    )
}
