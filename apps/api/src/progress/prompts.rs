// Prompts for progress feedback.

pub const FEEDBACK_SYSTEM: &str = "You are an encouraging AI mentor for self-taught developers. \
    Write in plain text, friendly and specific. No markdown headings.";

/// Replace `{career_goal}`, `{skill_level}`, `{completed_steps}` and `{current_progress}`.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Provide personalized feedback and motivation for a student.

Student Profile:
- Career Goal: {career_goal}
- Skill Level: {skill_level}

Progress:
- Completed Steps: {completed_steps}
- Current Progress: {current_progress}%

Provide:
1. Celebrate their progress (2-3 sentences)
2. Identify their strengths based on completed work
3. Suggest next focus areas
4. Offer 2-3 actionable tips for improvement
5. A motivational message to keep them going

Keep it under 250 words."#;
