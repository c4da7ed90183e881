// Prompts for weekly study plans.

/// Replace `{step_title}`, `{step_description}`, `{skills}`, `{skill_level}`,
/// `{learning_style}`, `{study_time}`, `{week_start}` and `{week_end}`.
pub const STUDY_PLAN_PROMPT_TEMPLATE: &str = r#"Create a detailed weekly study plan for a student working on: {step_title}

Student Profile:
- Skill Level: {skill_level}
- Learning Style: {learning_style}
- Available Time: {study_time} hours per week

Current Learning Focus: {step_description}
Skills to Learn: {skills}

The week runs from {week_start} to {week_end}.

Generate a specific, day-by-day study plan with:
1. Concrete daily tasks with time allocations
2. A mix of learning, practice, and project work based on their learning style
3. Realistic time estimates
4. Weekly goals to achieve
5. Study tips for staying motivated

Make sure the total weekly hours match their available study time.

Return a JSON object with this EXACT schema:
{
  "weekStart": "{week_start}",
  "weekEnd": "{week_end}",
  "focusArea": "...",
  "dailyPlans": {
    "monday": [{"time": "6:00 PM", "task": "...", "duration": "1h", "type": "learning"}],
    "tuesday": [], "wednesday": [], "thursday": [], "friday": [], "saturday": [], "sunday": []
  },
  "weeklyGoals": ["..."],
  "tips": ["..."]
}
Task "type" must be one of: learning, practice, project, review."#;
