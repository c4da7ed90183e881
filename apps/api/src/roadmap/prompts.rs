// All LLM prompt constants for roadmap generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// JSON shape every roadmap prompt asks for.
pub const ROADMAP_JSON_SCHEMA: &str = r#"{
  "careerPath": "...",
  "overview": "...",
  "estimatedTimeframe": "...",
  "steps": [
    {
      "id": "step-1",
      "title": "...",
      "description": "...",
      "duration": "...",
      "skills": ["...", "..."],
      "resources": [{"title": "...", "type": "course", "url": "https://...", "description": "..."}],
      "milestones": ["...", "..."]
    }
  ],
  "weeklySchedule": {
    "monday": "...", "tuesday": "...", "wednesday": "...",
    "thursday": "...", "friday": "...", "saturday": "...", "sunday": "..."
  }
}
Resource "type" must be one of: course, book, tutorial, project, documentation."#;

/// Initial roadmap prompt. Replace `{interests}`, `{education_level}`,
/// `{career_goal}`, `{skill_level}`, `{learning_style}`, `{study_time}`
/// and `{schema}`.
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor and learning path designer. Create a comprehensive, personalized learning roadmap for a student with the following profile:

Interests: {interests}
Education Level: {education_level}
Career Goal: {career_goal}
Current Skill Level: {skill_level}
Learning Style: {learning_style}
Available Study Time: {study_time} hours per week

Generate a detailed step-by-step roadmap that:
1. Maps their interests to the career goal
2. Breaks down the learning path into 5-8 major steps/phases
3. For each step, provides a clear title and description, a realistic duration based on their skill level and study time, 3-5 specific learning resources, key skills to acquire, and milestones to track progress
4. Includes a weekly study schedule that fits their available time

Make the roadmap practical, achievable, and tailored to their learning style.

Return a JSON object with this EXACT schema:
{schema}"#;

/// Follow-up roadmap prompt. Replace `{career_goal}`, `{skill_level}`,
/// `{learning_style}`, `{study_time}`, `{completed_path}`,
/// `{completed_topics}`, `{completed_skills}` and `{schema}`.
pub const NEXT_ROADMAP_PROMPT_TEMPLATE: &str = r#"A student has just completed a learning roadmap and needs the next one.

Student profile:
- Career goal: {career_goal}
- Skill level: {skill_level}
- Learning style: {learning_style}
- Study time: {study_time} hours/week

Completed roadmap: "{completed_path}"
Topics already mastered: {completed_topics}
Skills already learned: {completed_skills}

Generate the NEXT advanced roadmap that builds on what they've learned. Include 3-4 steps with more advanced topics. Number step ids step-1, step-2, and so on.

Return a JSON object with this EXACT schema:
{schema}"#;
