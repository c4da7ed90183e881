//! Deterministic weekly plan built from the step's own skills and milestones.

use chrono::{Duration, NaiveDate};

use crate::models::study_plan::{DailyPlans, DailyTask, StudyPlan, TaskKind};
use crate::models::user::Profile;
use crate::study_plan::generator::CurrentStep;

const DEFAULT_WEEKLY_HOURS: f64 = 7.5;

/// Midpoint of the hour figures in a study-time answer like `"5-10"` or `"20+"`.
pub fn weekly_hours(study_time: &str) -> f64 {
    let numbers: Vec<f64> = study_time
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter_map(|part| part.parse::<f64>().ok())
        .filter(|n| *n > 0.0)
        .collect();
    if numbers.is_empty() {
        return DEFAULT_WEEKLY_HOURS;
    }
    numbers.iter().sum::<f64>() / numbers.len() as f64
}

/// Minutes per session for six sessions a week, in 15-minute steps, at least 30.
fn session_minutes(weekly_hours: f64) -> u32 {
    let raw = weekly_hours * 60.0 / 6.0;
    let rounded = ((raw / 15.0).round() * 15.0) as u32;
    rounded.max(30)
}

fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn tips_for(learning_style: &str) -> Vec<String> {
    let style = learning_style.to_lowercase();
    let specific = if style.contains("visual") {
        "Sketch diagrams and mind maps of each new concept before writing code."
    } else if style.contains("hands") || style.contains("kinesthetic") || style.contains("practical") {
        "Start each session by building something small, then read up on what confused you."
    } else if style.contains("read") || style.contains("writ") {
        "Keep written notes and summarize every session in your own words."
    } else if style.contains("audi") {
        "Explain each concept out loud, as if teaching a friend."
    } else {
        "Mix short reading sessions with immediate hands-on practice."
    };
    vec![
        specific.to_string(),
        "Study at the same time each day to build a habit.".to_string(),
        "Use Sunday to review, rest and plan the next week.".to_string(),
    ]
}

pub fn template_study_plan(profile: &Profile, step: &CurrentStep, week_start: NaiveDate) -> StudyPlan {
    let skills: Vec<&str> = step
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let skill = |i: usize| {
        if skills.is_empty() {
            step.title.as_str()
        } else {
            skills[i % skills.len()]
        }
    };
    let milestone = step
        .milestones
        .first()
        .map(String::as_str)
        .unwrap_or(step.title.as_str());

    let hours = weekly_hours(profile.study_time());
    let session = format_minutes(session_minutes(hours));
    let task = |time: &str, task: String, kind: TaskKind| {
        vec![DailyTask {
            time: time.to_string(),
            task,
            duration: session.clone(),
            kind,
        }]
    };

    let daily_plans = DailyPlans {
        monday: task("6:00 PM", format!("Learn the fundamentals of {}", skill(0)), TaskKind::Learning),
        tuesday: task("6:00 PM", format!("Practice exercises on {}", skill(0)), TaskKind::Practice),
        wednesday: task("6:00 PM", format!("Learn {}", skill(1)), TaskKind::Learning),
        thursday: task("6:00 PM", format!("Practice exercises on {}", skill(1)), TaskKind::Practice),
        friday: task("6:00 PM", format!("Apply {} in a small project", skill(2)), TaskKind::Project),
        saturday: task("10:00 AM", format!("Work towards milestone: {milestone}"), TaskKind::Project),
        sunday: vec![DailyTask {
            time: "10:00 AM".to_string(),
            task: format!("Review the week's notes on {}", step.title),
            duration: "30m".to_string(),
            kind: TaskKind::Review,
        }],
    };

    let mut weekly_goals: Vec<String> = step.milestones.iter().take(2).cloned().collect();
    weekly_goals.push(format!(
        "Spend about {} hours on {}",
        hours.round() as u32,
        step.title
    ));

    StudyPlan {
        week_start: week_start.format("%Y-%m-%d").to_string(),
        week_end: (week_start + Duration::days(6)).format("%Y-%m-%d").to_string(),
        focus_area: step.title.clone(),
        daily_plans,
        weekly_goals,
        tips: tips_for(profile.learning_style()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(skills: &[&str]) -> CurrentStep {
        CurrentStep {
            title: "Databases & ORM".to_string(),
            description: "SQL and Prisma".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            milestones: vec!["Design a schema".to_string()],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_weekly_hours_parses_ranges() {
        assert_eq!(weekly_hours("5-10"), 7.5);
        assert_eq!(weekly_hours("20+"), 20.0);
        assert_eq!(weekly_hours("a few"), DEFAULT_WEEKLY_HOURS);
    }

    #[test]
    fn test_session_length_formatting() {
        assert_eq!(format_minutes(session_minutes(7.5)), "1h 15m");
        assert_eq!(format_minutes(session_minutes(1.0)), "30m");
        assert_eq!(format_minutes(session_minutes(12.0)), "2h");
    }

    #[test]
    fn test_skills_are_spread_over_the_week() {
        let plan = template_study_plan(&Profile::default(), &step(&["SQL", "PostgreSQL"]), date());
        assert_eq!(plan.week_start, "2026-03-02");
        assert_eq!(plan.week_end, "2026-03-08");
        assert_eq!(plan.focus_area, "Databases & ORM");
        assert!(plan.daily_plans.monday[0].task.contains("SQL"));
        assert!(plan.daily_plans.wednesday[0].task.contains("PostgreSQL"));
        assert!(plan.daily_plans.friday[0].task.contains("SQL"));
        assert_eq!(plan.daily_plans.sunday[0].kind, TaskKind::Review);
        assert_eq!(plan.daily_plans.total_tasks(), 7);
        assert_eq!(plan.weekly_goals[0], "Design a schema");
    }

    #[test]
    fn test_no_skills_falls_back_to_title() {
        let plan = template_study_plan(&Profile::default(), &step(&[]), date());
        assert!(plan.daily_plans.tuesday[0].task.ends_with("Databases & ORM"));
    }

    #[test]
    fn test_tips_follow_learning_style() {
        let profile = Profile {
            learning_style: Some("Hands-on".to_string()),
            ..Default::default()
        };
        let plan = template_study_plan(&profile, &step(&["SQL"]), date());
        assert!(plan.tips[0].starts_with("Start each session by building"));
    }
}
