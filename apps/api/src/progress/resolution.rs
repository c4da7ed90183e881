//! Best-effort step lookup from a client-supplied id and/or title.
//!
//! Order: exact id, case-insensitive exact title, title contains input,
//! input contains title. First rule that fires wins.

use uuid::Uuid;

use crate::models::roadmap::StepRow;

/// Which rule matched. Logged so mismatches can be traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Id,
    ExactTitle,
    TitleContainsInput,
    InputContainsTitle,
}

/// Parses a client step id. Template ids like `step-1` are not stored ids.
pub fn parse_step_id(raw: Option<&str>) -> Option<Uuid> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Uuid::parse_str(s).ok())
}

/// Title-only rules (2-4) over `steps` in order.
pub fn match_by_title<'a>(steps: &'a [StepRow], title: &str) -> Option<(&'a StepRow, MatchRule)> {
    let needle = title.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(step) = steps
        .iter()
        .find(|s| s.title.trim().to_lowercase() == needle)
    {
        return Some((step, MatchRule::ExactTitle));
    }

    if let Some(step) = steps
        .iter()
        .find(|s| s.title.to_lowercase().contains(&needle))
    {
        return Some((step, MatchRule::TitleContainsInput));
    }

    steps
        .iter()
        .find(|s| {
            let title = s.title.trim().to_lowercase();
            !title.is_empty() && needle.contains(&title)
        })
        .map(|s| (s, MatchRule::InputContainsTitle))
}

/// Focus-area matching used by study-plan task completion: substring rules
/// only, in both directions, never falling back to an arbitrary step.
pub fn match_focus_area<'a>(steps: &'a [StepRow], focus_area: &str) -> Option<&'a StepRow> {
    let focus = focus_area.trim().to_lowercase();
    if focus.is_empty() {
        return None;
    }
    steps
        .iter()
        .find(|s| s.title.to_lowercase().contains(&focus))
        .or_else(|| {
            steps.iter().find(|s| {
                let title = s.title.trim().to_lowercase();
                !title.is_empty() && focus.contains(&title)
            })
        })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use sqlx::types::Json;
    use uuid::Uuid;

    use crate::models::roadmap::StepRow;

    pub fn step(roadmap_id: Uuid, position: i32, title: &str) -> StepRow {
        StepRow {
            id: Uuid::new_v4(),
            roadmap_id,
            position,
            title: title.to_string(),
            description: String::new(),
            duration: "2 Weeks".to_string(),
            skills: Json(vec![]),
            resources: Json(vec![]),
            milestones: Json(vec![]),
            completed: false,
            progress: 0,
        }
    }

    pub fn steps(titles: &[&str]) -> Vec<StepRow> {
        let roadmap_id = Uuid::new_v4();
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| step(roadmap_id, i as i32, t))
            .collect()
    }
}
