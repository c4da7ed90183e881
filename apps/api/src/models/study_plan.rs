use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Learning,
    Practice,
    Project,
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    pub time: String,
    pub task: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPlans {
    pub monday: Vec<DailyTask>,
    pub tuesday: Vec<DailyTask>,
    pub wednesday: Vec<DailyTask>,
    pub thursday: Vec<DailyTask>,
    pub friday: Vec<DailyTask>,
    pub saturday: Vec<DailyTask>,
    pub sunday: Vec<DailyTask>,
}

impl DailyPlans {
    pub fn days(&self) -> [(&'static str, &Vec<DailyTask>); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }

    pub fn total_tasks(&self) -> usize {
        self.days().iter().map(|(_, tasks)| tasks.len()).sum()
    }
}

/// A one-week, day-by-day schedule for the active roadmap step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub week_start: String,
    pub week_end: String,
    pub focus_area: String,
    pub daily_plans: DailyPlans,
    #[serde(default)]
    pub weekly_goals: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}
