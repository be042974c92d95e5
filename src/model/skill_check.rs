use serde::{Deserialize, Serialize};

pub const DEFAULT_DIFFICULTY: i32 = 10;
pub const MIN_DIFFICULTY: i32 = 5;
pub const MAX_DIFFICULTY: i32 = 30;

/// Skills offered by the skill-check form.
pub const SKILL_OPTIONS: [&str; 18] = [
    "Athletics",
    "Acrobatics",
    "Sleight of Hand",
    "Stealth",
    "Arcana",
    "History",
    "Investigation",
    "Nature",
    "Religion",
    "Perception",
    "Survival",
    "Medicine",
    "Animal Handling",
    "Insight",
    "Performance",
    "Intimidation",
    "Deception",
    "Persuasion",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    Passed,
    Failed,
}

impl CheckResult {
    pub fn label(self) -> &'static str {
        match self {
            CheckResult::Passed => "PASSED",
            CheckResult::Failed => "FAILED",
        }
    }
}

/// A skill check pinned to one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheckPoint {
    pub id: String,
    /// Grid column.
    pub x: u32,
    /// Grid row.
    pub y: u32,
    pub skill: String,
    pub difficulty: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CheckResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSkillCheck {
    pub x: u32,
    pub y: u32,
    pub skill: String,
    pub difficulty: i32,
    pub description: Option<String>,
}

impl SkillCheckPoint {
    pub fn new(id: String, data: NewSkillCheck) -> Self {
        let description = data
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Self {
            id,
            x: data.x,
            y: data.y,
            skill: data.skill.trim().to_string(),
            difficulty: data.difficulty,
            description,
            result: None,
        }
    }

    pub fn is_at(&self, col: u32, row: u32) -> bool {
        self.x == col && self.y == row
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }
}
