use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::player::Player;
use crate::model::skill_check::SkillCheckPoint;

pub const MIN_GRID: u32 = 4;
pub const MAX_GRID: u32 = 20;
pub const DEFAULT_COLS: u32 = 10;
pub const DEFAULT_ROWS: u32 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    #[default]
    Setup,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSize {
    pub cols: u32,
    pub rows: u32,
}

impl Default for MapSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl MapSize {
    pub fn clamped(cols: u32, rows: u32) -> Self {
        Self {
            cols: cols.clamp(MIN_GRID, MAX_GRID),
            rows: rows.clamp(MIN_GRID, MAX_GRID),
        }
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col < self.cols && row < self.rows
    }
}

/// Address of one grid cell, written as `"col-row"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellKey {
    pub col: u32,
    pub row: u32,
}

impl CellKey {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.col, self.row)
    }
}

impl FromStr for CellKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (col, row) = s
            .split_once('-')
            .ok_or_else(|| format!("cell key '{}' is not 'col-row'", s))?;
        let col = col
            .parse()
            .map_err(|_| format!("bad column in cell key '{}'", s))?;
        let row = row
            .parse()
            .map_err(|_| format!("bad row in cell key '{}'", s))?;
        Ok(Self { col, row })
    }
}

impl TryFrom<String> for CellKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellKey> for String {
    fn from(key: CellKey) -> Self {
        key.to_string()
    }
}

/// Modal flags. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiFlags {
    pub upload_modal_open: bool,
    pub add_player_modal_open: bool,
    pub selecting_cell_for_check: bool,
}

/// Everything the session store owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub mode: AppMode,
    /// Data URL of the uploaded map.
    pub map_image: Option<String>,
    pub map_size: MapSize,
    pub players: Vec<Player>,
    pub skill_checks: Vec<SkillCheckPoint>,
    pub revealed_cells: BTreeSet<CellKey>,
    pub flags: UiFlags,
}

impl GameState {
    pub fn is_revealed(&self, col: u32, row: u32) -> bool {
        self.revealed_cells.contains(&CellKey::new(col, row))
    }

    pub fn skill_check_at(&self, col: u32, row: u32) -> Option<&SkillCheckPoint> {
        self.skill_checks.iter().find(|sc| sc.is_at(col, row))
    }

    /// 1-based number shown on the marker of a skill check.
    pub fn skill_check_number(&self, id: &str) -> Option<usize> {
        self.skill_checks
            .iter()
            .position(|sc| sc.id == id)
            .map(|i| i + 1)
    }

    pub fn has_initiative_rolls(&self) -> bool {
        self.players.iter().any(|p| p.initiative_roll.is_some())
    }
}
