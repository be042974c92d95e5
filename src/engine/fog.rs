//! Fog-of-war rules shared by the map canvas and the game view.

use crate::engine::command::{apply_command, CommandOutcome, SessionCommand};
use crate::engine::store::SessionStore;
use crate::model::session::{AppMode, CellKey, GameState, MapSize};
use crate::model::skill_check::{CheckResult, SkillCheckPoint};

/// Maps a position inside the map rectangle to the grid cell under it.
///
/// `x`/`y` are relative to the top-left corner of a `width` x `height`
/// rectangle. Anything outside the rectangle maps to no cell.
pub fn cell_at(x: f32, y: f32, width: f32, height: f32, size: MapSize) -> Option<CellKey> {
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return None;
    }
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let col = (x / width * size.cols as f32).floor() as u32;
    let row = (y / height * size.rows as f32).floor() as u32;

    size.contains(col, row).then(|| CellKey::new(col, row))
}

/// Whether a cell is drawn under fog.
pub fn is_fogged(state: &GameState, col: u32, row: u32) -> bool {
    state.mode == AppMode::Game && !state.is_revealed(col, row)
}

/// What the canvas draws for one skill check marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerView {
    /// 1-based marker number.
    pub number: Option<usize>,
    pub badge: Option<CheckResult>,
}

pub fn marker_view(state: &GameState, check: &SkillCheckPoint) -> MarkerView {
    let revealed = state.is_revealed(check.x, check.y);
    let game = state.mode == AppMode::Game;

    let badge = check.result.filter(|_| revealed);
    let number = if !game || (revealed && check.result.is_none()) {
        state.skill_check_number(&check.id)
    } else {
        None
    };

    MarkerView { number, badge }
}

/// Unresolved skill check waiting at a cell, if any.
pub fn pending_check_at(state: &GameState, col: u32, row: u32) -> Option<&SkillCheckPoint> {
    state
        .skill_checks
        .iter()
        .find(|sc| sc.is_at(col, row) && !sc.is_resolved())
}

/// Game-mode click on a cell.
///
/// Reveals the cell and returns the id of the skill check to resolve. Only
/// the first reveal of a cell can produce a prompt.
pub fn reveal_for_play(store: &mut SessionStore, col: u32, row: u32) -> Option<String> {
    match apply_command(store, SessionCommand::RevealCell { col, row }) {
        CommandOutcome::Applied => {
            pending_check_at(store.state(), col, row).map(|sc| sc.id.clone())
        }
        CommandOutcome::Ignored { .. } => None,
    }
}
