use tracing::debug;

use crate::engine::store::SessionStore;
use crate::model::player::{NewPlayer, PlayerPatch};
use crate::model::session::AppMode;
use crate::model::skill_check::{CheckResult, NewSkillCheck};

/// A user action against the session store.
///
/// Panels queue these while drawing; the app applies them once the frame's
/// widgets are laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SetMode(AppMode),
    SetMap {
        image: String,
        cols: u32,
        rows: u32,
    },
    ResetMap,
    AddPlayer(NewPlayer),
    RemovePlayer {
        id: String,
    },
    UpdatePlayer {
        id: String,
        patch: PlayerPatch,
    },
    RollInitiativeForAll,
    ClearInitiativeRolls,
    AddSkillCheck(NewSkillCheck),
    RemoveSkillCheck {
        id: String,
    },
    UpdateSkillCheckResult {
        id: String,
        result: CheckResult,
    },
    RevealCell {
        col: u32,
        row: u32,
    },
    ResetGame,
    SetUploadModalOpen(bool),
    SetAddPlayerModalOpen(bool),
    SetSelectingCellForCheck(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ignored { reason: String },
}

impl SessionCommand {
    pub fn short_name(&self) -> &'static str {
        match self {
            SessionCommand::SetMode(_) => "SetMode",
            SessionCommand::SetMap { .. } => "SetMap",
            SessionCommand::ResetMap => "ResetMap",
            SessionCommand::AddPlayer(_) => "AddPlayer",
            SessionCommand::RemovePlayer { .. } => "RemovePlayer",
            SessionCommand::UpdatePlayer { .. } => "UpdatePlayer",
            SessionCommand::RollInitiativeForAll => "RollInitiativeForAll",
            SessionCommand::ClearInitiativeRolls => "ClearInitiativeRolls",
            SessionCommand::AddSkillCheck(_) => "AddSkillCheck",
            SessionCommand::RemoveSkillCheck { .. } => "RemoveSkillCheck",
            SessionCommand::UpdateSkillCheckResult { .. } => "UpdateSkillCheckResult",
            SessionCommand::RevealCell { .. } => "RevealCell",
            SessionCommand::ResetGame => "ResetGame",
            SessionCommand::SetUploadModalOpen(_) => "SetUploadModalOpen",
            SessionCommand::SetAddPlayerModalOpen(_) => "SetAddPlayerModalOpen",
            SessionCommand::SetSelectingCellForCheck(_) => "SetSelectingCellForCheck",
        }
    }
}

/// Apply a SessionCommand to the store, returning the outcome
pub fn apply_command(store: &mut SessionStore, command: SessionCommand) -> CommandOutcome {
    let name = command.short_name();

    let outcome = match command {
        SessionCommand::SetMode(mode) => {
            store.set_mode(mode);
            CommandOutcome::Applied
        }

        SessionCommand::SetMap { image, cols, rows } => {
            store.set_map(image, cols, rows);
            CommandOutcome::Applied
        }

        SessionCommand::ResetMap => {
            store.reset_map();
            CommandOutcome::Applied
        }

        SessionCommand::AddPlayer(data) => {
            if data.name.trim().is_empty() {
                return ignored(name, "player name is empty".to_string());
            }
            store.add_player(data);
            CommandOutcome::Applied
        }

        SessionCommand::RemovePlayer { id } => {
            if !store.remove_player(&id) {
                return ignored(name, format!("Player '{}' not found", id));
            }
            CommandOutcome::Applied
        }

        SessionCommand::UpdatePlayer { id, patch } => {
            if !store.update_player(&id, patch) {
                return ignored(name, format!("Player '{}' not found", id));
            }
            CommandOutcome::Applied
        }

        SessionCommand::RollInitiativeForAll => {
            store.roll_initiative_for_all();
            CommandOutcome::Applied
        }

        SessionCommand::ClearInitiativeRolls => {
            store.clear_initiative_rolls();
            CommandOutcome::Applied
        }

        SessionCommand::AddSkillCheck(data) => {
            if store.add_skill_check(data).is_none() {
                return ignored(name, "skill is empty".to_string());
            }
            CommandOutcome::Applied
        }

        SessionCommand::RemoveSkillCheck { id } => {
            if !store.remove_skill_check(&id) {
                return ignored(name, format!("Skill check '{}' not found", id));
            }
            CommandOutcome::Applied
        }

        SessionCommand::UpdateSkillCheckResult { id, result } => {
            if !store.update_skill_check_result(&id, result) {
                return ignored(name, format!("Skill check '{}' not found", id));
            }
            CommandOutcome::Applied
        }

        SessionCommand::RevealCell { col, row } => {
            if !store.reveal_cell(col, row) {
                return ignored(name, format!("Cell {}-{} already revealed", col, row));
            }
            CommandOutcome::Applied
        }

        SessionCommand::ResetGame => {
            store.reset_game();
            CommandOutcome::Applied
        }

        SessionCommand::SetUploadModalOpen(open) => {
            store.set_upload_modal_open(open);
            CommandOutcome::Applied
        }

        SessionCommand::SetAddPlayerModalOpen(open) => {
            store.set_add_player_modal_open(open);
            CommandOutcome::Applied
        }

        SessionCommand::SetSelectingCellForCheck(selecting) => {
            store.set_selecting_cell_for_check(selecting);
            CommandOutcome::Applied
        }
    };

    debug!(command = name, "applied");
    outcome
}

fn ignored(name: &str, reason: String) -> CommandOutcome {
    debug!(command = name, %reason, "ignored");
    CommandOutcome::Ignored { reason }
}
