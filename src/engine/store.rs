use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::dice::{roll_token, DiceError, DiceRoll};
use crate::engine::initiative;
use crate::engine::roller::Roller;
use crate::engine::storage::{SnapshotStorage, StorageError};
use crate::model::player::{NewPlayer, Player, PlayerPatch, INITIATIVE_DIE};
use crate::model::session::{AppMode, CellKey, GameState, MapSize};
use crate::model::skill_check::{CheckResult, NewSkillCheck, SkillCheckPoint};
use crate::model::snapshot::SessionSnapshot;

/// Single owner of the session state.
///
/// Every mutator updates the state in place and then mirrors the persisted
/// subset to `storage`. Storage failures are logged and otherwise ignored,
/// so no operation ever fails because of them.
pub struct SessionStore {
    state: GameState,
    storage: Box<dyn SnapshotStorage>,
    roller: Box<dyn Roller>,
}

impl SessionStore {
    /// Rehydrates from `storage`, falling back to a fresh session.
    pub fn open(storage: Box<dyn SnapshotStorage>, roller: Box<dyn Roller>) -> Self {
        let state = load_state(storage.as_ref());
        Self {
            state,
            storage,
            roller,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.state.players.iter().find(|p| p.id == id)
    }

    pub fn skill_check(&self, id: &str) -> Option<&SkillCheckPoint> {
        self.state.skill_checks.iter().find(|sc| sc.id == id)
    }

    pub fn display_order(&self) -> Vec<&Player> {
        initiative::display_order(&self.state.players, self.state.mode)
    }

    /* =========================
       Mode & map
       ========================= */

    pub fn set_mode(&mut self, mode: AppMode) {
        self.state.mode = mode;
        self.persist();
    }

    /// New map means fresh fog.
    pub fn set_map(&mut self, image: String, cols: u32, rows: u32) {
        self.state.map_image = Some(image);
        self.state.map_size = MapSize::clamped(cols, rows);
        self.state.revealed_cells.clear();
        self.persist();
    }

    pub fn reset_map(&mut self) {
        self.state.map_image = None;
        self.state.map_size = MapSize::default();
        self.state.skill_checks.clear();
        self.state.revealed_cells.clear();
        self.persist();
    }

    /* =========================
       Players
       ========================= */

    pub fn add_player(&mut self, data: NewPlayer) -> String {
        let id = Uuid::new_v4().to_string();
        let player = Player::new(id.clone(), data, self.roller.hue());
        debug!(id = %player.id, name = %player.name, "player added");

        self.state.players.push(player);
        self.persist();
        id
    }

    pub fn remove_player(&mut self, id: &str) -> bool {
        let before = self.state.players.len();
        self.state.players.retain(|p| p.id != id);

        let removed = self.state.players.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn update_player(&mut self, id: &str, patch: PlayerPatch) -> bool {
        let Some(player) = self.state.players.iter_mut().find(|p| p.id == id) else {
            return false;
        };

        player.apply_patch(patch);
        self.persist();
        true
    }

    pub fn roll_initiative_for_all(&mut self) {
        for player in &mut self.state.players {
            player.initiative_roll = Some(self.roller.roll(INITIATIVE_DIE) as i32);
        }
        self.persist();
    }

    pub fn clear_initiative_rolls(&mut self) {
        for player in &mut self.state.players {
            player.initiative_roll = None;
        }
        self.persist();
    }

    /* =========================
       Skill checks
       ========================= */

    /// Returns the new id, or `None` when `skill` is blank.
    pub fn add_skill_check(&mut self, data: NewSkillCheck) -> Option<String> {
        if data.skill.trim().is_empty() {
            return None;
        }

        let id = Uuid::new_v4().to_string();
        self.state
            .skill_checks
            .push(SkillCheckPoint::new(id.clone(), data));
        self.persist();
        Some(id)
    }

    pub fn remove_skill_check(&mut self, id: &str) -> bool {
        let before = self.state.skill_checks.len();
        self.state.skill_checks.retain(|sc| sc.id != id);

        let removed = self.state.skill_checks.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn update_skill_check_result(&mut self, id: &str, result: CheckResult) -> bool {
        let Some(sc) = self.state.skill_checks.iter_mut().find(|sc| sc.id == id) else {
            return false;
        };

        sc.result = Some(result);
        self.persist();
        true
    }

    /* =========================
       Fog of war
       ========================= */

    /// Returns `true` only when the cell was hidden before.
    pub fn reveal_cell(&mut self, col: u32, row: u32) -> bool {
        let inserted = self.state.revealed_cells.insert(CellKey::new(col, row));
        if inserted {
            self.persist();
        }
        inserted
    }

    /// Back to a blank session; the stored snapshot is removed, not rewritten.
    pub fn reset_game(&mut self) {
        self.state = GameState::default();
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "failed to clear session snapshot");
        }
        info!("session reset");
    }

    /* =========================
       Transient UI flags
       ========================= */

    pub fn set_upload_modal_open(&mut self, open: bool) {
        self.state.flags.upload_modal_open = open;
    }

    pub fn set_add_player_modal_open(&mut self, open: bool) {
        self.state.flags.add_player_modal_open = open;
    }

    pub fn set_selecting_cell_for_check(&mut self, selecting: bool) {
        self.state.flags.selecting_cell_for_check = selecting;
    }

    /* =========================
       Dice
       ========================= */

    pub fn roll_dice(
        &mut self,
        token: &str,
        count: u32,
        modifier: i32,
    ) -> Result<DiceRoll, DiceError> {
        roll_token(self.roller.as_mut(), token, count, modifier)
    }

    fn persist(&mut self) {
        let snapshot = SessionSnapshot::from(&self.state);
        let result = serde_json::to_string(&snapshot)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.save(&json));

        if let Err(e) = result {
            warn!(error = %e, "failed to persist session snapshot");
        }
    }

    #[cfg(test)]
    fn storage(&self) -> &dyn SnapshotStorage {
        self.storage.as_ref()
    }
}

fn load_state(storage: &dyn SnapshotStorage) -> GameState {
    let json = match storage.load() {
        Ok(Some(json)) => json,
        Ok(None) => return GameState::default(),
        Err(e) => {
            warn!(error = %e, "session snapshot unavailable, starting fresh");
            return GameState::default();
        }
    };

    match SessionSnapshot::from_json(&json) {
        Ok(snapshot) => {
            let state = snapshot.into_state();
            info!(
                players = state.players.len(),
                skill_checks = state.skill_checks.len(),
                revealed = state.revealed_cells.len(),
                "session restored"
            );
            state
        }
        Err(e) => {
            warn!(error = %e, "discarding unreadable session snapshot");
            GameState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::roller::{RandRoller, ScriptedRoller};
    use crate::engine::storage::MemoryStorage;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> SessionStore {
        SessionStore::open(
            Box::new(MemoryStorage::default()),
            Box::new(RandRoller::seeded(42)),
        )
    }

    fn new_player(name: &str, hp: i32, initiative: i32) -> NewPlayer {
        NewPlayer {
            name: name.into(),
            health_points: Some(hp),
            initiative: Some(initiative),
        }
    }

    fn new_check(x: u32, y: u32) -> NewSkillCheck {
        NewSkillCheck {
            x,
            y,
            skill: "Perception".into(),
            difficulty: 12,
            description: None,
        }
    }

    fn stored_snapshot(store: &SessionStore) -> Option<SessionSnapshot> {
        store
            .storage()
            .load()
            .unwrap()
            .map(|json| serde_json::from_str(&json).unwrap())
    }

    struct BrokenStorage;

    impl SnapshotStorage for BrokenStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn save(&mut self, _json: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn clear(&mut self) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[rstest]
    fn add_player_clamps_health(mut store: SessionStore) {
        let id = store.add_player(new_player("Aria", 200, 0));
        let p = store.player(&id).unwrap();
        assert_eq!(p.health_points, 150);
        assert_eq!(p.max_health_points, 150);
    }

    #[rstest]
    fn add_player_clamps_initiative(mut store: SessionStore) {
        let id = store.add_player(new_player("Aria", 10, -99));
        assert_eq!(store.player(&id).unwrap().initiative, -20);
    }

    #[rstest]
    fn players_keep_insertion_order_and_unique_ids(mut store: SessionStore) {
        let a = store.add_player(new_player("Aria", 1, 0));
        let b = store.add_player(new_player("Bram", 1, 0));
        assert_ne!(a, b);
        let names: Vec<_> = store.state().players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Aria", "Bram"]);
    }

    #[rstest]
    fn remove_and_update_unknown_player_are_no_ops(mut store: SessionStore) {
        store.add_player(new_player("Aria", 5, 0));
        let before = store.state().clone();

        assert!(!store.remove_player("nope"));
        assert!(!store.update_player(
            "nope",
            PlayerPatch {
                health_points: Some(1),
                ..Default::default()
            }
        ));
        assert_eq!(store.state(), &before);
    }

    #[rstest]
    fn update_player_clamps_to_ceiling(mut store: SessionStore) {
        let id = store.add_player(new_player("Aria", 10, 0));
        assert!(store.update_player(
            &id,
            PlayerPatch {
                health_points: Some(50),
                ..Default::default()
            }
        ));
        assert_eq!(store.player(&id).unwrap().health_points, 10);

        store.update_player(&id, PlayerPatch {
            health_points: Some(-3),
            ..Default::default()
        });
        assert_eq!(store.player(&id).unwrap().health_points, 0);
    }

    #[rstest]
    fn reveal_cell_is_idempotent(mut store: SessionStore) {
        assert!(store.reveal_cell(2, 3));
        assert!(!store.reveal_cell(2, 3));

        let keys: Vec<String> = store
            .state()
            .revealed_cells
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, ["2-3"]);
    }

    #[rstest]
    fn initiative_rolls_cover_everyone_then_clear(mut store: SessionStore) {
        for i in 0..5 {
            store.add_player(new_player(&format!("P{i}"), 5, 0));
        }

        store.roll_initiative_for_all();
        assert!(store
            .state()
            .players
            .iter()
            .all(|p| matches!(p.initiative_roll, Some(1..=20))));

        store.clear_initiative_rolls();
        assert!(store.state().players.iter().all(|p| p.initiative_roll.is_none()));
    }

    #[rstest]
    fn remove_unknown_skill_check_keeps_list(mut store: SessionStore) {
        store.add_skill_check(new_check(1, 1));
        store.add_skill_check(new_check(2, 2));
        let before = store.state().skill_checks.clone();

        assert!(!store.remove_skill_check("missing"));
        assert_eq!(store.state().skill_checks, before);
    }

    #[rstest]
    fn blank_skill_is_rejected(mut store: SessionStore) {
        let mut check = new_check(0, 0);
        check.skill = "  ".into();
        assert!(store.add_skill_check(check).is_none());
        assert!(store.state().skill_checks.is_empty());
    }

    #[rstest]
    fn skill_check_result_is_recorded(mut store: SessionStore) {
        let id = store.add_skill_check(new_check(3, 4)).unwrap();
        assert!(store.update_skill_check_result(&id, CheckResult::Failed));
        assert_eq!(store.skill_check(&id).unwrap().result, Some(CheckResult::Failed));
        assert!(!store.update_skill_check_result("other", CheckResult::Passed));
    }

    #[rstest]
    fn set_map_clears_fog_and_clamps_grid(mut store: SessionStore) {
        store.reveal_cell(1, 1);
        store.set_map("data:image/png;base64,AA==".into(), 12, 6);
        assert!(store.state().revealed_cells.is_empty());
        assert_eq!(store.state().map_size, MapSize { cols: 12, rows: 6 });

        store.set_map("data:image/png;base64,AA==".into(), 1, 99);
        assert_eq!(store.state().map_size, MapSize { cols: 4, rows: 20 });
    }

    #[rstest]
    fn reset_map_keeps_players(mut store: SessionStore) {
        store.add_player(new_player("Aria", 5, 0));
        store.set_map("data:x".into(), 12, 12);
        store.add_skill_check(new_check(1, 1));
        store.reveal_cell(1, 1);

        store.reset_map();
        let state = store.state();
        assert_eq!(state.players.len(), 1);
        assert!(state.map_image.is_none());
        assert_eq!(state.map_size, MapSize::default());
        assert!(state.skill_checks.is_empty());
        assert!(state.revealed_cells.is_empty());
    }

    #[rstest]
    fn reset_game_restores_defaults_and_clears_snapshot(mut store: SessionStore) {
        store.add_player(new_player("Aria", 5, 0));
        store.set_map("data:x".into(), 12, 12);
        store.set_mode(AppMode::Game);
        assert!(stored_snapshot(&store).is_some());

        store.reset_game();
        assert_eq!(store.state(), &GameState::default());
        assert!(stored_snapshot(&store).is_none());
    }

    #[rstest]
    fn every_mutation_is_persisted(mut store: SessionStore) {
        let id = store.add_player(new_player("Aria", 5, 1));
        store.reveal_cell(0, 2);

        let snap = stored_snapshot(&store).unwrap();
        assert_eq!(snap.players[0].id, id);
        assert_eq!(snap.revealed_cells, vec![CellKey::new(0, 2)]);
    }

    #[rstest]
    fn ui_flags_are_not_persisted(mut store: SessionStore) {
        store.set_upload_modal_open(true);
        store.set_add_player_modal_open(true);
        store.set_selecting_cell_for_check(true);
        assert!(store.state().flags.upload_modal_open);
        assert!(stored_snapshot(&store).is_none());
    }

    #[rstest]
    fn snapshot_round_trips(mut store: SessionStore) {
        store.set_map("data:image/png;base64,AAAA".into(), 14, 9);
        let a = store.add_player(new_player("Aria", 10, 2));
        store.add_player(new_player("Bram", 8, 5));
        store.update_player(&a, PlayerPatch {
            initiative_roll: Some(Some(7)),
            ..Default::default()
        });
        let sc = store.add_skill_check(new_check(3, 3)).unwrap();
        store.update_skill_check_result(&sc, CheckResult::Passed);
        store.reveal_cell(3, 3);
        store.reveal_cell(0, 8);
        store.set_upload_modal_open(true);

        let json = store.storage().load().unwrap().unwrap();
        let restored = SessionStore::open(
            Box::new(MemoryStorage::with_snapshot(json)),
            Box::new(RandRoller::seeded(1)),
        );

        let (orig, back) = (store.state(), restored.state());
        assert_eq!(back.players, orig.players);
        assert_eq!(back.skill_checks, orig.skill_checks);
        assert_eq!(back.map_size, orig.map_size);
        assert_eq!(back.map_image, orig.map_image);
        assert_eq!(back.revealed_cells, orig.revealed_cells);
        assert!(!back.flags.upload_modal_open);
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_defaults() {
        let store = SessionStore::open(
            Box::new(MemoryStorage::with_snapshot("{ not json")),
            Box::new(RandRoller::seeded(1)),
        );
        assert_eq!(store.state(), &GameState::default());
    }

    #[test]
    fn partial_map_size_does_not_drop_players() {
        let json = r#"{
            "mapSize": {"cols": 12},
            "players": [{"id": "p1", "name": "Aria", "healthPoints": 9, "maxHealthPoints": 9}]
        }"#;
        let store = SessionStore::open(
            Box::new(MemoryStorage::with_snapshot(json)),
            Box::new(RandRoller::seeded(1)),
        );

        assert_eq!(store.state().map_size, MapSize { cols: 12, rows: 8 });
        let aria = store.player("p1").unwrap();
        assert_eq!((aria.name.as_str(), aria.health_points), ("Aria", 9));
    }

    #[test]
    fn broken_storage_never_fails_operations() {
        let mut store =
            SessionStore::open(Box::new(BrokenStorage), Box::new(RandRoller::seeded(1)));
        let id = store.add_player(new_player("Aria", 5, 0));
        store.reveal_cell(1, 1);
        store.reset_game();
        assert!(store.player(&id).is_none());
        assert_eq!(store.state(), &GameState::default());
    }

    #[test]
    fn scripted_initiative_orders_the_roster() {
        let mut store = SessionStore::open(
            Box::new(MemoryStorage::default()),
            Box::new(ScriptedRoller::new([3, 12])),
        );
        store.add_player(new_player("Aria", 10, 2));
        store.add_player(new_player("Bram", 8, 5));
        store.roll_initiative_for_all();
        store.set_mode(AppMode::Game);

        let order: Vec<_> = store
            .display_order()
            .into_iter()
            .map(|p| (p.name.as_str(), p.turn_score()))
            .collect();
        assert_eq!(order, [("Bram", 17), ("Aria", 5)]);
    }

    #[rstest]
    fn dice_roll_uses_store_roller(mut store: SessionStore) {
        let roll = store.roll_dice("d100", 5, 3).unwrap();
        assert_eq!(roll.draws.len(), 1);
        assert_eq!(roll.total, roll.sum + 3);
        assert!(store.roll_dice("d3", 1, 0).is_err());
    }
}
