use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::model::player::Player;
use crate::model::session::{CellKey, GameState, MapSize};
use crate::model::skill_check::SkillCheckPoint;

/// The persisted part of a session. Mode and modal flags are not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub map_image: Option<String>,
    pub map_size: MapSize,
    pub players: Vec<Player>,
    pub skill_checks: Vec<SkillCheckPoint>,
    pub revealed_cells: Vec<CellKey>,
}

impl From<&GameState> for SessionSnapshot {
    fn from(state: &GameState) -> Self {
        SessionSnapshot {
            map_image: state.map_image.clone(),
            map_size: state.map_size,
            players: state.players.clone(),
            skill_checks: state.skill_checks.clone(),
            revealed_cells: state.revealed_cells.iter().copied().collect(),
        }
    }
}

impl SessionSnapshot {
    /// Parses a stored snapshot one field at a time. A malformed field, or
    /// one malformed entry of a list, falls back to its default and leaves
    /// the rest of the session intact.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = serde_json::from_str(json)? else {
            return Err(serde_json::Error::custom("session snapshot is not an object"));
        };

        Ok(SessionSnapshot {
            map_image: field(&mut fields, "mapImage"),
            map_size: field(&mut fields, "mapSize"),
            players: list(&mut fields, "players"),
            skill_checks: list(&mut fields, "skillChecks"),
            revealed_cells: list(&mut fields, "revealedCells"),
        })
    }

    pub fn into_state(self) -> GameState {
        GameState {
            map_image: self.map_image,
            map_size: MapSize::clamped(self.map_size.cols, self.map_size.rows),
            players: self.players.into_iter().map(Player::normalized).collect(),
            skill_checks: self.skill_checks,
            revealed_cells: self.revealed_cells.into_iter().collect(),
            ..GameState::default()
        }
    }
}

fn field<T: DeserializeOwned + Default>(fields: &mut Map<String, Value>, key: &str) -> T {
    match fields.remove(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(field = key, error = %e, "ignoring malformed snapshot field");
            T::default()
        }),
    }
}

fn list<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Vec<T> {
    match fields.remove(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(field = key, error = %e, "dropping malformed snapshot entry");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(field = key, "ignoring snapshot field that is not a list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let snap: SessionSnapshot = serde_json::from_str(r#"{"mapImage":"data:x"}"#).unwrap();
        let state = snap.into_state();
        assert_eq!(state.map_image.as_deref(), Some("data:x"));
        assert_eq!(state.map_size, MapSize::default());
        assert!(state.players.is_empty());
        assert!(state.revealed_cells.is_empty());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let mut state = GameState::default();
        state.revealed_cells.insert(CellKey::new(1, 4));
        let json = serde_json::to_value(SessionSnapshot::from(&state)).unwrap();

        assert!(json["mapImage"].is_null());
        assert_eq!(json["mapSize"]["cols"], 10);
        assert_eq!(json["revealedCells"][0], "1-4");
        assert!(json["skillChecks"].as_array().unwrap().is_empty());
        assert!(json.get("mode").is_none());
    }

    #[test]
    fn partial_map_size_keeps_the_roster() {
        let json = r#"{
            "mapSize": {"cols": 12},
            "players": [{"id": "p1", "name": "Aria", "healthPoints": 8, "maxHealthPoints": 8}]
        }"#;
        let state = SessionSnapshot::from_json(json).unwrap().into_state();

        assert_eq!(state.map_size, MapSize { cols: 12, rows: 8 });
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].name, "Aria");
    }

    #[test]
    fn malformed_entries_are_dropped_one_by_one() {
        let json = r#"{
            "mapImage": "data:x",
            "mapSize": "huge",
            "players": [{"id": "p1", "name": "Aria"}, {"name": 42}],
            "skillChecks": 7,
            "revealedCells": ["1-2", "nope", "3-4"]
        }"#;
        let state = SessionSnapshot::from_json(json).unwrap().into_state();

        assert_eq!(state.map_image.as_deref(), Some("data:x"));
        assert_eq!(state.map_size, MapSize::default());
        assert_eq!(state.players.len(), 1);
        assert!(state.skill_checks.is_empty());
        assert_eq!(
            state.revealed_cells.iter().copied().collect::<Vec<_>>(),
            [CellKey::new(1, 2), CellKey::new(3, 4)]
        );
    }

    #[test]
    fn non_object_snapshot_is_an_error() {
        assert!(SessionSnapshot::from_json("[1, 2]").is_err());
        assert!(SessionSnapshot::from_json("{ not json").is_err());
    }
}
