use serde::{Deserialize, Serialize};

pub const MAX_NAME_CHARS: usize = 16;
pub const MAX_HEALTH_POINTS: i32 = 150;
pub const MIN_INITIATIVE: i32 = -20;
pub const MAX_INITIATIVE: i32 = 20;
pub const INITIATIVE_DIE: u32 = 20;

/// A member of the roster shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub health_points: i32,

    /// Ceiling for `health_points`, fixed when the player is created.
    #[serde(default)]
    pub max_health_points: i32,

    #[serde(default)]
    pub initiative: i32,

    /// Turn-order roll for the current encounter. Cleared in bulk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_roll: Option<i32>,

    /// CSS-style `hsl(h, s%, l%)` display hint.
    #[serde(default)]
    pub color: String,
}

/// Input of the add-player form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub health_points: Option<i32>,
    pub initiative: Option<i32>,
}

/// Partial update of a player. `initiative_roll: Some(None)` clears the roll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPatch {
    pub health_points: Option<i32>,
    pub initiative: Option<i32>,
    pub initiative_roll: Option<Option<i32>>,
}

impl Player {
    pub fn new(id: String, data: NewPlayer, hue: f32) -> Self {
        let hp = data.health_points.unwrap_or(0).clamp(0, MAX_HEALTH_POINTS);

        Self {
            id,
            name: truncate_name(&data.name),
            health_points: hp,
            max_health_points: hp,
            initiative: clamp_initiative(data.initiative.unwrap_or(0)),
            initiative_roll: None,
            color: format!("hsl({:.0}, 60%, 55%)", hue.rem_euclid(360.0)),
        }
    }

    pub fn apply_patch(&mut self, patch: PlayerPatch) {
        if let Some(hp) = patch.health_points {
            self.health_points = hp.clamp(0, self.max_health_points);
        }
        if let Some(init) = patch.initiative {
            self.initiative = clamp_initiative(init);
        }
        if let Some(roll) = patch.initiative_roll {
            self.initiative_roll = roll.map(|r| r.clamp(1, INITIATIVE_DIE as i32));
        }
    }

    /// Initiative roll plus modifier; a missing roll counts as zero.
    pub fn turn_score(&self) -> i32 {
        self.initiative_roll.unwrap_or(0) + self.initiative
    }

    /// Repairs records written by older snapshots that lack the
    /// health ceiling or carry out-of-range values.
    pub fn normalized(mut self) -> Self {
        self.max_health_points = self
            .max_health_points
            .max(self.health_points)
            .clamp(0, MAX_HEALTH_POINTS);
        self.health_points = self.health_points.clamp(0, self.max_health_points);
        self.initiative = clamp_initiative(self.initiative);
        self.initiative_roll = self
            .initiative_roll
            .map(|r| r.clamp(1, INITIATIVE_DIE as i32));
        self.name = truncate_name(&self.name);
        self
    }

    /// Parses `color` into RGB. `None` when the hint is not an `hsl(...)` triple.
    pub fn color_rgb(&self) -> Option<[u8; 3]> {
        let inner = self
            .color
            .trim()
            .strip_prefix("hsl(")?
            .strip_suffix(')')?;

        let mut parts = inner.split(',').map(|p| p.trim().trim_end_matches('%'));
        let h: f32 = parts.next()?.parse().ok()?;
        let s: f32 = parts.next()?.parse().ok()?;
        let l: f32 = parts.next()?.parse().ok()?;

        Some(hsl_to_rgb(h, s / 100.0, l / 100.0))
    }
}

pub fn clamp_initiative(value: i32) -> i32 {
    value.clamp(MIN_INITIATIVE, MAX_INITIATIVE)
}

pub fn truncate_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_CHARS).collect()
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn player(hp: i32) -> Player {
        Player::new(
            "p1".into(),
            NewPlayer {
                name: "Aria".into(),
                health_points: Some(hp),
                initiative: Some(2),
            },
            120.0,
        )
    }

    #[rstest]
    #[case(200, 150)]
    #[case(-5, 0)]
    #[case(42, 42)]
    fn new_player_clamps_health_and_sets_ceiling(#[case] input: i32, #[case] expected: i32) {
        let p = player(input);
        assert_eq!(p.health_points, expected);
        assert_eq!(p.max_health_points, expected);
    }

    #[test]
    fn name_is_truncated_to_sixteen_chars() {
        let p = Player::new(
            "p".into(),
            NewPlayer {
                name: "Вальдемар Длинноимённый".into(),
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(p.name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(p.health_points, 0);
        assert_eq!(p.initiative, 0);
    }

    #[test]
    fn patch_clamps_to_stored_ceiling() {
        let mut p = player(10);
        p.apply_patch(PlayerPatch {
            health_points: Some(99),
            initiative: Some(-99),
            ..Default::default()
        });
        assert_eq!(p.health_points, 10);
        assert_eq!(p.initiative, MIN_INITIATIVE);
    }

    #[test]
    fn patch_sets_and_clears_roll() {
        let mut p = player(10);
        p.apply_patch(PlayerPatch {
            initiative_roll: Some(Some(25)),
            ..Default::default()
        });
        assert_eq!(p.initiative_roll, Some(20));

        p.apply_patch(PlayerPatch::default());
        assert_eq!(p.initiative_roll, Some(20));

        p.apply_patch(PlayerPatch {
            initiative_roll: Some(None),
            ..Default::default()
        });
        assert_eq!(p.initiative_roll, None);
    }

    #[test]
    fn color_hint_round_trips_to_rgb() {
        let p = player(1);
        assert_eq!(p.color, "hsl(120, 60%, 55%)");
        let [r, g, b] = p.color_rgb().unwrap();
        assert!(g > r && g > b);

        let odd = Player {
            color: "#ff0000".into(),
            ..p
        };
        assert_eq!(odd.color_rgb(), None);
    }

    #[test]
    fn normalized_repairs_missing_ceiling() {
        let legacy: Player =
            serde_json::from_str(r#"{"id":"x","name":"Old","healthPoints":30}"#).unwrap();
        let p = legacy.normalized();
        assert_eq!(p.max_health_points, 30);
        assert_eq!(p.health_points, 30);
    }
}
