use crate::model::player::Player;
use crate::model::session::AppMode;

/// Order in which the sidebar lists players.
///
/// During a game with at least one rolled initiative the roster is sorted by
/// `roll + initiative`, highest first, keeping insertion order on ties.
/// Otherwise insertion order is kept.
pub fn display_order(players: &[Player], mode: AppMode) -> Vec<&Player> {
    let mut ordered: Vec<&Player> = players.iter().collect();

    let rolled = players.iter().any(|p| p.initiative_roll.is_some());
    if mode == AppMode::Game && rolled {
        ordered.sort_by(|a, b| b.turn_score().cmp(&a.turn_score()));
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str, initiative: i32, roll: Option<i32>) -> Player {
        Player {
            id: name.to_lowercase(),
            name: name.into(),
            health_points: 10,
            max_health_points: 10,
            initiative,
            initiative_roll: roll,
            color: String::new(),
        }
    }

    fn names(players: Vec<&Player>) -> Vec<&str> {
        players.into_iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn game_mode_sorts_by_roll_plus_initiative() {
        let roster = vec![p("Aria", 2, Some(3)), p("Bram", 5, Some(12))];
        assert_eq!(names(display_order(&roster, AppMode::Game)), ["Bram", "Aria"]);
    }

    #[test]
    fn setup_mode_keeps_insertion_order() {
        let roster = vec![p("Aria", 2, Some(3)), p("Bram", 5, Some(12))];
        assert_eq!(names(display_order(&roster, AppMode::Setup)), ["Aria", "Bram"]);
    }

    #[test]
    fn without_rolls_insertion_order_is_kept() {
        let roster = vec![p("Aria", 2, None), p("Bram", 5, None)];
        assert_eq!(names(display_order(&roster, AppMode::Game)), ["Aria", "Bram"]);
    }

    #[test]
    fn ties_are_stable_and_missing_rolls_count_as_zero() {
        let roster = vec![
            p("Cid", 4, None),
            p("Aria", 1, Some(3)),
            p("Bram", 0, Some(4)),
            p("Dex", 0, Some(10)),
        ];
        assert_eq!(
            names(display_order(&roster, AppMode::Game)),
            ["Dex", "Cid", "Aria", "Bram"]
        );
    }
}
