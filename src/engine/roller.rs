use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for dice and display colors.
pub trait Roller {
    /// Uniform draw in `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Hue in degrees for a new player's color.
    fn hue(&mut self) -> f32;
}

pub struct RandRoller {
    rng: StdRng,
}

impl RandRoller {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Roller for RandRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }

    fn hue(&mut self) -> f32 {
        self.rng.gen_range(0.0..360.0)
    }
}

/// Replays a fixed list of draws, then falls back to 1.
#[cfg(test)]
pub struct ScriptedRoller {
    draws: std::collections::VecDeque<u32>,
}

#[cfg(test)]
impl ScriptedRoller {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl Roller for ScriptedRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.draws.pop_front().unwrap_or(1).clamp(1, sides.max(1))
    }

    fn hue(&mut self) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_roller_stays_in_range() {
        let mut roller = RandRoller::seeded(7);
        for _ in 0..500 {
            let r = roller.roll(20);
            assert!((1..=20).contains(&r));
            let h = roller.hue();
            assert!((0.0..360.0).contains(&h));
        }
    }

    #[test]
    fn scripted_roller_replays_then_defaults() {
        let mut roller = ScriptedRoller::new([3, 12]);
        assert_eq!(roller.roll(20), 3);
        assert_eq!(roller.roll(20), 12);
        assert_eq!(roller.roll(20), 1);
    }
}
