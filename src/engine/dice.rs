use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::roller::Roller;

pub const MAX_DICE: u32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("unknown die type '{0}'")]
    UnknownDie(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub const ALL: [DieType; 7] = [
        DieType::D4,
        DieType::D6,
        DieType::D8,
        DieType::D10,
        DieType::D12,
        DieType::D20,
        DieType::D100,
    ];

    pub fn sides(self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    /// Percentile dice are always thrown one at a time.
    pub fn effective_count(self, requested: u32) -> u32 {
        match self {
            DieType::D100 => 1,
            _ => requested.clamp(1, MAX_DICE),
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sides = s
            .trim()
            .strip_prefix(['d', 'D'])
            .and_then(|n| n.parse::<u32>().ok());

        DieType::ALL
            .into_iter()
            .find(|d| Some(d.sides()) == sides)
            .ok_or_else(|| DiceError::UnknownDie(s.to_string()))
    }
}

impl TryFrom<String> for DieType {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DieType> for String {
    fn from(die: DieType) -> Self {
        die.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die: DieType,
    pub draws: Vec<u32>,
    pub modifier: i32,
    pub sum: i32,
    pub total: i32,
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:+}={}", self.sum, self.modifier, self.total)
    }
}

pub fn roll_dice(roller: &mut dyn Roller, die: DieType, count: u32, modifier: i32) -> DiceRoll {
    let draws: Vec<u32> = (0..die.effective_count(count))
        .map(|_| roller.roll(die.sides()))
        .collect();
    let sum: i32 = draws.iter().map(|&d| d as i32).sum();

    DiceRoll {
        die,
        draws,
        modifier,
        sum,
        total: sum + modifier,
    }
}

pub fn roll_token(
    roller: &mut dyn Roller,
    token: &str,
    count: u32,
    modifier: i32,
) -> Result<DiceRoll, DiceError> {
    Ok(roll_dice(roller, token.parse()?, count, modifier))
}
