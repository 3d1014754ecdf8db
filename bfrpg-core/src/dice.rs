//! Dice for Basic Fantasy.
//!
//! Die types ordered by face count, the hit dice value type used on the
//! character sheet ("5d8+2"), and simple `XdY+Z` expressions for ability,
//! gold and damage rolls.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
    #[error("Too many dice: {0} (at most {max})", max = MAX_DICE)]
    TooManyDice(u32),
}

/// Largest number of dice a single expression may roll.
pub const MAX_DICE: u32 = 100;

/// Die types. Declaration order matches face count, so `Ord` compares size.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum DieType {
    #[serde(rename = "d4")]
    D4,
    #[serde(rename = "d6")]
    D6,
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d10")]
    D10,
    #[serde(rename = "d12")]
    D12,
    #[serde(rename = "d20")]
    D20,
    #[serde(rename = "d100")]
    D100,
}

/// The dice a character may roll for hit points, smallest first.
pub const HIT_DIE_SCALE: [DieType; 5] = [
    DieType::D4,
    DieType::D6,
    DieType::D8,
    DieType::D10,
    DieType::D12,
];

impl DieType {
    pub fn sides(&self) -> u32 {
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

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }

    /// Move `steps` places along the hit die scale, stopping at d4 and d12.
    ///
    /// Dice outside the scale (d20, d100) are returned unchanged.
    pub fn shifted(self, steps: i8) -> DieType {
        let Some(pos) = HIT_DIE_SCALE.iter().position(|d| *d == self) else {
            return self;
        };
        let last = HIT_DIE_SCALE.len() as i32 - 1;
        let target = (pos as i32 + steps as i32).clamp(0, last);
        HIT_DIE_SCALE[target as usize]
    }

    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.sides())
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
        let lower = s.trim().to_lowercase();
        let sides = lower
            .strip_prefix('d')
            .ok_or_else(|| DiceError::InvalidNotation(s.to_string()))?;
        let sides: u32 = sides
            .parse()
            .map_err(|_| DiceError::InvalidNotation(s.to_string()))?;
        DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))
    }
}

/// Multi-level hit dice, e.g. `9d8+4` for a 11th level fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDice {
    pub count: u8,
    pub die: DieType,
    pub modifier: i32,
}

impl HitDice {
    pub fn new(count: u8, die: DieType) -> Self {
        Self {
            count,
            die,
            modifier: 0,
        }
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }
}

impl fmt::Display for HitDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "-{}", m.abs()),
        }
    }
}

/// A parsed `XdY+Z` expression. Several dice groups may be chained with `+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub groups: Vec<(u32, DieType)>,
    pub modifier: i32,
}

impl DiceExpression {
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation = notation.trim().to_lowercase().replace(' ', "");
        if notation.is_empty() {
            return Err(DiceError::NoDice);
        }

        let mut groups = Vec::new();
        let mut modifier = 0i32;
        let mut term = String::new();
        let mut sign = 1i32;

        // Trailing sentinel flushes the last term.
        for ch in notation.chars().chain(std::iter::once('+')) {
            if ch == '+' || ch == '-' {
                if !term.is_empty() {
                    Self::push_term(&term, sign, &mut groups, &mut modifier)?;
                    term.clear();
                }
                sign = if ch == '+' { 1 } else { -1 };
            } else {
                term.push(ch);
            }
        }

        if groups.is_empty() {
            return Err(DiceError::NoDice);
        }
        let count = groups
            .iter()
            .fold(0u32, |total, (count, _)| total.saturating_add(*count));
        if count > MAX_DICE {
            return Err(DiceError::TooManyDice(count));
        }
        Ok(Self { groups, modifier })
    }

    fn push_term(
        term: &str,
        sign: i32,
        groups: &mut Vec<(u32, DieType)>,
        modifier: &mut i32,
    ) -> Result<(), DiceError> {
        let invalid = || DiceError::InvalidNotation(term.to_string());
        match term.split_once('d') {
            Some((count, sides)) => {
                if sign < 0 {
                    return Err(invalid());
                }
                let count: u32 = if count.is_empty() {
                    1
                } else {
                    count.parse().map_err(|_| invalid())?
                };
                let sides: u32 = sides.parse().map_err(|_| invalid())?;
                let die = DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;
                groups.push((count, die));
            }
            None => {
                let value: i32 = term.parse().map_err(|_| invalid())?;
                *modifier = modifier
                    .checked_add(sign * value)
                    .ok_or_else(invalid)?;
            }
        }
        Ok(())
    }

    /// Roll every die and add the flat modifier.
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> RollResult {
        let mut rolls = Vec::new();
        for &(count, die) in &self.groups {
            for _ in 0..count {
                rolls.push(die.roll_with_rng(rng));
            }
        }
        let sum = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(self.modifier);
        let total = sum.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        RollResult {
            rolls,
            modifier: self.modifier,
            total,
        }
    }

    pub fn roll(&self) -> RollResult {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    pub fn minimum(&self) -> i32 {
        self.bound(|_| 1)
    }

    pub fn maximum(&self) -> i32 {
        self.bound(|die| die.sides())
    }

    fn bound(&self, face: impl Fn(DieType) -> u32) -> i32 {
        let dice: i64 = self
            .groups
            .iter()
            .map(|&(count, die)| i64::from(count) * i64::from(face(die)))
            .sum();
        let total = dice + i64::from(self.modifier);
        total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice: Vec<String> = self
            .groups
            .iter()
            .map(|(count, die)| format!("{count}{die}"))
            .collect();
        write!(f, "{}", dice.join("+"))?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "-{}", m.abs()),
        }
    }
}

/// Outcome of rolling a [`DiceExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i32,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", dice.join(", "))?;
        if self.modifier != 0 {
            write!(f, " {:+}", self.modifier)?;
        }
        write!(f, " = {}", self.total)
    }
}

/// Roll a notation string with the thread RNG.
pub fn roll(notation: &str) -> Result<RollResult, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll())
}
