//! Errors raised by the rules engine.

use crate::world::Ability;
use thiserror::Error;

/// Errors from rules resolution and character mutation.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A saving throw table has no row covering the level. The tables are
    /// complete for levels 1-20, so this is a data-integrity failure.
    #[error("Invalid level range: no {class} saving throw row covers level {level}")]
    InvalidLevelRange { class: &'static str, level: u8 },

    #[error("{ability} score {score} is outside the 3-18 range")]
    InvalidAbilityScore { ability: Ability, score: u8 },

    #[error("Cannot afford {cost} gp with {available} gp on hand")]
    InsufficientFunds { cost: f64, available: f64 },

    #[error("Level {level} is outside the 1-{max} range")]
    InvalidLevel { level: u8, max: u8 },

    #[error("Level {level} is the highest level allowed")]
    LevelCap { level: u8 },

    #[error("Need {needed} XP to advance, have {have}")]
    NotEnoughExperience { have: u32, needed: u32 },

    #[error("Custom class \"{0}\" has no tables; track this value by hand")]
    CustomClass(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
