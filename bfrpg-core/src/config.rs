//! Table rules configuration.
//!
//! Controls how strictly the character wizard enforces eligibility and a few
//! common house rules. Resolvers never read this; they always apply the book
//! tables.

use crate::class_data::MAX_LEVEL;
use crate::dice::{DiceError, DiceExpression};
use crate::error::RulesError;
use serde::{Deserialize, Serialize};

/// House rules for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Reject disabled races, classes and items in the wizard.
    pub enforce_eligibility: bool,

    /// Allow two-class characters where the race permits them.
    pub allow_combination_classes: bool,

    /// Highest level characters may reach. Never above 20.
    pub max_level: u8,

    /// Take the first-level hit die at its maximum instead of rolling.
    pub max_hit_points_at_first_level: bool,

    /// Dice rolled for starting money, multiplied by 10.
    pub starting_gold_dice: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enforce_eligibility: true,
            allow_combination_classes: true,
            max_level: MAX_LEVEL,
            max_hit_points_at_first_level: false,
            starting_gold_dice: "3d6".to_string(),
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_enforce_eligibility(mut self, enforce: bool) -> Self {
        self.enforce_eligibility = enforce;
        self
    }

    pub fn with_combination_classes(mut self, allow: bool) -> Self {
        self.allow_combination_classes = allow;
        self
    }

    /// Set the level cap, clamped to the tables' range.
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.max_level = level.clamp(1, MAX_LEVEL);
        self
    }

    pub fn with_max_hit_points_at_first_level(mut self, enabled: bool) -> Self {
        self.max_hit_points_at_first_level = enabled;
        self
    }

    pub fn with_starting_gold_dice(mut self, notation: impl Into<String>) -> Self {
        self.starting_gold_dice = notation.into();
        self
    }

    /// Level cap actually applied.
    pub fn level_cap(&self) -> u8 {
        self.max_level.clamp(1, MAX_LEVEL)
    }

    pub fn starting_gold(&self) -> Result<DiceExpression, DiceError> {
        DiceExpression::parse(&self.starting_gold_dice)
    }
}
