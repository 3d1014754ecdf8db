//! Basic Fantasy building blocks.
//!
//! Identifiers, ability scores, hit points, money and equipment items.
//! The [`Character`](crate::character::Character) aggregate is assembled from
//! these in `character.rs`.

use crate::dice::{DiceError, DiceExpression, DieType};
use crate::error::RulesError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated user id handed over by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for game tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores, in Basic Fantasy sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Intelligence,
    Wisdom,
    Dexterity,
    Constitution,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

pub const MIN_SCORE: u8 = 3;
pub const MAX_SCORE: u8 = 18;

/// Index of the score band used by both the modifier and the carrying
/// capacity tables: 3 | 4-5 | 6-8 | 9-12 | 13-15 | 16-17 | 18.
pub(crate) fn score_band(score: u8) -> usize {
    match score {
        0..=3 => 0,
        4..=5 => 1,
        6..=8 => 2,
        9..=12 => 3,
        13..=15 => 4,
        16..=17 => 5,
        _ => 6,
    }
}

/// Ability modifier for a score.
pub fn ability_modifier(score: u8) -> i8 {
    const MODIFIERS: [i8; 7] = [-3, -2, -1, 0, 1, 2, 3];
    MODIFIERS[score_band(score)]
}

/// Ability scores container. Every score stays within 3-18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, int: u8, wis: u8, dex: u8, con: u8, cha: u8) -> Result<Self, RulesError> {
        let scores = Self {
            strength: str,
            intelligence: int,
            wisdom: wis,
            dexterity: dex,
            constitution: con,
            charisma: cha,
        };
        scores.validate()?;
        Ok(scores)
    }

    /// Roll 3d6 for each ability, in order.
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let mut three_d6 = || {
            (0..3)
                .map(|_| DieType::D6.roll_with_rng(rng) as u8)
                .sum::<u8>()
        };
        Self {
            strength: three_d6(),
            intelligence: three_d6(),
            wisdom: three_d6(),
            dexterity: three_d6(),
            constitution: three_d6(),
            charisma: three_d6(),
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, score: u8) -> Result<(), RulesError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(RulesError::InvalidAbilityScore { ability, score });
        }
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Charisma => self.charisma = score,
        }
        Ok(())
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        ability_modifier(self.get(ability))
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        for ability in Ability::all() {
            let score = self.get(ability);
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(RulesError::InvalidAbilityScore { ability, score });
            }
        }
        Ok(())
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            intelligence: 10,
            wisdom: 10,
            dexterity: 10,
            constitution: 10,
            charisma: 10,
        }
    }
}

// ============================================================================
// Hit Points
// ============================================================================

/// Hit points as shown on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    /// Die rolled at each level up to 9th; `None` for custom classes.
    pub dice: Option<DieType>,
    /// Current hit points.
    pub points: i32,
    pub max: i32,
    #[serde(default)]
    pub description: String,
}

impl HitPoints {
    pub fn new(dice: Option<DieType>, max: i32) -> Self {
        Self {
            dice,
            points: max,
            max,
            description: String::new(),
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.points -= amount.max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.points = (self.points + amount.max(0)).min(self.max);
    }

    pub fn is_down(&self) -> bool {
        self.points <= 0
    }
}

// ============================================================================
// Money
// ============================================================================

/// Coin denominations. Gold is the base unit for balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "cp")]
    Copper,
    #[serde(rename = "sp")]
    Silver,
    #[serde(rename = "ep")]
    Electrum,
    #[serde(rename = "gp")]
    Gold,
    #[serde(rename = "pp")]
    Platinum,
}

impl Currency {
    /// Value of one coin in gold pieces.
    pub fn in_gold(&self) -> f64 {
        match self {
            Currency::Copper => 0.01,
            Currency::Silver => 0.1,
            Currency::Electrum => 0.5,
            Currency::Gold => 1.0,
            Currency::Platinum => 5.0,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Currency::Copper => "cp",
            Currency::Silver => "sp",
            Currency::Electrum => "ep",
            Currency::Gold => "gp",
            Currency::Platinum => "pp",
        }
    }

    /// Express a gold balance in this denomination.
    pub fn from_gold(&self, gold: f64) -> f64 {
        round_coins(gold / self.in_gold())
    }
}

/// Round to the nearest hundredth (one copper piece).
pub(crate) fn round_coins(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub value: f64,
    pub currency: Currency,
}

impl Cost {
    pub fn gp(value: f64) -> Self {
        Self {
            value,
            currency: Currency::Gold,
        }
    }

    pub fn sp(value: f64) -> Self {
        Self {
            value,
            currency: Currency::Silver,
        }
    }

    pub fn cp(value: f64) -> Self {
        Self {
            value,
            currency: Currency::Copper,
        }
    }

    pub fn in_gold(&self) -> f64 {
        round_coins(self.value * self.currency.in_gold())
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency.abbreviation())
    }
}

// ============================================================================
// Equipment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Ammunition,
    Armor,
    Shield,
    Gear,
}

/// Weapon size. Small races may not wield Large weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSize {
    Small,
    Medium,
    Large,
}

/// How much an armor slows its wearer. `Light` covers no armor and magic
/// leather; ordinary leather is `Medium`; metal armor is `Heavy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArmorWeight {
    #[default]
    Light,
    Medium,
    Heavy,
}

/// Body slot an item is worn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WornSlot {
    Armor,
    Shield,
}

/// An equipment entry on the sheet.
///
/// Armor stores its full AC in `ac`; shields store their bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub category: ItemCategory,
    pub cost: Cost,
    pub weight: Option<f64>,
    pub size: Option<WeaponSize>,
    pub damage: Option<String>,
    pub ac: Option<i8>,
    pub missile_ac: Option<i8>,
    pub armor_weight: Option<ArmorWeight>,
    #[serde(default)]
    pub blunt: bool,
    pub amount: u32,
    pub worn: Option<WornSlot>,
}

impl Item {
    pub fn new(name: impl Into<String>, category: ItemCategory, cost: Cost) -> Self {
        Self {
            name: name.into(),
            category,
            cost,
            weight: None,
            size: None,
            damage: None,
            ac: None,
            missile_ac: None,
            armor_weight: None,
            blunt: false,
            amount: 1,
            worn: None,
        }
    }

    pub fn weapon(
        name: impl Into<String>,
        size: WeaponSize,
        damage: impl Into<String>,
        cost: Cost,
    ) -> Self {
        let mut item = Self::new(name, ItemCategory::Weapon, cost);
        item.size = Some(size);
        item.damage = Some(damage.into());
        item
    }

    pub fn armor(name: impl Into<String>, ac: i8, weight_class: ArmorWeight, cost: Cost) -> Self {
        let mut item = Self::new(name, ItemCategory::Armor, cost);
        item.ac = Some(ac);
        item.armor_weight = Some(weight_class);
        item
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_ac(mut self, ac: i8) -> Self {
        self.ac = Some(ac);
        self
    }

    pub fn with_missile_ac(mut self, missile_ac: i8) -> Self {
        self.missile_ac = Some(missile_ac);
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn blunt(mut self) -> Self {
        self.blunt = true;
        self
    }

    pub fn worn(mut self, slot: WornSlot) -> Self {
        self.worn = Some(slot);
        self
    }

    /// Weight of the whole stack.
    pub fn total_weight(&self) -> f64 {
        self.weight.unwrap_or(0.0) * self.amount as f64
    }

    pub fn damage_dice(&self) -> Option<Result<DiceExpression, DiceError>> {
        self.damage.as_deref().map(DiceExpression::parse)
    }

    /// Whether this item can go in `slot`.
    pub fn fits(&self, slot: WornSlot) -> bool {
        matches!(
            (self.category, slot),
            (ItemCategory::Armor, WornSlot::Armor) | (ItemCategory::Shield, WornSlot::Shield)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_bands() {
        let expected = [
            (3, -3),
            (4, -2),
            (5, -2),
            (6, -1),
            (8, -1),
            (9, 0),
            (12, 0),
            (13, 1),
            (15, 1),
            (16, 2),
            (17, 2),
            (18, 3),
        ];
        for (score, modifier) in expected {
            assert_eq!(ability_modifier(score), modifier, "score {score}");
        }
    }

    #[test]
    fn test_scores_reject_out_of_range() {
        assert!(AbilityScores::new(9, 9, 9, 9, 9, 9).is_ok());
        let err = AbilityScores::new(19, 9, 9, 9, 9, 9).unwrap_err();
        assert!(matches!(
            err,
            RulesError::InvalidAbilityScore {
                ability: Ability::Strength,
                score: 19
            }
        ));

        let mut scores = AbilityScores::default();
        assert!(scores.set(Ability::Wisdom, 2).is_err());
        assert_eq!(scores.wisdom, 10);
        scores.set(Ability::Wisdom, 17).unwrap();
        assert_eq!(scores.modifier(Ability::Wisdom), 2);
    }

    #[test]
    fn test_rolled_scores_are_valid() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(AbilityScores::roll(&mut rng).validate().is_ok());
        }
    }

    #[test]
    fn test_currency_conversion() {
        assert_eq!(Cost::sp(5.0).in_gold(), 0.5);
        assert_eq!(Cost::cp(30.0).in_gold(), 0.3);
        assert_eq!(Currency::Silver.from_gold(12.5), 125.0);
        assert_eq!(Currency::Platinum.from_gold(10.0), 2.0);
    }

    #[test]
    fn test_hit_points_heal_caps_at_max() {
        let mut hp = HitPoints::new(Some(DieType::D8), 8);
        hp.take_damage(6);
        assert_eq!(hp.points, 2);
        hp.heal(10);
        assert_eq!(hp.points, 8);
        hp.take_damage(9);
        assert!(hp.is_down());
    }

    #[test]
    fn test_item_slots() {
        let shield = Item::new("Shield", ItemCategory::Shield, Cost::gp(7.0)).with_ac(1);
        assert!(shield.fits(WornSlot::Shield));
        assert!(!shield.fits(WornSlot::Armor));
        let rope = Item::new("Rope", ItemCategory::Gear, Cost::gp(1.0))
            .with_weight(5.0)
            .with_amount(2);
        assert_eq!(rope.total_weight(), 10.0);
    }
}
