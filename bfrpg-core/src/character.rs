//! The character sheet.
//!
//! Only base fields are stored. Everything the rules derive (attack bonus,
//! saving throws, hit dice, armor class, movement) is a method that calls
//! into [`crate::rules`] with the current fields, so the sheet can never go
//! stale after an edit.

use crate::class_data::{SavingThrows, SpellsPerDay, ThiefSkills, MAX_LEVEL};
use crate::config::RulesConfig;
use crate::dice::HitDice;
use crate::error::RulesError;
use crate::race_data::{Race, RaceDefinition, StandardRace};
use crate::rules::{self, ArmorClass, CarryingCapacity, ClassKind, ClassSelection, Encumbrance};
use crate::spells::Spell;
use crate::world::{
    round_coins, Ability, AbilityScores, CharacterId, HitPoints, Item, UserId, WornSlot,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A Basic Fantasy player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    /// User who owns the sheet.
    pub owner: UserId,
    pub name: String,
    pub abilities: AbilityScores,
    pub race: Race,
    pub classes: ClassSelection,
    pub level: u8,
    pub xp: u32,
    pub hit_points: HitPoints,
    #[serde(default)]
    pub equipment: Vec<Item>,
    /// Money in gold pieces.
    pub gold: f64,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub description: String,
}

impl Character {
    /// A blank first-level human with average scores and no class.
    pub fn new(name: impl Into<String>, owner: UserId) -> Self {
        Self {
            id: CharacterId::new(),
            owner,
            name: name.into(),
            abilities: AbilityScores::default(),
            race: Race::Standard(StandardRace::Human),
            classes: ClassSelection::none(),
            level: 1,
            xp: 0,
            hit_points: HitPoints::new(None, 0),
            equipment: Vec::new(),
            gold: 0.0,
            spells: Vec::new(),
            description: String::new(),
        }
    }

    pub fn race_definition(&self) -> Option<&'static RaceDefinition> {
        self.race.definition()
    }

    pub fn class_kind(&self) -> ClassKind {
        self.classes.kind()
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        self.abilities.modifier(ability)
    }

    // ========================================================================
    // Derived values
    // ========================================================================

    pub fn attack_bonus(&self) -> i8 {
        rules::attack_bonus(&self.classes, self.level)
    }

    pub fn saving_throws(&self) -> Result<Option<SavingThrows>, RulesError> {
        rules::saving_throws(&self.classes, self.race_definition(), self.level)
    }

    pub fn hit_dice(&self) -> Option<HitDice> {
        rules::hit_dice(&self.classes, self.race_definition(), self.level)
    }

    pub fn armor_class(&self) -> ArmorClass {
        rules::armor_class(
            &self.equipment,
            self.modifier(Ability::Dexterity),
            self.race_definition(),
        )
    }

    pub fn carrying_capacity(&self) -> CarryingCapacity {
        rules::carrying_capacity(self.abilities.strength, self.race_definition())
    }

    pub fn carried_weight(&self) -> f64 {
        rules::carried_weight(&self.equipment)
    }

    pub fn encumbrance(&self) -> Encumbrance {
        rules::encumbrance(self.carried_weight(), self.carrying_capacity())
    }

    /// Movement in feet per turn.
    pub fn movement(&self) -> u8 {
        rules::movement(self.encumbrance(), rules::worn_armor_weight(&self.equipment))
    }

    pub fn spell_budget(&self) -> SpellsPerDay {
        rules::spell_budget(&self.classes, self.level)
    }

    pub fn thief_skills(&self) -> Option<ThiefSkills> {
        rules::thief_skills(&self.classes, self.level)
    }

    pub fn specials(&self) -> Vec<&'static str> {
        rules::specials(&self.classes, self.race_definition())
    }

    pub fn restrictions(&self) -> Vec<&'static str> {
        rules::restrictions(&self.classes, self.race_definition())
    }

    pub fn custom_content_warning(&self) -> Option<&'static str> {
        rules::custom_content_warning(&self.classes, self.race_definition())
    }

    pub fn xp_for_next_level(&self) -> Option<u32> {
        rules::xp_for_next_level(&self.classes, self.level)
    }

    pub fn can_level_up(&self) -> bool {
        rules::can_level_up(&self.classes, self.level, self.xp)
    }

    // ========================================================================
    // Experience
    // ========================================================================

    /// Award experience, applying the race's bonus. Returns the amount gained.
    pub fn award_xp(&mut self, amount: u32) -> u32 {
        let gained = rules::experience_with_bonus(amount, self.race_definition());
        self.xp = self.xp.saturating_add(gained);
        debug!(character = %self.id, amount, gained, xp = self.xp, "awarded experience");
        gained
    }

    /// Apply a typed delta such as `"+250"`. The total never drops below 0.
    ///
    /// Returns the new total, or `None` (leaving XP untouched) when the input
    /// is not a whole number.
    pub fn apply_xp_delta(&mut self, input: &str) -> Option<u32> {
        let delta = rules::parse_xp_delta(input)?;
        let total = (self.xp as i64).saturating_add(delta).clamp(0, u32::MAX as i64);
        self.xp = total as u32;
        Some(self.xp)
    }

    /// Advance one level: checks experience and the level cap, then rolls
    /// (or, past 9th, adds) hit points. Returns the hit points gained.
    pub fn level_up<R: Rng>(&mut self, config: &RulesConfig, rng: &mut R) -> Result<i32, RulesError> {
        if self.class_kind().is_custom() {
            return Err(RulesError::CustomClass(self.classes.display_name()));
        }
        if self.level == 0 {
            return Err(RulesError::InvalidLevel {
                level: self.level,
                max: MAX_LEVEL,
            });
        }
        if self.level >= config.level_cap() {
            return Err(RulesError::LevelCap { level: self.level });
        }
        let needed = self
            .xp_for_next_level()
            .ok_or(RulesError::LevelCap { level: self.level })?;
        if self.xp < needed {
            return Err(RulesError::NotEnoughExperience {
                have: self.xp,
                needed,
            });
        }

        let next = self.level + 1;
        let gained = if next <= rules::MAX_HIT_DICE {
            let die = rules::hit_die(&self.classes, self.race_definition())
                .ok_or_else(|| RulesError::CustomClass(self.classes.display_name()))?;
            rules::roll_hit_points(die, self.modifier(Ability::Constitution), rng)
        } else {
            rules::hit_points_after_ninth(&self.classes).unwrap_or(0)
        };

        self.level = next;
        self.hit_points.max += gained;
        self.hit_points.points += gained;
        debug!(character = %self.id, level = next, gained, "level up");
        Ok(gained)
    }

    // ========================================================================
    // Money and equipment
    // ========================================================================

    /// Apply a typed money delta such as `"-12.5"`.
    ///
    /// Returns the new balance. Garbage input, or a spend larger than the
    /// purse, leaves gold unchanged and returns `None`.
    pub fn apply_gold_delta(&mut self, input: &str) -> Option<f64> {
        let delta = rules::parse_gold_delta(input)?;
        let total = round_coins(self.gold + delta);
        if total < 0.0 {
            warn!(character = %self.id, gold = self.gold, delta, "refusing to overdraw gold");
            return None;
        }
        self.gold = total;
        Some(self.gold)
    }

    /// Buy `item` (all of its `amount`) with the character's gold.
    ///
    /// Items with the same name stack; a bought item is never worn.
    pub fn buy(&mut self, item: &Item) -> Result<(), RulesError> {
        let cost = round_coins(item.cost.in_gold() * item.amount as f64);
        if cost > self.gold {
            return Err(RulesError::InsufficientFunds {
                cost,
                available: self.gold,
            });
        }
        self.gold = round_coins(self.gold - cost);
        self.add_item(item.clone());
        debug!(character = %self.id, item = %item.name, cost, gold = self.gold, "bought item");
        Ok(())
    }

    /// Add an item without paying for it, stacking by name.
    pub fn add_item(&mut self, mut item: Item) {
        match self
            .equipment
            .iter_mut()
            .find(|owned| owned.name.eq_ignore_ascii_case(&item.name))
        {
            Some(owned) => owned.amount = owned.amount.saturating_add(item.amount),
            None => {
                item.worn = None;
                self.equipment.push(item);
            }
        }
    }

    /// Remove up to `amount` of the named item. Returns how many were removed.
    pub fn remove_item(&mut self, name: &str, amount: u32) -> u32 {
        let Some(index) = self
            .equipment
            .iter()
            .position(|item| item.name.eq_ignore_ascii_case(name))
        else {
            return 0;
        };
        let owned = &mut self.equipment[index];
        let removed = amount.min(owned.amount);
        owned.amount -= removed;
        if owned.amount == 0 {
            self.equipment.remove(index);
        }
        removed
    }

    /// Wear the named armor or shield, taking off whatever was in that slot.
    pub fn wear(&mut self, name: &str) -> Option<WornSlot> {
        let index = self
            .equipment
            .iter()
            .position(|item| item.name.eq_ignore_ascii_case(name))?;
        let slot = [WornSlot::Armor, WornSlot::Shield]
            .into_iter()
            .find(|slot| self.equipment[index].fits(*slot))?;
        self.take_off(slot);
        self.equipment[index].worn = Some(slot);
        Some(slot)
    }

    /// Empty a slot. Returns the name of the item taken off.
    pub fn take_off(&mut self, slot: WornSlot) -> Option<String> {
        let item = self
            .equipment
            .iter_mut()
            .find(|item| item.worn == Some(slot))?;
        item.worn = None;
        Some(item.name.clone())
    }

    pub fn worn(&self, slot: WornSlot) -> Option<&Item> {
        self.equipment.iter().find(|item| item.worn == Some(slot))
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn to_json(&self) -> Result<String, RulesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot, rejecting out-of-range ability scores and levels.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let character: Character = serde_json::from_str(json)?;
        character.abilities.validate()?;
        if !(1..=MAX_LEVEL).contains(&character.level) {
            return Err(RulesError::InvalidLevel {
                level: character.level,
                max: MAX_LEVEL,
            });
        }
        Ok(character)
    }

    pub fn summary(&self) -> Result<CharacterSummary, RulesError> {
        Ok(CharacterSummary {
            id: self.id,
            owner: self.owner,
            name: self.name.clone(),
            race: self.race.name().to_string(),
            classes: self.classes.display_name(),
            level: self.level,
            hit_points: self.hit_points.points,
            max_hit_points: self.hit_points.max,
            armor_class: self.armor_class(),
            attack_bonus: self.attack_bonus(),
            saving_throws: self.saving_throws()?,
        })
    }
}

/// Compact read-only view used by the game master's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub owner: UserId,
    pub name: String,
    pub race: String,
    pub classes: String,
    pub level: u8,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub armor_class: ArmorClass,
    pub attack_bonus: i8,
    pub saving_throws: Option<SavingThrows>,
}
