//! Character builder for Basic Fantasy character creation.
//!
//! Follows the wizard order: ability scores, race, class, hit points,
//! equipment, then name. Each step is a consuming setter; the query helpers
//! ([`CharacterBuilder::available_races`] and friends) tell a UI which
//! choices to offer at the current step. `build` checks everything against
//! the table's [`RulesConfig`].

use crate::character::Character;
use crate::class_data::StandardClass;
use crate::config::RulesConfig;
use crate::dice::DiceError;
use crate::error::RulesError;
use crate::race_data::{Race, RaceDefinition, StandardRace};
use crate::rules::{self, ClassKind, ClassSelection};
use crate::spells::starting_spells;
use crate::world::{Ability, AbilityScores, HitPoints, Item, UserId};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Error from character building.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Character name is required")]
    MissingName,

    #[error("Ability scores are required")]
    MissingAbilityScores,

    #[error("Race selection is required")]
    MissingRace,

    #[error("Class selection is required")]
    MissingClass,

    #[error("Hit points must be rolled or entered")]
    MissingHitPoints,

    #[error("{0} is not available with these ability scores")]
    RaceNotAllowed(String),

    #[error("{0} is not available for this race and these ability scores")]
    ClassNotAllowed(String),

    #[error("Combination classes are disabled at this table")]
    CombinationsDisabled,

    #[error("{0} cannot be used by this character")]
    ItemNotAllowed(String),

    #[error("Starting gold: {0}")]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Builder for creating Basic Fantasy characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    owner: Option<UserId>,
    abilities: Option<AbilityScores>,
    race: Option<Race>,
    classes: Option<ClassSelection>,
    hit_points: Option<i32>,
    gold: f64,
    equipment: Vec<Item>,
    description: Option<String>,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Steps
    // ========================================================================

    /// Step 1: enter ability scores.
    pub fn abilities(mut self, scores: AbilityScores) -> Self {
        self.abilities = Some(scores);
        self
    }

    /// Step 1: roll 3d6 in order for each ability.
    pub fn roll_abilities<R: Rng>(mut self, rng: &mut R) -> Self {
        self.abilities = Some(AbilityScores::roll(rng));
        self
    }

    /// Step 2: pick a standard race or type a custom one.
    pub fn race(mut self, race: impl Into<Race>) -> Self {
        self.race = Some(race.into());
        self
    }

    /// Step 3: pick one class, a combination, or type a custom class.
    pub fn class(mut self, classes: impl Into<ClassSelection>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    /// Step 4: enter first-level hit points.
    pub fn hit_points(mut self, points: i32) -> Self {
        self.hit_points = Some(points);
        self
    }

    /// Step 4: roll first-level hit points (die + CON modifier, at least 1).
    ///
    /// Needs scores, race and class chosen first. Custom classes have no die
    /// and must enter hit points by hand.
    pub fn roll_hit_points<R: Rng>(
        mut self,
        config: &RulesConfig,
        rng: &mut R,
    ) -> Result<Self, BuilderError> {
        let scores = self.abilities.ok_or(BuilderError::MissingAbilityScores)?;
        let classes = self.classes.as_ref().ok_or(BuilderError::MissingClass)?;
        let race = self.race_definition();
        let die = rules::hit_die(classes, race).ok_or(BuilderError::MissingHitPoints)?;
        let con = scores.modifier(Ability::Constitution);
        let points = if config.max_hit_points_at_first_level {
            (die.sides() as i32 + con as i32).max(1)
        } else {
            rules::roll_hit_points(die, con, rng)
        };
        debug!(%die, points, "rolled first-level hit points");
        self.hit_points = Some(points);
        Ok(self)
    }

    /// Step 5: set starting money directly.
    pub fn gold(mut self, gold: f64) -> Self {
        self.gold = gold;
        self
    }

    /// Step 5: roll starting money (the table's dice times 10).
    pub fn roll_gold<R: Rng>(mut self, config: &RulesConfig, rng: &mut R) -> Result<Self, BuilderError> {
        let dice = config.starting_gold()?;
        self.gold = f64::from(dice.roll_with_rng(rng).total) * 10.0;
        Ok(self)
    }

    /// Step 5: buy an item from starting money.
    pub fn buy(mut self, item: Item) -> Self {
        self.equipment.push(item);
        self
    }

    /// Step 6: name the character.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // ========================================================================
    // Queries for the current step
    // ========================================================================

    fn race_definition(&self) -> Option<&'static RaceDefinition> {
        self.race.as_ref().and_then(Race::definition)
    }

    /// Standard races the entered scores allow.
    pub fn available_races(&self) -> Vec<StandardRace> {
        self.abilities
            .map(|scores| rules::available_races(&scores))
            .unwrap_or_default()
    }

    /// Classes that may be picked next, given the classes already chosen.
    pub fn available_classes(&self, config: &RulesConfig) -> Vec<StandardClass> {
        let Some(scores) = self.abilities else {
            return Vec::new();
        };
        let chosen: Vec<StandardClass> = self
            .classes
            .as_ref()
            .map(|c| c.kind().classes().to_vec())
            .unwrap_or_default();
        if !chosen.is_empty() && !config.allow_combination_classes {
            return Vec::new();
        }
        rules::available_classes(self.race_definition(), &scores, &chosen)
    }

    /// Gold left after the items queued so far.
    pub fn remaining_gold(&self) -> f64 {
        let spent: f64 = self
            .equipment
            .iter()
            .map(|item| item.cost.in_gold() * item.amount as f64)
            .sum();
        self.gold - spent
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the character, returning an error if a step is missing or a
    /// choice breaks the table's rules.
    pub fn build(self, config: &RulesConfig) -> Result<Character, BuilderError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(BuilderError::MissingName)?;
        let abilities = self.abilities.ok_or(BuilderError::MissingAbilityScores)?;
        abilities.validate()?;
        let race = self.race.ok_or(BuilderError::MissingRace)?;
        let classes = self.classes.ok_or(BuilderError::MissingClass)?;
        let race_def = race.definition();
        let kind = classes.kind();

        match &kind {
            ClassKind::None => return Err(BuilderError::MissingClass),
            ClassKind::Combination(_) if !config.allow_combination_classes => {
                return Err(BuilderError::CombinationsDisabled);
            }
            _ => {}
        }

        if config.enforce_eligibility {
            if rules::race_disabled(race_def, &abilities) {
                return Err(BuilderError::RaceNotAllowed(race.name().to_string()));
            }
            if !rules::selection_legal(&classes, race_def, &abilities) {
                return Err(BuilderError::ClassNotAllowed(classes.display_name()));
            }
            if let Some(item) = self
                .equipment
                .iter()
                .find(|item| rules::item_disabled(item, &classes, race_def))
            {
                return Err(BuilderError::ItemNotAllowed(item.name.clone()));
            }
        }

        let points = self.hit_points.ok_or(BuilderError::MissingHitPoints)?;

        let mut character = Character::new(name, self.owner.unwrap_or_default());
        character.abilities = abilities;
        character.hit_points = HitPoints::new(rules::hit_die(&classes, race_def), points);
        character.spells = starting_spells(&classes);
        character.race = race;
        character.classes = classes;
        character.gold = self.gold;
        character.description = self.description.unwrap_or_default();

        for item in &self.equipment {
            character.buy(item)?;
        }

        debug!(
            character = %character.id,
            race = %character.race,
            classes = %character.classes.display_name(),
            "built character"
        );
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::find_item;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scores() -> AbilityScores {
        AbilityScores::new(10, 14, 9, 12, 13, 10).unwrap()
    }

    #[test]
    fn test_build_elf_fighter_magic_user() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = RulesConfig::default();
        let character = CharacterBuilder::new()
            .abilities(scores())
            .race(StandardRace::Elf)
            .class(ClassSelection::parse("Fighter Magic-User"))
            .roll_hit_points(&config, &mut rng)
            .unwrap()
            .gold(50.0)
            .buy(find_item("Longsword").unwrap())
            .buy(find_item("Leather Armor").unwrap())
            .name("Aelwyn")
            .build(&config)
            .unwrap();

        assert_eq!(character.level, 1);
        assert_eq!(character.gold, 20.0);
        assert_eq!(character.equipment.len(), 2);
        assert_eq!(character.hit_points.dice, Some(crate::dice::DieType::D6));
        assert!((2..=7).contains(&character.hit_points.max));
        assert_eq!(character.spells.len(), 1);
        assert_eq!(character.spells[0].name, "Read Magic");
    }

    #[test]
    fn test_max_hit_points_house_rule() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = RulesConfig::default().with_max_hit_points_at_first_level(true);
        let character = CharacterBuilder::new()
            .abilities(AbilityScores::new(12, 10, 10, 10, 16, 10).unwrap())
            .race(StandardRace::Dwarf)
            .class(StandardClass::Fighter)
            .roll_hit_points(&config, &mut rng)
            .unwrap()
            .name("Durin")
            .build(&config)
            .unwrap();
        assert_eq!(character.hit_points.max, 10);
    }

    #[test]
    fn test_missing_steps() {
        let config = RulesConfig::default();
        let result = CharacterBuilder::new()
            .abilities(scores())
            .race(StandardRace::Human)
            .class(StandardClass::Fighter)
            .hit_points(6)
            .build(&config);
        assert!(matches!(result, Err(BuilderError::MissingName)));

        let result = CharacterBuilder::new()
            .abilities(scores())
            .race(StandardRace::Human)
            .class(StandardClass::Fighter)
            .name("Nobody")
            .build(&config);
        assert!(matches!(result, Err(BuilderError::MissingHitPoints)));

        let result = CharacterBuilder::new()
            .abilities(scores())
            .class(StandardClass::Fighter)
            .roll_hit_points(&config, &mut StdRng::seed_from_u64(1))
            .unwrap()
            .name("Nobody")
            .build(&config);
        assert!(matches!(result, Err(BuilderError::MissingRace)));
    }

    #[test]
    fn test_eligibility_is_enforced() {
        let config = RulesConfig::default();
        let base = || {
            CharacterBuilder::new()
                .abilities(scores())
                .hit_points(4)
                .name("Test")
        };

        let halfling = base()
            .abilities(AbilityScores::new(10, 10, 10, 8, 10, 10).unwrap())
            .race(StandardRace::Halfling)
            .class(StandardClass::Fighter)
            .build(&config);
        assert!(matches!(halfling, Err(BuilderError::RaceNotAllowed(_))));

        let dwarf_mage = base()
            .race(StandardRace::Dwarf)
            .class(StandardClass::MagicUser)
            .build(&config);
        assert!(matches!(dwarf_mage, Err(BuilderError::ClassNotAllowed(_))));

        let fighter_thief = base()
            .race(StandardRace::Elf)
            .class(ClassSelection::parse("Fighter Thief"))
            .build(&config);
        assert!(matches!(fighter_thief, Err(BuilderError::ClassNotAllowed(_))));

        let armored_mage = base()
            .race(StandardRace::Human)
            .class(StandardClass::MagicUser)
            .gold(100.0)
            .buy(find_item("Chain Mail").unwrap())
            .build(&config);
        assert!(matches!(armored_mage, Err(BuilderError::ItemNotAllowed(_))));

        let no_combos = base()
            .race(StandardRace::Elf)
            .class(ClassSelection::parse("Magic-User Thief"))
            .build(&config.clone().with_combination_classes(false));
        assert!(matches!(no_combos, Err(BuilderError::CombinationsDisabled)));
    }

    #[test]
    fn test_relaxed_table_allows_anything() {
        let config = RulesConfig::default().with_enforce_eligibility(false);
        let character = CharacterBuilder::new()
            .abilities(scores())
            .race(StandardRace::Dwarf)
            .class(StandardClass::MagicUser)
            .hit_points(3)
            .name("Odd Dwarf")
            .build(&config)
            .unwrap();
        assert_eq!(character.classes.display_name(), "Magic-User");
    }

    #[test]
    fn test_custom_race_and_class() {
        let config = RulesConfig::default();
        let builder = CharacterBuilder::new()
            .abilities(scores())
            .race(Race::parse("Lizardfolk"))
            .class(ClassSelection::parse("Shaman"));
        assert!(matches!(
            builder.clone().roll_hit_points(&config, &mut StdRng::seed_from_u64(2)),
            Err(BuilderError::MissingHitPoints)
        ));
        let character = builder.hit_points(5).name("Sss").build(&config).unwrap();
        assert_eq!(character.hit_points.dice, None);
        assert_eq!(character.attack_bonus(), 0);
        assert!(character.saving_throws().unwrap().is_none());
        assert!(character.custom_content_warning().is_some());
    }

    #[test]
    fn test_insufficient_gold() {
        let result = CharacterBuilder::new()
            .abilities(scores())
            .race(StandardRace::Human)
            .class(StandardClass::Fighter)
            .hit_points(8)
            .gold(40.0)
            .buy(find_item("Plate Mail").unwrap())
            .name("Poor")
            .build(&RulesConfig::default());
        assert!(matches!(
            result,
            Err(BuilderError::Rules(RulesError::InsufficientFunds { .. }))
        ));
    }

    #[test]
    fn test_step_queries() {
        let config = RulesConfig::default();
        let builder = CharacterBuilder::new().abilities(scores()).race(StandardRace::Elf);
        assert_eq!(builder.available_races().len(), 4);
        assert_eq!(builder.available_classes(&config).len(), 4);
        let builder = builder.class(StandardClass::MagicUser);
        assert_eq!(
            builder.available_classes(&config),
            vec![StandardClass::Fighter, StandardClass::Thief]
        );
        assert!(builder
            .available_classes(&config.clone().with_combination_classes(false))
            .is_empty());

        let builder = builder.gold(30.0).buy(find_item("Dagger").unwrap());
        assert_eq!(builder.remaining_gold(), 28.0);
    }

    #[test]
    fn test_rolled_gold_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = RulesConfig::default();
        for _ in 0..20 {
            let builder = CharacterBuilder::new().roll_gold(&config, &mut rng).unwrap();
            assert!((30.0..=180.0).contains(&builder.remaining_gold()));
        }
        let bad = RulesConfig::default().with_starting_gold_dice("three dice");
        assert!(matches!(
            CharacterBuilder::new().roll_gold(&bad, &mut rng),
            Err(BuilderError::Dice(_))
        ));
    }

    #[test]
    fn test_oversized_gold_dice_are_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = RulesConfig::from_json(r#"{"starting_gold_dice":"5000000d100"}"#).unwrap();
        assert!(matches!(
            CharacterBuilder::new().roll_gold(&config, &mut rng),
            Err(BuilderError::Dice(DiceError::TooManyDice(5_000_000)))
        ));
    }

    #[test]
    fn test_combinations_disabled_without_enforcement() {
        let config = RulesConfig::default()
            .with_enforce_eligibility(false)
            .with_combination_classes(false);
        let result = CharacterBuilder::new()
            .abilities(scores())
            .race(StandardRace::Elf)
            .class(ClassSelection::parse("Fighter Magic-User"))
            .hit_points(4)
            .name("Sylwen")
            .build(&config);
        assert!(matches!(result, Err(BuilderError::CombinationsDisabled)));
    }
}
