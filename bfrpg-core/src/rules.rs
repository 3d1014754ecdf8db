//! Rules resolution for Basic Fantasy characters.
//!
//! Everything here is a pure function of the character's base fields and the
//! static race/class tables. Derived values (attack bonus, saving throws,
//! hit dice, armor class, movement) are recomputed on demand and never
//! stored, so calling any resolver twice with the same inputs gives the same
//! answer.
//!
//! Custom races and classes are a supported path: table lookups fall back to
//! permissive or empty results instead of failing.

use crate::class_data::{
    ArmorRule, ClassDefinition, SavingThrows, SpellsPerDay, StandardClass, ThiefSkills, WeaponRule,
};
use crate::dice::{DieType, HitDice};
use crate::error::RulesError;
use crate::race_data::{RaceDefinition, StandardRace};
use crate::world::{score_band, AbilityScores, ArmorWeight, Item, ItemCategory, WornSlot};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Classification
// ============================================================================

/// The class names written on a sheet.
///
/// Either a list of names or a single space-joined string such as
/// `"Fighter Magic-User"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassSelection(Vec<String>);

impl ClassSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// A single free-form entry.
    pub fn parse(text: &str) -> Self {
        Self(vec![text.to_string()])
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    pub fn kind(&self) -> ClassKind {
        class_kind(self)
    }

    /// Names joined for display, e.g. `"Fighter/Magic-User"`.
    pub fn display_name(&self) -> String {
        self.tokens().collect::<Vec<_>>().join("/")
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(|entry| entry.split_whitespace())
    }
}

impl From<StandardClass> for ClassSelection {
    fn from(class: StandardClass) -> Self {
        Self(vec![class.name().to_string()])
    }
}

impl From<&[StandardClass]> for ClassSelection {
    fn from(classes: &[StandardClass]) -> Self {
        Self(classes.iter().map(|c| c.name().to_string()).collect())
    }
}

/// How a class selection is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    None,
    Standard(StandardClass),
    /// Two or more standard classes. Whether the pairing is legal is a
    /// separate question; see [`combination_legal`].
    Combination(Vec<StandardClass>),
    Custom,
}

impl ClassKind {
    /// The standard classes behind this kind; empty for none and custom.
    pub fn classes(&self) -> &[StandardClass] {
        match self {
            ClassKind::Standard(class) => std::slice::from_ref(class),
            ClassKind::Combination(classes) => classes,
            ClassKind::None | ClassKind::Custom => &[],
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ClassKind::Custom)
    }
}

/// Classify a class selection.
pub fn class_kind(selection: &ClassSelection) -> ClassKind {
    let tokens: Vec<&str> = selection.tokens().collect();
    if tokens.is_empty() {
        return ClassKind::None;
    }
    let classes: Option<Vec<StandardClass>> =
        tokens.iter().map(|t| StandardClass::from_name(t)).collect();
    match classes {
        Some(classes) if classes.len() == 1 => ClassKind::Standard(classes[0]),
        Some(classes) => ClassKind::Combination(classes),
        None => ClassKind::Custom,
    }
}

/// Whether a race name is one of the standard races.
pub fn is_standard_race(name: &str) -> bool {
    StandardRace::from_name(name).is_some()
}

// ============================================================================
// Best of N classes
// ============================================================================

/// Resolve a value for each class and fold the results with `combine`.
///
/// Combination characters never stack class tables: attack bonus keeps the
/// larger value, saving throws the better target per category, hit dice the
/// larger die. Returns `None` when there are no standard classes.
pub fn combine_per_class<T>(
    classes: &[StandardClass],
    resolve: impl FnMut(&'static ClassDefinition) -> T,
    combine: impl FnMut(T, T) -> T,
) -> Option<T> {
    classes
        .iter()
        .map(|class| class.definition())
        .map(resolve)
        .reduce(combine)
}

fn standard_classes(selection: &ClassSelection) -> Option<Vec<StandardClass>> {
    match class_kind(selection) {
        ClassKind::Standard(class) => Some(vec![class]),
        ClassKind::Combination(classes) => Some(classes),
        ClassKind::Custom => {
            debug!(classes = ?selection.names(), "custom class, skipping table lookup");
            None
        }
        ClassKind::None => None,
    }
}

// ============================================================================
// Eligibility
// ============================================================================

/// A race is disabled when any minimum is unmet or any maximum exceeded.
/// Custom races are never disabled.
pub fn race_disabled(race: Option<&RaceDefinition>, scores: &AbilityScores) -> bool {
    let Some(race) = race else {
        return false;
    };
    let below = race
        .minimums
        .iter()
        .any(|(ability, min)| scores.get(*ability) < *min);
    let above = race
        .maximums
        .iter()
        .any(|(ability, max)| scores.get(*ability) > *max);
    below || above
}

/// A class is disabled when the race excludes it or its prime requisite is
/// below the minimum.
pub fn class_disabled(
    class: StandardClass,
    race: Option<&RaceDefinition>,
    scores: &AbilityScores,
) -> bool {
    let def = class.definition();
    let excluded = race.is_some_and(|race| !race.allows_class(class));
    excluded || !def.meets_requirement(scores.get(def.requirement.0))
}

/// Whether two classes are barred from being held together.
pub fn mutually_exclusive(first: StandardClass, second: StandardClass) -> bool {
    first.definition().excludes.contains(&second) || second.definition().excludes.contains(&first)
}

/// Legality of a combination class: exactly two distinct standard classes,
/// not mutually exclusive, listed for the race, each meeting its minimum.
pub fn combination_legal(
    classes: &[StandardClass],
    race: Option<&RaceDefinition>,
    scores: &AbilityScores,
) -> bool {
    let [first, second] = classes else {
        return false;
    };
    if first == second || mutually_exclusive(*first, *second) {
        return false;
    }
    let listed = race.map_or(true, |race| race.allows_combination(*first, *second));
    let requirements_met = classes.iter().all(|class| {
        let def = class.definition();
        def.meets_requirement(scores.get(def.requirement.0))
    });
    listed && requirements_met
}

/// Whether a whole class selection may be taken by a character.
pub fn selection_legal(
    selection: &ClassSelection,
    race: Option<&RaceDefinition>,
    scores: &AbilityScores,
) -> bool {
    match class_kind(selection) {
        ClassKind::None => false,
        ClassKind::Standard(class) => !class_disabled(class, race, scores),
        ClassKind::Combination(classes) => combination_legal(&classes, race, scores),
        ClassKind::Custom => true,
    }
}

/// Standard races whose requirements the scores meet.
pub fn available_races(scores: &AbilityScores) -> Vec<StandardRace> {
    StandardRace::all()
        .iter()
        .copied()
        .filter(|race| !race_disabled(Some(race.definition()), scores))
        .collect()
}

/// Classes that may be picked next.
///
/// With nothing chosen this is every enabled class. With one class chosen it
/// is the classes that form a legal combination with it. Selection is capped
/// at two classes, so a full selection offers nothing.
pub fn available_classes(
    race: Option<&RaceDefinition>,
    scores: &AbilityScores,
    chosen: &[StandardClass],
) -> Vec<StandardClass> {
    let all = StandardClass::all().iter().copied();
    match chosen {
        [] => all
            .filter(|class| !class_disabled(*class, race, scores))
            .collect(),
        [first] => all
            .filter(|class| combination_legal(&[*first, *class], race, scores))
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether an item is off limits for the class and race.
///
/// Custom classes and races impose nothing. Combination characters follow
/// the more permissive of their classes, as elven fighter/magic-users may
/// wear armor.
pub fn item_disabled(item: &Item, selection: &ClassSelection, race: Option<&RaceDefinition>) -> bool {
    let race_blocks = match (race, item.category, item.size) {
        (Some(race), ItemCategory::Weapon, Some(size)) => race.forbidden_weapons.contains(&size),
        _ => false,
    };
    if race_blocks {
        return true;
    }
    let Some(classes) = standard_classes(selection) else {
        return false;
    };
    !classes
        .iter()
        .any(|class| class_allows_item(class.definition(), item))
}

fn class_allows_item(class: &ClassDefinition, item: &Item) -> bool {
    let named = |names: &[&str]| names.iter().any(|n| n.eq_ignore_ascii_case(&item.name));
    match item.category {
        ItemCategory::Weapon => match class.weapons {
            WeaponRule::Any => true,
            WeaponRule::BluntOnly => item.blunt,
            WeaponRule::Only(names) => named(names),
        },
        ItemCategory::Armor => match class.armor {
            ArmorRule::Any => true,
            ArmorRule::Forbidden => false,
            ArmorRule::Only(names) => named(names),
        },
        ItemCategory::Shield => class.shields,
        ItemCategory::Ammunition | ItemCategory::Gear => true,
    }
}

// ============================================================================
// Attack Bonus
// ============================================================================

/// Attack bonus: the highest single-class value at this level.
///
/// Custom classes resolve to 0 and the player tracks their own bonus.
pub fn attack_bonus(selection: &ClassSelection, level: u8) -> i8 {
    let Some(classes) = standard_classes(selection) else {
        return 0;
    };
    combine_per_class(&classes, |def| def.attack_bonus_at(level), i8::max).unwrap_or(0)
}

// ============================================================================
// Saving Throws
// ============================================================================

/// Saving throw targets after combining classes and applying race adjustments.
///
/// Each category independently takes the best (lowest) target across the
/// classes held. `Ok(None)` means there is no table to consult (no class or a
/// custom class). A level outside the tables is an error.
pub fn saving_throws(
    selection: &ClassSelection,
    race: Option<&RaceDefinition>,
    level: u8,
) -> Result<Option<SavingThrows>, RulesError> {
    let Some(classes) = standard_classes(selection) else {
        return Ok(None);
    };
    let combined = combine_per_class(
        &classes,
        |def| def.saving_throws_at(level),
        |a, b| Ok(a?.best(&b?)),
    )
    .transpose()?;
    Ok(combined.map(|saves| match race {
        Some(race) => saves.adjusted(&race.save_adjustments),
        None => saves,
    }))
}

// ============================================================================
// Hit Dice
// ============================================================================

/// Die rolled for hit points at level-up.
///
/// The largest die among the classes, clamped to the race's cap and then
/// shifted along the die scale by the race's adjustment.
pub fn hit_die(selection: &ClassSelection, race: Option<&RaceDefinition>) -> Option<DieType> {
    let classes = standard_classes(selection)?;
    let die = combine_per_class(&classes, |def| def.hit_die, DieType::max)?;
    let Some(race) = race else {
        return Some(die);
    };
    let capped = race.max_hit_die.map_or(die, |cap| die.min(cap));
    Some(capped.shifted(race.hit_die_shift))
}

/// Flat hit points gained per level past 9th.
///
/// Single classes use their own table; combinations use the smaller of their
/// classes' values.
pub fn hit_points_after_ninth(selection: &ClassSelection) -> Option<i32> {
    let classes = standard_classes(selection)?;
    combine_per_class(&classes, |def| def.hit_points_after_ninth, i32::min)
}

/// Dice cap: levels past 9th add flat hit points instead of dice.
pub const MAX_HIT_DICE: u8 = 9;

/// Hit dice for the sheet, e.g. `9d8+4` at 11th level.
pub fn hit_dice(
    selection: &ClassSelection,
    race: Option<&RaceDefinition>,
    level: u8,
) -> Option<HitDice> {
    let die = hit_die(selection, race)?;
    let per_level = hit_points_after_ninth(selection)?;
    let count = level.clamp(1, MAX_HIT_DICE);
    let extra_levels = level.saturating_sub(MAX_HIT_DICE) as i32;
    Some(HitDice::new(count, die).with_modifier(extra_levels * per_level))
}

/// Roll one level's worth of hit points: die plus CON modifier, at least 1.
pub fn roll_hit_points<R: Rng>(die: DieType, constitution_modifier: i8, rng: &mut R) -> i32 {
    (die.roll_with_rng(rng) as i32 + constitution_modifier as i32).max(1)
}

// ============================================================================
// Armor Class
// ============================================================================

/// Unarmored AC.
pub const BASE_ARMOR_CLASS: i8 = 11;

/// Melee and missile armor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClass {
    pub melee: i8,
    pub missile: i8,
}

/// Armor class from the items worn in the armor and shield slots.
///
/// Worn armor replaces the race's base AC when its rating is higher; the
/// shield's rating adds on top; the DEX modifier comes last. Missile AC reads
/// `missile_ac` where an item has one and falls back to `ac`.
pub fn armor_class(
    equipment: &[Item],
    dexterity_modifier: i8,
    race: Option<&RaceDefinition>,
) -> ArmorClass {
    let base = race.and_then(|r| r.base_ac).unwrap_or(BASE_ARMOR_CLASS);
    let worn = |slot: WornSlot| equipment.iter().find(|item| item.worn == Some(slot));
    let armor = worn(WornSlot::Armor);
    let shield = worn(WornSlot::Shield);

    let body_melee = armor.and_then(|a| a.ac).map_or(base, |ac| ac.max(base));
    let body_missile = armor
        .and_then(|a| a.missile_ac.or(a.ac))
        .map_or(base, |ac| ac.max(base));
    let shield_melee = shield.and_then(|s| s.ac).unwrap_or(0);
    let shield_missile = shield.and_then(|s| s.missile_ac.or(s.ac)).unwrap_or(0);

    ArmorClass {
        melee: body_melee + shield_melee + dexterity_modifier,
        missile: body_missile + shield_missile + dexterity_modifier,
    }
}

// ============================================================================
// Carrying Capacity and Movement
// ============================================================================

/// Weight thresholds in pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryingCapacity {
    pub light: u16,
    pub heavy: u16,
}

const NORMAL_CAPACITY: [(u16, u16); 7] = [
    (25, 60),
    (35, 90),
    (50, 120),
    (60, 150),
    (65, 165),
    (70, 180),
    (80, 195),
];

const SMALL_CAPACITY: [(u16, u16); 7] = [
    (20, 40),
    (30, 60),
    (40, 80),
    (50, 100),
    (55, 110),
    (60, 120),
    (65, 130),
];

/// Carrying capacity for a strength score. Small races use the reduced table.
pub fn carrying_capacity(strength: u8, race: Option<&RaceDefinition>) -> CarryingCapacity {
    let table = if race.is_some_and(|r| r.small) {
        &SMALL_CAPACITY
    } else {
        &NORMAL_CAPACITY
    };
    let (light, heavy) = table[score_band(strength)];
    CarryingCapacity { light, heavy }
}

/// Total weight of everything carried.
pub fn carried_weight(equipment: &[Item]) -> f64 {
    equipment.iter().map(Item::total_weight).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encumbrance {
    /// At or under the light threshold.
    Unencumbered,
    /// Over light, at or under heavy.
    Encumbered,
    /// Over the heavy threshold; the character cannot move.
    Overloaded,
}

pub fn encumbrance(load: f64, capacity: CarryingCapacity) -> Encumbrance {
    if load <= capacity.light as f64 {
        Encumbrance::Unencumbered
    } else if load <= capacity.heavy as f64 {
        Encumbrance::Encumbered
    } else {
        Encumbrance::Overloaded
    }
}

/// Movement in feet per turn.
pub fn movement(encumbrance: Encumbrance, armor: ArmorWeight) -> u8 {
    let (unencumbered, encumbered) = match armor {
        ArmorWeight::Light => (40, 30),
        ArmorWeight::Medium => (30, 20),
        ArmorWeight::Heavy => (20, 10),
    };
    match encumbrance {
        Encumbrance::Unencumbered => unencumbered,
        Encumbrance::Encumbered => encumbered,
        Encumbrance::Overloaded => 0,
    }
}

/// Weight class of the worn armor; no armor counts as light.
pub fn worn_armor_weight(equipment: &[Item]) -> ArmorWeight {
    equipment
        .iter()
        .find(|item| item.worn == Some(WornSlot::Armor))
        .and_then(|item| item.armor_weight)
        .unwrap_or_default()
}

// ============================================================================
// Experience
// ============================================================================

/// Experience needed to reach `level + 1`.
///
/// Combination characters must earn the sum of both classes' requirements.
pub fn xp_for_next_level(selection: &ClassSelection, level: u8) -> Option<u32> {
    let classes = standard_classes(selection)?;
    let next = level.checked_add(1)?;
    let per_class: Option<Vec<u32>> = classes
        .iter()
        .map(|class| class.definition().experience_for(next))
        .collect();
    per_class.map(|xp| xp.iter().sum())
}

pub fn can_level_up(selection: &ClassSelection, level: u8, xp: u32) -> bool {
    xp_for_next_level(selection, level).is_some_and(|needed| xp >= needed)
}

/// Apply a race's experience bonus to an award.
pub fn experience_with_bonus(amount: u32, race: Option<&RaceDefinition>) -> u32 {
    let bonus = race.map_or(0, |r| r.experience_bonus_percent) as u64;
    (amount as u64 * (100 + bonus) / 100).min(u32::MAX as u64) as u32
}

// ============================================================================
// Spells and Thief Abilities
// ============================================================================

/// Spells per day by spell level, taking the larger count across classes.
/// Classes that cast nothing contribute zeros.
pub fn spell_budget(selection: &ClassSelection, level: u8) -> SpellsPerDay {
    let Some(classes) = standard_classes(selection) else {
        return [0; 6];
    };
    combine_per_class(
        &classes,
        |def| def.spells_per_day_at(level).unwrap_or([0; 6]),
        |a, b| std::array::from_fn(|i| a[i].max(b[i])),
    )
    .unwrap_or([0; 6])
}

/// Thief ability percentages, if any class held has them.
pub fn thief_skills(selection: &ClassSelection, level: u8) -> Option<ThiefSkills> {
    let classes = standard_classes(selection)?;
    combine_per_class(
        &classes,
        |def| def.thief_skills_at(level),
        |a, b| match (a, b) {
            (Some(a), Some(b)) => Some(a.best(&b)),
            (a, b) => a.or(b),
        },
    )
    .flatten()
}

// ============================================================================
// Specials and Restrictions
// ============================================================================

/// Descriptive special abilities from the race and class tables.
pub fn specials(selection: &ClassSelection, race: Option<&RaceDefinition>) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = race.map(|r| r.specials.to_vec()).unwrap_or_default();
    for class in standard_classes(selection).unwrap_or_default() {
        out.extend(class.definition().specials);
    }
    out
}

/// Descriptive restrictions from the race and class tables.
pub fn restrictions(selection: &ClassSelection, race: Option<&RaceDefinition>) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = race.map(|r| r.restrictions.to_vec()).unwrap_or_default();
    for class in standard_classes(selection).unwrap_or_default() {
        out.extend(class.definition().restrictions);
    }
    out
}

/// Notice shown when custom content turns off automatic calculation.
pub fn custom_content_warning(
    selection: &ClassSelection,
    race: Option<&RaceDefinition>,
) -> Option<&'static str> {
    match (class_kind(selection).is_custom(), race.is_none()) {
        (true, _) => Some(
            "Custom class: attack bonus, saving throws and hit dice are not calculated. \
             Track them on your own.",
        ),
        (false, true) => Some(
            "Custom race: race requirements, adjustments and restrictions are not applied.",
        ),
        (false, false) => None,
    }
}

// ============================================================================
// Delta Parsing
// ============================================================================

/// Parse a signed whole-number delta such as `"+250"` or `"-100"`.
pub fn parse_xp_delta(input: &str) -> Option<i64> {
    let parsed = input.trim().parse::<i64>().ok();
    if parsed.is_none() {
        warn!(input, "ignoring non-numeric experience delta");
    }
    parsed
}

/// Parse a signed money delta such as `"+12.5"`. Non-finite values are rejected.
pub fn parse_gold_delta(input: &str) -> Option<f64> {
    let parsed = input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite());
    if parsed.is_none() {
        warn!(input, "ignoring non-numeric gold delta");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_data::MAX_LEVEL;
    use crate::race_data::{DWARF, ELF, HALFLING, HUMAN};
    use crate::world::{Cost, WeaponSize};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scores(str: u8, int: u8, wis: u8, dex: u8, con: u8, cha: u8) -> AbilityScores {
        AbilityScores::new(str, int, wis, dex, con, cha).unwrap()
    }

    fn sel(names: &[&str]) -> ClassSelection {
        ClassSelection::new(names.iter().copied())
    }

    #[test]
    fn test_class_kind() {
        assert_eq!(class_kind(&ClassSelection::none()), ClassKind::None);
        assert_eq!(class_kind(&sel(&["  "])), ClassKind::None);
        assert_eq!(
            class_kind(&sel(&["Fighter"])),
            ClassKind::Standard(StandardClass::Fighter)
        );
        assert_eq!(
            class_kind(&ClassSelection::parse("Fighter Magic-User")),
            ClassKind::Combination(vec![StandardClass::Fighter, StandardClass::MagicUser])
        );
        assert_eq!(
            class_kind(&sel(&["Magic-User", "Thief"])),
            ClassKind::Combination(vec![StandardClass::MagicUser, StandardClass::Thief])
        );
        assert_eq!(class_kind(&sel(&["Paladin"])), ClassKind::Custom);
        assert_eq!(class_kind(&sel(&["Fighter", "Witch Hunter"])), ClassKind::Custom);
    }

    #[test]
    fn test_standard_race_names() {
        assert!(is_standard_race("Halfling"));
        assert!(is_standard_race("human"));
        assert!(!is_standard_race("Gnome"));
        assert!(!is_standard_race(""));
    }

    #[test]
    fn test_race_requirements() {
        let weak_con = scores(10, 10, 10, 10, 8, 10);
        assert!(race_disabled(Some(&DWARF), &weak_con));
        let charming = scores(10, 10, 10, 10, 12, 18);
        assert!(race_disabled(Some(&DWARF), &charming));
        let sturdy = scores(10, 10, 10, 10, 12, 17);
        assert!(!race_disabled(Some(&DWARF), &sturdy));
        assert!(!race_disabled(None, &weak_con));
    }

    #[test]
    fn test_available_races() {
        let all_nines = scores(9, 9, 9, 9, 9, 9);
        assert_eq!(available_races(&all_nines).len(), 4);
        let strong = scores(18, 8, 9, 9, 9, 9);
        assert_eq!(
            available_races(&strong),
            vec![StandardRace::Dwarf, StandardRace::Human]
        );
    }

    #[test]
    fn test_class_requirements() {
        let dull = scores(12, 8, 12, 12, 12, 12);
        assert!(class_disabled(StandardClass::MagicUser, Some(&HUMAN), &dull));
        assert!(!class_disabled(StandardClass::Fighter, Some(&HUMAN), &dull));
        let bright = scores(12, 14, 12, 12, 12, 12);
        assert!(class_disabled(StandardClass::MagicUser, Some(&DWARF), &bright));
        assert!(!class_disabled(StandardClass::MagicUser, None, &bright));
    }

    #[test]
    fn test_fighter_thief_is_never_legal() {
        let gifted = scores(16, 16, 16, 16, 16, 16);
        assert!(!class_disabled(StandardClass::Fighter, Some(&HUMAN), &gifted));
        assert!(!class_disabled(StandardClass::Thief, Some(&HUMAN), &gifted));
        let pair = [StandardClass::Fighter, StandardClass::Thief];
        assert!(!combination_legal(&pair, Some(&ELF), &gifted));
        assert!(!combination_legal(&pair, None, &gifted));
        assert!(!selection_legal(&sel(&["Fighter", "Thief"]), None, &gifted));
    }

    #[test]
    fn test_elf_combinations() {
        let gifted = scores(16, 16, 16, 16, 16, 16);
        let fmu = [StandardClass::Fighter, StandardClass::MagicUser];
        assert!(combination_legal(&fmu, Some(&ELF), &gifted));
        assert!(!combination_legal(&fmu, Some(&HUMAN), &gifted));
        let weak = scores(8, 16, 16, 16, 16, 16);
        assert!(!combination_legal(&fmu, Some(&ELF), &weak));
        let three = [StandardClass::Fighter, StandardClass::MagicUser, StandardClass::Cleric];
        assert!(!combination_legal(&three, Some(&ELF), &gifted));
        let twice = [StandardClass::Fighter, StandardClass::Fighter];
        assert!(!combination_legal(&twice, None, &gifted));
    }

    #[test]
    fn test_available_classes_after_first_pick() {
        let gifted = scores(16, 16, 16, 16, 16, 16);
        assert_eq!(available_classes(Some(&ELF), &gifted, &[]).len(), 4);
        assert_eq!(
            available_classes(Some(&ELF), &gifted, &[StandardClass::MagicUser]),
            vec![StandardClass::Fighter, StandardClass::Thief]
        );
        assert_eq!(
            available_classes(Some(&ELF), &gifted, &[StandardClass::Fighter]),
            vec![StandardClass::MagicUser]
        );
        assert!(available_classes(
            Some(&ELF),
            &gifted,
            &[StandardClass::Fighter, StandardClass::MagicUser]
        )
        .is_empty());
    }

    #[test]
    fn test_attack_bonus_scenarios() {
        let fighter = sel(&["Fighter"]);
        assert_eq!(attack_bonus(&fighter, 1), 0);
        assert_eq!(attack_bonus(&fighter, 5), 2);
        assert_eq!(attack_bonus(&sel(&["Necromancer"]), 5), 0);
        assert_eq!(attack_bonus(&ClassSelection::none(), 5), 0);
    }

    #[test]
    fn test_attack_bonus_never_decreases() {
        for class in StandardClass::all() {
            let selection = ClassSelection::from(*class);
            let mut last = i8::MIN;
            for level in 1..=MAX_LEVEL {
                let bonus = attack_bonus(&selection, level);
                assert!(bonus >= last, "{class} level {level}");
                assert_eq!(bonus, class.definition().attack_bonus_at(level));
                last = bonus;
            }
        }
    }

    #[test]
    fn test_combination_attack_bonus_is_max_not_sum() {
        let fmu = sel(&["Fighter", "Magic-User"]);
        for level in 1..=MAX_LEVEL {
            let f = attack_bonus(&sel(&["Fighter"]), level);
            let m = attack_bonus(&sel(&["Magic-User"]), level);
            assert_eq!(attack_bonus(&fmu, level), f.max(m));
        }
    }

    #[test]
    fn test_dwarf_cleric_saves() {
        let saves = saving_throws(&sel(&["Cleric"]), Some(&DWARF), 1)
            .unwrap()
            .unwrap();
        assert_eq!(saves.as_array(), [7, 8, 10, 12, 12]);
    }

    #[test]
    fn test_combination_saves_are_per_category_best() {
        for pair in [
            [StandardClass::Fighter, StandardClass::MagicUser],
            [StandardClass::MagicUser, StandardClass::Thief],
            [StandardClass::Cleric, StandardClass::Fighter],
        ] {
            let combined = ClassSelection::from(&pair[..]);
            for level in 1..=MAX_LEVEL {
                let both = saving_throws(&combined, None, level).unwrap().unwrap();
                for class in pair {
                    let single = saving_throws(&ClassSelection::from(class), None, level).unwrap().unwrap();
                    for (b, s) in both.as_array().iter().zip(single.as_array()) {
                        assert!(*b <= s);
                    }
                }
            }
        }
    }

    #[test]
    fn test_saves_fail_loudly_outside_tables() {
        let err = saving_throws(&sel(&["Thief"]), None, 21).unwrap_err();
        assert!(matches!(err, RulesError::InvalidLevelRange { level: 21, .. }));
        assert!(saving_throws(&sel(&["Sword Saint"]), None, 21).unwrap().is_none());
    }

    #[test]
    fn test_hit_die_selection() {
        let fmu = sel(&["Fighter", "Magic-User"]);
        assert_eq!(hit_die(&fmu, None), Some(DieType::D8));
        assert_eq!(hit_die(&fmu, Some(&ELF)), Some(DieType::D6));
        assert_eq!(hit_die(&sel(&["Magic-User"]), Some(&ELF)), Some(DieType::D4));
        assert_eq!(hit_die(&sel(&["Fighter"]), Some(&DWARF)), Some(DieType::D8));
        assert_eq!(hit_die(&sel(&["Fighter"]), Some(&HALFLING)), Some(DieType::D6));
        assert_eq!(hit_die(&sel(&["Brewer"]), None), None);
    }

    #[test]
    fn test_hit_die_shift_for_table_driven_custom_race() {
        let half_ogre = RaceDefinition {
            name: "Half-Ogre",
            hit_die_shift: 1,
            max_hit_die: None,
            ..HUMAN
        };
        let sprite = RaceDefinition {
            name: "Sprite",
            hit_die_shift: -1,
            max_hit_die: Some(DieType::D6),
            ..HUMAN
        };
        assert_eq!(hit_die(&sel(&["Fighter"]), Some(&half_ogre)), Some(DieType::D10));
        assert_eq!(hit_die(&sel(&["Fighter"]), Some(&sprite)), Some(DieType::D4));
        assert_eq!(hit_die(&sel(&["Thief"]), Some(&sprite)), Some(DieType::D4));
    }

    #[test]
    fn test_hit_dice_expression() {
        let fighter = sel(&["Fighter"]);
        assert_eq!(hit_dice(&fighter, None, 5).unwrap().to_string(), "5d8");
        assert_eq!(hit_dice(&fighter, None, 9).unwrap().to_string(), "9d8");
        assert_eq!(hit_dice(&fighter, None, 11).unwrap().to_string(), "9d8+4");
        let fmu = sel(&["Fighter", "Magic-User"]);
        assert_eq!(hit_dice(&fmu, Some(&ELF), 12).unwrap().to_string(), "9d6+3");
    }

    #[test]
    fn test_rolled_hit_points_floor_at_one() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert_eq!(roll_hit_points(DieType::D4, -3, &mut rng), 1);
            let hp = roll_hit_points(DieType::D8, 1, &mut rng);
            assert!((2..=9).contains(&hp));
        }
    }

    #[test]
    fn test_armor_class_from_worn_items() {
        let chain = Item::armor("Chain Mail", 15, ArmorWeight::Heavy, Cost::gp(60.0))
            .worn(WornSlot::Armor);
        let shield = Item::new("Shield", ItemCategory::Shield, Cost::gp(7.0))
            .with_ac(1)
            .worn(WornSlot::Shield);
        let spare = Item::armor("Plate Mail", 17, ArmorWeight::Heavy, Cost::gp(300.0));

        let naked = armor_class(&[], 0, None);
        assert_eq!(naked, ArmorClass { melee: 11, missile: 11 });
        let ac = armor_class(&[chain.clone(), shield.clone(), spare], 1, Some(&HUMAN));
        assert_eq!(ac.melee, 17);
        assert_eq!(ac.missile, 17);
    }

    #[test]
    fn test_homebrew_armor_and_missile_rating() {
        let cloak = Item::armor("Cloak of Warding", 9, ArmorWeight::Light, Cost::gp(1.0))
            .with_missile_ac(14)
            .worn(WornSlot::Armor);
        let ac = armor_class(&[cloak], -1, None);
        assert_eq!(ac.melee, 10);
        assert_eq!(ac.missile, 13);

        let tortle = RaceDefinition {
            name: "Tortle",
            base_ac: Some(15),
            ..HUMAN
        };
        let leather = Item::armor("Leather Armor", 13, ArmorWeight::Medium, Cost::gp(20.0))
            .worn(WornSlot::Armor);
        assert_eq!(armor_class(&[leather], 0, Some(&tortle)).melee, 15);
    }

    #[test]
    fn test_carrying_capacity_tables() {
        assert_eq!(
            carrying_capacity(10, Some(&HALFLING)),
            CarryingCapacity { light: 50, heavy: 100 }
        );
        assert_eq!(
            carrying_capacity(10, Some(&HUMAN)),
            CarryingCapacity { light: 60, heavy: 150 }
        );
        let mut last = CarryingCapacity { light: 0, heavy: 0 };
        for strength in 3..=18 {
            let normal = carrying_capacity(strength, None);
            let small = carrying_capacity(strength, Some(&HALFLING));
            assert!(normal.light >= last.light && normal.heavy >= last.heavy);
            assert!(small.light < normal.light && small.heavy < normal.heavy);
            last = normal;
        }
    }

    #[test]
    fn test_movement_steps() {
        let capacity = carrying_capacity(10, None);
        assert_eq!(encumbrance(60.0, capacity), Encumbrance::Unencumbered);
        assert_eq!(encumbrance(61.0, capacity), Encumbrance::Encumbered);
        assert_eq!(encumbrance(151.0, capacity), Encumbrance::Overloaded);
        assert_eq!(movement(Encumbrance::Unencumbered, ArmorWeight::Light), 40);
        assert_eq!(movement(Encumbrance::Encumbered, ArmorWeight::Light), 30);
        assert_eq!(movement(Encumbrance::Unencumbered, ArmorWeight::Medium), 30);
        assert_eq!(movement(Encumbrance::Encumbered, ArmorWeight::Medium), 20);
        assert_eq!(movement(Encumbrance::Unencumbered, ArmorWeight::Heavy), 20);
        assert_eq!(movement(Encumbrance::Encumbered, ArmorWeight::Heavy), 10);
        assert_eq!(movement(Encumbrance::Overloaded, ArmorWeight::Light), 0);
    }

    #[test]
    fn test_item_restrictions() {
        let sword = Item::weapon("Two-Handed Sword", WeaponSize::Large, "1d10", Cost::gp(18.0));
        let mace = Item::weapon("Mace", WeaponSize::Medium, "1d8", Cost::gp(6.0)).blunt();
        let dagger = Item::weapon("Dagger", WeaponSize::Small, "1d4", Cost::gp(2.0));
        let leather = Item::armor("Leather Armor", 13, ArmorWeight::Medium, Cost::gp(20.0));
        let shield = Item::new("Shield", ItemCategory::Shield, Cost::gp(7.0)).with_ac(1);

        assert!(item_disabled(&sword, &sel(&["Fighter"]), Some(&DWARF)));
        assert!(!item_disabled(&sword, &sel(&["Fighter"]), Some(&HUMAN)));
        assert!(item_disabled(&sword, &sel(&["Cleric"]), Some(&HUMAN)));
        assert!(!item_disabled(&mace, &sel(&["Cleric"]), Some(&HUMAN)));
        assert!(!item_disabled(&dagger, &sel(&["Magic-User"]), Some(&ELF)));
        assert!(item_disabled(&leather, &sel(&["Magic-User"]), Some(&ELF)));
        assert!(!item_disabled(&leather, &sel(&["Fighter", "Magic-User"]), Some(&ELF)));
        assert!(!item_disabled(&leather, &sel(&["Thief"]), Some(&HUMAN)));
        assert!(item_disabled(&shield, &sel(&["Thief"]), Some(&HUMAN)));
        assert!(!item_disabled(&shield, &sel(&["Wizard-Priest"]), None));
    }

    #[test]
    fn test_experience_thresholds() {
        assert_eq!(xp_for_next_level(&sel(&["Fighter"]), 1), Some(2_000));
        assert_eq!(
            xp_for_next_level(&sel(&["Fighter", "Magic-User"]), 1),
            Some(4_500)
        );
        assert_eq!(xp_for_next_level(&sel(&["Fighter"]), 20), None);
        assert_eq!(xp_for_next_level(&sel(&["Bard"]), 1), None);
        assert!(can_level_up(&sel(&["Thief"]), 1, 1_250));
        assert!(!can_level_up(&sel(&["Thief"]), 1, 1_249));
        assert_eq!(experience_with_bonus(100, Some(&HUMAN)), 110);
        assert_eq!(experience_with_bonus(100, Some(&ELF)), 100);
    }

    #[test]
    fn test_spells_and_thief_skills() {
        assert_eq!(spell_budget(&sel(&["Fighter"]), 5), [0; 6]);
        assert_eq!(spell_budget(&sel(&["Magic-User"]), 3), [2, 1, 0, 0, 0, 0]);
        assert_eq!(
            spell_budget(&sel(&["Fighter", "Magic-User"]), 3),
            spell_budget(&sel(&["Magic-User"]), 3)
        );
        assert!(thief_skills(&sel(&["Cleric"]), 1).is_none());
        let skills = thief_skills(&sel(&["Magic-User", "Thief"]), 1).unwrap();
        assert_eq!(skills.open_locks, 25);
        assert_eq!(skills.climb_walls, 80);
    }

    #[test]
    fn test_specials_combine_race_and_class() {
        let list = specials(&sel(&["Thief"]), Some(&HALFLING));
        assert!(list.iter().any(|s| s.contains("Hide")));
        assert!(list.iter().any(|s| s.contains("Sneak attack")));
        let list = restrictions(&sel(&["Magic-User"]), Some(&ELF));
        assert!(list.iter().any(|s| s.contains("No armor")));
        assert!(custom_content_warning(&sel(&["Fighter"]), Some(&HUMAN)).is_none());
        assert!(custom_content_warning(&sel(&["Ranger"]), Some(&HUMAN)).is_some());
        assert!(custom_content_warning(&sel(&["Fighter"]), None).is_some());
    }

    #[test]
    fn test_delta_parsing() {
        assert_eq!(parse_xp_delta("+250"), Some(250));
        assert_eq!(parse_xp_delta(" -100 "), Some(-100));
        assert_eq!(parse_xp_delta("lots"), None);
        assert_eq!(parse_xp_delta("12.5"), None);
        assert_eq!(parse_gold_delta("+12.5"), Some(12.5));
        assert_eq!(parse_gold_delta("NaN"), None);
        assert_eq!(parse_gold_delta("inf"), None);
        assert_eq!(parse_gold_delta(""), None);
    }

    #[test]
    fn test_resolvers_are_deterministic() {
        let selection = sel(&["Magic-User", "Thief"]);
        for level in 1..=MAX_LEVEL {
            assert_eq!(attack_bonus(&selection, level), attack_bonus(&selection, level));
            assert_eq!(
                saving_throws(&selection, Some(&ELF), level).unwrap(),
                saving_throws(&selection, Some(&ELF), level).unwrap()
            );
            assert_eq!(hit_dice(&selection, Some(&ELF), level), hit_dice(&selection, Some(&ELF), level));
        }
    }
}
