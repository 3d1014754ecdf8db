//! Rules resolution scenarios taken from the Basic Fantasy core tables.
//!
//! Run with: `cargo test -p bfrpg-core --test rules_scenarios`
//! Set `RUST_LOG=debug` to see table lookups.

use bfrpg_core::class_data::{StandardClass, MAX_LEVEL};
use bfrpg_core::race_data::{StandardRace, DWARF, ELF, HALFLING, HUMAN};
use bfrpg_core::rules::{
    self, ArmorClass, CarryingCapacity, ClassKind, ClassSelection, Encumbrance,
};
use bfrpg_core::world::{AbilityScores, ArmorWeight};
use bfrpg_core::{items, RulesError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn selection(text: &str) -> ClassSelection {
    ClassSelection::parse(text)
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn test_list_and_joined_string_classify_alike() {
    let joined = selection("Magic-User Thief");
    let listed = ClassSelection::new(["Magic-User", "Thief"]);
    assert_eq!(joined.kind(), listed.kind());
    assert!(matches!(joined.kind(), ClassKind::Combination(ref c) if c.len() == 2));
    assert_eq!(joined.display_name(), "Magic-User/Thief");
}

// =============================================================================
// ATTACK BONUS
// =============================================================================

#[test]
fn test_fighter_attack_bonus() {
    init_tracing();
    assert_eq!(rules::attack_bonus(&selection("Fighter"), 1), 0);
    assert_eq!(rules::attack_bonus(&selection("Fighter"), 5), 2);
}

#[test]
fn test_combination_attack_bonus_never_below_components() {
    for level in 1..=MAX_LEVEL {
        let combined = rules::attack_bonus(&selection("Magic-User Thief"), level);
        assert!(combined >= rules::attack_bonus(&selection("Magic-User"), level));
        assert!(combined >= rules::attack_bonus(&selection("Thief"), level));
    }
}

// =============================================================================
// SAVING THROWS
// =============================================================================

#[test]
fn test_dwarf_cleric_first_level_saves() {
    init_tracing();
    let saves = rules::saving_throws(&selection("Cleric"), Some(&DWARF), 1)
        .unwrap()
        .unwrap();
    assert_eq!(saves.as_array(), [7, 8, 10, 12, 12]);
}

#[test]
fn test_saves_improve_with_level() {
    for class in StandardClass::all() {
        let sel = ClassSelection::from(*class);
        let mut last = rules::saving_throws(&sel, None, 1).unwrap().unwrap();
        for level in 2..=MAX_LEVEL {
            let saves = rules::saving_throws(&sel, None, level).unwrap().unwrap();
            for (now, before) in saves.as_array().iter().zip(last.as_array()) {
                assert!(*now <= before, "{class} level {level}");
            }
            last = saves;
        }
    }
}

#[test]
fn test_out_of_table_level_is_an_error() {
    let result = rules::saving_throws(&selection("Cleric"), Some(&HUMAN), 21);
    assert!(matches!(
        result,
        Err(RulesError::InvalidLevelRange {
            class: "Cleric",
            level: 21
        })
    ));
}

// =============================================================================
// ELIGIBILITY
// =============================================================================

#[test]
fn test_fighter_thief_rejected_even_with_perfect_scores() {
    let perfect = AbilityScores::new(18, 18, 18, 18, 17, 17).unwrap();
    for race in StandardRace::all() {
        assert!(!rules::selection_legal(
            &selection("Fighter Thief"),
            Some(race.definition()),
            &perfect
        ));
    }
}

#[test]
fn test_available_races_follow_scores() {
    let scores = AbilityScores::new(9, 9, 9, 9, 18, 9).unwrap();
    let races = rules::available_races(&scores);
    assert!(races.contains(&StandardRace::Dwarf));
    assert!(!races.contains(&StandardRace::Elf));
}

// =============================================================================
// HIT DICE AND ARMOR CLASS
// =============================================================================

#[test]
fn test_elf_combination_hit_dice() {
    let fmu = selection("Fighter Magic-User");
    let dice = rules::hit_dice(&fmu, Some(&ELF), 3).unwrap();
    assert_eq!(dice.to_string(), "3d6");
    let dice = rules::hit_dice(&fmu, Some(&ELF), 10).unwrap();
    assert_eq!(dice.to_string(), "9d6+1");
}

#[test]
fn test_catalog_armor_class() {
    let mut chain = items::find_item("Chain Mail").unwrap();
    chain.worn = Some(bfrpg_core::world::WornSlot::Armor);
    let mut shield = items::find_item("Shield").unwrap();
    shield.worn = Some(bfrpg_core::world::WornSlot::Shield);
    assert_eq!(
        rules::armor_class(&[chain, shield], -1, Some(&DWARF)),
        ArmorClass {
            melee: 15,
            missile: 15
        }
    );
}

// =============================================================================
// CARRYING CAPACITY
// =============================================================================

#[test]
fn test_halfling_strength_ten_capacity() {
    assert_eq!(
        rules::carrying_capacity(10, Some(&HALFLING)),
        CarryingCapacity {
            light: 50,
            heavy: 100
        }
    );
}

#[test]
fn test_halfling_overloaded_cannot_move() {
    let capacity = rules::carrying_capacity(10, Some(&HALFLING));
    let plate = items::find_item("Plate Mail").unwrap().with_amount(3);
    let load = rules::carried_weight(&[plate]);
    assert_eq!(rules::encumbrance(load, capacity), Encumbrance::Overloaded);
    assert_eq!(
        rules::movement(rules::encumbrance(load, capacity), ArmorWeight::Heavy),
        0
    );
}
