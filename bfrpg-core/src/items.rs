//! Basic Fantasy equipment list.
//!
//! Weapons, ammunition, armor and adventuring gear that the wizard's shop
//! step offers. Lookups are case-insensitive and return owned copies so the
//! caller can stack or wear them.

use crate::race_data::RaceDefinition;
use crate::rules::{item_disabled, ClassSelection};
use crate::world::{ArmorWeight, Cost, Item, ItemCategory, WeaponSize};

/// Find any catalog item by name.
pub fn find_item(name: &str) -> Option<Item> {
    let name = name.trim();
    all_items()
        .find(|item| item.name.eq_ignore_ascii_case(name))
        .cloned()
}

/// Every catalog item, weapons first.
pub fn all_items() -> impl Iterator<Item = &'static Item> {
    WEAPONS
        .iter()
        .chain(AMMUNITION.iter())
        .chain(ARMORS.iter())
        .chain(GEAR.iter())
}

pub fn items_in(category: ItemCategory) -> impl Iterator<Item = &'static Item> {
    all_items().filter(move |item| item.category == category)
}

/// Catalog entries paired with whether the character may use them.
pub fn shop<'a>(
    classes: &'a ClassSelection,
    race: Option<&'a RaceDefinition>,
) -> impl Iterator<Item = (&'static Item, bool)> + 'a {
    all_items().map(move |item| (item, item_disabled(item, classes, race)))
}

// ============================================================================
// Weapons
// ============================================================================

lazy_static::lazy_static! {
    pub static ref WEAPONS: Vec<Item> = vec![
        // Axes
        Item::weapon("Hand Axe", WeaponSize::Small, "1d6", Cost::gp(4.0)).with_weight(5.0),
        Item::weapon("Battle Axe", WeaponSize::Medium, "1d8", Cost::gp(7.0)).with_weight(7.0),
        Item::weapon("Great Axe", WeaponSize::Large, "1d10", Cost::gp(14.0)).with_weight(15.0),
        // Bows
        Item::weapon("Shortbow", WeaponSize::Medium, "1d6", Cost::gp(25.0)).with_weight(2.0),
        Item::weapon("Longbow", WeaponSize::Large, "1d8", Cost::gp(60.0)).with_weight(3.0),
        Item::weapon("Light Crossbow", WeaponSize::Medium, "1d6", Cost::gp(30.0)).with_weight(7.0),
        Item::weapon("Heavy Crossbow", WeaponSize::Large, "1d8", Cost::gp(50.0)).with_weight(14.0),
        // Daggers and swords
        Item::weapon("Dagger", WeaponSize::Small, "1d4", Cost::gp(2.0)).with_weight(1.0),
        Item::weapon("Silver Dagger", WeaponSize::Small, "1d4", Cost::gp(25.0)).with_weight(1.0),
        Item::weapon("Shortsword", WeaponSize::Small, "1d6", Cost::gp(6.0)).with_weight(3.0),
        Item::weapon("Longsword", WeaponSize::Medium, "1d8", Cost::gp(10.0)).with_weight(4.0),
        Item::weapon("Scimitar", WeaponSize::Medium, "1d8", Cost::gp(10.0)).with_weight(4.0),
        Item::weapon("Two-Handed Sword", WeaponSize::Large, "1d10", Cost::gp(18.0)).with_weight(10.0),
        // Hammers and maces
        Item::weapon("Warhammer", WeaponSize::Small, "1d6", Cost::gp(4.0)).with_weight(6.0).blunt(),
        Item::weapon("Mace", WeaponSize::Medium, "1d8", Cost::gp(6.0)).with_weight(10.0).blunt(),
        Item::weapon("Maul", WeaponSize::Large, "1d10", Cost::gp(10.0)).with_weight(16.0).blunt(),
        // Other weapons
        Item::weapon("Club", WeaponSize::Medium, "1d4", Cost::sp(2.0)).with_weight(1.0).blunt(),
        Item::weapon("Walking Staff", WeaponSize::Medium, "1d4", Cost::sp(2.0)).with_weight(1.0).blunt(),
        Item::weapon("Quarterstaff", WeaponSize::Large, "1d6", Cost::gp(2.0)).with_weight(4.0).blunt(),
        Item::weapon("Pole Arm", WeaponSize::Large, "1d10", Cost::gp(9.0)).with_weight(15.0),
        Item::weapon("Sling", WeaponSize::Small, "1d4", Cost::gp(1.0)).with_weight(1.0).blunt(),
        Item::weapon("Spear", WeaponSize::Medium, "1d6", Cost::gp(5.0)).with_weight(5.0),
    ];
}

// ============================================================================
// Ammunition
// ============================================================================

lazy_static::lazy_static! {
    pub static ref AMMUNITION: Vec<Item> = vec![
        Item::new("Arrows (quiver of 20)", ItemCategory::Ammunition, Cost::gp(3.5)).with_weight(1.0),
        Item::new("Silver Arrow", ItemCategory::Ammunition, Cost::gp(5.0)),
        Item::new("Crossbow Bolts (case of 30)", ItemCategory::Ammunition, Cost::gp(10.0)).with_weight(1.0),
        Item::new("Sling Bullets (pouch of 30)", ItemCategory::Ammunition, Cost::gp(1.0)).with_weight(1.0),
    ];
}

// ============================================================================
// Armor
// ============================================================================

lazy_static::lazy_static! {
    pub static ref ARMORS: Vec<Item> = vec![
        Item::armor("Leather Armor", 13, ArmorWeight::Medium, Cost::gp(20.0)).with_weight(15.0),
        Item::armor("Chain Mail", 15, ArmorWeight::Heavy, Cost::gp(60.0)).with_weight(40.0),
        Item::armor("Plate Mail", 17, ArmorWeight::Heavy, Cost::gp(300.0)).with_weight(50.0),
        Item::new("Shield", ItemCategory::Shield, Cost::gp(7.0)).with_ac(1).with_weight(5.0),
    ];
}

// ============================================================================
// Adventuring Gear
// ============================================================================

lazy_static::lazy_static! {
    pub static ref GEAR: Vec<Item> = vec![
        Item::new("Backpack", ItemCategory::Gear, Cost::gp(4.0)).with_weight(2.0),
        Item::new("Belt Pouch", ItemCategory::Gear, Cost::gp(1.0)),
        Item::new("Candles (12)", ItemCategory::Gear, Cost::gp(1.0)),
        Item::new("Chalk (small bag)", ItemCategory::Gear, Cost::gp(2.0)),
        Item::new("Cloak", ItemCategory::Gear, Cost::gp(2.0)).with_weight(1.0),
        Item::new("Holy Symbol", ItemCategory::Gear, Cost::gp(25.0)),
        Item::new("Holy Water (vial)", ItemCategory::Gear, Cost::gp(10.0)),
        Item::new("Iron Spikes (12)", ItemCategory::Gear, Cost::gp(1.0)).with_weight(8.0),
        Item::new("Lantern", ItemCategory::Gear, Cost::gp(5.0)).with_weight(2.0),
        Item::new("Mirror (small metal)", ItemCategory::Gear, Cost::gp(7.0)),
        Item::new("Oil (flask)", ItemCategory::Gear, Cost::gp(1.0)).with_weight(1.0),
        Item::new("Quill", ItemCategory::Gear, Cost::sp(1.0)),
        Item::new("Rations (dry, one week)", ItemCategory::Gear, Cost::gp(10.0)).with_weight(14.0),
        Item::new("Rope (hemp, 50 ft)", ItemCategory::Gear, Cost::gp(1.0)).with_weight(5.0),
        Item::new("Rope (silk, 50 ft)", ItemCategory::Gear, Cost::gp(10.0)).with_weight(2.0),
        Item::new("Sack (large)", ItemCategory::Gear, Cost::gp(1.0)),
        Item::new("Spellbook (128 pages)", ItemCategory::Gear, Cost::gp(25.0)).with_weight(1.0),
        Item::new("Thieves' Picks and Tools", ItemCategory::Gear, Cost::gp(25.0)).with_weight(1.0),
        Item::new("Tinderbox", ItemCategory::Gear, Cost::gp(3.0)).with_weight(1.0),
        Item::new("Torches (6)", ItemCategory::Gear, Cost::gp(1.0)).with_weight(1.0),
        Item::new("Waterskin", ItemCategory::Gear, Cost::gp(1.0)).with_weight(2.0),
        Item::new("Wolfsbane (bunch)", ItemCategory::Gear, Cost::gp(10.0)),
    ];
}
