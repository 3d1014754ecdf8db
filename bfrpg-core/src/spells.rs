//! Basic Fantasy spell list.
//!
//! Each spell records the level at which every class that can cast it learns
//! it. Clerics and magic-users share some spells at different levels
//! (Hold Person is 2nd for clerics, 3rd for magic-users).

use crate::class_data::StandardClass;
use crate::rules::{spell_budget, ClassSelection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// A spell entry on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub range: String,
    pub duration: String,
    pub description: String,
    /// Spell level for each class that can cast it.
    pub levels: BTreeMap<StandardClass, u8>,
}

impl Spell {
    fn new(
        name: &str,
        levels: &[(StandardClass, u8)],
        range: &str,
        duration: &str,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            range: range.to_string(),
            duration: duration.to_string(),
            description: description.to_string(),
            levels: levels.iter().copied().collect(),
        }
    }

    pub fn level_for(&self, class: StandardClass) -> Option<u8> {
        self.levels.get(&class).copied()
    }
}

// ============================================================================
// Spell Database
// ============================================================================

static SPELL_DATABASE: LazyLock<HashMap<String, Spell>> = LazyLock::new(build_spell_database);

/// Look up a spell by name (case-insensitive).
pub fn get_spell(name: &str) -> Option<&'static Spell> {
    SPELL_DATABASE.get(&name.trim().to_lowercase())
}

pub fn all_spells() -> impl Iterator<Item = &'static Spell> {
    SPELL_DATABASE.values()
}

/// Spells a class learns at exactly `level`.
pub fn spells_for_class(class: StandardClass, level: u8) -> impl Iterator<Item = &'static Spell> {
    SPELL_DATABASE
        .values()
        .filter(move |spell| spell.level_for(class) == Some(level))
}

/// Spells the character can currently cast, sorted by name.
///
/// A spell qualifies when one of the character's classes lists it at a spell
/// level for which that class has at least one slot per day.
pub fn available_spells(classes: &ClassSelection, level: u8) -> Vec<&'static Spell> {
    let budgets: Vec<(StandardClass, [u8; 6])> = classes
        .kind()
        .classes()
        .iter()
        .map(|class| (*class, spell_budget(&ClassSelection::from(*class), level)))
        .collect();
    let mut spells: Vec<&'static Spell> = all_spells()
        .filter(|spell| {
            budgets.iter().any(|(class, budget)| {
                spell
                    .level_for(*class)
                    .and_then(|l| budget.get(l as usize - 1))
                    .is_some_and(|slots| *slots > 0)
            })
        })
        .collect();
    spells.sort_by(|a, b| a.name.cmp(&b.name));
    spells
}

/// Spells a newly built character starts with.
pub fn starting_spells(classes: &ClassSelection) -> Vec<Spell> {
    classes
        .kind()
        .classes()
        .iter()
        .flat_map(|class| class.definition().starting_spells)
        .filter_map(|name| get_spell(name).cloned())
        .collect()
}

fn build_spell_database() -> HashMap<String, Spell> {
    use StandardClass::{Cleric, MagicUser};

    let spells = vec![
        // ====================================================================
        // FIRST LEVEL
        // ====================================================================
        Spell::new(
            "Cure Light Wounds",
            &[(Cleric, 1)],
            "touch",
            "instantaneous",
            "Heals 1d6+1 hit points, or cures paralysis instead of healing.",
        ),
        Spell::new(
            "Detect Evil",
            &[(Cleric, 1)],
            "60'",
            "1 round/level",
            "Reveals evil creatures and evilly enchanted objects within range.",
        ),
        Spell::new(
            "Detect Magic",
            &[(Cleric, 1), (MagicUser, 1)],
            "60'",
            "2 turns",
            "Magical objects, creatures and places within range glow faintly.",
        ),
        Spell::new(
            "Light",
            &[(Cleric, 1), (MagicUser, 1)],
            "120'",
            "6 turns + 1/level",
            "Creates light as bright as a torch in a 30' radius.",
        ),
        Spell::new(
            "Protection from Evil",
            &[(Cleric, 1), (MagicUser, 1)],
            "touch",
            "1 turn/level",
            "Wards the subject against attacks by evil creatures.",
        ),
        Spell::new(
            "Purify Food and Water",
            &[(Cleric, 1)],
            "10'",
            "instantaneous",
            "Makes spoiled or poisoned food and water fit to consume.",
        ),
        Spell::new(
            "Remove Fear",
            &[(Cleric, 1)],
            "touch",
            "2 turns",
            "Calms the subject and suppresses magical fear.",
        ),
        Spell::new(
            "Resist Cold",
            &[(Cleric, 1)],
            "0",
            "1 round/level",
            "Allies within 30' shrug off normal cold and save better against cold attacks.",
        ),
        Spell::new(
            "Charm Person",
            &[(MagicUser, 1)],
            "30'",
            "special",
            "A humanoid that fails its save regards the caster as a trusted friend.",
        ),
        Spell::new(
            "Floating Disc",
            &[(MagicUser, 1)],
            "0",
            "5 turns + 1/level",
            "An invisible disc carries up to 500 pounds behind the caster.",
        ),
        Spell::new(
            "Hold Portal",
            &[(MagicUser, 1)],
            "100'",
            "1 round/level",
            "Magically holds a door, gate or window shut.",
        ),
        Spell::new(
            "Magic Missile",
            &[(MagicUser, 1)],
            "100' + 10'/level",
            "instantaneous",
            "A missile of magical energy unerringly strikes for 1d6+1 damage.",
        ),
        Spell::new(
            "Read Languages",
            &[(MagicUser, 1)],
            "0",
            "special",
            "The caster can read any written language for two readings.",
        ),
        Spell::new(
            "Read Magic",
            &[(MagicUser, 1)],
            "0",
            "permanent",
            "Lets the caster read magical inscriptions and scrolls.",
        ),
        Spell::new(
            "Shield",
            &[(MagicUser, 1)],
            "self",
            "5 rounds + 1/level",
            "An invisible disc gives AC 17 against missiles and AC 15 against other attacks.",
        ),
        Spell::new(
            "Sleep",
            &[(MagicUser, 1)],
            "90'",
            "5 rounds/level",
            "Puts 2d8 hit dice of creatures into a magical slumber.",
        ),
        Spell::new(
            "Ventriloquism",
            &[(MagicUser, 1)],
            "60'",
            "1 turn/level",
            "The caster's voice seems to come from somewhere else.",
        ),
        // ====================================================================
        // SECOND LEVEL
        // ====================================================================
        Spell::new(
            "Bless",
            &[(Cleric, 2)],
            "50' radius",
            "1 minute/level",
            "Allies gain +1 on attack rolls and morale.",
        ),
        Spell::new(
            "Find Traps",
            &[(Cleric, 2)],
            "30'",
            "3 turns",
            "Traps within range glow dimly blue.",
        ),
        Spell::new(
            "Hold Person",
            &[(Cleric, 2), (MagicUser, 3)],
            "180'",
            "2d8 turns",
            "Paralyzes one or more humanoids that fail their saves.",
        ),
        Spell::new(
            "Silence 15' radius",
            &[(Cleric, 2)],
            "360'",
            "2 rounds/level",
            "Creates an area of total silence.",
        ),
        Spell::new(
            "Speak with Animals",
            &[(Cleric, 2)],
            "0",
            "1 turn/level",
            "The caster can converse with normal or giant animals.",
        ),
        Spell::new(
            "Continual Light",
            &[(Cleric, 3), (MagicUser, 2)],
            "360'",
            "permanent",
            "Creates lasting light as bright as full daylight.",
        ),
        Spell::new(
            "ESP",
            &[(MagicUser, 2)],
            "60'",
            "1 turn/level",
            "The caster hears the surface thoughts of nearby creatures.",
        ),
        Spell::new(
            "Invisibility",
            &[(MagicUser, 2)],
            "touch",
            "special",
            "The subject vanishes from sight until it attacks.",
        ),
        Spell::new(
            "Knock",
            &[(MagicUser, 2)],
            "60'",
            "special",
            "Opens a stuck, barred, locked or magically held door.",
        ),
        Spell::new(
            "Levitate",
            &[(MagicUser, 2)],
            "touch",
            "1 turn/level",
            "The subject floats up and down at the caster's direction.",
        ),
        Spell::new(
            "Mirror Image",
            &[(MagicUser, 2)],
            "self",
            "1 turn/level",
            "Creates 1d4 illusory duplicates of the caster.",
        ),
        Spell::new(
            "Web",
            &[(MagicUser, 2)],
            "10'/level",
            "2 turns/level",
            "Fills an area with sticky strands that entangle creatures.",
        ),
        // ====================================================================
        // THIRD LEVEL AND ABOVE
        // ====================================================================
        Spell::new(
            "Cure Disease",
            &[(Cleric, 3)],
            "touch",
            "instantaneous",
            "Cures all diseases afflicting the subject.",
        ),
        Spell::new(
            "Remove Curse",
            &[(Cleric, 3), (MagicUser, 4)],
            "touch",
            "instantaneous",
            "Frees a person or object from a curse.",
        ),
        Spell::new(
            "Dispel Magic",
            &[(Cleric, 4), (MagicUser, 3)],
            "120'",
            "instantaneous",
            "Cancels spells and magical effects in a 20' cube.",
        ),
        Spell::new(
            "Fireball",
            &[(MagicUser, 3)],
            "100' + 10'/level",
            "instantaneous",
            "An explosion of flame deals 1d6 damage per caster level in a 20' radius.",
        ),
        Spell::new(
            "Fly",
            &[(MagicUser, 3)],
            "touch",
            "1 turn/level",
            "The subject flies at a speed of 120'.",
        ),
        Spell::new(
            "Lightning Bolt",
            &[(MagicUser, 3)],
            "50' + 10'/level",
            "instantaneous",
            "A bolt of electricity deals 1d6 damage per caster level.",
        ),
        Spell::new(
            "Cure Serious Wounds",
            &[(Cleric, 4)],
            "touch",
            "instantaneous",
            "Heals 3d6+3 hit points.",
        ),
        Spell::new(
            "Polymorph Self",
            &[(MagicUser, 4)],
            "self",
            "1 hour/level",
            "The caster takes the form of another creature.",
        ),
        Spell::new(
            "Raise Dead",
            &[(Cleric, 5)],
            "120'",
            "instantaneous",
            "Restores life to a creature dead no more than a few days.",
        ),
        Spell::new(
            "Teleport",
            &[(MagicUser, 5)],
            "touch",
            "instantaneous",
            "Instantly transports the caster to a known location.",
        ),
        Spell::new(
            "Animate Objects",
            &[(Cleric, 6)],
            "60'",
            "1 round/level",
            "Objects come to life and attack at the caster's command.",
        ),
        Spell::new(
            "Disintegrate",
            &[(MagicUser, 6)],
            "60'",
            "instantaneous",
            "A thin green ray reduces one creature or object to dust.",
        ),
    ];

    spells
        .into_iter()
        .map(|spell| (spell.name.to_lowercase(), spell))
        .collect()
}
