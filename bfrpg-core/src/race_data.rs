//! Basic Fantasy race tables.
//!
//! The four core races are a closed enum, each mapped to one static
//! [`RaceDefinition`]. Anything else a player types is a custom race and
//! bypasses the tables.

use crate::class_data::{SavingThrows, StandardClass};
use crate::dice::DieType;
use crate::world::{Ability, WeaponSize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The standard races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardRace {
    Dwarf,
    Elf,
    Halfling,
    Human,
}

impl StandardRace {
    pub fn name(&self) -> &'static str {
        match self {
            StandardRace::Dwarf => "Dwarf",
            StandardRace::Elf => "Elf",
            StandardRace::Halfling => "Halfling",
            StandardRace::Human => "Human",
        }
    }

    pub fn from_name(name: &str) -> Option<StandardRace> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|race| race.name().eq_ignore_ascii_case(name))
    }

    pub fn all() -> &'static [StandardRace] {
        &[
            StandardRace::Dwarf,
            StandardRace::Elf,
            StandardRace::Halfling,
            StandardRace::Human,
        ]
    }

    pub fn definition(&self) -> &'static RaceDefinition {
        match self {
            StandardRace::Dwarf => &DWARF,
            StandardRace::Elf => &ELF,
            StandardRace::Halfling => &HALFLING,
            StandardRace::Human => &HUMAN,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StandardRace::Dwarf => "Short, stocky and tough, dwarves resist magic and poison",
            StandardRace::Elf => "Slender and long-lived, elves combine swordplay with spells",
            StandardRace::Halfling => "Small and nimble folk who vanish into the brush",
            StandardRace::Human => "Adaptable and ambitious, humans may follow any path",
        }
    }
}

impl fmt::Display for StandardRace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A character's race: one of the standard races or a free-form custom name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Race {
    Standard(StandardRace),
    Custom(String),
}

impl Race {
    pub fn parse(name: &str) -> Race {
        match StandardRace::from_name(name) {
            Some(race) => Race::Standard(race),
            None => Race::Custom(name.trim().to_string()),
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, Race::Standard(_))
    }

    /// Table data, or `None` for custom races.
    pub fn definition(&self) -> Option<&'static RaceDefinition> {
        match self {
            Race::Standard(race) => Some(race.definition()),
            Race::Custom(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Race::Standard(race) => race.name(),
            Race::Custom(name) => name,
        }
    }
}

impl From<StandardRace> for Race {
    fn from(race: StandardRace) -> Self {
        Race::Standard(race)
    }
}

impl From<String> for Race {
    fn from(name: String) -> Self {
        Race::parse(&name)
    }
}

impl From<Race> for String {
    fn from(race: Race) -> Self {
        race.name().to_string()
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Static table data for one race.
///
/// Standard races use the statics below; a table-driven custom race can be
/// described with the same shape and handed straight to the resolvers.
#[derive(Debug, Clone, Copy)]
pub struct RaceDefinition {
    pub name: &'static str,
    pub minimums: &'static [(Ability, u8)],
    pub maximums: &'static [(Ability, u8)],
    pub classes: &'static [StandardClass],
    /// Allowed two-class combinations, order-insensitive.
    pub combinations: &'static [[StandardClass; 2]],
    /// Largest hit die the race may roll.
    pub max_hit_die: Option<DieType>,
    /// Steps up (positive) or down the hit die scale, applied after the cap.
    pub hit_die_shift: i8,
    /// Signed saving throw adjustments; negative is better.
    pub save_adjustments: SavingThrows,
    /// Unarmored AC when it differs from 11.
    pub base_ac: Option<i8>,
    pub forbidden_weapons: &'static [WeaponSize],
    /// Small races use the reduced carrying capacity table.
    pub small: bool,
    pub experience_bonus_percent: u8,
    pub specials: &'static [&'static str],
    pub restrictions: &'static [&'static str],
}

impl RaceDefinition {
    pub fn allows_class(&self, class: StandardClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn allows_combination(&self, first: StandardClass, second: StandardClass) -> bool {
        self.combinations
            .iter()
            .any(|[a, b]| (*a == first && *b == second) || (*a == second && *b == first))
    }
}

pub static DWARF: RaceDefinition = RaceDefinition {
    name: "Dwarf",
    minimums: &[(Ability::Constitution, 9)],
    maximums: &[(Ability::Charisma, 17)],
    classes: &[StandardClass::Cleric, StandardClass::Fighter, StandardClass::Thief],
    combinations: &[],
    max_hit_die: None,
    hit_die_shift: 0,
    save_adjustments: SavingThrows::new(-4, -4, -4, -4, -3),
    base_ac: None,
    forbidden_weapons: &[WeaponSize::Large],
    small: false,
    experience_bonus_percent: 0,
    specials: &["Darkvision 60'", "Detect slanting passages, traps and shifting walls (1-2 on 1d6)"],
    restrictions: &["May not use Large weapons"],
};

pub static ELF: RaceDefinition = RaceDefinition {
    name: "Elf",
    minimums: &[(Ability::Intelligence, 9)],
    maximums: &[(Ability::Constitution, 17)],
    classes: &[
        StandardClass::Cleric,
        StandardClass::Fighter,
        StandardClass::MagicUser,
        StandardClass::Thief,
    ],
    combinations: &[
        [StandardClass::Fighter, StandardClass::MagicUser],
        [StandardClass::MagicUser, StandardClass::Thief],
    ],
    max_hit_die: Some(DieType::D6),
    hit_die_shift: 0,
    save_adjustments: SavingThrows::new(0, -2, -1, 0, -2),
    base_ac: None,
    forbidden_weapons: &[],
    small: false,
    experience_bonus_percent: 0,
    specials: &[
        "Darkvision 60'",
        "Find secret doors (1-2 on 1d6)",
        "Immune to ghoul paralysis",
        "Surprised only on a 1 on 1d6",
    ],
    restrictions: &["Never rolls larger than d6 for hit points"],
};

pub static HALFLING: RaceDefinition = RaceDefinition {
    name: "Halfling",
    minimums: &[(Ability::Dexterity, 9)],
    maximums: &[(Ability::Strength, 17)],
    classes: &[StandardClass::Cleric, StandardClass::Fighter, StandardClass::Thief],
    combinations: &[],
    max_hit_die: Some(DieType::D6),
    hit_die_shift: 0,
    save_adjustments: SavingThrows::new(-4, -4, -4, -4, -3),
    base_ac: None,
    forbidden_weapons: &[WeaponSize::Large],
    small: true,
    experience_bonus_percent: 0,
    specials: &[
        "+1 attack bonus with ranged weapons",
        "+2 AC against creatures larger than man-sized",
        "Hide: 90% outdoors, 70% indoors",
        "+1 initiative",
    ],
    restrictions: &[
        "Never rolls larger than d6 for hit points",
        "May not use Large weapons; Medium weapons need both hands",
    ],
};

pub static HUMAN: RaceDefinition = RaceDefinition {
    name: "Human",
    minimums: &[],
    maximums: &[],
    classes: &[
        StandardClass::Cleric,
        StandardClass::Fighter,
        StandardClass::MagicUser,
        StandardClass::Thief,
    ],
    combinations: &[],
    max_hit_die: None,
    hit_die_shift: 0,
    save_adjustments: SavingThrows::new(0, 0, 0, 0, 0),
    base_ac: None,
    forbidden_weapons: &[],
    small: false,
    experience_bonus_percent: 10,
    specials: &["+10% to all experience earned"],
    restrictions: &[],
};
