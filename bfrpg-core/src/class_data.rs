//! Basic Fantasy class tables.
//!
//! Hit dice, experience, attack bonus, saving throws, spells per day and
//! thief abilities for the four core classes, plus the equipment rules
//! each class lives under.

use crate::dice::DieType;
use crate::error::RulesError;
use crate::world::Ability;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The standard classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StandardClass {
    Cleric,
    Fighter,
    #[serde(rename = "Magic-User")]
    MagicUser,
    Thief,
}

impl StandardClass {
    pub fn name(&self) -> &'static str {
        match self {
            StandardClass::Cleric => "Cleric",
            StandardClass::Fighter => "Fighter",
            StandardClass::MagicUser => "Magic-User",
            StandardClass::Thief => "Thief",
        }
    }

    /// Case-insensitive lookup by sheet name.
    pub fn from_name(name: &str) -> Option<StandardClass> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(name))
    }

    pub fn all() -> &'static [StandardClass] {
        &[
            StandardClass::Cleric,
            StandardClass::Fighter,
            StandardClass::MagicUser,
            StandardClass::Thief,
        ]
    }

    pub fn definition(&self) -> &'static ClassDefinition {
        match self {
            StandardClass::Cleric => &CLERIC,
            StandardClass::Fighter => &FIGHTER,
            StandardClass::MagicUser => &MAGIC_USER,
            StandardClass::Thief => &THIEF,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StandardClass::Cleric => "A holy warrior who turns the undead and casts divine spells",
            StandardClass::Fighter => "A trained combatant at home in any armor",
            StandardClass::MagicUser => "A scholar of arcane spells, frail in a fight",
            StandardClass::Thief => "A sneak and skill expert who strikes from behind",
        }
    }
}

impl fmt::Display for StandardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Saving Throws
// ============================================================================

/// The five saving throw categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaveCategory {
    DeathRay,
    Wands,
    Paralysis,
    DragonBreath,
    Spells,
}

impl SaveCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SaveCategory::DeathRay => "Death Ray or Poison",
            SaveCategory::Wands => "Magic Wands",
            SaveCategory::Paralysis => "Paralysis or Petrify",
            SaveCategory::DragonBreath => "Dragon Breath",
            SaveCategory::Spells => "Spells",
        }
    }

    pub fn all() -> [SaveCategory; 5] {
        [
            SaveCategory::DeathRay,
            SaveCategory::Wands,
            SaveCategory::Paralysis,
            SaveCategory::DragonBreath,
            SaveCategory::Spells,
        ]
    }
}

/// One value per saving throw category.
///
/// Class tables hold target numbers (roll this or higher, lower is better).
/// Race tables reuse the shape for signed adjustments that are added to the
/// target, so negative is better there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavingThrows {
    pub death_ray: i8,
    pub wands: i8,
    pub paralysis: i8,
    pub dragon_breath: i8,
    pub spells: i8,
}

impl SavingThrows {
    pub const fn new(death_ray: i8, wands: i8, paralysis: i8, dragon_breath: i8, spells: i8) -> Self {
        Self {
            death_ray,
            wands,
            paralysis,
            dragon_breath,
            spells,
        }
    }

    pub fn get(&self, category: SaveCategory) -> i8 {
        match category {
            SaveCategory::DeathRay => self.death_ray,
            SaveCategory::Wands => self.wands,
            SaveCategory::Paralysis => self.paralysis,
            SaveCategory::DragonBreath => self.dragon_breath,
            SaveCategory::Spells => self.spells,
        }
    }

    fn zip_with(&self, other: &SavingThrows, f: impl Fn(i8, i8) -> i8) -> SavingThrows {
        SavingThrows::new(
            f(self.death_ray, other.death_ray),
            f(self.wands, other.wands),
            f(self.paralysis, other.paralysis),
            f(self.dragon_breath, other.dragon_breath),
            f(self.spells, other.spells),
        )
    }

    /// Per-category minimum: each category independently takes the better target.
    pub fn best(&self, other: &SavingThrows) -> SavingThrows {
        self.zip_with(other, i8::min)
    }

    /// Add signed adjustments category by category.
    pub fn adjusted(&self, adjustments: &SavingThrows) -> SavingThrows {
        self.zip_with(adjustments, |target, delta| target + delta)
    }

    pub fn as_array(&self) -> [i8; 5] {
        [
            self.death_ray,
            self.wands,
            self.paralysis,
            self.dragon_breath,
            self.spells,
        ]
    }
}

// ============================================================================
// Thief Abilities
// ============================================================================

/// Percentage chances for thief abilities at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThiefSkills {
    pub open_locks: u8,
    pub remove_traps: u8,
    pub pick_pockets: u8,
    pub move_silently: u8,
    pub climb_walls: u8,
    pub hide: u8,
    pub listen: u8,
}

impl ThiefSkills {
    const fn new(
        open_locks: u8,
        remove_traps: u8,
        pick_pockets: u8,
        move_silently: u8,
        climb_walls: u8,
        hide: u8,
        listen: u8,
    ) -> Self {
        Self {
            open_locks,
            remove_traps,
            pick_pockets,
            move_silently,
            climb_walls,
            hide,
            listen,
        }
    }

    /// Per-skill maximum of two tables.
    pub fn best(&self, other: &ThiefSkills) -> ThiefSkills {
        ThiefSkills::new(
            self.open_locks.max(other.open_locks),
            self.remove_traps.max(other.remove_traps),
            self.pick_pockets.max(other.pick_pockets),
            self.move_silently.max(other.move_silently),
            self.climb_walls.max(other.climb_walls),
            self.hide.max(other.hide),
            self.listen.max(other.listen),
        )
    }
}

// ============================================================================
// Equipment Rules
// ============================================================================

/// Which weapons a class may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponRule {
    Any,
    BluntOnly,
    /// Only these weapons, matched by name.
    Only(&'static [&'static str]),
}

/// Which armor a class may wear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorRule {
    Any,
    Forbidden,
    Only(&'static [&'static str]),
}

// ============================================================================
// Class Definition
// ============================================================================

/// Highest level with table data.
pub const MAX_LEVEL: u8 = 20;

/// Spells per day by spell level 1-6.
pub type SpellsPerDay = [u8; 6];

/// Static table data for one class.
#[derive(Debug)]
pub struct ClassDefinition {
    pub class: StandardClass,
    /// Prime requisite and the minimum score it needs.
    pub requirement: (Ability, u8),
    pub hit_die: DieType,
    /// Flat hit points gained per level past 9th.
    pub hit_points_after_ninth: i32,
    /// Experience needed to reach each level; index 0 is level 1.
    pub experience: [u32; 20],
    /// Attack bonus looked up at index `level - 1`.
    pub attack_bonus: [i8; 21],
    /// Ascending checkpoints: each row covers levels up to and including its key.
    pub saving_throws: &'static [(u8, SavingThrows)],
    pub spells_per_day: Option<&'static [SpellsPerDay; 20]>,
    pub thief_skills: Option<&'static [ThiefSkills; 20]>,
    pub starting_spells: &'static [&'static str],
    pub weapons: WeaponRule,
    pub armor: ArmorRule,
    pub shields: bool,
    /// Classes this one may never be combined with.
    pub excludes: &'static [StandardClass],
    pub specials: &'static [&'static str],
    pub restrictions: &'static [&'static str],
}

impl ClassDefinition {
    pub fn name(&self) -> &'static str {
        self.class.name()
    }

    pub fn attack_bonus_at(&self, level: u8) -> i8 {
        let index = (level.max(1) as usize - 1).min(self.attack_bonus.len() - 1);
        self.attack_bonus[index]
    }

    /// Saving throw targets for `level`. Fails when no row covers the level.
    pub fn saving_throws_at(&self, level: u8) -> Result<SavingThrows, RulesError> {
        let invalid = RulesError::InvalidLevelRange {
            class: self.name(),
            level,
        };
        if level == 0 {
            return Err(invalid);
        }
        self.saving_throws
            .iter()
            .find(|(upto, _)| *upto >= level)
            .map(|(_, saves)| *saves)
            .ok_or(invalid)
    }

    /// Experience needed to reach `level`, if the table goes that far.
    pub fn experience_for(&self, level: u8) -> Option<u32> {
        if level == 0 {
            return None;
        }
        self.experience.get(level as usize - 1).copied()
    }

    pub fn spells_per_day_at(&self, level: u8) -> Option<SpellsPerDay> {
        let table = self.spells_per_day?;
        table.get(level.clamp(1, MAX_LEVEL) as usize - 1).copied()
    }

    pub fn thief_skills_at(&self, level: u8) -> Option<ThiefSkills> {
        let table = self.thief_skills?;
        table.get(level.clamp(1, MAX_LEVEL) as usize - 1).copied()
    }

    pub fn meets_requirement(&self, score: u8) -> bool {
        score >= self.requirement.1
    }
}

const fn st(death_ray: i8, wands: i8, paralysis: i8, dragon_breath: i8, spells: i8) -> SavingThrows {
    SavingThrows::new(death_ray, wands, paralysis, dragon_breath, spells)
}

const fn ts(ol: u8, rt: u8, pp: u8, ms: u8, cw: u8, hi: u8, li: u8) -> ThiefSkills {
    ThiefSkills::new(ol, rt, pp, ms, cw, hi, li)
}

static CLERIC_SAVES: [(u8, SavingThrows); 11] = [
    (1, st(11, 12, 14, 16, 15)),
    (3, st(10, 11, 13, 15, 14)),
    (5, st(9, 10, 13, 15, 14)),
    (7, st(9, 10, 12, 14, 13)),
    (9, st(8, 9, 12, 14, 13)),
    (11, st(8, 9, 11, 13, 12)),
    (13, st(7, 8, 11, 13, 12)),
    (15, st(7, 8, 10, 12, 11)),
    (17, st(6, 7, 10, 12, 11)),
    (19, st(6, 7, 9, 11, 10)),
    (20, st(5, 6, 9, 11, 10)),
];

static FIGHTER_SAVES: [(u8, SavingThrows); 11] = [
    (1, st(12, 13, 14, 15, 17)),
    (3, st(11, 12, 14, 15, 16)),
    (5, st(11, 11, 13, 14, 15)),
    (7, st(10, 11, 12, 14, 15)),
    (9, st(9, 10, 12, 13, 14)),
    (11, st(9, 9, 11, 12, 13)),
    (13, st(8, 9, 10, 12, 13)),
    (15, st(7, 8, 9, 11, 12)),
    (17, st(7, 7, 9, 10, 11)),
    (19, st(6, 7, 8, 10, 11)),
    (20, st(5, 6, 7, 9, 10)),
];

static MAGIC_USER_SAVES: [(u8, SavingThrows); 11] = [
    (1, st(13, 14, 13, 16, 15)),
    (3, st(13, 14, 13, 15, 14)),
    (5, st(12, 13, 12, 15, 13)),
    (7, st(12, 12, 11, 14, 13)),
    (9, st(11, 11, 10, 14, 12)),
    (11, st(11, 10, 9, 13, 11)),
    (13, st(10, 10, 9, 13, 11)),
    (15, st(10, 9, 8, 12, 10)),
    (17, st(9, 8, 7, 12, 9)),
    (19, st(9, 7, 6, 11, 8)),
    (20, st(8, 6, 5, 11, 7)),
];

static THIEF_SAVES: [(u8, SavingThrows); 11] = [
    (1, st(13, 14, 13, 16, 15)),
    (3, st(12, 14, 12, 15, 14)),
    (5, st(11, 13, 12, 14, 13)),
    (7, st(11, 13, 11, 13, 13)),
    (9, st(10, 12, 11, 12, 12)),
    (11, st(9, 12, 10, 11, 11)),
    (13, st(9, 10, 10, 10, 11)),
    (15, st(8, 10, 9, 9, 10)),
    (17, st(7, 9, 8, 8, 9)),
    (19, st(6, 9, 8, 7, 9)),
    (20, st(5, 8, 7, 6, 8)),
];

static CLERIC_SPELLS: [SpellsPerDay; 20] = [
    [0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0],
    [2, 1, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0],
    [2, 2, 1, 0, 0, 0],
    [3, 2, 2, 0, 0, 0],
    [3, 2, 2, 1, 0, 0],
    [3, 3, 2, 2, 0, 0],
    [3, 3, 2, 2, 1, 0],
    [4, 3, 3, 2, 2, 0],
    [4, 4, 3, 2, 2, 1],
    [5, 4, 3, 2, 2, 1],
    [5, 4, 4, 3, 2, 2],
    [6, 5, 4, 3, 2, 2],
    [6, 5, 4, 4, 3, 2],
    [7, 6, 5, 4, 3, 2],
    [7, 6, 5, 4, 4, 3],
    [8, 7, 6, 5, 4, 3],
    [8, 7, 6, 5, 5, 3],
];

static MAGIC_USER_SPELLS: [SpellsPerDay; 20] = [
    [1, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0],
    [2, 1, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0],
    [2, 2, 1, 0, 0, 0],
    [3, 2, 2, 0, 0, 0],
    [3, 2, 2, 1, 0, 0],
    [3, 3, 2, 2, 0, 0],
    [3, 3, 2, 2, 1, 0],
    [4, 3, 3, 2, 2, 0],
    [4, 4, 3, 2, 2, 1],
    [4, 4, 3, 3, 2, 2],
    [4, 4, 4, 3, 2, 2],
    [4, 4, 4, 3, 3, 2],
    [5, 4, 4, 3, 3, 2],
    [5, 5, 4, 3, 3, 2],
    [5, 5, 4, 4, 3, 3],
    [6, 5, 4, 4, 3, 3],
    [6, 5, 5, 4, 3, 3],
    [6, 5, 5, 4, 4, 3],
];

static THIEF_SKILLS: [ThiefSkills; 20] = [
    ts(25, 20, 30, 25, 80, 10, 30),
    ts(30, 25, 35, 30, 81, 15, 34),
    ts(35, 30, 40, 35, 82, 20, 38),
    ts(40, 35, 45, 40, 83, 25, 42),
    ts(45, 40, 50, 45, 84, 30, 46),
    ts(50, 45, 55, 50, 85, 35, 50),
    ts(55, 50, 60, 55, 86, 40, 54),
    ts(60, 55, 65, 60, 87, 45, 58),
    ts(65, 60, 70, 65, 88, 50, 62),
    ts(68, 63, 74, 68, 89, 53, 65),
    ts(71, 66, 78, 71, 90, 56, 68),
    ts(74, 69, 82, 74, 91, 59, 71),
    ts(77, 72, 86, 77, 92, 62, 74),
    ts(80, 75, 90, 80, 93, 65, 77),
    ts(83, 78, 94, 83, 94, 68, 80),
    ts(84, 79, 95, 85, 95, 69, 83),
    ts(85, 80, 96, 87, 96, 70, 86),
    ts(86, 81, 97, 89, 97, 71, 89),
    ts(87, 82, 98, 91, 98, 72, 92),
    ts(88, 83, 99, 93, 99, 73, 95),
];

pub static CLERIC: ClassDefinition = ClassDefinition {
    class: StandardClass::Cleric,
    requirement: (Ability::Wisdom, 9),
    hit_die: DieType::D6,
    hit_points_after_ninth: 1,
    experience: [
        0, 1_500, 3_000, 6_000, 12_000, 24_000, 48_000, 90_000, 180_000, 270_000, 360_000,
        450_000, 540_000, 630_000, 720_000, 810_000, 900_000, 990_000, 1_080_000, 1_170_000,
    ],
    attack_bonus: [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7],
    saving_throws: &CLERIC_SAVES,
    spells_per_day: Some(&CLERIC_SPELLS),
    thief_skills: None,
    starting_spells: &[],
    weapons: WeaponRule::BluntOnly,
    armor: ArmorRule::Any,
    shields: true,
    excludes: &[],
    specials: &["Turn Undead", "Casts divine spells from 2nd level"],
    restrictions: &["Blunt weapons only"],
};

pub static FIGHTER: ClassDefinition = ClassDefinition {
    class: StandardClass::Fighter,
    requirement: (Ability::Strength, 9),
    hit_die: DieType::D8,
    hit_points_after_ninth: 2,
    experience: [
        0, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 120_000, 240_000, 360_000, 480_000,
        600_000, 720_000, 840_000, 960_000, 1_080_000, 1_200_000, 1_320_000, 1_440_000,
        1_560_000,
    ],
    attack_bonus: [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10],
    saving_throws: &FIGHTER_SAVES,
    spells_per_day: None,
    thief_skills: None,
    starting_spells: &[],
    weapons: WeaponRule::Any,
    armor: ArmorRule::Any,
    shields: true,
    excludes: &[StandardClass::Thief],
    specials: &["May use any weapon and armor"],
    restrictions: &[],
};

pub static MAGIC_USER: ClassDefinition = ClassDefinition {
    class: StandardClass::MagicUser,
    requirement: (Ability::Intelligence, 9),
    hit_die: DieType::D4,
    hit_points_after_ninth: 1,
    experience: [
        0, 2_500, 5_000, 10_000, 20_000, 40_000, 80_000, 150_000, 300_000, 450_000, 600_000,
        750_000, 900_000, 1_050_000, 1_200_000, 1_350_000, 1_500_000, 1_650_000, 1_800_000,
        1_950_000,
    ],
    attack_bonus: [0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5],
    saving_throws: &MAGIC_USER_SAVES,
    spells_per_day: Some(&MAGIC_USER_SPELLS),
    thief_skills: None,
    starting_spells: &["Read Magic"],
    weapons: WeaponRule::Only(&["Dagger", "Walking Staff"]),
    armor: ArmorRule::Forbidden,
    shields: false,
    excludes: &[],
    specials: &["Casts arcane spells from a spellbook", "Begins play knowing Read Magic"],
    restrictions: &["Dagger or walking staff only", "No armor or shield"],
};

pub static THIEF: ClassDefinition = ClassDefinition {
    class: StandardClass::Thief,
    requirement: (Ability::Dexterity, 9),
    hit_die: DieType::D4,
    hit_points_after_ninth: 2,
    experience: [
        0, 1_250, 2_500, 5_000, 10_000, 20_000, 40_000, 75_000, 150_000, 225_000, 300_000,
        375_000, 450_000, 525_000, 600_000, 675_000, 750_000, 825_000, 900_000, 975_000,
    ],
    attack_bonus: [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7],
    saving_throws: &THIEF_SAVES,
    spells_per_day: None,
    thief_skills: Some(&THIEF_SKILLS),
    starting_spells: &[],
    weapons: WeaponRule::Any,
    armor: ArmorRule::Only(&["Leather Armor"]),
    shields: false,
    excludes: &[StandardClass::Fighter],
    specials: &[
        "Sneak attack: +4 to hit and double damage from behind",
        "Thief abilities",
    ],
    restrictions: &["Leather armor only", "No shield"],
};
