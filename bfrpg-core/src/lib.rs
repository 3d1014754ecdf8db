//! Basic Fantasy RPG character rules engine.
//!
//! This crate provides:
//! - Race and class tables for the four core races and classes
//! - Pure resolvers for attack bonus, saving throws, hit dice, armor class,
//!   carrying capacity and movement, including two-class characters
//! - Eligibility checks for races, classes, combinations and equipment
//! - A step-by-step character builder and a game master's table view
//!
//! Custom races and classes are accepted everywhere; the resolvers fall back
//! to permissive or empty answers for them.
//!
//! # Quick Start
//!
//! ```ignore
//! use bfrpg_core::{CharacterBuilder, RulesConfig, StandardRace};
//! use bfrpg_core::items::find_item;
//!
//! let config = RulesConfig::default();
//! let mut rng = rand::thread_rng();
//!
//! let character = CharacterBuilder::new()
//!     .roll_abilities(&mut rng)
//!     .race(StandardRace::Human)
//!     .class(bfrpg_core::StandardClass::Fighter)
//!     .roll_hit_points(&config, &mut rng)?
//!     .roll_gold(&config, &mut rng)?
//!     .buy(find_item("Longsword").unwrap())
//!     .name("Brom")
//!     .build(&config)?;
//!
//! println!("AB +{} AC {}", character.attack_bonus(), character.armor_class().melee);
//! ```

pub mod character;
pub mod character_builder;
pub mod class_data;
pub mod config;
pub mod dice;
pub mod error;
pub mod items;
pub mod race_data;
pub mod rules;
pub mod session;
pub mod spells;
pub mod world;

// Primary public API
pub use character::{Character, CharacterSummary};
pub use character_builder::{BuilderError, CharacterBuilder};
pub use class_data::{SavingThrows, StandardClass};
pub use config::RulesConfig;
pub use dice::{DiceError, DiceExpression, DieType, HitDice};
pub use error::RulesError;
pub use race_data::{Race, StandardRace};
pub use rules::{ArmorClass, ClassKind, ClassSelection};
pub use session::{CharacterRef, CharacterSource, GameTable, SessionError};
pub use world::{AbilityScores, CharacterId, GameId, Item, UserId};
