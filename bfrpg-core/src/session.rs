//! GameTable - a game master's view over the characters at a table.
//!
//! A table never owns character sheets. It holds [`CharacterRef`]s and
//! resolves them through a [`CharacterSource`] that the storage layer
//! provides, so the same sheet can sit at several tables.

use crate::character::{Character, CharacterSummary};
use crate::error::RulesError;
use crate::world::{CharacterId, GameId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from GameTable operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Character {0} is already at this table")]
    AlreadySeated(CharacterId),

    #[error("Character {0} is not at this table")]
    NotSeated(CharacterId),

    #[error("Only the game master may do that")]
    NotGameMaster,

    #[error("Rules error: {0}")]
    Rules(#[from] RulesError),
}

/// Pointer to a character owned by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRef {
    pub owner: UserId,
    pub character: CharacterId,
}

impl CharacterRef {
    pub fn new(owner: UserId, character: CharacterId) -> Self {
        Self { owner, character }
    }
}

impl From<&Character> for CharacterRef {
    fn from(character: &Character) -> Self {
        Self::new(character.owner, character.id)
    }
}

/// Where a table looks up the characters it references.
pub trait CharacterSource {
    /// Fetch a character. `None` when it no longer exists or the owner no
    /// longer matches.
    fn character(&self, reference: &CharacterRef) -> Option<Character>;
}

impl CharacterSource for HashMap<CharacterId, Character> {
    fn character(&self, reference: &CharacterRef) -> Option<Character> {
        self.get(&reference.character)
            .filter(|c| c.owner == reference.owner)
            .cloned()
    }
}

impl CharacterSource for [Character] {
    fn character(&self, reference: &CharacterRef) -> Option<Character> {
        self.iter()
            .find(|c| c.id == reference.character && c.owner == reference.owner)
            .cloned()
    }
}

/// A game master's table of player characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTable {
    pub id: GameId,
    pub name: String,
    pub game_master: UserId,
    pub characters: Vec<CharacterRef>,
}

impl GameTable {
    pub fn new(name: impl Into<String>, game_master: UserId) -> Self {
        Self {
            id: GameId::new(),
            name: name.into(),
            game_master,
            characters: Vec::new(),
        }
    }

    pub fn is_game_master(&self, user: UserId) -> bool {
        self.game_master == user
    }

    pub fn contains(&self, character: CharacterId) -> bool {
        self.characters.iter().any(|r| r.character == character)
    }

    /// Whether `user` may read the referenced sheet: the game master sees
    /// every seated character, players only their own.
    pub fn can_view(&self, user: UserId, reference: &CharacterRef) -> bool {
        self.contains(reference.character)
            && (self.is_game_master(user) || reference.owner == user)
    }

    /// Seat a character at the table.
    pub fn add_character(&mut self, reference: CharacterRef) -> Result<(), SessionError> {
        if self.contains(reference.character) {
            return Err(SessionError::AlreadySeated(reference.character));
        }
        debug!(table = %self.name, character = %reference.character, "seated character");
        self.characters.push(reference);
        Ok(())
    }

    /// Remove a character. Its owner or the game master may do this.
    pub fn remove_character(
        &mut self,
        by: UserId,
        character: CharacterId,
    ) -> Result<CharacterRef, SessionError> {
        let index = self
            .characters
            .iter()
            .position(|r| r.character == character)
            .ok_or(SessionError::NotSeated(character))?;
        if !self.is_game_master(by) && self.characters[index].owner != by {
            return Err(SessionError::NotGameMaster);
        }
        Ok(self.characters.remove(index))
    }

    /// Summaries of every seated character, in seating order.
    ///
    /// References the source cannot resolve are skipped with a warning.
    /// Only the game master may see the whole table.
    pub fn summaries<S: CharacterSource + ?Sized>(
        &self,
        viewer: UserId,
        source: &S,
    ) -> Result<Vec<CharacterSummary>, SessionError> {
        if !self.is_game_master(viewer) {
            return Err(SessionError::NotGameMaster);
        }
        let mut summaries = Vec::with_capacity(self.characters.len());
        for reference in &self.characters {
            match source.character(reference) {
                Some(character) => summaries.push(character.summary()?),
                None => {
                    warn!(table = %self.name, character = %reference.character, "missing character")
                }
            }
        }
        Ok(summaries)
    }
}
