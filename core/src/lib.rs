#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use decimal::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use question::*;
pub use rules::*;
pub use session::*;
pub use snapshot::*;
pub use storage::*;
pub use tile::*;
pub use types::*;

mod decimal;
mod deck;
mod engine;
mod error;
mod generator;
mod question;
mod rules;
mod session;
mod snapshot;
mod storage;
mod tile;
mod types;

/// Deck size of the keypad layout.
pub const SMALL_DECK_SIZE: TileIndex = 10;

/// Deck size of the 8x8 board layout.
pub const LARGE_DECK_SIZE: TileIndex = 64;

/// How tile values are chosen when a new deck is dealt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeckValues {
    Random,
    Keypad,
    Fixed(Vec<TileValue>),
}

impl DeckValues {
    pub fn build_deck(&self, size: TileIndex, seed: u64) -> Result<TileDeck> {
        match self {
            Self::Random => TileDeck::new(size, RandomValueGenerator::new(seed)),
            Self::Keypad => TileDeck::new(size, SequenceValueGenerator::keypad()),
            Self::Fixed(values) => TileDeck::new(size, SequenceValueGenerator::new(values.clone())),
        }
    }
}

impl Default for DeckValues {
    fn default() -> Self {
        Self::Keypad
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub deck_size: TileIndex,
    pub deck_values: DeckValues,
    pub operator: Operator,
    pub seed: u64,
    pub rules: RulePolicy,
}

impl SessionConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Random 1-9 values on an 8x8 board.
    pub fn board(seed: u64) -> Self {
        Self {
            deck_size: LARGE_DECK_SIZE,
            deck_values: DeckValues::Random,
            ..Self::new(seed)
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_deck(mut self, deck_size: TileIndex, deck_values: DeckValues) -> Self {
        self.deck_size = deck_size;
        self.deck_values = deck_values;
        self
    }

    pub fn with_rules(mut self, rules: RulePolicy) -> Self {
        self.rules = rules;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            deck_size: SMALL_DECK_SIZE,
            deck_values: DeckValues::default(),
            operator: Operator::default(),
            seed: 0,
            rules: RulePolicy::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
}
