use alloc::vec::Vec;

use super::*;

/// Layout of a numeric keypad, read row by row from the top.
pub const KEYPAD_VALUES: [TileValue; 10] = [7, 8, 9, 4, 5, 6, 1, 2, 3, 0];

/// Deterministic values taken from a fixed list, cycling when the deck is larger than the list.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceValueGenerator {
    values: Vec<TileValue>,
}

impl SequenceValueGenerator {
    pub fn new(values: impl Into<Vec<TileValue>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    pub fn keypad() -> Self {
        Self::new(KEYPAD_VALUES)
    }
}

impl ValueGenerator for SequenceValueGenerator {
    fn next_value(&mut self, index: TileIndex) -> TileValue {
        if self.values.is_empty() {
            log::warn!("Empty value sequence, falling back to zero");
            return 0;
        }
        self.values[usize::from(index) % self.values.len()]
    }
}
