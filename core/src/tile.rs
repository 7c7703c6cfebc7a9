use serde::{Deserialize, Serialize};

use crate::*;

/// Consumption state of a tile. `Used` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Available,
    Selected,
    Used,
}

impl TileState {
    pub const fn is_used(self) -> bool {
        matches!(self, Self::Used)
    }

    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }
}

impl Default for TileState {
    fn default() -> Self {
        Self::Available
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    index: TileIndex,
    value: TileValue,
    state: TileState,
    selection_order: Option<SelectionOrder>,
}

impl Tile {
    pub fn new(index: TileIndex, value: TileValue) -> Result<Self> {
        if value > MAX_TILE_VALUE {
            return Err(GameError::InvalidTileValue);
        }
        Ok(Self {
            index,
            value,
            state: TileState::Available,
            selection_order: None,
        })
    }

    /// Tile with an explicit state, used when a saved game is loaded.
    pub(crate) fn restored(
        index: TileIndex,
        value: TileValue,
        state: TileState,
        selection_order: Option<SelectionOrder>,
    ) -> Result<Self> {
        let mut tile = Self::new(index, value)?;
        tile.state = state;
        tile.selection_order = match state {
            TileState::Selected => selection_order,
            TileState::Available | TileState::Used => None,
        };
        Ok(tile)
    }

    pub const fn index(&self) -> TileIndex {
        self.index
    }

    pub const fn value(&self) -> TileValue {
        self.value
    }

    pub const fn state(&self) -> TileState {
        self.state
    }

    pub const fn selection_order(&self) -> Option<SelectionOrder> {
        self.selection_order
    }

    pub const fn is_used(&self) -> bool {
        self.state.is_used()
    }

    pub const fn is_selected(&self) -> bool {
        self.state.is_selected()
    }

    pub const fn is_available(&self) -> bool {
        !self.state.is_used()
    }

    pub(crate) fn set_selected(&mut self, order: SelectionOrder) {
        self.state = TileState::Selected;
        self.selection_order = Some(order);
    }

    pub(crate) fn set_available(&mut self) {
        self.state = TileState::Available;
        self.selection_order = None;
    }

    pub(crate) fn set_used(&mut self) {
        self.state = TileState::Used;
        self.selection_order = None;
    }

    pub(crate) fn set_order(&mut self, order: SelectionOrder) {
        self.selection_order = Some(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tile_starts_available() {
        let tile = Tile::new(3, 7).unwrap();

        assert_eq!(tile.index(), 3);
        assert_eq!(tile.value(), 7);
        assert_eq!(tile.state(), TileState::Available);
        assert_eq!(tile.selection_order(), None);
    }

    #[test]
    fn rejects_values_above_nine() {
        assert_eq!(Tile::new(0, 10), Err(GameError::InvalidTileValue));
    }

    #[test]
    fn used_clears_order() {
        let mut tile = Tile::new(0, 1).unwrap();
        tile.set_selected(0);
        tile.set_used();

        assert!(tile.is_used());
        assert!(!tile.is_available());
        assert_eq!(tile.selection_order(), None);
    }
}
