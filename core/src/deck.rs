use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Pool of numbered tiles for one level, in display order.
///
/// Selected tiles always carry the orders `0..selected_count()` with no gaps, the order recovers which operand was
/// picked first for non-commutative operators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDeck {
    tiles: Vec<Tile>,
}

impl TileDeck {
    pub fn new<G: ValueGenerator>(size: TileIndex, mut generator: G) -> Result<Self> {
        let tiles = (0..size)
            .map(|index| Tile::new(index, generator.next_value(index)))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("New deck with {} tiles", tiles.len());
        Ok(Self { tiles })
    }

    /// Rebuilds a deck from tiles that already carry a state, e.g. a restored save.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tiles.len());
        if !tiles.iter().all(|tile| seen.insert(tile.index())) {
            return Err(GameError::InvalidIndex);
        }
        let mut deck = Self { tiles };
        deck.compact_orders();
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: TileIndex) -> Result<&Tile> {
        let pos = self.position(index)?;
        Ok(&self.tiles[pos])
    }

    /// Tiles that are not used yet, selected ones included, in deck order.
    pub fn available(&self) -> impl Iterator<Item = &Tile> + Clone + '_ {
        self.tiles.iter().filter(|tile| tile.is_available())
    }

    pub fn is_used(&self, index: TileIndex) -> Result<bool> {
        Ok(self.tile(index)?.is_used())
    }

    pub fn used_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_used()).count()
    }

    pub fn selected_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_selected()).count()
    }

    pub fn select(&mut self, index: TileIndex) -> Result<MarkOutcome> {
        let pos = self.position(index)?;
        match self.tiles[pos].state() {
            TileState::Used => Err(GameError::TileUsed),
            TileState::Selected => Ok(MarkOutcome::NoChange),
            TileState::Available => {
                let order = self.next_order();
                self.tiles[pos].set_selected(order);
                Ok(MarkOutcome::Changed)
            }
        }
    }

    pub fn deselect(&mut self, index: TileIndex) -> Result<MarkOutcome> {
        let pos = self.position(index)?;
        if !self.tiles[pos].is_selected() {
            return Ok(MarkOutcome::NoChange);
        }
        self.tiles[pos].set_available();
        self.compact_orders();
        Ok(MarkOutcome::Changed)
    }

    pub fn toggle(&mut self, index: TileIndex) -> Result<ToggleOutcome> {
        if self.tile(index)?.is_selected() {
            self.deselect(index)?;
            Ok(ToggleOutcome::Deselected)
        } else {
            self.select(index)?;
            Ok(ToggleOutcome::Selected)
        }
    }

    /// Moves the given selected tiles to `Used`. Callers only pass validated selections, anything else is skipped.
    pub fn mark_used(&mut self, indices: &[TileIndex]) {
        for &index in indices {
            match self.position(index) {
                Ok(pos) if self.tiles[pos].is_selected() => self.tiles[pos].set_used(),
                Ok(_) => log::warn!("Tile {} is not selected, not marking it as used", index),
                Err(_) => log::warn!("Tile {} does not exist, not marking it as used", index),
            }
        }
        self.compact_orders();
    }

    /// Marks the whole current selection as used and returns the affected indices in selection order.
    pub fn mark_selection_used(&mut self) -> Vec<TileIndex> {
        let indices: Vec<_> = self
            .ordered_selection()
            .into_iter()
            .map(Tile::index)
            .collect();
        self.mark_used(&indices);
        indices
    }

    pub fn clear_selection(&mut self) {
        for tile in self.tiles.iter_mut().filter(|tile| tile.is_selected()) {
            tile.set_available();
        }
    }

    /// A level is over once fewer than two tiles are left to form a pair.
    pub fn is_level_exhausted(&self) -> bool {
        self.available().count() < 2
    }

    /// Selected tiles sorted by the order they were picked in.
    pub fn ordered_selection(&self) -> Vec<&Tile> {
        let mut selection: Vec<_> = self.tiles.iter().filter(|tile| tile.is_selected()).collect();
        selection.sort_by_key(|tile| tile.selection_order());
        selection
    }

    fn position(&self, index: TileIndex) -> Result<usize> {
        self.tiles
            .iter()
            .position(|tile| tile.index() == index)
            .ok_or(GameError::InvalidIndex)
    }

    fn next_order(&self) -> SelectionOrder {
        self.tiles
            .iter()
            .filter_map(|tile| tile.selection_order())
            .max()
            .map_or(0, |last| last + 1)
    }

    /// Renumbers the selected tiles to `0..n`, keeping their relative order. Selected tiles without an order go last,
    /// in deck order.
    fn compact_orders(&mut self) {
        let mut selected: Vec<usize> = (0..self.tiles.len())
            .filter(|&pos| self.tiles[pos].is_selected())
            .collect();
        selected.sort_by_key(|&pos| {
            let order = self.tiles[pos].selection_order();
            (order.is_none(), order, pos)
        });
        for (order, pos) in selected.into_iter().enumerate() {
            self.tiles[pos].set_order(order as SelectionOrder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn deck(values: &[TileValue]) -> TileDeck {
        TileDeck::new(values.len() as TileIndex, SequenceValueGenerator::new(values)).unwrap()
    }

    fn selected_values(deck: &TileDeck) -> Vec<TileValue> {
        deck.ordered_selection().into_iter().map(Tile::value).collect()
    }

    #[test]
    fn keypad_deck_keeps_display_order() {
        let deck = TileDeck::new(10, SequenceValueGenerator::keypad()).unwrap();

        let values: Vec<_> = deck.tiles().iter().map(Tile::value).collect();
        assert_eq!(values, KEYPAD_VALUES);
        assert_eq!(deck.available().count(), 10);
    }

    #[test]
    fn keypad_deck_truncates_to_size() {
        let deck = TileDeck::new(4, SequenceValueGenerator::keypad()).unwrap();

        let values: Vec<_> = deck.tiles().iter().map(Tile::value).collect();
        assert_eq!(values, vec![7, 8, 9, 4]);
    }

    #[test]
    fn generator_out_of_range_fails() {
        let result = TileDeck::new(2, SequenceValueGenerator::new([3, 12]));
        assert_eq!(result, Err(GameError::InvalidTileValue));
    }

    #[test]
    fn empty_deck_is_exhausted() {
        let deck = TileDeck::new(0, SequenceValueGenerator::keypad()).unwrap();
        assert!(deck.is_empty());
        assert!(deck.is_level_exhausted());
    }

    #[test]
    fn select_assigns_increasing_orders() {
        let mut deck = deck(&[4, 5, 6]);

        assert_eq!(deck.select(2).unwrap(), MarkOutcome::Changed);
        assert_eq!(deck.select(0).unwrap(), MarkOutcome::Changed);
        assert_eq!(deck.select(0).unwrap(), MarkOutcome::NoChange);

        assert_eq!(deck.tile(2).unwrap().selection_order(), Some(0));
        assert_eq!(deck.tile(0).unwrap().selection_order(), Some(1));
        assert_eq!(selected_values(&deck), vec![6, 4]);
    }

    #[test]
    fn deselect_keeps_orders_contiguous() {
        let mut deck = deck(&[1, 2, 3]);
        deck.select(0).unwrap();
        deck.select(1).unwrap();
        deck.select(2).unwrap();

        assert_eq!(deck.deselect(1).unwrap(), MarkOutcome::Changed);

        assert_eq!(deck.tile(0).unwrap().selection_order(), Some(0));
        assert_eq!(deck.tile(1).unwrap().selection_order(), None);
        assert_eq!(deck.tile(2).unwrap().selection_order(), Some(1));

        deck.select(1).unwrap();
        assert_eq!(selected_values(&deck), vec![1, 3, 2]);
    }

    #[test]
    fn selecting_used_tile_is_rejected_without_change() {
        let mut deck = deck(&[1, 2, 3]);
        deck.select(0).unwrap();
        deck.mark_used(&[0]);
        let before = deck.clone();

        assert_eq!(deck.select(0), Err(GameError::TileUsed));
        assert_eq!(deck.toggle(0), Err(GameError::TileUsed));
        assert_eq!(deck, before);
    }

    #[test]
    fn toggle_flips_selection() {
        let mut deck = deck(&[1, 2]);

        assert_eq!(deck.toggle(1).unwrap(), ToggleOutcome::Selected);
        assert!(deck.tile(1).unwrap().is_selected());
        assert_eq!(deck.toggle(1).unwrap(), ToggleOutcome::Deselected);
        assert_eq!(deck.tile(1).unwrap().state(), TileState::Available);
    }

    #[test]
    fn invalid_index_is_reported() {
        let mut deck = deck(&[1, 2]);
        assert_eq!(deck.select(9), Err(GameError::InvalidIndex));
        assert_eq!(deck.tile(9), Err(GameError::InvalidIndex));
    }

    #[test]
    fn mark_selection_used_consumes_tiles() {
        let mut deck = deck(&[2, 3, 4]);
        deck.select(1).unwrap();
        deck.select(0).unwrap();

        assert_eq!(deck.mark_selection_used(), vec![1, 0]);
        assert_eq!(deck.used_count(), 2);
        assert_eq!(deck.selected_count(), 0);
        assert!(deck.is_level_exhausted());
        let available: Vec<_> = deck.available().map(Tile::index).collect();
        assert_eq!(available, vec![2]);
    }

    #[test]
    fn mark_used_skips_unselected_tiles() {
        let mut deck = deck(&[2, 3, 4]);
        deck.select(2).unwrap();

        deck.mark_used(&[0, 2]);

        assert_eq!(deck.tile(0).unwrap().state(), TileState::Available);
        assert!(deck.tile(2).unwrap().is_used());
    }

    #[test]
    fn available_is_restartable() {
        let mut deck = deck(&[5, 6, 7]);
        deck.select(0).unwrap();
        deck.mark_used(&[0]);

        let available = deck.available();
        assert_eq!(available.clone().count(), 2);
        assert_eq!(available.map(Tile::value).collect::<Vec<_>>(), vec![6, 7]);
    }

    #[test]
    fn from_tiles_rejects_duplicate_indices() {
        let tiles = vec![Tile::new(0, 1).unwrap(), Tile::new(0, 2).unwrap()];
        assert_eq!(TileDeck::from_tiles(tiles), Err(GameError::InvalidIndex));
    }

    #[test]
    fn from_tiles_fills_missing_orders() {
        let first = Tile::restored(4, 1, TileState::Selected, Some(3)).unwrap();
        let second = Tile::restored(7, 2, TileState::Selected, None).unwrap();
        let deck = TileDeck::from_tiles(vec![second, first]).unwrap();

        assert_eq!(deck.tile(4).unwrap().selection_order(), Some(0));
        assert_eq!(deck.tile(7).unwrap().selection_order(), Some(1));
    }
}
