use crate::*;
pub use random::*;
pub use sequence::*;

mod random;
mod sequence;

/// Source of tile values used when a deck is populated.
pub trait ValueGenerator {
    fn next_value(&mut self, index: TileIndex) -> TileValue;
}

impl<G: ValueGenerator + ?Sized> ValueGenerator for &mut G {
    fn next_value(&mut self, index: TileIndex) -> TileValue {
        (**self).next_value(index)
    }
}
