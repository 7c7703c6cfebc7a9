use rand::prelude::*;

use super::*;

/// Lowest digit drawn for random decks, zero tiles are never generated.
const MIN_RANDOM_VALUE: TileValue = 1;

/// Uniform `1..=9` values from a seeded generator.
#[derive(Clone, Debug)]
pub struct RandomValueGenerator {
    rng: SmallRng,
}

impl RandomValueGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl ValueGenerator for RandomValueGenerator {
    fn next_value(&mut self, _index: TileIndex) -> TileValue {
        self.rng.random_range(MIN_RANDOM_VALUE..=MAX_TILE_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_range() {
        let mut generator = RandomValueGenerator::new(42);
        for index in 0..500 {
            let value = generator.next_value(index);
            assert!((1..=9).contains(&value), "value out of range: {value}");
        }
    }

    #[test]
    fn same_seed_same_values() {
        let mut a = RandomValueGenerator::new(7);
        let mut b = RandomValueGenerator::new(7);
        for index in 0..64 {
            assert_eq!(a.next_value(index), b.next_value(index));
        }
    }
}
