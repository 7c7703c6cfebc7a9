use alloc::vec::Vec;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::*;
pub use selection::*;
pub use solutions::*;

mod selection;
mod solutions;

/// Tiles drawn for one question, in the order the operator is applied.
type Draw<'a> = SmallVec<[&'a Tile; 4]>;

/// Generates questions, validates selections against them and searches for the tile pairs that answer them.
#[derive(Clone, Debug)]
pub struct QuestionEngine {
    rng: SmallRng,
    rules: RulePolicy,
}

impl QuestionEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, RulePolicy::default())
    }

    pub fn with_rules(seed: u64, rules: RulePolicy) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            rules,
        }
    }

    pub fn rules(&self) -> &RulePolicy {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: RulePolicy) {
        self.rules = rules;
    }

    /// Draws two distinct available tiles and builds a question from them.
    pub fn generate_question(&mut self, operator: Operator, deck: &TileDeck) -> Result<Question> {
        self.generate_question_with_operands(operator, deck, DEFAULT_OPERAND_COUNT)
    }

    pub fn generate_question_with_operands(
        &mut self,
        operator: Operator,
        deck: &TileDeck,
        operand_count: u8,
    ) -> Result<Question> {
        let pool: Vec<&Tile> = deck.available().collect();
        let amount = usize::from(operand_count);

        if amount == 0 || pool.len() < amount {
            log::debug!(
                "Cannot draw {} operands from {} available tiles",
                amount,
                pool.len()
            );
            return Err(GameError::NoValidQuestion);
        }

        let (drawn, target) = self.draw_playable(operator, &pool, amount)?;
        log::debug!(
            "New {} question from tiles {:?}, target {}",
            operator,
            drawn.iter().map(|tile| tile.index()).collect::<SmallVec<[TileIndex; 4]>>(),
            target
        );
        Ok(Question::new(operator, target, operand_count))
    }

    /// Draws operands the player can pick in draw order without breaking a rule, retrying like
    /// [`Self::draw_divisible`]. Two operand questions fall back to choosing among every playable pair.
    fn draw_playable<'a>(
        &mut self,
        operator: Operator,
        pool: &[&'a Tile],
        amount: usize,
    ) -> Result<(Draw<'a>, f64)> {
        for _ in 0..pool.len() {
            let drawn = if operator == Operator::Divide {
                self.draw_divisible(pool, amount)?
            } else {
                self.draw(pool, amount)
            };
            if let Some(target) = self.playable_target(operator, &drawn) {
                return Ok((drawn, target));
            }
        }

        if amount != usize::from(DEFAULT_OPERAND_COUNT) {
            log::debug!("No playable {} draw of {} operands", operator, amount);
            return Err(GameError::NoValidQuestion);
        }

        let mut playable: Vec<(Draw<'a>, f64)> = Vec::new();
        for (i, &x) in pool.iter().enumerate() {
            for (j, &y) in pool.iter().enumerate() {
                if i == j {
                    continue;
                }
                let pair: Draw<'a> = [x, y].into_iter().collect();
                if let Some(target) = self.playable_target(operator, &pair) {
                    playable.push((pair, target));
                }
            }
        }
        if playable.is_empty() {
            log::debug!("No pair of {} tiles is playable for {}", pool.len(), operator);
            return Err(GameError::NoValidQuestion);
        }
        let pick = self.rng.random_range(0..playable.len());
        Ok(playable.swap_remove(pick))
    }

    /// Target of `drawn` when every partial pick along the draw order is allowed by the rules.
    fn playable_target(&self, operator: Operator, drawn: &[&Tile]) -> Option<f64> {
        let values: SmallVec<[f64; 4]> = drawn.iter().map(|tile| f64::from(tile.value())).collect();
        let target = operator.fold(values.iter().copied())?;
        let question = Question::new(operator, target, u8::try_from(values.len()).ok()?);

        (1..values.len())
            .all(|count| {
                let running = operator.fold(values[..count].iter().copied());
                self.partial_violations(&question, count, running).is_empty()
            })
            .then_some(target)
    }

    /// Picks `amount` tiles uniformly without replacement by running the first `amount` steps of a Fisher-Yates
    /// shuffle.
    fn draw<'a>(&mut self, pool: &[&'a Tile], amount: usize) -> Draw<'a> {
        let mut order: Vec<usize> = (0..pool.len()).collect();
        for i in 0..amount {
            let j = self.rng.random_range(i..order.len());
            order.swap(i, j);
        }
        order[..amount].iter().map(|&pos| pool[pos]).collect()
    }

    /// Like [`Self::draw`] but no operand after the first may be zero.
    fn draw_divisible<'a>(&mut self, pool: &[&'a Tile], amount: usize) -> Result<Draw<'a>> {
        let divisors = pool.iter().filter(|tile| tile.value() != 0).count();
        if divisors + 1 < amount {
            log::debug!("Only {} non-zero tiles, cannot divide", divisors);
            return Err(GameError::NoValidQuestion);
        }

        for _ in 0..pool.len() {
            let drawn = self.draw(pool, amount);
            if drawn.iter().skip(1).all(|tile| tile.value() != 0) {
                return Ok(drawn);
            }
        }

        // retries exhausted, draw the divisors first and the dividend from what is left
        let non_zero: Vec<&Tile> = pool.iter().copied().filter(|tile| tile.value() != 0).collect();
        let tail = self.draw(&non_zero, amount - 1);
        let rest: Vec<&Tile> = pool
            .iter()
            .copied()
            .filter(|tile| !tail.iter().any(|taken| taken.index() == tile.index()))
            .collect();
        let head = self.draw(&rest, 1);
        Ok(head.into_iter().chain(tail).collect())
    }
}
