use core::cmp::Reverse;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::*;

/// Pair of tiles that answers a question as `x OP y`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub x: Tile,
    pub y: Tile,
}

impl Solution {
    pub const fn values(&self) -> (TileValue, TileValue) {
        (self.x.value(), self.y.value())
    }

    pub const fn indices(&self) -> [TileIndex; 2] {
        [self.x.index(), self.y.index()]
    }

    /// Values ordered high to low, so `(x, y)` and `(y, x)` compare equal.
    pub fn normalized(&self) -> (TileValue, TileValue) {
        let (x, y) = self.values();
        (x.max(y), x.min(y))
    }
}

impl QuestionEngine {
    /// Every distinct pair of available tiles that answers `question`.
    ///
    /// When `anchors` names tiles, the first operand must be one of them, which finds the completions of a partial
    /// selection. Pairs with the same values in either order are reported once. For commutative operators the
    /// anchored tile, or else the higher value, comes first in each pair. The list is sorted by the first value,
    /// highest first.
    pub fn find_all_solutions(
        &self,
        question: &Question,
        deck: &TileDeck,
        anchors: Option<&[TileIndex]>,
    ) -> Vec<Solution> {
        let pool: Vec<&Tile> = deck.available().collect();
        if pool.len() < 2 {
            return Vec::new();
        }

        let anchors = anchors.filter(|anchors| !anchors.is_empty());
        let is_anchor = |tile: &Tile| match anchors {
            Some(anchors) => anchors.contains(&tile.index()),
            None => tile.is_selected(),
        };

        let operator = question.operator();
        let mut seen = HashSet::new();
        let mut solutions = Vec::new();

        for (i, &x) in pool.iter().enumerate() {
            if anchors.is_some_and(|anchors| !anchors.contains(&x.index())) {
                continue;
            }
            for (j, &y) in pool.iter().enumerate() {
                if i == j {
                    continue;
                }
                let value = operator.apply(f64::from(x.value()), f64::from(y.value()));
                if !question.is_answered_by(value) {
                    continue;
                }
                let solution = Solution { x: *x, y: *y };
                if seen.insert(solution.normalized()) {
                    solutions.push(solution);
                }
            }
        }

        if operator.is_commutative() {
            for solution in solutions.iter_mut() {
                let swap = match (is_anchor(&solution.x), is_anchor(&solution.y)) {
                    (true, false) => false,
                    (false, true) => true,
                    _ => solution.y.value() > solution.x.value(),
                };
                if swap {
                    core::mem::swap(&mut solution.x, &mut solution.y);
                }
            }
        }

        solutions.sort_by_key(|solution| Reverse(solution.x.value()));
        log::debug!(
            "Found {} solutions for {} = {}",
            solutions.len(),
            operator,
            question.target()
        );
        solutions
    }
}
