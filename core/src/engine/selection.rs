use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::*;

bitflags! {
    /// Reasons a selection is currently invalid. An empty set means the selection is fine so far.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Violations: u8 {
        const DIRECT_ANSWER_NOT_ALLOWED      = 1;
        const EXCEEDS_TARGET_BEFORE_COMPLETE = 1 << 1;
        const WRONG_FINAL_ANSWER             = 1 << 2;
        const UNREACHABLE                    = 1 << 3;
    }
}

/// Outcome of checking the current selection against the active question.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Operator folded over the selection, `None` until two tiles are picked or after dividing by zero.
    pub computed_value: Option<f64>,
    pub is_complete: bool,
    pub violations: Violations,
    pub selected_count: usize,
    /// Most recently picked tile, the one to put back on rejection.
    pub last_selected: Option<TileIndex>,
}

impl SelectionResult {
    pub const fn empty() -> Self {
        Self {
            computed_value: None,
            is_complete: false,
            violations: Violations::empty(),
            selected_count: 0,
            last_selected: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl Default for SelectionResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl QuestionEngine {
    /// Rules a selection of `count` tiles folding to `running` breaks while operands are still missing.
    pub(crate) fn partial_violations(
        &self,
        question: &Question,
        count: usize,
        running: Option<f64>,
    ) -> Violations {
        let rules = self.rules.rules_for(question.operator());
        let needed = usize::from(question.operand_count());
        let mut violations = Violations::empty();

        if count == 1 && needed > 1 && rules.forbid_direct_answer && question.is_answered_by(running) {
            violations |= Violations::DIRECT_ANSWER_NOT_ALLOWED;
        }

        if count < needed
            && let (Some(bound), Some(value)) = (rules.bound, running)
            && bound.is_violated(value, question.target())
        {
            violations |= Violations::EXCEEDS_TARGET_BEFORE_COMPLETE;
        }

        violations
    }

    /// Checks the deck's current selection against `question`. Pure read, calling it again without new input gives
    /// the same result.
    pub fn evaluate_selection(&self, question: &Question, deck: &TileDeck) -> SelectionResult {
        let selection = deck.ordered_selection();
        let count = selection.len();
        if count == 0 {
            return SelectionResult::empty();
        }

        let needed = usize::from(question.operand_count());
        let values: SmallVec<[f64; 4]> = selection
            .iter()
            .map(|tile| f64::from(tile.value()))
            .collect();
        let running = question.operator().fold(values.iter().copied());

        let mut violations = self.partial_violations(question, count, running);

        if count >= needed && !question.is_answered_by(running) {
            violations |= Violations::WRONG_FINAL_ANSWER;
        }

        if self.rules.require_completion
            && count == 1
            && needed == usize::from(DEFAULT_OPERAND_COUNT)
            && violations.is_empty()
        {
            let anchors = [selection[0].index()];
            if self.find_all_solutions(question, deck, Some(&anchors)).is_empty() {
                violations |= Violations::UNREACHABLE;
            }
        }

        let computed_value = if count >= 2 || needed <= 1 {
            running
        } else {
            None
        };
        let is_complete =
            violations.is_empty() && question.is_answered_by(computed_value) && count >= needed;

        SelectionResult {
            computed_value,
            is_complete,
            violations,
            selected_count: count,
            last_selected: selection.last().map(|tile| tile.index()),
        }
    }
}
