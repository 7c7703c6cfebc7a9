use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Number of tiles a question is built from.
pub const DEFAULT_OPERAND_COUNT: u8 = 2;

/// The active challenge: which tiles combine via `operator` to reach `target`.
///
/// A question only knows the target value, never the tiles it was drawn from, so any pair producing the same value
/// answers it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    operator: Operator,
    target: f64,
    operand_count: u8,
}

impl Question {
    pub const fn new(operator: Operator, target: f64, operand_count: u8) -> Self {
        Self {
            operator,
            target,
            operand_count,
        }
    }

    pub const fn operator(&self) -> Operator {
        self.operator
    }

    pub const fn target(&self) -> f64 {
        self.target
    }

    pub const fn operand_count(&self) -> u8 {
        self.operand_count
    }

    /// Whether `value` hits the target exactly.
    pub fn is_answered_by(&self, value: Option<f64>) -> bool {
        value == Some(self.target)
    }

    /// Repeating decimal breakdown of the target, `None` for integers and terminating decimals.
    pub fn repeating_target(&self) -> Option<RepeatingDecimal> {
        repeating_decimal(self.target)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "? {} ? = ", self.operator.symbol())?;
        match self.repeating_target() {
            Some(repeating) => write!(f, "{}", repeating),
            None => write!(f, "{}", self.target),
        }
    }
}
