use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::UnknownOperator;

/// Stable position identifier of a tile, assigned when the deck is created.
pub type TileIndex = u16;

/// Digit printed on a tile.
pub type TileValue = u8;

/// Rank of a tile inside the current selection, `0` is the first pick.
pub type SelectionOrder = u16;

/// Largest digit a tile may carry.
pub const MAX_TILE_VALUE: TileValue = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "addition")]
    Add,
    #[serde(rename = "subtraction")]
    Subtract,
    #[serde(rename = "multiplication")]
    Multiply,
    #[serde(rename = "division")]
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Whether swapping the operands can never change the result.
    pub const fn is_commutative(self) -> bool {
        matches!(self, Self::Add | Self::Multiply)
    }

    pub const fn symbol(self) -> char {
        use Operator::*;
        match self {
            Add => '+',
            Subtract => '−',
            Multiply => '×',
            Divide => '÷',
        }
    }

    pub const fn name(self) -> &'static str {
        use Operator::*;
        match self {
            Add => "addition",
            Subtract => "subtraction",
            Multiply => "multiplication",
            Divide => "division",
        }
    }

    /// Applies the operator to a single pair, `None` when dividing by zero.
    pub fn apply(self, x: f64, y: f64) -> Option<f64> {
        use Operator::*;
        match self {
            Add => Some(x + y),
            Subtract => Some(x - y),
            Multiply => Some(x * y),
            Divide if y == 0.0 => None,
            Divide => Some(x / y),
        }
    }

    /// Left fold over `values`, the first value seeds the accumulator.
    pub fn fold<I>(self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter();
        let first = values.next()?;
        values.try_fold(first, |acc, value| self.apply(acc, value))
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::Subtract
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        use Operator::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "addition" | "add" | "+" => Ok(Add),
            "subtraction" | "sub" | "subtract" | "-" | "−" => Ok(Subtract),
            "multiplication" | "mul" | "multiply" | "*" | "x" | "×" => Ok(Multiply),
            "division" | "div" | "divide" | "/" | "÷" => Ok(Divide),
            _ => Err(UnknownOperator),
        }
    }
}

/// Pure numeric core: `x OP y`, or `None` when `y` is zero under division.
pub fn apply(operator: Operator, x: f64, y: f64) -> Option<f64> {
    operator.apply(x, y)
}
