use serde::{Deserialize, Serialize};

use crate::*;

/// Side of the target a partial result must stay on while operands are still missing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    /// The running value may not grow past the target.
    Upper,
    /// The running value may not shrink below the target.
    Lower,
}

impl Bound {
    pub fn is_violated(self, value: f64, target: f64) -> bool {
        match self {
            Self::Upper => value > target,
            Self::Lower => value < target,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRules {
    /// Picking a single tile that already equals the target is rejected.
    pub forbid_direct_answer: bool,
    pub bound: Option<Bound>,
}

impl OperatorRules {
    pub const fn new(forbid_direct_answer: bool, bound: Option<Bound>) -> Self {
        Self {
            forbid_direct_answer,
            bound,
        }
    }

    pub const fn permissive() -> Self {
        Self::new(false, None)
    }
}

/// Named validity rules, one entry per operator.
///
/// Additive operators forbid answering with a single tile and bound the running value, multiplicative ones do
/// neither.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePolicy {
    pub add: OperatorRules,
    pub subtract: OperatorRules,
    pub multiply: OperatorRules,
    pub divide: OperatorRules,
    /// Flag partial selections that no available tile can complete.
    pub require_completion: bool,
}

impl RulePolicy {
    pub const fn permissive() -> Self {
        Self {
            add: OperatorRules::permissive(),
            subtract: OperatorRules::permissive(),
            multiply: OperatorRules::permissive(),
            divide: OperatorRules::permissive(),
            require_completion: false,
        }
    }

    pub const fn rules_for(&self, operator: Operator) -> OperatorRules {
        use Operator::*;
        match operator {
            Add => self.add,
            Subtract => self.subtract,
            Multiply => self.multiply,
            Divide => self.divide,
        }
    }

    pub fn with_rules(mut self, operator: Operator, rules: OperatorRules) -> Self {
        use Operator::*;
        match operator {
            Add => self.add = rules,
            Subtract => self.subtract = rules,
            Multiply => self.multiply = rules,
            Divide => self.divide = rules,
        }
        self
    }

    pub fn with_required_completion(mut self, require_completion: bool) -> Self {
        self.require_completion = require_completion;
        self
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            add: OperatorRules::new(true, Some(Bound::Upper)),
            subtract: OperatorRules::new(true, Some(Bound::Lower)),
            multiply: OperatorRules::permissive(),
            divide: OperatorRules::permissive(),
            require_completion: false,
        }
    }
}
