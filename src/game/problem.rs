//! Arithmetic problem generation and hint derivation.
//!
//! Difficulty comes in three tiers: simple warm-up problems (no carrying or
//! borrowing) for the first few answers of a session, regular two-digit
//! problems after that, and boss problems (three-digit minus/plus two-digit)
//! on every 10th attempted floor.

use super::progress::ProgressionState;
use super::rng::Lcg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    /// Display symbol: a true minus glyph, not a hyphen.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "\u{2212}",
        }
    }
}

/// Set of operations enabled by the player. Non-empty by construction: the UI
/// reverts any toggle that would empty it.
#[derive(Clone, Copy, Debug)]
pub struct OperationSelection {
    pub addition: bool,
    pub subtraction: bool,
}

impl Default for OperationSelection {
    fn default() -> Self {
        Self {
            addition: true,
            subtraction: true,
        }
    }
}

impl OperationSelection {
    pub fn enabled(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(2);
        if self.addition {
            ops.push(Operation::Add);
        }
        if self.subtraction {
            ops.push(Operation::Subtract);
        }
        ops
    }
}

/// One immutable arithmetic problem. Replaced, never mutated, on every
/// generation cycle.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    pub first: i32,
    pub second: i32,
    pub operation: Operation,
    pub answer: i32,
    pub is_boss: bool,
}

impl Problem {
    /// Problem line in the form `"12 + 34 = ?"`.
    pub fn display_text(&self) -> String {
        format!("{} {} {} = ?", self.first, self.operation.symbol(), self.second)
    }

    /// Canonical step-by-step hint. Always computed; visibility is the
    /// presentation layer's concern.
    ///
    /// Addition decomposes both operands into whole tens and ones
    /// (`40 + 20 + 5 + 3`); subtraction shows a two-step reduction over the
    /// second operand (`(57 − 20) − 3 = 37 − 3`).
    pub fn hint_text(&self) -> String {
        let tens1 = self.first / 10 * 10;
        let ones1 = self.first % 10;
        let tens2 = self.second / 10 * 10;
        let ones2 = self.second % 10;
        match self.operation {
            Operation::Add => format!("{tens1} + {tens2} + {ones1} + {ones2}"),
            Operation::Subtract => {
                let after_tens = self.first - tens2;
                format!(
                    "({} \u{2212} {tens2}) \u{2212} {ones2} = {after_tens} \u{2212} {ones2}",
                    self.first
                )
            }
        }
    }
}

/// Generate the next problem for the given selection and progression state.
/// Reads the progression (boss round, simple mode) but never mutates it.
pub fn generate(
    selection: OperationSelection,
    progression: &ProgressionState,
    rng: &mut Lcg,
) -> Problem {
    let ops = selection.enabled();
    let operation = *rng.pick(&ops);
    let is_boss = progression.is_boss_round();

    let (first, second) = if is_boss {
        // Three-digit against two-digit, both operations. Subtraction draws
        // the operands independently, so the answer may be negative.
        (rng.range_inclusive(100, 899), rng.range_inclusive(10, 99))
    } else if progression.simple_mode() {
        match operation {
            Operation::Add => {
                // Digit pairs chosen so neither column sum exceeds 9.
                let tens1 = rng.range_inclusive(1, 5);
                let tens2 = rng.range_inclusive(1, 9 - tens1);
                let ones1 = rng.range_inclusive(1, 5);
                let ones2 = rng.range_inclusive(1, 9 - ones1);
                (tens1 * 10 + ones1, tens2 * 10 + ones2)
            }
            Operation::Subtract => {
                // Each digit of the first operand strictly exceeds the
                // matching digit of the second: no borrowing, result positive.
                let tens1 = rng.range_inclusive(4, 8);
                let tens2 = rng.range_inclusive(1, tens1 - 1);
                let ones1 = rng.range_inclusive(4, 8);
                let ones2 = rng.range_inclusive(1, ones1 - 1);
                (tens1 * 10 + ones1, tens2 * 10 + ones2)
            }
        }
    } else {
        match operation {
            Operation::Add => (rng.range_inclusive(10, 99), rng.range_inclusive(10, 99)),
            Operation::Subtract => {
                let first = rng.range_inclusive(10, 99);
                // Degenerate-range clamp: below 21 the second operand is
                // forced to 10, which for first == 10 permits an equal pair.
                let second = if first >= 21 {
                    rng.range_inclusive(10, first - 1)
                } else {
                    10
                };
                (first, second)
            }
        }
    };

    let answer = match operation {
        Operation::Add => first + second,
        Operation::Subtract => first - second,
    };

    Problem {
        first,
        second,
        operation,
        answer,
        is_boss,
    }
}
