//! Answer evaluation: lenient integer parsing and the correct / incorrect
//! decision. No side effects; the caller sequences progression and building
//! updates from the returned outcome.

use super::problem::Problem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Input had no parseable integer prefix (including empty input).
    NotANumber,
    Correct,
    /// Wrong answer; carries the expected value for display.
    Incorrect(i32),
}

/// Parse a leading integer the way `parseInt` does: skip leading whitespace,
/// accept an optional sign, take the longest digit prefix, ignore the rest.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for c in digits.chars() {
        value = value.saturating_mul(10).saturating_add((c as u8 - b'0') as i64);
    }
    Some(if negative { -value } else { value })
}

pub fn evaluate(raw: &str, problem: &Problem) -> Outcome {
    match parse_int_prefix(raw) {
        None => Outcome::NotANumber,
        Some(v) if v == problem.answer as i64 => Outcome::Correct,
        Some(_) => Outcome::Incorrect(problem.answer),
    }
}
