use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use serde::{Deserialize, Serialize};

/// A value needs at least this many fractional digits before a repeating block is trusted.
const MIN_FRACTION_DIGITS: usize = 10;

/// Shortest block the tail search considers.
const MIN_BLOCK_LEN: usize = 2;

/// Decimal split into integer digits, non-repeating fraction digits and the repeating block that would carry a
/// vinculum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingDecimal {
    pub integer: String,
    pub non_repeating: String,
    pub repeating: String,
}

impl RepeatingDecimal {
    /// Text form with the block written out, e.g. `0.33...` or `0.5384615384...`.
    pub fn expanded(&self) -> String {
        if self.non_repeating.is_empty() {
            format!(
                "{}.{}{}...",
                self.integer, self.repeating, self.repeating
            )
        } else {
            format!(
                "{}.{}{}...",
                self.integer, self.non_repeating, self.repeating
            )
        }
    }
}

impl fmt::Display for RepeatingDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({})",
            self.integer, self.non_repeating, self.repeating
        )
    }
}

/// Detects a repeating fractional pattern in the shortest decimal text of `value`.
///
/// The last digit may be a rounding artifact, so when the full text shows no pattern it is dropped and the search
/// runs again. Integers, terminating decimals and values without an obvious block give `None`.
pub fn repeating_decimal(value: f64) -> Option<RepeatingDecimal> {
    if !value.is_finite() {
        return None;
    }

    let text = format!("{}", value);
    let mut candidate = text.as_str();
    let mut block = find_repeating_tail(candidate);
    if block.is_none() {
        candidate = strip_last_digit(candidate);
        block = find_repeating_tail(candidate);
    }
    let block = minimal_period(block?);

    let (integer, fraction) = candidate.split_once('.')?;
    if fraction.len() < MIN_FRACTION_DIGITS {
        return None;
    }

    let mut non_repeating = fraction;
    while let Some(rest) = non_repeating.strip_suffix(block) {
        non_repeating = rest;
    }

    Some(RepeatingDecimal {
        integer: integer.to_string(),
        non_repeating: non_repeating.to_string(),
        repeating: block.to_string(),
    })
}

fn strip_last_digit(text: &str) -> &str {
    match text.as_bytes().last() {
        Some(last) if last.is_ascii_digit() => &text[..text.len() - 1],
        _ => text,
    }
}

/// Finds the block of a fraction that ends in some blocks of two or more digits, the last of which appears twice.
///
/// The leading free digits are taken as long as possible, then blocks are tried longest first, so the first hit is
/// the one a greedy backtracking search reports.
fn find_repeating_tail(text: &str) -> Option<&str> {
    let (integer, fraction) = text.split_once('.')?;
    if integer.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    (0..=fraction.len())
        .rev()
        .find_map(|start| match_blocks(fraction, start, None))
}

/// Matches one or more blocks from `pos`, followed by a copy of the last block that ends the string.
fn match_blocks<'a>(digits: &'a str, pos: usize, last: Option<&'a str>) -> Option<&'a str> {
    let rest = digits.len() - pos;
    for len in (MIN_BLOCK_LEN..=rest).rev() {
        let block = &digits[pos..pos + len];
        if let Some(found) = match_blocks(digits, pos + len, Some(block)) {
            return Some(found);
        }
    }

    let last = last?;
    (&digits[pos..] == last).then_some(last)
}

/// Shortest block whose repetition spells out `block`, e.g. `0909` gives `09`.
fn minimal_period(block: &str) -> &str {
    let bytes = block.as_bytes();
    (1..bytes.len())
        .filter(|period| bytes.len() % period == 0)
        .find(|&period| bytes.chunks(period).all(|chunk| chunk == &bytes[..period]))
        .map_or(block, |period| &block[..period])
}
