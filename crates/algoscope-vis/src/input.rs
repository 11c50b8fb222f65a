//! Input arrays: random generation, custom CSV parsing, and the text echo.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

/// Smallest array the size setting allows.
pub const MIN_ARRAY_SIZE: usize = 5;

/// Largest array the size setting allows.
pub const MAX_ARRAY_SIZE: usize = 100;

/// Values drawn for generated arrays.
pub const VALUE_RANGE: RangeInclusive<i64> = 5..=99;

/// Clamp a requested array size to the supported range.
pub fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_ARRAY_SIZE, MAX_ARRAY_SIZE)
}

/// Generate `size` random values, optionally in ascending order.
pub fn generate_array<R: Rng + ?Sized>(rng: &mut R, size: usize, sorted: bool) -> Vec<i64> {
    let mut array: Vec<i64> = (0..size).map(|_| rng.gen_range(VALUE_RANGE)).collect();
    if sorted {
        array.sort_unstable();
    }
    array
}

/// Pick a search target present in `array`.
pub fn pick_target<R: Rng + ?Sized>(rng: &mut R, array: &[i64]) -> Option<i64> {
    array.choose(rng).copied()
}

/// Read the integer a token starts with: an optional sign, then decimal
/// digits. Anything after the digits is ignored, so `"3.7"` reads as 3 and
/// `"12px"` as 12. Tokens without leading digits, or too large for `i64`,
/// yield `None`.
pub fn leading_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let unsigned = token
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(token);
    let rest = unsigned.trim_start_matches(|c: char| c.is_ascii_digit());
    let digits = unsigned.len() - rest.len();
    if digits == 0 {
        return None;
    }
    let sign_len = token.len() - unsigned.len();
    token[..sign_len + digits].parse().ok()
}

/// Parse comma-separated integers, dropping tokens without a leading integer.
///
/// Returns [`Error::NoIntegers`] when nothing parses, so callers can keep
/// their current array.
///
/// ```
/// use algoscope_vis::input::parse_array;
///
/// assert_eq!(parse_array("4, x, 10,,7").unwrap(), vec![4, 10, 7]);
/// assert_eq!(parse_array("10, 3.7, 12px").unwrap(), vec![10, 3, 12]);
/// assert!(parse_array("abc").is_err());
/// ```
pub fn parse_array(text: &str) -> Result<Vec<i64>> {
    let parsed: Vec<i64> = text.split(',').filter_map(leading_integer).collect();
    if parsed.is_empty() {
        return Err(Error::NoIntegers(text.to_string()));
    }
    Ok(parsed)
}

/// Parse a search target by its leading integer; `None` means "no target".
pub fn parse_target(text: &str) -> Option<i64> {
    leading_integer(text)
}

/// Render an array the way the custom-input field shows it.
pub fn format_array(array: &[i64]) -> String {
    array
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
