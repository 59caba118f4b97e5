//! Lenient field coercion for untrusted JSON payloads.
//!
//! Every helper returns `Option` instead of an error: a field that is
//! missing or the wrong type simply yields nothing, and the caller falls
//! back to the next candidate or a default.

use serde_json::Value;

/// Numeric field as a finite `f64`. Non-numbers and non-finite values
/// (serde_json can produce infinities from out-of-range literals) yield
/// `None`.
pub fn finite_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

/// Finite, non-negative number rounded to an integer count.
pub fn count_u64(value: &Value) -> Option<u64> {
    finite_f64(value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64)
}

/// Non-empty string with surrounding whitespace removed.
pub fn trimmed_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Probe `names` on `object` in order and return the first value `extract`
/// accepts. A field that is present but rejected does not stop the scan.
pub fn first_match<'a, T>(
    object: &'a Value,
    names: &[&str],
    extract: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find_map(extract)
}
