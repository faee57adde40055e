//! Numeric normalization
//!
//! Every value that crosses a component boundary (stored, displayed, validated
//! or exported) is rounded to a canonical precision exactly once. Rounding is
//! performed on the shortest decimal representation of the float, not on its
//! binary value, so `59.999999999` becomes `60.00` and `25.995` becomes `26.00`
//! even though `25.995` is stored as `25.99499999...` in binary.
//!
//! Normalized values are compared with an absolute tolerance because
//! arithmetic on them reintroduces representation error.

use std::collections::BTreeMap;

/// Canonical number of decimal places
pub const DEFAULT_DECIMALS: u32 = 2;

/// Absolute tolerance used by every comparison of normalized values
pub const TOLERANCE: f64 = 1e-9;

/// Round `value` to `decimals` places, half away from zero, on its decimal
/// representation.
///
/// Non-finite input is returned unchanged. Negative zero is returned as
/// positive zero.
///
/// # Examples
/// ```
/// use harnessgen_core::precision::round_value;
///
/// assert_eq!(round_value(59.999999999, 2), 60.0);
/// assert_eq!(round_value(25.995, 2), 26.0);
/// assert_eq!(round_value(-1.005, 2), -1.01);
/// ```
pub fn round_value(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // `Display` for f64 yields the shortest round-trip representation and
    // never switches to exponent notation.
    let repr = value.to_string();
    let (negative, magnitude) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr.as_str()),
    };
    let (int_part, frac_part) = magnitude.split_once('.').unwrap_or((magnitude, ""));

    let keep = decimals as usize;
    if frac_part.len() <= keep {
        return value + 0.0;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(keep))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes()[keep] >= b'5' {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - keep;
    let mut text = String::with_capacity(digits.len() + 2);
    if negative {
        text.push('-');
    }
    text.extend(digits[..split].iter().map(|d| char::from(b'0' + d)));
    if keep > 0 {
        text.push('.');
        text.extend(digits[split..].iter().map(|d| char::from(b'0' + d)));
    }

    text.parse::<f64>().map(|rounded| rounded + 0.0).unwrap_or(value)
}

/// Round to the canonical precision
pub fn normalize(value: f64) -> f64 {
    round_value(value, DEFAULT_DECIMALS)
}

/// Normalize a value, refusing NaN and infinities
pub fn normalize_finite(value: f64) -> Option<f64> {
    value.is_finite().then(|| normalize(value))
}

/// Normalize every value of a name-to-value map
pub fn round_all<K: Ord + Clone>(values: &BTreeMap<K, f64>) -> BTreeMap<K, f64> {
    values
        .iter()
        .map(|(key, value)| (key.clone(), normalize(*value)))
        .collect()
}

/// Whether `value` is already at canonical precision
pub fn is_normalized(value: f64) -> bool {
    value.is_finite() && normalize(value) == value
}

/// Compare two values using the default absolute tolerance
pub fn equal_within_tolerance(a: f64, b: f64) -> bool {
    equal_within(a, b, TOLERANCE)
}

/// Compare two values using an explicit absolute tolerance
pub fn equal_within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// `a < b`, where tolerance-equal values are not less
pub fn less_than(a: f64, b: f64) -> bool {
    a < b && !equal_within_tolerance(a, b)
}

/// `a > b`, where tolerance-equal values are not greater
pub fn greater_than(a: f64, b: f64) -> bool {
    a > b && !equal_within_tolerance(a, b)
}

/// `a <= b`, where tolerance-equal values count as equal
pub fn at_most(a: f64, b: f64) -> bool {
    !greater_than(a, b)
}

/// `a >= b`, where tolerance-equal values count as equal
pub fn at_least(a: f64, b: f64) -> bool {
    !less_than(a, b)
}
