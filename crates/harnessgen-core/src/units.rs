//! Unit symbols and display formatting
//!
//! Every parameter is measured in millimeters, degrees or a plain count.
//! Display strings always go through the normalizer first so that what the
//! user sees is exactly what is stored.

use crate::precision::{round_value, DEFAULT_DECIMALS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeters,
    /// Degrees
    Degrees,
    /// Dimensionless count
    Count,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Millimeters
    }
}

impl Unit {
    /// Symbol appended to formatted values
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Degrees => "°",
            Self::Count => "#",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeters => write!(f, "mm"),
            Self::Degrees => write!(f, "degrees"),
            Self::Count => write!(f, "count"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" => Ok(Self::Millimeters),
            "deg" | "degrees" | "°" => Ok(Self::Degrees),
            "count" | "#" | "" => Ok(Self::Count),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

/// Format a value for display with its unit symbol
///
/// Lengths and angles are shown with two decimals, counts as integers:
/// `60.00°`, `30.00mm`, `5#`.
pub fn format_display(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Count => format!("{}#", round_value(value, 0)),
        _ => {
            let rounded = round_value(value, DEFAULT_DECIMALS);
            format!(
                "{:.*}{}",
                DEFAULT_DECIMALS as usize,
                rounded,
                unit.symbol()
            )
        }
    }
}

/// Parse user input into a number
///
/// Partial inputs typed into a numeric field are tolerated: `.1` and `1.` are
/// accepted, while an empty string, a bare `.` or anything non-numeric yields
/// `None` so the caller keeps the current value. Integer fields refuse any
/// decimal point.
pub fn parse_input(input: &str, integer: bool) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() || input == "." {
        return None;
    }

    if !input
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    {
        return None;
    }

    if integer {
        if input.contains('.') {
            return None;
        }
        return input.parse::<i64>().ok().map(|v| v as f64);
    }

    input.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(60.0, Unit::Degrees), "60.00°");
        assert_eq!(format_display(30.0, Unit::Millimeters), "30.00mm");
        assert_eq!(format_display(5.0, Unit::Count), "5#");
        assert_eq!(format_display(25.995, Unit::Millimeters), "26.00mm");
        assert_eq!(format_display(0.1 + 0.2, Unit::Millimeters), "0.30mm");
    }

    #[test]
    fn test_parse_partial_decimals() {
        assert_eq!(parse_input(".1", false), Some(0.1));
        assert_eq!(parse_input("1.", false), Some(1.0));
        assert_eq!(parse_input(" 12.5 ", false), Some(12.5));
        assert_eq!(parse_input(".", false), None);
        assert_eq!(parse_input("", false), None);
        assert_eq!(parse_input("1.2.3", false), None);
        assert_eq!(parse_input("abc", false), None);
        assert_eq!(parse_input("inf", false), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_input("6", true), Some(6.0));
        assert_eq!(parse_input("6.", true), None);
        assert_eq!(parse_input("6.5", true), None);
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Millimeters);
        assert_eq!("degrees".parse::<Unit>().unwrap(), Unit::Degrees);
        assert_eq!("#".parse::<Unit>().unwrap(), Unit::Count);
        assert!("furlong".parse::<Unit>().is_err());
    }
}
