//! # Quantity Parser
//!
//! Turns the free-text `quantity` column of the menu sheet into a numeric
//! quantity and a unit string. People type quantities in a handful of shapes,
//! so the grammars are tried in a fixed priority order and the first match wins:
//!
//! 1. a bare number (`"16"`, `"~3"`) counts items
//! 2. a fraction and a unit (`"3/4 cup"`)
//! 3. a number and a unit (`"12 pounds"`, `"~5 oz"`)
//! 4. a unit without a number (`"dozen"`), which means one of that unit
//! 5. nothing at all, which means one item
//!
//! No unit conversion happens here; units are grouped later by their literal text.
//!
//! ## Usage
//!
//! ```rust
//! use food_planner::quantity_parser::{parse_quantity, ParseMethod};
//!
//! let parsed = parse_quantity("3/4 cup");
//! assert_eq!(parsed.quantity, 0.75);
//! assert_eq!(parsed.unit, "cup");
//! assert_eq!(parsed.parse_method, ParseMethod::FractionalQuantity);
//! ```

use crate::measurement_patterns::{
    FRACTION_WITH_UNIT_REGEX, NUMBER_ONLY_REGEX, NUMBER_WITH_UNIT_REGEX,
};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit assigned when a quantity has no explicit unit
pub const COUNT_UNIT: &str = "count";

/// Which grammar rule produced a [`ParsedQuantity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseMethod {
    /// Only a number was given
    NoUnitQuantity,
    /// `N/M unit`
    FractionalQuantity,
    /// `N unit` or `N.N unit`
    NumericalQuantity,
    /// Text with no leading number
    UnitNoQuantity,
    /// Empty or whitespace-only text
    BlankOneCount,
}

impl ParseMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMethod::NoUnitQuantity => "noUnitQuantity",
            ParseMethod::FractionalQuantity => "fractionalQuantity",
            ParseMethod::NumericalQuantity => "numericalQuantity",
            ParseMethod::UnitNoQuantity => "unitNoQuantity",
            ParseMethod::BlankOneCount => "blankOneCount",
        }
    }
}

impl fmt::Display for ParseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing a quantity field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuantity {
    /// Numeric amount, never rounded
    pub quantity: f64,
    /// Unit text, trimmed
    pub unit: String,
    /// The rule that matched
    pub parse_method: ParseMethod,
}

impl ParsedQuantity {
    fn new(quantity: f64, unit: &str, parse_method: ParseMethod) -> Self {
        Self {
            quantity,
            unit: unit.trim().to_string(),
            parse_method,
        }
    }
}

/// Parse a quantity field. Never fails: anything unrecognised becomes
/// one unit of whatever the text says.
pub fn parse_quantity(text: &str) -> ParsedQuantity {
    let text = text.trim();

    let parsed = parse_number_only(text)
        .or_else(|| parse_fraction_with_unit(text))
        .or_else(|| parse_number_with_unit(text))
        .unwrap_or_else(|| {
            if text.is_empty() {
                ParsedQuantity::new(1.0, COUNT_UNIT, ParseMethod::BlankOneCount)
            } else {
                ParsedQuantity::new(1.0, text, ParseMethod::UnitNoQuantity)
            }
        });

    trace!(
        "Parsed quantity {:?} as {} {:?} via {}",
        text,
        parsed.quantity,
        parsed.unit,
        parsed.parse_method
    );
    parsed
}

fn parse_number_only(text: &str) -> Option<ParsedQuantity> {
    let captures = NUMBER_ONLY_REGEX.captures(text)?;
    let quantity: f64 = captures[1].parse().ok()?;
    Some(ParsedQuantity::new(
        quantity,
        COUNT_UNIT,
        ParseMethod::NoUnitQuantity,
    ))
}

fn parse_fraction_with_unit(text: &str) -> Option<ParsedQuantity> {
    let captures = FRACTION_WITH_UNIT_REGEX.captures(text)?;
    let numerator: f64 = captures[1].parse().ok()?;
    let denominator: f64 = captures[2].parse().ok()?;

    // A zero denominator is not a fraction; let the later rules decide.
    if denominator == 0.0 {
        return None;
    }

    Some(ParsedQuantity::new(
        numerator / denominator,
        &captures[3],
        ParseMethod::FractionalQuantity,
    ))
}

fn parse_number_with_unit(text: &str) -> Option<ParsedQuantity> {
    let captures = NUMBER_WITH_UNIT_REGEX.captures(text)?;
    let quantity: f64 = captures[1].parse().ok()?;
    let unit = captures.get(2).or_else(|| captures.get(3))?.as_str();
    Some(ParsedQuantity::new(
        quantity,
        unit,
        ParseMethod::NumericalQuantity,
    ))
}
