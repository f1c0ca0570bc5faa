//! # Measurement Patterns Module
//!
//! This module contains the regex patterns used to split a free-text quantity
//! field into a number and a unit. Each pattern tolerates a leading `~`
//! ("about") marker, which carries no meaning for the numeric value.

use lazy_static::lazy_static;
use regex::Regex;

/// A bare number: "16", "2.5", "~3"
pub const NUMBER_ONLY_PATTERN: &str = r"^~?\s*(\d+(?:\.\d+)?|\.\d+)$";

/// A fraction followed by a unit: "3/4 cup", "1 / 2 tsp"
pub const FRACTION_WITH_UNIT_PATTERN: &str = r"^~?\s*(\d+)\s*/\s*(\d+)\s+(\S.*)$";

/// A number followed by a unit: "12 pounds", "~5 oz", "500g".
/// The unit lands in group 2 when separated by whitespace, group 3 when glued on.
pub const NUMBER_WITH_UNIT_PATTERN: &str =
    r"^~?\s*(\d+(?:\.\d+)?|\.\d+)(?:\s+(\S.*)|([^\d\s./].*))$";

lazy_static! {
    pub static ref NUMBER_ONLY_REGEX: Regex =
        Regex::new(NUMBER_ONLY_PATTERN).expect("Number-only pattern should be valid");
    pub static ref FRACTION_WITH_UNIT_REGEX: Regex =
        Regex::new(FRACTION_WITH_UNIT_PATTERN).expect("Fraction pattern should be valid");
    pub static ref NUMBER_WITH_UNIT_REGEX: Regex =
        Regex::new(NUMBER_WITH_UNIT_PATTERN).expect("Number-with-unit pattern should be valid");
}
