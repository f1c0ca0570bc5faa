//! # Record Normalizer
//!
//! Rows arrive from the dataset provider as loose `field name -> text` maps.
//! Before any record kind is built from them they are trimmed, blank rows are
//! dropped, and per-kind defaults are filled in for missing or empty fields.

use std::collections::BTreeMap;
use std::fmt;

/// Defaults applied to ingredient rows
pub const INGREDIENT_DEFAULTS: &[(&str, &str)] = &[
    ("buyStore", "NO STORE DEFINED"),
    ("buyStoreAlternate", ""),
    ("notes", ""),
];

/// Defaults applied to menu item rows
pub const MENU_ITEM_DEFAULTS: &[(&str, &str)] = &[("cookingNotes", ""), ("buyingNotes", "")];

/// Defaults applied to purchase rows
pub const PURCHASE_DEFAULTS: &[(&str, &str)] = &[("unit", "count"), ("unitsPerCount", "1")];

/// Values that read as "no" in a flag column
const FALSY_FLAGS: &[&str] = &["false", "0", "no", "n"];

/// One raw row from a dataset, with its 1-based position in the source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    fields: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: BTreeMap::new(),
        }
    }

    /// Build a row from `(field, value)` pairs
    pub fn from_pairs<K, V>(line: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Value of a field, or `""` when absent
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// `true` when the field is present and non-empty
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Value of a field, `None` when absent or empty
    pub fn optional(&self, field: &str) -> Option<String> {
        let value = self.get(field);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Whether a flag column reads as set
    pub fn flag(&self, field: &str) -> bool {
        is_truthy(self.get(field))
    }

    /// `true` when every field is empty
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.is_empty())
    }

    /// Names of the given fields that are missing or empty
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|field| !self.has(field))
            .collect()
    }
}

impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} {{", self.line)?;
        let mut first = true;
        for (field, value) in self.fields.iter().filter(|(_, v)| !v.is_empty()) {
            if !first {
                write!(f, ",")?;
            }
            write!(f, " {field}: {value:?}")?;
            first = false;
        }
        write!(f, " }}")
    }
}

/// Trim every value and drop the row if nothing is left
pub fn normalize_row(mut row: RawRow) -> Option<RawRow> {
    for value in row.fields.values_mut() {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }

    if row.is_blank() {
        None
    } else {
        Some(row)
    }
}

/// Fill missing or empty fields from `defaults`; present values are kept
pub fn apply_defaults(row: &mut RawRow, defaults: &[(&str, &str)]) {
    for (field, default) in defaults {
        if !row.has(field) {
            row.insert(*field, *default);
        }
    }
}

/// Boolean-ish reading of a spreadsheet cell
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !FALSY_FLAGS.iter().any(|f| value.eq_ignore_ascii_case(f))
}
