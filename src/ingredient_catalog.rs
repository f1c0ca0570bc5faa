//! # Ingredient Catalog
//!
//! The catalog is the list of every ingredient the trip knows how to buy,
//! keyed by its lower-cased name. Menu items and purchases refer to
//! ingredients by name only and resolve them here on demand.
//!
//! Building the catalog runs two name checks over the whole sheet:
//!
//! - **exact duplicates**: the same name on more than one row (the first row wins)
//! - **similar names**: two distinct names where one contains the other,
//!   such as `"carrot"` and `"carrots"`, which usually means a typo
//!
//! In strict mode either finding aborts the run; otherwise both are recorded
//! as warnings.

use crate::planner_errors::{Diagnostics, PlannerError, Result};
use crate::record_normalizer::{apply_defaults, normalize_row, RawRow, INGREDIENT_DEFAULTS};
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Store assigned to ingredients whose row names none
pub const NO_STORE_DEFINED: &str = "NO STORE DEFINED";

/// A purchasable ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Lower-cased, trimmed name; unique within the catalog
    pub name: String,
    /// Where to buy it
    pub buy_store: String,
    /// Fallback store, if any
    pub buy_store_alternate: Option<String>,
    /// Free-text notes from the catalog sheet
    pub notes: String,
}

impl Ingredient {
    pub fn new(name: &str, buy_store: &str) -> Self {
        Self {
            name: normalize_name(name),
            buy_store: buy_store.trim().to_string(),
            buy_store_alternate: None,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.trim().to_string();
        self
    }

    pub fn with_alternate_store(mut self, store: &str) -> Self {
        self.buy_store_alternate = Some(store.trim().to_string()).filter(|s| !s.is_empty());
        self
    }

    /// Construct from a normalized row with defaults already applied
    fn from_row(row: &RawRow) -> Self {
        Self {
            name: normalize_name(row.get("name")),
            buy_store: row.get("buyStore").to_string(),
            buy_store_alternate: row.optional("buyStoreAlternate"),
            notes: row.get("notes").to_string(),
        }
    }
}

/// Canonical form of an ingredient name used for every lookup
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validated, deduplicated set of ingredients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientCatalog {
    ingredients: BTreeMap<String, Ingredient>,
}

impl IngredientCatalog {
    /// Build the catalog from raw ingredient rows.
    ///
    /// # Arguments
    ///
    /// * `rows` - Rows from the ingredient sheet, in file order
    /// * `diagnostics` - Receives findings demoted to warnings
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first batch of findings: rows without a
    /// name, then duplicate names, then similar names.
    pub fn build(rows: Vec<RawRow>, diagnostics: &mut Diagnostics) -> Result<Self> {
        let mut catalog = Self::default();
        let mut rejected = Vec::new();
        let mut duplicates = BTreeSet::new();

        for row in rows.into_iter().filter_map(normalize_row) {
            if !row.has("name") {
                rejected.push(format!("missing name: {row}"));
                continue;
            }

            let mut row = row;
            apply_defaults(&mut row, INGREDIENT_DEFAULTS);
            let ingredient = Ingredient::from_row(&row);

            if catalog.ingredients.contains_key(&ingredient.name) {
                debug!("Ignoring repeated ingredient {:?} at row {}", ingredient.name, row.line);
                duplicates.insert(ingredient.name);
                continue;
            }
            catalog.ingredients.insert(ingredient.name.clone(), ingredient);
        }

        if !rejected.is_empty() {
            diagnostics.raise_or_warn(PlannerError::Structural {
                kind: "ingredient".to_string(),
                rows: rejected,
            })?;
        }
        if !duplicates.is_empty() {
            diagnostics.raise_or_warn(PlannerError::DuplicateName {
                names: duplicates.into_iter().collect(),
            })?;
        }
        let similar = catalog.similar_names();
        if !similar.is_empty() {
            diagnostics.raise_or_warn(PlannerError::SimilarNames { pairs: similar })?;
        }

        info!("Built ingredient catalog with {} ingredients", catalog.len());
        Ok(catalog)
    }

    /// Catalog from already-typed ingredients; later repeats are ignored
    pub fn from_ingredients(ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        let mut catalog = Self::default();
        for ingredient in ingredients {
            catalog
                .ingredients
                .entry(ingredient.name.clone())
                .or_insert(ingredient);
        }
        catalog
    }

    /// Find an ingredient by name, ignoring case and surrounding whitespace
    pub fn lookup(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.get(&normalize_name(name))
    }

    /// Like [`lookup`](Self::lookup), but a miss becomes a resolution error
    pub fn resolve(&self, name: &str, context: &str) -> Result<&Ingredient> {
        self.lookup(name).ok_or_else(|| PlannerError::Resolution {
            context: context.to_string(),
            name: normalize_name(name),
        })
    }

    /// Every ingredient, sorted by name
    pub fn all(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    /// Sorted, unique store names
    pub fn store_names(&self) -> Vec<String> {
        self.all()
            .map(|i| i.buy_store.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Pairs of distinct names where one contains the other
    pub fn similar_names(&self) -> Vec<(String, String)> {
        let names: Vec<&String> = self.ingredients.keys().collect();
        let mut pairs = Vec::new();

        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                if first.contains(second.as_str()) || second.contains(first.as_str()) {
                    pairs.push((first.to_string(), second.to_string()));
                }
            }
        }
        pairs
    }
}
