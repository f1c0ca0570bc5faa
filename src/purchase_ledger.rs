//! # Purchase Ledger
//!
//! Records what has already been bought. Each purchase is `count` packages of
//! `unitsPerCount` units each, so "2 bags of 5 lbs" is `count = 2`,
//! `unitsPerCount = 5`, `unit = "lbs"`. A purchase may name the day and meal
//! it was bought for, which ties it to a specific menu item.

use crate::ingredient_catalog::{normalize_name, IngredientCatalog};
use crate::menu_items::{MenuItem, MenuItemSet};
use crate::planner_errors::{Diagnostics, PlannerError, Result};
use crate::quantity_parser::COUNT_UNIT;
use crate::record_normalizer::{apply_defaults, normalize_row, RawRow, PURCHASE_DEFAULTS};
use log::{debug, info};
use serde::Serialize;

/// A validated purchase row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub line: usize,
    /// Catalog name of the ingredient
    pub name: String,
    pub count: f64,
    pub units_per_count: f64,
    pub unit: String,
    pub description: Option<String>,
    pub shopping_trip: Option<String>,
    pub notes: String,
    pub day: Option<String>,
    pub meal: Option<String>,
}

impl Purchase {
    /// Total units bought
    pub fn total_quantity(&self) -> f64 {
        self.count * self.units_per_count
    }

    /// Whether this purchase was bought for the given menu item
    pub fn satisfies(&self, item: &MenuItem) -> bool {
        let day_matches = match &self.day {
            Some(day) => day.parse::<u32>().map(|d| d == item.day).unwrap_or(false),
            None => true,
        };
        let meal_matches = match &self.meal {
            Some(meal) => *meal == item.meal,
            None => true,
        };
        self.name == item.item && day_matches && meal_matches
    }

    fn from_row(row: &RawRow) -> Result<Self> {
        let number = |field: &str| -> Result<f64> {
            let value = row.get(field);
            value
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| PlannerError::Parse {
                    field: field.to_string(),
                    value: value.to_string(),
                    row: row.to_string(),
                })
        };

        let unit = clean_unit(row.get("unit"));
        Ok(Self {
            line: row.line,
            name: normalize_name(row.get("name")),
            count: number("count")?,
            units_per_count: number("unitsPerCount")?,
            unit,
            description: row.optional("description"),
            shopping_trip: row.optional("shoppingTrip"),
            notes: row.get("notes").to_string(),
            day: row.optional("day"),
            meal: row.optional("meal"),
        })
    }
}

/// Strip trailing periods and whitespace ("lbs." -> "lbs")
fn clean_unit(unit: &str) -> String {
    let cleaned = unit.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        COUNT_UNIT.to_string()
    } else {
        cleaned.to_string()
    }
}

/// First menu item the purchase was bought for
pub fn find_matching_menu_item<'m>(purchase: &Purchase, menu: &'m MenuItemSet) -> Option<&'m MenuItem> {
    menu.items().iter().find(|item| purchase.satisfies(item))
}

/// Validated purchases, in sheet order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseLedger {
    purchases: Vec<Purchase>,
}

impl PurchaseLedger {
    /// Validate purchase rows against the catalog and menu.
    ///
    /// A `count` or `unitsPerCount` that is not a number always aborts.
    /// Unknown ingredient names drop the row (or abort in strict mode).
    /// A purchase tied to a day or meal that matches no menu item is kept,
    /// but reported.
    pub fn build(
        rows: Vec<RawRow>,
        catalog: &IngredientCatalog,
        menu: &MenuItemSet,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let mut purchases = Vec::new();
        let mut rejected = Vec::new();

        for mut row in rows.into_iter().filter_map(normalize_row) {
            if !row.has("name") {
                rejected.push(format!("missing name: {row}"));
                continue;
            }

            apply_defaults(&mut row, PURCHASE_DEFAULTS);
            let purchase = Purchase::from_row(&row)?;

            if let Err(error) = catalog.resolve(&purchase.name, "Invalid purchase") {
                diagnostics.raise_or_warn(error)?;
                continue;
            }

            if (purchase.day.is_some() || purchase.meal.is_some())
                && find_matching_menu_item(&purchase, menu).is_none()
            {
                diagnostics.raise_or_warn(PlannerError::Resolution {
                    context: format!(
                        "Purchase for day {} meal {} matches no menu item",
                        purchase.day.as_deref().unwrap_or("-"),
                        purchase.meal.as_deref().unwrap_or("-")
                    ),
                    name: purchase.name.clone(),
                })?;
            }

            debug!(
                "Purchase of {} x {} {:?} {}",
                purchase.count, purchase.units_per_count, purchase.unit, purchase.name
            );
            purchases.push(purchase);
        }

        if !rejected.is_empty() {
            diagnostics.raise_or_warn(PlannerError::Structural {
                kind: "purchase".to_string(),
                rows: rejected,
            })?;
        }

        info!("Loaded {} purchases", purchases.len());
        Ok(Self { purchases })
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }
}
