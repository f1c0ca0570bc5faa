//! # Menu Items
//!
//! One menu row is one planned use of an ingredient: which day, which meal,
//! how much, and where it is packed. Rows are validated once at load time and
//! resolved against the [`IngredientCatalog`]; only the ingredient name is kept
//! so catalog data is never copied into the menu.
//!
//! Meal codes start with a digit giving their order within a day
//! (`1B` breakfast, `2L` lunch, `3D` dinner), which is what [`MenuItemSet::meals`]
//! sorts on.

use crate::ingredient_catalog::{normalize_name, IngredientCatalog};
use crate::planner_errors::{Diagnostics, PlannerError, Result};
use crate::quantity_parser::{parse_quantity, ParseMethod};
use crate::record_normalizer::{apply_defaults, normalize_row, RawRow, MENU_ITEM_DEFAULTS};
use crate::storage::{resolve_storage, storage_label, Container, StorageLocation};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// Fields every menu row must carry
pub const REQUIRED_MENU_FIELDS: &[&str] = &["day", "meal", "item", "quantity"];

/// Display labels for the known meal codes
pub const MEAL_LABELS: &[(&str, &str)] = &[("1B", "Breakfast"), ("2L", "Lunch"), ("3D", "Dinner")];

/// Which meal of the day a code stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
    Other,
}

impl MealKind {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1B" => MealKind::Breakfast,
            "2L" => MealKind::Lunch,
            "3D" => MealKind::Dinner,
            _ => MealKind::Other,
        }
    }
}

/// Display label for a meal code
pub fn meal_label(code: &str) -> Result<&'static str> {
    MEAL_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
        .ok_or_else(|| PlannerError::UnknownMealCode(code.to_string()))
}

/// A (day, meal) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MealSlot {
    pub day: u32,
    pub meal: String,
}

impl MealSlot {
    pub fn new(day: u32, meal: &str) -> Self {
        Self {
            day,
            meal: meal.to_string(),
        }
    }

    /// `day * 100 + leading digit of the meal code`
    pub fn sort_key(&self) -> u64 {
        let meal_order = self
            .meal
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .unwrap_or(0);
        u64::from(self.day) * 100 + u64::from(meal_order)
    }
}

/// A validated menu row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Position in the source sheet
    pub line: usize,
    pub day: u32,
    pub meal: String,
    pub meal_type: Option<String>,
    pub dish: Option<String>,
    /// Catalog name of the ingredient
    pub item: String,
    /// The quantity text as typed
    pub raw_quantity: String,
    pub quantity: f64,
    pub unit: String,
    pub parse_method: ParseMethod,
    pub storage: Option<StorageLocation>,
    pub cooking_notes: String,
    pub buying_notes: String,
}

impl MenuItem {
    pub fn slot(&self) -> MealSlot {
        MealSlot::new(self.day, &self.meal)
    }

    pub fn meal_kind(&self) -> MealKind {
        MealKind::from_code(&self.meal)
    }

    pub fn storage_label(&self) -> &'static str {
        storage_label(self.storage)
    }

    pub fn container(&self) -> Container {
        Container::for_item(self.storage, Some(i64::from(self.day)), self.meal_kind())
    }

    /// Construct from a normalized row with defaults applied and required
    /// fields already checked
    fn from_row(row: &RawRow, day: u32) -> Self {
        let parsed = parse_quantity(row.get("quantity"));
        Self {
            line: row.line,
            day,
            meal: row.get("meal").to_string(),
            meal_type: row.optional("mealType"),
            dish: row.optional("dish"),
            item: normalize_name(row.get("item")),
            raw_quantity: row.get("quantity").to_string(),
            quantity: parsed.quantity,
            unit: parsed.unit,
            parse_method: parsed.parse_method,
            storage: resolve_storage(row),
            cooking_notes: row.get("cookingNotes").to_string(),
            buying_notes: row.get("buyingNotes").to_string(),
        }
    }
}

/// Problems with a row's shape, or `None` when it can be built
fn structural_problem(row: &RawRow) -> Option<String> {
    let missing = row.missing(REQUIRED_MENU_FIELDS);
    if !missing.is_empty() {
        return Some(format!("missing {}: {row}", missing.join(", ")));
    }
    if row.get("day").parse::<u32>().is_err() {
        return Some(format!("day is not a whole number: {row}"));
    }
    if !row.get("meal").starts_with(|c: char| c.is_ascii_digit()) {
        return Some(format!("meal code must start with a digit: {row}"));
    }
    if meal_label(row.get("meal")).is_err() {
        return Some(format!("unknown meal code {:?}: {row}", row.get("meal")));
    }
    None
}

/// The validated menu, in sheet order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemSet {
    items: Vec<MenuItem>,
}

impl MenuItemSet {
    /// Validate menu rows and resolve each against the catalog.
    ///
    /// Rows with a blank `item` are skipped silently. Rows missing a required
    /// field, with a non-numeric day, or with a meal code that has no label
    /// are reported together as one structural finding. Each
    /// ingredient name that does not resolve is its own resolution finding.
    pub fn build(
        rows: Vec<RawRow>,
        catalog: &IngredientCatalog,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let mut items = Vec::new();
        let mut rejected = Vec::new();
        let mut unresolved = Vec::new();

        for mut row in rows.into_iter().filter_map(normalize_row) {
            if !row.has("item") {
                continue;
            }
            if let Some(problem) = structural_problem(&row) {
                rejected.push(problem);
                continue;
            }
            if catalog.lookup(row.get("item")).is_none() {
                unresolved.push(row.get("item").to_string());
                continue;
            }

            apply_defaults(&mut row, MENU_ITEM_DEFAULTS);
            let day = row.get("day").parse().unwrap_or_default();
            let item = MenuItem::from_row(&row, day);
            debug!(
                "Menu item {:?} on day {} {}: {} {:?} ({}) in {}",
                item.item,
                item.day,
                item.meal,
                item.quantity,
                item.unit,
                item.parse_method,
                item.storage_label()
            );
            items.push(item);
        }

        if !rejected.is_empty() {
            diagnostics.raise_or_warn(PlannerError::Structural {
                kind: "menu item".to_string(),
                rows: rejected,
            })?;
        }
        for name in unresolved {
            diagnostics.raise_or_warn(PlannerError::Resolution {
                context: "Invalid menu item".to_string(),
                name: normalize_name(&name),
            })?;
        }

        info!("Loaded {} menu items", items.len());
        Ok(Self { items })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Unique meals, breakfast before lunch before dinner within each day
    pub fn meals(&self) -> Vec<MealSlot> {
        let mut meals: Vec<MealSlot> = self
            .items
            .iter()
            .map(MenuItem::slot)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        meals.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.meal.cmp(&b.meal)));
        meals
    }

    /// Items planned for one meal, sorted by ingredient name
    pub fn items_for(&self, day: u32, meal: &str) -> Vec<&MenuItem> {
        let mut items: Vec<&MenuItem> = self
            .items
            .iter()
            .filter(|item| item.day == day && item.meal == meal)
            .collect();
        items.sort_by(|a, b| a.item.cmp(&b.item));
        items
    }

    /// Sorted, unique ingredient names used anywhere on the menu
    pub fn ingredient_names(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.item.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_catalog::Ingredient;
    use crate::planner_errors::Strictness;

    fn catalog() -> IngredientCatalog {
        IngredientCatalog::from_ingredients([
            Ingredient::new("eggs", "Market"),
            Ingredient::new("bacon", "Market"),
            Ingredient::new("pasta", "Costco"),
        ])
    }

    fn menu_row(line: usize, day: &str, meal: &str, item: &str, quantity: &str) -> RawRow {
        RawRow::from_pairs(
            line,
            [("day", day), ("meal", meal), ("item", item), ("quantity", quantity)],
        )
    }

    #[test]
    fn test_build_parses_quantity_and_storage() {
        let mut row = menu_row(5, "1", "1B", "Eggs", "12");
        row.insert("inCoolerCool", "x");
        let mut diagnostics = Diagnostics::new(Strictness::Strict);
        let menu = MenuItemSet::build(vec![row], &catalog(), &mut diagnostics).unwrap();

        let item = &menu.items()[0];
        assert_eq!(item.item, "eggs");
        assert_eq!(item.quantity, 12.0);
        assert_eq!(item.unit, "count");
        assert_eq!(item.parse_method, ParseMethod::NoUnitQuantity);
        assert_eq!(item.storage, Some(StorageLocation::CoolerCool));
        assert_eq!(item.cooking_notes, "");
    }

    #[test]
    fn test_rejections_are_batched_in_warn_mode() {
        let rows = vec![
            menu_row(1, "1", "1B", "eggs", ""),
            menu_row(2, "one", "1B", "eggs", "2"),
            menu_row(3, "1", "B1", "eggs", "2"),
            menu_row(4, "1", "1B", "", "2"),
            menu_row(5, "1", "1B", "tofu", "2"),
            menu_row(6, "2", "3D", "pasta", "1 lb"),
            menu_row(7, "2", "4S", "bacon", "2 strips"),
        ];
        let mut diagnostics = Diagnostics::new(Strictness::Warn);
        let menu = MenuItemSet::build(rows, &catalog(), &mut diagnostics).unwrap();

        assert_eq!(menu.len(), 1);
        assert_eq!(diagnostics.warnings().len(), 2);
        assert_eq!(diagnostics.warnings()[0].kind, "structural");
        assert_eq!(diagnostics.warnings()[0].message.lines().count(), 5);
        assert!(diagnostics.warnings()[0].message.contains("unknown meal code \"4S\""));
        assert_eq!(diagnostics.warnings()[1].kind, "resolution");
    }

    #[test]
    fn test_strict_mode_rejects() {
        let mut diagnostics = Diagnostics::new(Strictness::Strict);
        let result = MenuItemSet::build(
            vec![menu_row(1, "1", "1B", "tofu", "2")],
            &catalog(),
            &mut diagnostics,
        );
        assert_eq!(result.unwrap_err().kind(), "resolution");
    }

    #[test]
    fn test_meals_order_and_items_for() {
        let rows = vec![
            menu_row(1, "2", "3D", "pasta", "1 lb"),
            menu_row(2, "2", "1B", "eggs", "6"),
            menu_row(3, "1", "3D", "pasta", "1 lb"),
            menu_row(4, "2", "1B", "bacon", "1 lb"),
            menu_row(5, "2", "1B", "eggs", "6"),
        ];
        let mut diagnostics = Diagnostics::new(Strictness::Strict);
        let menu = MenuItemSet::build(rows, &catalog(), &mut diagnostics).unwrap();

        assert_eq!(
            menu.meals(),
            vec![MealSlot::new(1, "3D"), MealSlot::new(2, "1B"), MealSlot::new(2, "3D")]
        );
        let breakfast: Vec<&str> = menu.items_for(2, "1B").iter().map(|i| i.item.as_str()).collect();
        assert_eq!(breakfast, vec!["bacon", "eggs", "eggs"]);
        assert_eq!(menu.ingredient_names(), vec!["bacon", "eggs", "pasta"]);
    }

    #[test]
    fn test_meal_labels() {
        assert_eq!(meal_label("2L").unwrap(), "Lunch");
        assert!(matches!(meal_label("4S"), Err(PlannerError::UnknownMealCode(_))));
        assert_eq!(MealKind::from_code("3D"), MealKind::Dinner);
        assert_eq!(MealKind::from_code("4S"), MealKind::Other);
    }
}
