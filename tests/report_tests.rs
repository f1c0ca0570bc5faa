//! # Report Derivation Tests
//!
//! Buy, pack and cook lists derived from small but realistic trips.

use food_planner::ingredient_catalog::{Ingredient, IngredientCatalog};
use food_planner::menu_items::MenuItemSet;
use food_planner::planner_errors::{Diagnostics, PlannerError, Strictness};
use food_planner::purchase_ledger::PurchaseLedger;
use food_planner::record_normalizer::RawRow;
use food_planner::report_engine::ReportEngine;
use food_planner::storage::{StorageLocation, NO_CONTAINER};

struct Trip {
    catalog: IngredientCatalog,
    menu: MenuItemSet,
    purchases: PurchaseLedger,
    diagnostics: Diagnostics,
}

impl Trip {
    fn new(catalog: IngredientCatalog, menu_rows: Vec<RawRow>, purchase_rows: Vec<RawRow>) -> Self {
        let mut diagnostics = Diagnostics::new(Strictness::Warn);
        let menu = MenuItemSet::build(menu_rows, &catalog, &mut diagnostics).unwrap();
        let purchases = PurchaseLedger::build(purchase_rows, &catalog, &menu, &mut diagnostics).unwrap();
        Self {
            catalog,
            menu,
            purchases,
            diagnostics,
        }
    }

    fn engine(&self) -> ReportEngine<'_> {
        ReportEngine::new(&self.catalog, &self.menu, &self.purchases, "Saturday")
    }
}

fn menu_row(line: usize, day: &str, meal: &str, item: &str, quantity: &str) -> RawRow {
    RawRow::from_pairs(
        line,
        [("day", day), ("meal", meal), ("item", item), ("quantity", quantity)],
    )
}

fn stored(mut row: RawRow, flag: &str) -> RawRow {
    row.insert(flag, "x");
    row
}

fn purchase_row(line: usize, name: &str, count: &str, units_per_count: &str, unit: &str) -> RawRow {
    RawRow::from_pairs(
        line,
        [("name", name), ("count", count), ("unitsPerCount", units_per_count), ("unit", unit)],
    )
}

fn carrot_trip() -> Trip {
    Trip::new(
        IngredientCatalog::from_ingredients([Ingredient::new("carrot", "Market")]),
        vec![menu_row(1, "1", "1B", "carrot", "3 lbs")],
        vec![purchase_row(2, "carrot", "1", "2", "lbs")],
    )
}

#[test]
fn test_carrot_buy_list() {
    let trip = carrot_trip();
    let buy_list = trip.engine().buy_list();

    assert_eq!(buy_list.stores.len(), 1);
    let market = buy_list.store("Market").unwrap();
    assert_eq!(market.ingredients.len(), 1);

    let carrot = &market.ingredients[0];
    assert_eq!(carrot.name, "carrot");
    assert_eq!(carrot.unit, "lbs");
    assert_eq!(carrot.quantity_required, 3.0);
    assert_eq!(carrot.quantity_purchased, 2.0);
    assert_eq!(carrot.quantity_still_needed, 1.0);
    assert_eq!(buy_list.time, "Saturday");
}

#[test]
fn test_buy_list_serializes_camel_case() {
    let trip = carrot_trip();
    let json = serde_json::to_value(trip.engine().buy_list()).unwrap();
    let carrot = &json["stores"][0]["ingredients"][0];

    assert_eq!(json["stores"][0]["name"], "Market");
    assert_eq!(carrot["quantityRequired"], 3.0);
    assert_eq!(carrot["quantityStillNeeded"], 1.0);
}

#[test]
fn test_required_quantity_sums_exact_unit_only() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([Ingredient::new("rice", "Costco")]),
        vec![
            menu_row(1, "3", "3D", "rice", "2 cups"),
            menu_row(2, "1", "3D", "rice", "1/2 cups"),
            menu_row(3, "2", "2L", "rice", "1 lb"),
            menu_row(4, "2", "3D", "rice", "1.5 cups"),
        ],
        vec![],
    );
    let engine = trip.engine();

    assert_eq!(engine.quantity_required("rice", "cups"), 4.0);
    assert_eq!(engine.quantity_required("rice", "lb"), 1.0);
    assert_eq!(engine.quantity_required("rice", "cup"), 0.0);

    let costco = engine.buy_list();
    let units: Vec<&str> = costco.stores[0].ingredients.iter().map(|e| e.unit.as_str()).collect();
    assert_eq!(units, vec!["cups", "lb"]);
}

#[test]
fn test_over_purchase_gives_negative_still_needed() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([Ingredient::new("eggs", "Market")]),
        vec![menu_row(1, "1", "1B", "eggs", "6")],
        vec![purchase_row(2, "eggs", "1", "12", "count")],
    );
    let buy_list = trip.engine().buy_list();
    assert_eq!(buy_list.stores[0].ingredients[0].quantity_still_needed, -6.0);
}

#[test]
fn test_generate_is_repeatable() {
    let trip = carrot_trip();
    let engine = trip.engine();
    let first = engine.generate().unwrap();
    let second = engine.generate().unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_unresolvable_purchase_does_not_count() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([Ingredient::new("carrot", "Market")]),
        vec![menu_row(1, "1", "3D", "carrot", "3 lbs")],
        vec![
            purchase_row(2, "carrots", "5", "1", "lbs"),
            purchase_row(3, "carrot", "1", "1", "lbs"),
        ],
    );

    assert_eq!(trip.purchases.len(), 1);
    assert_eq!(trip.diagnostics.warnings().len(), 1);
    let carrot = &trip.engine().buy_list().stores[0].ingredients[0];
    assert_eq!(carrot.quantity_purchased, 1.0);
    assert_eq!(carrot.quantity_still_needed, 2.0);
}

#[test]
fn test_pack_list_splits_by_container() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([
            Ingredient::new("butter", "Market"),
            Ingredient::new("salt", "Market"),
            Ingredient::new("mustard", "Market"),
            Ingredient::new("chocolate", "Market"),
        ]),
        vec![
            stored(menu_row(1, "1", "3D", "butter", "2 tbsp"), "inCoolerCool"),
            stored(menu_row(2, "2", "1B", "butter", "1 tbsp"), "inCoolerCool"),
            stored(menu_row(3, "6", "3D", "butter", "3 tbsp"), "inCoolerCool"),
            menu_row(4, "2", "3D", "salt", "1 tsp"),
            stored(menu_row(5, "2", "3D", "mustard", "1 tbsp"), "inCondiments"),
        ],
        vec![purchase_row(6, "chocolate", "2", "1", "bars")],
    );
    let pack_list = trip.engine().pack_list();

    let names: Vec<&str> = pack_list.containers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["NO CONTAINER", "bag 1 cooler 1", "bag 6 cooler 2", "condiments box"]
    );

    let first_bag = pack_list.container("bag 1 cooler 1").unwrap();
    assert_eq!(first_bag.item_list.len(), 1);
    assert_eq!(first_bag.item_list[0].quantity, 3.0);

    let unassigned = pack_list.container(NO_CONTAINER).unwrap();
    let unassigned: Vec<(&str, f64)> = unassigned
        .item_list
        .iter()
        .map(|entry| (entry.name.as_str(), entry.quantity))
        .collect();
    assert_eq!(unassigned, vec![("chocolate", 0.0), ("salt", 1.0)]);
}

#[test]
fn test_notes_are_merged_without_repeats() {
    let mut buying = menu_row(1, "1", "3D", "flour", "2 cups");
    buying.insert("buyingNotes", "unbleached");
    let mut purchase = purchase_row(2, "flour", "1", "4", "cups");
    purchase.insert("notes", "unbleached");

    let trip = Trip::new(
        IngredientCatalog::from_ingredients([Ingredient::new("flour", "Co-op").with_notes("bulk bin")]),
        vec![buying],
        vec![purchase],
    );
    let entry = &trip.engine().buy_list().stores[0].ingredients[0];
    assert_eq!(entry.notes, "bulk bin; unbleached");
}

#[test]
fn test_cook_list_order() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([
            Ingredient::new("pasta", "Costco").with_alternate_store("Market"),
            Ingredient::new("pesto", "Market").with_notes("keep cold"),
            Ingredient::new("granola", "Co-op"),
            Ingredient::new("apples", "Market"),
        ]),
        vec![
            stored(menu_row(1, "2", "3D", "pasta", "1 lb"), "inBoxDry"),
            stored(menu_row(2, "2", "3D", "pesto", "1 jar"), "inCoolerCool"),
            stored(menu_row(3, "2", "1B", "granola", "2 cups"), "inBoxDry"),
            stored(menu_row(4, "2", "1B", "apples", "2"), "inBoxFruit"),
            stored(menu_row(5, "1", "3D", "apples", "1"), "inBoxFruit"),
        ],
        vec![],
    );
    let cook_list = trip.engine().cook_list().unwrap();

    let meals: Vec<(u32, &str)> = cook_list
        .meals
        .iter()
        .map(|meal| (meal.day, meal.name.as_str()))
        .collect();
    assert_eq!(meals, vec![(1, "Dinner"), (2, "Breakfast"), (2, "Dinner")]);

    let dinner = &cook_list.meals[2];
    let dinner_items: Vec<(&str, &str)> = dinner
        .ingredients
        .iter()
        .map(|entry| (entry.container.as_str(), entry.name.as_str()))
        .collect();
    assert_eq!(
        dinner_items,
        vec![("bag 2 cooler 1", "pesto"), ("bag 2 drybox 1", "pasta")]
    );
    assert_eq!(dinner.ingredients[0].notes, "keep cold");
    assert_eq!(dinner.ingredients[1].buy_store_alternate.as_deref(), Some("Market"));
}

#[test]
fn test_unknown_meal_code_row_is_left_out() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([
            Ingredient::new("cocoa", "Market"),
            Ingredient::new("oats", "Co-op"),
        ]),
        vec![
            menu_row(1, "1", "1B", "oats", "1 cup"),
            menu_row(2, "1", "4S", "cocoa", "2 packets"),
        ],
        vec![],
    );

    assert_eq!(trip.menu.len(), 1);
    assert_eq!(trip.diagnostics.warnings().len(), 1);
    assert_eq!(trip.diagnostics.warnings()[0].kind, "structural");

    let reports = trip.engine().generate().unwrap();
    assert_eq!(reports.cook_list.meals.len(), 1);
    assert_eq!(reports.cook_list.meals[0].name, "Breakfast");
    assert!(reports.buy_list.store("Market").is_none());
    assert_eq!(reports.buy_list.store("Co-op").unwrap().ingredients[0].name, "oats");
}

#[test]
fn test_unknown_meal_code_aborts_strict_menu() {
    let catalog = IngredientCatalog::from_ingredients([Ingredient::new("cocoa", "Market")]);
    let mut diagnostics = Diagnostics::new(Strictness::Strict);
    let error = MenuItemSet::build(
        vec![menu_row(1, "1", "4S", "cocoa", "2 packets")],
        &catalog,
        &mut diagnostics,
    )
    .unwrap_err();

    assert!(matches!(error, PlannerError::Structural { .. }));
    assert!(error.to_string().contains("4S"));
}

#[test]
fn test_location_index_groups_menu_rows() {
    let trip = Trip::new(
        IngredientCatalog::from_ingredients([
            Ingredient::new("peas", "Market"),
            Ingredient::new("corn", "Market"),
            Ingredient::new("bread", "Bakery"),
        ]),
        vec![
            stored(menu_row(1, "1", "3D", "peas", "1 bag"), "inCoolerFrozen"),
            stored(menu_row(2, "2", "3D", "corn", "1 bag"), "inCoolerFrozen"),
            stored(menu_row(3, "1", "2L", "bread", "1 loaf"), "inBoxBread"),
        ],
        vec![],
    );
    let index = trip.engine().location_index();

    assert_eq!(index.locations.len(), StorageLocation::ALL.len());
    let frozen: Vec<&str> = index
        .items_in(StorageLocation::CoolerFrozen)
        .iter()
        .map(|item| item.item.as_str())
        .collect();
    assert_eq!(frozen, vec!["corn", "peas"]);
    assert_eq!(index.items_in(StorageLocation::BoxBread).len(), 1);
    assert!(index.items_in(StorageLocation::Condiments).is_empty());

    let json = serde_json::to_value(&index).unwrap();
    assert_eq!(json["inCoolerFrozen"][0]["item"], "corn");
}
