//! # Report Derivation Engine
//!
//! Derives the trip reports from the catalog, the menu and the purchase
//! ledger. Every report is a pure function of those three inputs plus the
//! run timestamp, so deriving twice yields identical structures.
//!
//! Quantities are only ever added up for identical `(name, unit)` pairs;
//! "2 lbs" and "32 oz" of the same ingredient are two separate lines.

use crate::ingredient_catalog::{IngredientCatalog, NO_STORE_DEFINED};
use crate::menu_items::{meal_label, MenuItem, MenuItemSet};
use crate::planner_errors::Result;
use crate::purchase_ledger::PurchaseLedger;
use crate::storage::{StorageLocation, NO_CONTAINER};
use chrono::Local;
use log::{debug, info};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Separator between notes gathered from different sheets
pub const NOTES_SEPARATOR: &str = "; ";

/// Human-readable timestamp for the reports of one run
pub fn report_timestamp() -> String {
    Local::now().format("%A, %B %-d, %Y at %-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyListEntry {
    pub name: String,
    pub unit: String,
    pub quantity_required: f64,
    pub quantity_purchased: f64,
    /// Negative when more was bought than the menu needs
    pub quantity_still_needed: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreBuyList {
    pub name: String,
    pub ingredients: Vec<BuyListEntry>,
}

/// What to buy, grouped by store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyList {
    pub stores: Vec<StoreBuyList>,
    pub time: String,
}

impl BuyList {
    pub fn store(&self, name: &str) -> Option<&StoreBuyList> {
        self.stores.iter().find(|store| store.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackListEntry {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub container: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPackList {
    pub name: String,
    pub item_list: Vec<PackListEntry>,
}

/// What goes in each container, containers sorted by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackList {
    pub containers: Vec<ContainerPackList>,
    pub time: String,
}

impl PackList {
    pub fn container(&self, name: &str) -> Option<&ContainerPackList> {
        self.containers.iter().find(|container| container.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookListEntry {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub notes: String,
    pub container: String,
    pub dish: Option<String>,
    pub buy_store: String,
    pub buy_store_alternate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookListMeal {
    pub day: u32,
    /// Display label such as "Breakfast"
    pub name: String,
    /// Meal code from the sheet
    pub meal: String,
    pub ingredients: Vec<CookListEntry>,
}

/// What to cook at each meal, in meal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookList {
    pub meals: Vec<CookListMeal>,
    pub time: String,
}

/// Menu rows grouped by storage location, one group per location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationIndex {
    pub locations: Vec<(StorageLocation, Vec<MenuItem>)>,
}

impl LocationIndex {
    pub fn items_in(&self, location: StorageLocation) -> &[MenuItem] {
        self.locations
            .iter()
            .find(|(l, _)| *l == location)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }
}

impl Serialize for LocationIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.locations.len()))?;
        for (location, items) in &self.locations {
            map.serialize_entry(location.key(), items)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreDirectoryEntry {
    pub name: String,
    pub ingredients: Vec<String>,
}

/// Everything derived in one run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripReports {
    pub buy_list: BuyList,
    pub pack_list: PackList,
    pub cook_list: CookList,
    pub location_index: LocationIndex,
    /// Unique ingredient names used by the menu
    pub ingredient_names: Vec<String>,
    /// Catalog ingredients grouped by store
    pub store_directory: Vec<StoreDirectoryEntry>,
}

/// Derives reports from immutable snapshots of the three tables
#[derive(Debug, Clone)]
pub struct ReportEngine<'a> {
    catalog: &'a IngredientCatalog,
    menu: &'a MenuItemSet,
    purchases: &'a PurchaseLedger,
    time: String,
}

impl<'a> ReportEngine<'a> {
    pub fn new(
        catalog: &'a IngredientCatalog,
        menu: &'a MenuItemSet,
        purchases: &'a PurchaseLedger,
        time: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            menu,
            purchases,
            time: time.into(),
        }
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    /// Derive every report
    pub fn generate(&self) -> Result<TripReports> {
        let reports = TripReports {
            buy_list: self.buy_list(),
            pack_list: self.pack_list(),
            cook_list: self.cook_list()?,
            location_index: self.location_index(),
            ingredient_names: self.menu.ingredient_names(),
            store_directory: self.store_directory(),
        };
        info!(
            "Derived reports: {} stores, {} containers, {} meals",
            reports.buy_list.stores.len(),
            reports.pack_list.containers.len(),
            reports.cook_list.meals.len()
        );
        Ok(reports)
    }

    /// Sum of menu quantities for an exact `(name, unit)` pair
    pub fn quantity_required(&self, name: &str, unit: &str) -> f64 {
        self.menu
            .items()
            .iter()
            .filter(|item| item.item == name && item.unit == unit)
            .map(|item| item.quantity)
            .sum()
    }

    /// Sum of `count * unitsPerCount` over purchases of an exact `(name, unit)` pair
    pub fn quantity_purchased(&self, name: &str, unit: &str) -> f64 {
        self.purchases
            .purchases()
            .iter()
            .filter(|purchase| purchase.name == name && purchase.unit == unit)
            .map(|purchase| purchase.total_quantity())
            .sum()
    }

    /// Every distinct `(name, unit)` pair on the menu or in the ledger, sorted
    fn name_unit_pairs(&self) -> BTreeSet<(String, String)> {
        let from_menu = self
            .menu
            .items()
            .iter()
            .map(|item| (item.item.clone(), item.unit.clone()));
        let from_purchases = self
            .purchases
            .purchases()
            .iter()
            .map(|purchase| (purchase.name.clone(), purchase.unit.clone()));
        from_menu.chain(from_purchases).collect()
    }

    /// Catalog notes, menu buying notes and purchase notes for a pair
    fn buying_notes(&self, name: &str, unit: &str) -> String {
        let catalog_notes = self.catalog.lookup(name).map(|i| i.notes.as_str());
        let menu_notes = self
            .menu
            .items()
            .iter()
            .filter(|item| item.item == name && item.unit == unit)
            .map(|item| item.buying_notes.as_str());
        let purchase_notes = self
            .purchases
            .purchases()
            .iter()
            .filter(|purchase| purchase.name == name && purchase.unit == unit)
            .map(|purchase| purchase.notes.as_str());

        join_notes(catalog_notes.into_iter().chain(menu_notes).chain(purchase_notes))
    }

    /// What is still needed from each store.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use food_planner::ingredient_catalog::{Ingredient, IngredientCatalog};
    /// use food_planner::menu_items::MenuItemSet;
    /// use food_planner::planner_errors::Diagnostics;
    /// use food_planner::purchase_ledger::PurchaseLedger;
    /// use food_planner::record_normalizer::RawRow;
    /// use food_planner::report_engine::ReportEngine;
    ///
    /// let catalog = IngredientCatalog::from_ingredients([Ingredient::new("carrot", "Market")]);
    /// let mut diagnostics = Diagnostics::default();
    /// let menu = MenuItemSet::build(
    ///     vec![RawRow::from_pairs(1, [("day", "1"), ("meal", "1B"), ("item", "carrot"), ("quantity", "3 lbs")])],
    ///     &catalog,
    ///     &mut diagnostics,
    /// )?;
    /// let purchases = PurchaseLedger::build(
    ///     vec![RawRow::from_pairs(2, [("name", "carrot"), ("count", "1"), ("unitsPerCount", "2"), ("unit", "lbs")])],
    ///     &catalog,
    ///     &menu,
    ///     &mut diagnostics,
    /// )?;
    ///
    /// let buy_list = ReportEngine::new(&catalog, &menu, &purchases, "now").buy_list();
    /// let carrot = &buy_list.store("Market").unwrap().ingredients[0];
    /// assert_eq!(carrot.quantity_still_needed, 1.0);
    /// # Ok::<(), food_planner::planner_errors::PlannerError>(())
    /// ```
    pub fn buy_list(&self) -> BuyList {
        let mut stores: BTreeMap<String, Vec<BuyListEntry>> = BTreeMap::new();

        for (name, unit) in self.name_unit_pairs() {
            let store = self
                .catalog
                .lookup(&name)
                .map(|ingredient| ingredient.buy_store.clone())
                .unwrap_or_else(|| NO_STORE_DEFINED.to_string());
            let quantity_required = self.quantity_required(&name, &unit);
            let quantity_purchased = self.quantity_purchased(&name, &unit);
            let notes = self.buying_notes(&name, &unit);

            stores.entry(store).or_default().push(BuyListEntry {
                name,
                unit,
                quantity_required,
                quantity_purchased,
                quantity_still_needed: quantity_required - quantity_purchased,
                notes,
            });
        }

        debug!("Buy list covers {} stores", stores.len());
        BuyList {
            stores: stores
                .into_iter()
                .map(|(name, ingredients)| StoreBuyList { name, ingredients })
                .collect(),
            time: self.time.clone(),
        }
    }

    /// What to pack in each container.
    ///
    /// An ingredient used on several days is split across the bags it is
    /// eaten from. Pairs that were bought but are on no menu land in the
    /// unassigned container with a zero quantity.
    pub fn pack_list(&self) -> PackList {
        let mut per_container: BTreeMap<(String, String, String), f64> = BTreeMap::new();
        for item in self.menu.items() {
            let key = (item.item.clone(), item.unit.clone(), item.container().label());
            *per_container.entry(key).or_insert(0.0) += item.quantity;
        }
        for (name, unit) in self.name_unit_pairs() {
            let on_menu = per_container
                .keys()
                .any(|(n, u, _)| *n == name && *u == unit);
            if !on_menu {
                per_container.insert((name, unit, NO_CONTAINER.to_string()), 0.0);
            }
        }

        let mut containers: BTreeMap<String, Vec<PackListEntry>> = BTreeMap::new();
        for ((name, unit, container), quantity) in per_container {
            let notes = self.buying_notes(&name, &unit);
            containers
                .entry(container.clone())
                .or_default()
                .push(PackListEntry {
                    name,
                    unit,
                    quantity,
                    container,
                    notes,
                });
        }

        PackList {
            containers: containers
                .into_iter()
                .map(|(name, item_list)| ContainerPackList { name, item_list })
                .collect(),
            time: self.time.clone(),
        }
    }

    /// What to cook at each meal.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownMealCode`](crate::planner_errors::PlannerError::UnknownMealCode)
    /// when a meal code has no display label.
    pub fn cook_list(&self) -> Result<CookList> {
        let mut meals = Vec::new();

        for slot in self.menu.meals() {
            let label = meal_label(&slot.meal)?;
            let mut ingredients: Vec<CookListEntry> = self
                .menu
                .items_for(slot.day, &slot.meal)
                .into_iter()
                .map(|item| self.cook_entry(item))
                .collect();
            ingredients.sort_by(|a, b| {
                a.container
                    .cmp(&b.container)
                    .then_with(|| a.name.cmp(&b.name))
            });

            meals.push(CookListMeal {
                day: slot.day,
                name: label.to_string(),
                meal: slot.meal,
                ingredients,
            });
        }

        Ok(CookList {
            meals,
            time: self.time.clone(),
        })
    }

    fn cook_entry(&self, item: &MenuItem) -> CookListEntry {
        let ingredient = self.catalog.lookup(&item.item);
        let catalog_notes = ingredient.map(|i| i.notes.as_str());

        CookListEntry {
            name: item.item.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            notes: join_notes(catalog_notes.into_iter().chain([item.cooking_notes.as_str()])),
            container: item.container().label(),
            dish: item.dish.clone(),
            buy_store: ingredient
                .map(|i| i.buy_store.clone())
                .unwrap_or_else(|| NO_STORE_DEFINED.to_string()),
            buy_store_alternate: ingredient.and_then(|i| i.buy_store_alternate.clone()),
        }
    }

    /// Menu rows in each of the eight storage locations, sorted by name
    pub fn location_index(&self) -> LocationIndex {
        let locations = StorageLocation::ALL
            .into_iter()
            .map(|location| {
                let mut items: Vec<MenuItem> = self
                    .menu
                    .items()
                    .iter()
                    .filter(|item| item.storage == Some(location))
                    .cloned()
                    .collect();
                items.sort_by(|a, b| a.item.cmp(&b.item));
                (location, items)
            })
            .collect();
        LocationIndex { locations }
    }

    /// Catalog ingredient names grouped by store, both sorted
    pub fn store_directory(&self) -> Vec<StoreDirectoryEntry> {
        self.catalog
            .store_names()
            .into_iter()
            .map(|store| StoreDirectoryEntry {
                ingredients: self
                    .catalog
                    .all()
                    .filter(|ingredient| ingredient.buy_store == store)
                    .map(|ingredient| ingredient.name.clone())
                    .collect(),
                name: store,
            })
            .collect()
    }
}

/// Join non-empty notes, dropping repeats, in first-seen order
fn join_notes<'n>(notes: impl IntoIterator<Item = &'n str>) -> String {
    let mut seen = BTreeSet::new();
    notes
        .into_iter()
        .map(str::trim)
        .filter(|note| !note.is_empty() && seen.insert(*note))
        .collect::<Vec<_>>()
        .join(NOTES_SEPARATOR)
}
