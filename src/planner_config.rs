//! # Planner Configuration Module
//!
//! This module defines the immutable configuration handed to every stage of
//! the pipeline: where each table lives, how many junk rows precede the data,
//! the column names, and how strictly findings are treated.

use crate::planner_errors::Strictness;
use crate::record_normalizer::is_truthy;
use std::env;
use std::path::{Path, PathBuf};

// Constants for planner configuration
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_BUILD_DIR: &str = "_build";

pub const INGREDIENT_FIELDS: &[&str] = &["name", "buyStore", "buyStoreAlternate", "notes"];

pub const MENU_FIELDS: &[&str] = &[
    "day",
    "meal",
    "mealType",
    "dish",
    "item",
    "cookingNotes",
    "quantity",
    "inCoolerFrozen",
    "inCoolerCool",
    "inBoxVeg",
    "inBoxFruit",
    "inBoxDry",
    "inBoxBread",
    "inBoxOther",
    "inCondiments",
    "isPrecooked",
    "buyState",
    "buyStore",
    "alternateStore",
    "purchased",
    "buyingNotes",
];

pub const PURCHASE_FIELDS: &[&str] = &[
    "name",
    "count",
    "unitsPerCount",
    "unit",
    "description",
    "shoppingTrip",
    "notes",
    "day",
    "meal",
];

/// How to read one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Human-readable table name used in logs and errors
    pub name: String,
    /// Location of the table, relative to the data directory unless absolute
    pub source: PathBuf,
    /// Header/junk rows preceding the data
    pub rows_to_skip: usize,
    /// Column names in sheet order
    pub field_names: Vec<String>,
}

impl DatasetConfig {
    pub fn new(name: &str, source: impl Into<PathBuf>, rows_to_skip: usize, fields: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            source: source.into(),
            rows_to_skip,
            field_names: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// The ingredient catalog sheet
    pub fn ingredients() -> Self {
        Self::new("ingredients", "ingredients.csv", 0, INGREDIENT_FIELDS)
    }

    /// The menu sheet, which carries four rows of headings
    pub fn menus() -> Self {
        Self::new("menus", "menus.csv", 4, MENU_FIELDS)
    }

    /// The purchase log, which carries one header row
    pub fn purchases() -> Self {
        Self::new("purchases", "purchases.csv", 1, PURCHASE_FIELDS)
    }

    /// Source resolved against a data directory
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        if self.source.is_absolute() {
            self.source.clone()
        } else {
            data_dir.join(&self.source)
        }
    }
}

/// Configuration for a whole planning run
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Whether findings abort the run
    pub strictness: Strictness,
    /// Print demoted findings after the run
    pub show_warnings: bool,
    /// Log pipeline details
    pub verbose: bool,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Directory holding the three tables
    pub data_dir: PathBuf,
    /// Directory the reports are written to
    pub build_dir: PathBuf,
    pub ingredients: DatasetConfig,
    pub menus: DatasetConfig,
    pub purchases: DatasetConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Warn,
            show_warnings: false,
            verbose: false,
            json_logs: false,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            ingredients: DatasetConfig::ingredients(),
            menus: DatasetConfig::menus(),
            purchases: DatasetConfig::purchases(),
        }
    }
}

impl PlannerConfig {
    /// Read overrides from `PLANNER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unknown keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|v| is_truthy(&v)).unwrap_or(false);
        let mut config = Self::default();

        if flag("PLANNER_STRICT") {
            config.strictness = Strictness::Strict;
        }
        config.show_warnings = flag("PLANNER_SHOW_WARNINGS");
        config.verbose = flag("PLANNER_VERBOSE");
        config.json_logs = flag("PLANNER_LOG_JSON");

        if let Some(dir) = lookup("PLANNER_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PLANNER_BUILD_DIR").filter(|d| !d.trim().is_empty()) {
            config.build_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }
}
