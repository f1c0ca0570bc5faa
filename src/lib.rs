//! # Food Planner
//!
//! Turns three trip-planning tables (an ingredient catalog, a menu and a
//! purchase log) into shopping, packing and cooking reports.
//!
//! The pipeline is strictly ordered: the catalog is built first, the menu is
//! validated against it, purchases are validated against both, and the
//! reports are derived from the three immutable tables.

pub mod dataset_provider;
pub mod ingredient_catalog;
pub mod measurement_patterns;
pub mod menu_items;
pub mod planner;
pub mod planner_config;
pub mod planner_errors;
pub mod purchase_ledger;
pub mod quantity_parser;
pub mod record_normalizer;
pub mod report_engine;
pub mod report_writer;
pub mod storage;
