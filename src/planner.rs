//! # Food Planner
//!
//! Orchestrates one planning run: load the catalog, then the menu, then the
//! purchases, then derive the reports. Each table is built once and never
//! changed afterwards; asking for a table before it has been built is a
//! programming error reported as [`PlannerError::LookupNotYetBuilt`].

use crate::dataset_provider::DatasetProvider;
use crate::ingredient_catalog::IngredientCatalog;
use crate::menu_items::MenuItemSet;
use crate::planner_config::PlannerConfig;
use crate::planner_errors::{Diagnostics, PlannerError, Result};
use crate::purchase_ledger::PurchaseLedger;
use crate::report_engine::{report_timestamp, ReportEngine, TripReports};
use tracing::info;

pub struct FoodPlanner {
    config: PlannerConfig,
    diagnostics: Diagnostics,
    catalog: Option<IngredientCatalog>,
    menu: Option<MenuItemSet>,
    purchases: Option<PurchaseLedger>,
    time: String,
}

impl FoodPlanner {
    /// Create a planner; the report timestamp is fixed here for the whole run
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            diagnostics: Diagnostics::new(config.strictness),
            config,
            catalog: None,
            menu: None,
            purchases: None,
            time: report_timestamp(),
        }
    }

    /// Replace the run timestamp
    pub fn with_timestamp(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Findings demoted to warnings so far
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn load_ingredients(&mut self, provider: &impl DatasetProvider) -> Result<&IngredientCatalog> {
        let rows = provider.rows(&self.config.ingredients)?;
        let catalog = IngredientCatalog::build(rows, &mut self.diagnostics)?;
        info!(ingredients = catalog.len(), "ingredient catalog ready");
        self.catalog = Some(catalog);
        self.catalog()
    }

    pub fn load_menu_items(&mut self, provider: &impl DatasetProvider) -> Result<&MenuItemSet> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| not_built("ingredients"))?;
        let rows = provider.rows(&self.config.menus)?;
        let menu = MenuItemSet::build(rows, catalog, &mut self.diagnostics)?;
        info!(menu_items = menu.len(), "menu ready");
        self.menu = Some(menu);
        self.menu_items()
    }

    pub fn load_purchases(&mut self, provider: &impl DatasetProvider) -> Result<&PurchaseLedger> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| not_built("ingredients"))?;
        let menu = self.menu.as_ref().ok_or_else(|| not_built("menu"))?;
        let rows = provider.rows(&self.config.purchases)?;
        let ledger = PurchaseLedger::build(rows, catalog, menu, &mut self.diagnostics)?;
        info!(purchases = ledger.len(), "purchase ledger ready");
        self.purchases = Some(ledger);
        self.purchases()
    }

    /// Load the three tables in dependency order
    pub fn load_all(&mut self, provider: &impl DatasetProvider) -> Result<()> {
        self.load_ingredients(provider)?;
        self.load_menu_items(provider)?;
        self.load_purchases(provider)?;
        Ok(())
    }

    pub fn catalog(&self) -> Result<&IngredientCatalog> {
        self.catalog.as_ref().ok_or_else(|| not_built("ingredients"))
    }

    pub fn menu_items(&self) -> Result<&MenuItemSet> {
        self.menu.as_ref().ok_or_else(|| not_built("menu"))
    }

    pub fn purchases(&self) -> Result<&PurchaseLedger> {
        self.purchases.as_ref().ok_or_else(|| not_built("purchases"))
    }

    pub fn report_engine(&self) -> Result<ReportEngine<'_>> {
        Ok(ReportEngine::new(
            self.catalog()?,
            self.menu_items()?,
            self.purchases()?,
            self.time.as_str(),
        ))
    }

    /// Derive every report from the loaded tables
    pub fn reports(&self) -> Result<TripReports> {
        self.report_engine()?.generate()
    }

    /// Load everything and derive the reports in one go
    pub fn run(&mut self, provider: &impl DatasetProvider) -> Result<TripReports> {
        self.load_all(provider)?;
        let reports = self.reports()?;
        info!(warnings = self.diagnostics.warnings().len(), "planning run complete");
        Ok(reports)
    }
}

fn not_built(table: &str) -> PlannerError {
    PlannerError::LookupNotYetBuilt(table.to_string())
}
