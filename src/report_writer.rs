//! # Report Writer
//!
//! Hands the derived reports to whatever presents them. The bundled
//! [`JsonReportWriter`] recreates a build directory and drops one JSON file
//! per report into it, plus a plain-text ingredient list.

use crate::report_engine::TripReports;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const BUY_LIST_FILE: &str = "BuyList.json";
pub const PACK_LIST_FILE: &str = "PackList.json";
pub const COOK_LIST_FILE: &str = "CookList.json";
pub const LOCATION_INDEX_FILE: &str = "IngredientsByLocation.json";
pub const STORE_DIRECTORY_FILE: &str = "IngredientsStores.json";
pub const INGREDIENTS_LIST_FILE: &str = "IngredientsList.txt";

/// Consumer of derived reports
pub trait ReportRenderer {
    fn render(&self, reports: &TripReports) -> Result<()>;
}

/// Writes each report as pretty-printed JSON into a build directory
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    build_dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let path = self.build_dir.join(file_name);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {file_name}"))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote report");
        Ok(())
    }
}

impl ReportRenderer for JsonReportWriter {
    fn render(&self, reports: &TripReports) -> Result<()> {
        if self.build_dir.is_dir() {
            fs::remove_dir_all(&self.build_dir).with_context(|| {
                format!("Failed to clear build directory {}", self.build_dir.display())
            })?;
        }
        fs::create_dir_all(&self.build_dir).with_context(|| {
            format!("Failed to create build directory {}", self.build_dir.display())
        })?;

        self.write_json(BUY_LIST_FILE, &reports.buy_list)?;
        self.write_json(PACK_LIST_FILE, &reports.pack_list)?;
        self.write_json(COOK_LIST_FILE, &reports.cook_list)?;
        self.write_json(LOCATION_INDEX_FILE, &reports.location_index)?;
        self.write_json(STORE_DIRECTORY_FILE, &reports.store_directory)?;

        let list_path = self.build_dir.join(INGREDIENTS_LIST_FILE);
        fs::write(&list_path, reports.ingredient_names.join("\n"))
            .with_context(|| format!("Failed to write {}", list_path.display()))?;

        info!(build_dir = %self.build_dir.display(), "reports written");
        Ok(())
    }
}
