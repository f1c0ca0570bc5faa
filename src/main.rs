use anyhow::{Context, Result};
use food_planner::dataset_provider::CsvDatasetProvider;
use food_planner::planner::FoodPlanner;
use food_planner::planner_config::PlannerConfig;
use food_planner::report_writer::{JsonReportWriter, ReportRenderer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = PlannerConfig::from_env();
    init_tracing(&config);

    info!(
        data_dir = %config.data_dir.display(),
        strict = config.is_strict(),
        "Starting food planner"
    );

    let provider = CsvDatasetProvider::new(&config.data_dir);
    let mut planner = FoodPlanner::new(config.clone());
    let reports = planner
        .run(&provider)
        .context("Planning run failed")?;

    JsonReportWriter::new(&config.build_dir).render(&reports)?;

    if config.show_warnings && !planner.diagnostics().is_empty() {
        println!("Warnings");
        println!("--------");
        for warning in planner.diagnostics().warnings() {
            println!("[{}] {}", warning.kind, warning.message);
        }
    }

    Ok(())
}

fn init_tracing(config: &PlannerConfig) {
    let default_level = if config.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
