//! # Trip Reports Example
//!
//! Builds a two-day trip entirely in memory and prints the buy, pack and
//! cook lists the planner derives from it. Run with
//! `cargo run --example trip_reports`.

use food_planner::dataset_provider::InMemoryDatasetProvider;
use food_planner::planner::FoodPlanner;
use food_planner::planner_config::PlannerConfig;
use food_planner::record_normalizer::RawRow;

fn menu_row(line: usize, day: &str, meal: &str, item: &str, quantity: &str, flag: &str) -> RawRow {
    RawRow::from_pairs(
        line,
        [("day", day), ("meal", meal), ("item", item), ("quantity", quantity), (flag, "x")],
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏕️  Trip Reports Example");
    println!("========================\n");

    let provider = InMemoryDatasetProvider::new()
        .with_table(
            "ingredients",
            vec![
                RawRow::from_pairs(1, [("name", "Pancake mix"), ("buyStore", "Market")]),
                RawRow::from_pairs(2, [("name", "maple syrup"), ("buyStore", "Co-op"), ("notes", "grade A dark")]),
                RawRow::from_pairs(3, [("name", "sausages"), ("buyStore", "Butcher"), ("buyStoreAlternate", "Market")]),
                RawRow::from_pairs(4, [("name", "potatoes"), ("buyStore", "Market")]),
            ],
        )
        .with_table(
            "menus",
            vec![
                menu_row(5, "1", "3D", "sausages", "2 lbs", "inCoolerFrozen"),
                menu_row(6, "1", "3D", "potatoes", "3 lbs", "inBoxVeg"),
                menu_row(7, "2", "1B", "pancake mix", "3 cups", "inBoxDry"),
                menu_row(8, "2", "1B", "maple syrup", "1/2 cup", "inCondiments"),
                menu_row(9, "2", "3D", "sausages", "1 lb", "inCoolerFrozen"),
            ],
        )
        .with_table(
            "purchases",
            vec![
                RawRow::from_pairs(2, [("name", "potatoes"), ("count", "1"), ("unitsPerCount", "5"), ("unit", "lbs")]),
                RawRow::from_pairs(3, [("name", "maple syrup"), ("count", "1"), ("unitsPerCount", "1"), ("unit", "cup")]),
            ],
        );

    let mut planner = FoodPlanner::new(PlannerConfig::default());
    let reports = planner.run(&provider)?;

    println!("🛒 Buy list");
    println!("-----------");
    for store in &reports.buy_list.stores {
        println!("{}", store.name);
        for entry in &store.ingredients {
            println!(
                "  {:<14} {:>5} {:<5} (need {}, have {})",
                entry.name,
                entry.quantity_still_needed,
                entry.unit,
                entry.quantity_required,
                entry.quantity_purchased
            );
        }
    }

    println!("\n🎒 Pack list");
    println!("------------");
    for container in &reports.pack_list.containers {
        println!("{}", container.name);
        for entry in &container.item_list {
            println!("  {} {} {}", entry.quantity, entry.unit, entry.name);
        }
    }

    println!("\n🍳 Cook list");
    println!("------------");
    for meal in &reports.cook_list.meals {
        println!("Day {} {}", meal.day, meal.name);
        for entry in &meal.ingredients {
            println!("  {} {} {} from {}", entry.quantity, entry.unit, entry.name, entry.container);
        }
    }

    if !planner.diagnostics().is_empty() {
        println!("\n⚠️  Warnings");
        for warning in planner.diagnostics().warnings() {
            println!("  [{}] {}", warning.kind, warning.message);
        }
    }

    Ok(())
}
