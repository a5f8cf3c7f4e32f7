//! `swanplan optimize` command: pick cheapest compliant sources.

use std::path::Path;

use anyhow::Result;

use swanplan_core::budget::{optimize, BudgetConfig};
use swanplan_core::requirements::intersect_requirements;

use crate::config::SwanConfig;
use crate::household_cmds::load_snapshot;

/// Run the optimizer over the household's shopping needs and print the
/// selection with per-item savings.
pub fn run_optimize(file: &Path, config: &SwanConfig) -> Result<()> {
    let snapshot = load_snapshot(file)?;
    let requirements = intersect_requirements(&snapshot.people);
    let budget_config = BudgetConfig {
        weekly_budget: snapshot.household.weekly_budget,
        baseline_source: config.baseline_source.clone(),
    };

    let result = optimize(&snapshot.needs, &requirements, &budget_config)?;
    tracing::debug!(
        total = %result.total_cost,
        savings = %result.total_savings,
        over_budget = result.over_budget,
        "optimized shopping plan"
    );

    println!(
        "  {:<18} {:<10} {:<14} {:>8} {:>8}",
        "item", "quantity", "source", "cost", "savings"
    );
    for selection in &result.selection {
        println!(
            "  {:<18} {:<10} {:<14} {:>8} {:>8}",
            selection.item,
            selection.quantity,
            selection.source,
            selection.cost.to_string(),
            selection.savings.to_string()
        );
    }
    println!();
    println!(
        "Total: {} of {} budget (saving {} vs {})",
        result.total_cost,
        snapshot.household.weekly_budget,
        result.total_savings,
        config.baseline_source
    );
    if result.over_budget {
        let overshoot = result.total_cost - snapshot.household.weekly_budget;
        println!("WARNING: cheapest compliant plan is {overshoot} over budget");
    }

    Ok(())
}
