//! `swanplan status` command: one-screen household overview.

use std::path::Path;

use anyhow::Result;

use swanplan_core::budget::{optimize, BudgetConfig};
use swanplan_core::models::Severity;
use swanplan_core::requirements::intersect_requirements;
use swanplan_core::targets;

use crate::config::SwanConfig;
use crate::household_cmds::load_snapshot;
use crate::store::Store;

/// Show the household at a glance: budget position, per-person targets,
/// pending changes, and the latest insight batch summary.
pub fn run_status(file: &Path, store: &Store, config: &SwanConfig) -> Result<()> {
    let snapshot = load_snapshot(file)?;
    let h = &snapshot.household;

    println!("Household: {} (v{})", h.name, snapshot.version);
    println!(
        "Budget: {} spent of {} weekly, projected {}",
        h.current_spend, h.weekly_budget, h.projected_spend
    );

    let requirements = intersect_requirements(&snapshot.people);
    if !snapshot.needs.is_empty() {
        let budget_config = BudgetConfig {
            weekly_budget: h.weekly_budget,
            baseline_source: config.baseline_source.clone(),
        };
        let result = optimize(&snapshot.needs, &requirements, &budget_config)?;
        let marker = if result.over_budget { " (OVER BUDGET)" } else { "" };
        println!(
            "Optimized shop: {} across {} items, saving {}{}",
            result.total_cost,
            result.selection.len(),
            result.total_savings,
            marker
        );
    }
    println!();

    println!("People:");
    for person in &snapshot.people {
        let effective = targets::resolve_targets(person)?;
        let states = if person.active_states.is_empty() {
            String::new()
        } else {
            let names: Vec<String> = person
                .active_states
                .iter()
                .map(|s| s.to_string())
                .collect();
            format!("  [{}]", names.join(", "))
        };
        println!(
            "  {:<10} {:>6.0} kcal  {:>4.0}g protein{}",
            person.name, effective.calories, effective.protein_g, states
        );
    }
    println!();

    let log = store.load_changes()?;
    let pending = log.pending().count();
    let applied = log.applied().count();
    println!("Changes: {pending} pending approval, {applied} applied");

    let insights = store.load_insights()?;
    let warnings = insights
        .iter()
        .filter(|i| matches!(i.severity, Severity::Warning | Severity::Error))
        .count();
    println!(
        "Insights: {} in last batch ({} warnings)",
        insights.len(),
        warnings
    );

    Ok(())
}
