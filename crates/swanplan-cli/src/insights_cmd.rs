//! `swanplan insights` command: recompute and show the insight batch.

use std::path::Path;

use anyhow::Result;

use swanplan_core::budget::{optimize, BudgetConfig};
use swanplan_core::insight::generate;
use swanplan_core::models::Severity;
use swanplan_core::requirements::intersect_requirements;

use crate::config::SwanConfig;
use crate::household_cmds::load_snapshot;
use crate::store::Store;

/// Regenerate insights from the household file, persist the batch, and
/// print it grouped by severity.
pub fn run_insights(file: &Path, store: &Store, config: &SwanConfig) -> Result<()> {
    let snapshot = load_snapshot(file)?;
    let requirements = intersect_requirements(&snapshot.people);
    let budget_config = BudgetConfig {
        weekly_budget: snapshot.household.weekly_budget,
        baseline_source: config.baseline_source.clone(),
    };

    // Budget insights need the optimizer's view of the week. A household
    // with no shopping needs still gets the nutrition and adherence rules.
    let optimization = if snapshot.needs.is_empty() {
        None
    } else {
        Some(optimize(&snapshot.needs, &requirements, &budget_config)?)
    };

    let insights = generate(&snapshot, optimization.as_ref(), &config.insights)?;
    store.save_insights(&insights)?;
    tracing::info!(count = insights.len(), "insight batch regenerated");

    if insights.is_empty() {
        println!("No insights this pass.");
        return Ok(());
    }

    for insight in &insights {
        let icon = match insight.severity {
            Severity::Info => "i",
            Severity::Success => "+",
            Severity::Warning => "!",
            Severity::Error => "X",
        };
        let who = insight
            .person
            .and_then(|id| snapshot.person(id))
            .map(|p| format!(" [{}]", p.name))
            .unwrap_or_default();
        println!("  [{}] {}{}", icon, insight.title, who);
        println!("      {}", insight.message);
        if let Some(action) = &insight.suggested_action {
            println!("      -> {action}");
        }
    }
    println!();
    println!("{} insights written to {}", insights.len(), store.dir().join("insights.json").display());
    Ok(())
}
