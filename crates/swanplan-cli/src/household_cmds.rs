//! `swanplan household` commands: show and validate a household file.

use std::path::Path;

use anyhow::{Context, Result};

use swanplan_core::household::parse_household_toml;
use swanplan_core::snapshot::HouseholdSnapshot;
use swanplan_core::targets;

/// Read and parse a `household.toml`, with the file path in any error.
pub fn load_snapshot(file: &Path) -> Result<HouseholdSnapshot> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read household file at {}", file.display()))?;
    let snapshot = parse_household_toml(&contents)
        .with_context(|| format!("invalid household file at {}", file.display()))?;
    tracing::debug!(
        file = %file.display(),
        people = snapshot.people.len(),
        needs = snapshot.needs.len(),
        "loaded household snapshot"
    );
    Ok(snapshot)
}

/// Show the parsed household: budget, members, needs, substitutions.
pub fn run_show(file: &Path) -> Result<()> {
    let snapshot = load_snapshot(file)?;
    let h = &snapshot.household;

    println!("Household: {} (v{})", h.name, snapshot.version);
    println!(
        "Budget: {} weekly (spent {}, projected {}, saved to date {})",
        h.weekly_budget, h.current_spend, h.projected_spend, h.savings_to_date
    );
    println!();

    println!("People:");
    for person in &snapshot.people {
        let states = if person.active_states.is_empty() {
            "-".to_owned()
        } else {
            person
                .active_states
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let requirements = if person.requirements.is_empty() {
            "-".to_owned()
        } else {
            person
                .requirements
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "  {:<10} {:<7} age {:<3} {:>6.0} kcal  states: {}  requirements: {}",
            person.name, person.role, person.age, person.base_calories, states, requirements
        );
    }
    println!();

    println!("Shopping needs: {}", snapshot.needs.len());
    for need in &snapshot.needs {
        println!(
            "  {:<18} {:<10} ({} sources)",
            need.item,
            need.quantity,
            need.options.len()
        );
    }

    if !snapshot.substitutions.is_empty() {
        println!();
        println!("Substitution candidates:");
        for sub in &snapshot.substitutions {
            println!(
                "  {} -> {} (saves {}/week)",
                sub.from.name, sub.to.name, sub.weekly_saving
            );
        }
    }

    Ok(())
}

/// Validate a household file beyond parsing: resolve every person's targets
/// so state conflicts surface here instead of mid-pass.
pub fn run_validate(file: &Path) -> Result<()> {
    let snapshot = load_snapshot(file)?;

    for person in &snapshot.people {
        targets::resolve_targets(person)
            .with_context(|| format!("targets cannot be resolved for {}", person.name))?;
    }

    println!(
        "{} is valid: {} people, {} needs, {} substitutions, {} intake entries",
        file.display(),
        snapshot.people.len(),
        snapshot.needs.len(),
        snapshot.substitutions.len(),
        snapshot.window.days.len()
    );
    Ok(())
}
