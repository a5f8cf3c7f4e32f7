//! `swanplan targets` command: show effective nutrition targets.

use std::path::Path;

use anyhow::{bail, Result};

use swanplan_core::targets;

use crate::household_cmds::load_snapshot;

/// Print effective targets for every person, or one person by name.
pub fn run_targets(file: &Path, person_filter: Option<&str>) -> Result<()> {
    let snapshot = load_snapshot(file)?;

    let people: Vec<_> = match person_filter {
        Some(name) => {
            let Some(person) = snapshot.person_by_name(name) else {
                bail!("no person named {name:?} in the household");
            };
            vec![person]
        }
        None => snapshot.people.iter().collect(),
    };

    println!(
        "  {:<10} {:>9} {:>11} {:>9} {:>7}  active states",
        "person", "calories", "protein (g)", "carbs (g)", "fat (g)"
    );
    for person in people {
        let effective = targets::resolve_targets(person)?;
        let states = if person.active_states.is_empty() {
            "-".to_owned()
        } else {
            targets::ordered_states(person)
                .iter()
                .map(|s| format!("{s} ({})", s.adjustment_summary()))
                .collect::<Vec<_>>()
                .join("; ")
        };
        println!(
            "  {:<10} {:>9.0} {:>11.0} {:>9.0} {:>7.0}  {}",
            person.name,
            effective.calories,
            effective.protein_g,
            effective.carbs_g,
            effective.fat_g,
            states
        );
    }

    Ok(())
}
