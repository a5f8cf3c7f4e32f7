//! Proposal generation.
//!
//! One pass reads a snapshot and emits proposals of two kinds: portion
//! adjustments derived from sustained intake deviation, and ingredient
//! swaps drawn from the substitution candidates. Portion adjustments within
//! the configured bound auto-apply; everything else waits for approval.

use crate::models::{AutopilotChange, ChangeKind, ChangeScope, Money, Nutrient};
use crate::requirements::{self, RequirementSet};
use crate::snapshot::HouseholdSnapshot;
use crate::targets::{self, ResolveError};

use super::{new_change, Disposition};

/// Bounds on what the engine may do without a human in the loop.
#[derive(Debug, Clone)]
pub struct AutopilotConfig {
    /// Largest portion correction, in percent, applied automatically.
    pub max_auto_adjust_pct: f64,
    /// Deviations smaller than this, in percent of target, are ignored.
    pub tolerance_pct: f64,
    /// Days of logged intake averaged when measuring deviation.
    pub deviation_window_days: usize,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            max_auto_adjust_pct: 10.0,
            tolerance_pct: 5.0,
            deviation_window_days: 7,
        }
    }
}

/// A change plus how it should enter the log.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub change: AutopilotChange,
    pub disposition: Disposition,
}

/// Run one proposal pass over the snapshot.
///
/// Deviation scan first, in people order then nutrient order; substitution
/// scan second, ranked by the consumers' soft preferences. Identical
/// snapshots yield proposals with identical subjects, descriptions, and
/// dispositions.
pub fn propose_changes(
    snapshot: &HouseholdSnapshot,
    config: &AutopilotConfig,
) -> Result<Vec<Proposal>, ResolveError> {
    let mut proposals = Vec::new();

    for person in &snapshot.people {
        let effective = targets::resolve_targets(person)?;
        for nutrient in Nutrient::ALL {
            let Some(average) = snapshot.window.recent_average(
                person.id,
                nutrient,
                config.deviation_window_days,
            ) else {
                continue;
            };
            let target = effective.nutrient(nutrient);
            if target <= 0.0 {
                continue;
            }
            let deviation_pct = (average - target) / target * 100.0;
            if deviation_pct.abs() < config.tolerance_pct {
                continue;
            }

            // Correct in the opposite direction of the deviation.
            let correction_pct = -deviation_pct;
            let disposition = if correction_pct.abs() <= config.max_auto_adjust_pct {
                Disposition::AutoApply
            } else {
                Disposition::RequireApproval
            };
            let change = new_change(
                ChangeKind::PortionAdjustment,
                ChangeScope::Person(person.id),
                nutrient.to_string(),
                format!(
                    "Adjust {nutrient} portions by {correction_pct:+.0}% for {}",
                    person.name
                ),
                format!(
                    "{} averaged {average:.0} {nutrient} over the last {} logged days against a target of {target:.0} ({deviation_pct:+.0}%)",
                    person.name, config.deviation_window_days
                ),
            );
            tracing::info!(
                person = %person.name,
                %nutrient,
                deviation_pct,
                ?disposition,
                "proposing portion adjustment"
            );
            proposals.push(Proposal {
                change,
                disposition,
            });
        }
    }

    let household_requirements: RequirementSet =
        requirements::intersect_requirements(&snapshot.people);
    let mut swaps: Vec<(i32, Money, Proposal)> = Vec::new();
    for candidate in &snapshot.substitutions {
        if !requirements::is_compliant(
            std::slice::from_ref(&candidate.to),
            &household_requirements,
        ) {
            tracing::debug!(
                from = %candidate.from.name,
                to = %candidate.to.name,
                "skipping substitution: replacement violates a hard requirement"
            );
            continue;
        }

        // Net soft-preference change for whoever eats the swap: losing a
        // liked ingredient or gaining a disliked one pulls it negative.
        let preference_delta: i32 = snapshot
            .people
            .iter()
            .filter(|p| match candidate.scope {
                ChangeScope::Household => true,
                ChangeScope::Person(id) => p.id == id,
            })
            .map(|p| {
                requirements::preference_score(std::slice::from_ref(&candidate.to), &p.preferences)
                    - requirements::preference_score(
                        std::slice::from_ref(&candidate.from),
                        &p.preferences,
                    )
            })
            .sum();

        let change = new_change(
            ChangeKind::RecipeSwap,
            candidate.scope,
            candidate.from.name.clone(),
            format!("Swap {} for {}", candidate.from.name, candidate.to.name),
            format!(
                "saves {} per week; largest nutrient impact {:.1}%; household preference {:+}",
                candidate.weekly_saving,
                candidate.max_abs_delta_pct(),
                preference_delta
            ),
        );
        // Swaps change what is on the plate, so they always need a person
        // to sign off no matter how small the nutritional delta is.
        swaps.push((
            preference_delta,
            candidate.weekly_saving,
            Proposal {
                change,
                disposition: Disposition::RequireApproval,
            },
        ));
    }
    // Better-liked swaps surface first, bigger savings breaking ties.
    swaps.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    proposals.extend(swaps.into_iter().map(|(_, _, p)| p));

    Ok(proposals)
}
