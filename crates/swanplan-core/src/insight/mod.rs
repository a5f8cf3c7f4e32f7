//! Insight generation.
//!
//! Insights explain what the system did or noticed during a pass. Each rule
//! in [`rules::rule_table`] is evaluated against the same context and may
//! fire any number of times; a fresh pass replaces the previous batch
//! wholesale, so rules never mutate state.

pub mod rules;

use chrono::Utc;
use uuid::Uuid;

use crate::budget::OptimizationResult;
use crate::models::{EffectiveTargets, Insight};
use crate::snapshot::HouseholdSnapshot;
use crate::targets::{self, ResolveError};

/// Thresholds the insight rules read.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Consecutive days below target before a low-intake warning fires.
    pub low_streak_days: usize,
    /// Consecutive days off target before an adherence warning fires.
    pub deviation_streak_days: usize,
    /// Percent of target within which intake counts as on target.
    pub tolerance_pct: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            low_streak_days: 5,
            deviation_streak_days: 3,
            tolerance_pct: 10.0,
        }
    }
}

/// Everything a rule may look at.
pub struct EvalContext<'a> {
    pub snapshot: &'a HouseholdSnapshot,
    pub optimization: Option<&'a OptimizationResult>,
    /// Effective targets per person, in people order.
    pub targets: &'a [(Uuid, EffectiveTargets)],
    pub config: &'a InsightConfig,
}

impl EvalContext<'_> {
    pub fn targets_for(&self, person_id: Uuid) -> Option<&EffectiveTargets> {
        self.targets
            .iter()
            .find(|(id, _)| *id == person_id)
            .map(|(_, t)| t)
    }
}

/// One firing of a rule. Severity and category come from the rule itself.
#[derive(Debug, Clone)]
pub struct Firing {
    pub person: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub suggested_action: Option<String>,
}

/// Evaluate every rule against the snapshot and the optional optimization
/// result from the same pass.
pub fn generate(
    snapshot: &HouseholdSnapshot,
    optimization: Option<&OptimizationResult>,
    config: &InsightConfig,
) -> Result<Vec<Insight>, ResolveError> {
    let targets: Vec<(Uuid, EffectiveTargets)> = snapshot
        .people
        .iter()
        .map(|p| Ok((p.id, targets::resolve_targets(p)?)))
        .collect::<Result<_, ResolveError>>()?;

    let ctx = EvalContext {
        snapshot,
        optimization,
        targets: &targets,
        config,
    };

    let mut insights = Vec::new();
    for rule in rules::rule_table() {
        for firing in (rule.check)(&ctx) {
            tracing::debug!(rule = rule.name, title = %firing.title, "insight fired");
            insights.push(Insight {
                id: Uuid::new_v4(),
                severity: rule.severity,
                category: rule.category,
                person: firing.person,
                title: firing.title,
                message: firing.message,
                suggested_action: firing.suggested_action,
                emitted_at: Utc::now(),
            });
        }
    }
    Ok(insights)
}
