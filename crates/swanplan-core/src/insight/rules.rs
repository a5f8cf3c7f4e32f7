//! The built-in insight rules.
//!
//! Each rule is a named check with a fixed severity and category. Rules are
//! pure functions of the evaluation context; the table order is the order
//! insights appear in.

use crate::models::{InsightCategory, Money, Nutrient, Severity};
use crate::targets;

use super::{EvalContext, Firing};

/// One rule definition.
pub struct RuleDef {
    pub name: &'static str,
    pub severity: Severity,
    pub category: InsightCategory,
    pub check: fn(&EvalContext) -> Vec<Firing>,
}

/// The rule table, in evaluation order.
pub fn rule_table() -> &'static [RuleDef] {
    &[
        RuleDef {
            name: "state_adjustment",
            severity: Severity::Info,
            category: InsightCategory::Nutrition,
            check: state_adjustment,
        },
        RuleDef {
            name: "nutrient_low_streak",
            severity: Severity::Warning,
            category: InsightCategory::Nutrition,
            check: nutrient_low_streak,
        },
        RuleDef {
            name: "deviation_streak",
            severity: Severity::Warning,
            category: InsightCategory::Adherence,
            check: deviation_streak,
        },
        RuleDef {
            name: "under_budget",
            severity: Severity::Success,
            category: InsightCategory::Budget,
            check: under_budget,
        },
        RuleDef {
            name: "over_budget",
            severity: Severity::Warning,
            category: InsightCategory::Budget,
            check: over_budget,
        },
    ]
}

/// One info insight per active temporary state, citing its adjustment.
fn state_adjustment(ctx: &EvalContext) -> Vec<Firing> {
    let mut firings = Vec::new();
    for person in &ctx.snapshot.people {
        for state in targets::ordered_states(person) {
            firings.push(Firing {
                person: Some(person.id),
                title: format!("Targets adjusted for {}", state),
                message: format!(
                    "{}'s targets include {} while {} is active",
                    person.name,
                    state.adjustment_summary(),
                    state
                ),
                suggested_action: None,
            });
        }
    }
    firings
}

/// Warns when someone has run below a nutrient target for several days
/// straight.
fn nutrient_low_streak(ctx: &EvalContext) -> Vec<Firing> {
    let mut firings = Vec::new();
    for person in &ctx.snapshot.people {
        let Some(effective) = ctx.targets_for(person.id) else {
            continue;
        };
        for nutrient in Nutrient::ALL {
            let target = effective.nutrient(nutrient);
            if target <= 0.0 {
                continue;
            }
            let floor = target * (1.0 - ctx.config.tolerance_pct / 100.0);
            let streak = ctx
                .snapshot
                .window
                .trailing_streak(person.id, nutrient, |v| v < floor);
            if streak >= ctx.config.low_streak_days {
                firings.push(Firing {
                    person: Some(person.id),
                    title: format!("{} low on {nutrient}", person.name),
                    message: format!(
                        "{} has been under the {nutrient} target of {target:.0} for {streak} days running",
                        person.name
                    ),
                    suggested_action: Some(format!(
                        "Review {}'s meals for {nutrient}-dense options",
                        person.name
                    )),
                });
            }
        }
    }
    firings
}

/// Warns when intake of any nutrient has been off target, in either
/// direction, for several consecutive days.
fn deviation_streak(ctx: &EvalContext) -> Vec<Firing> {
    let mut firings = Vec::new();
    for person in &ctx.snapshot.people {
        let Some(effective) = ctx.targets_for(person.id) else {
            continue;
        };
        for nutrient in Nutrient::ALL {
            let target = effective.nutrient(nutrient);
            if target <= 0.0 {
                continue;
            }
            let tolerance = ctx.config.tolerance_pct / 100.0;
            let streak = ctx
                .snapshot
                .window
                .trailing_streak(person.id, nutrient, |v| {
                    ((v - target) / target).abs() >= tolerance
                });
            if streak >= ctx.config.deviation_streak_days {
                firings.push(Firing {
                    person: Some(person.id),
                    title: format!("{} drifting off plan on {nutrient}", person.name),
                    message: format!(
                        "{}'s {nutrient} intake has been more than {:.0}% off target for {streak} days",
                        person.name, ctx.config.tolerance_pct
                    ),
                    suggested_action: Some(
                        "Check portion sizes against the current plan".to_owned(),
                    ),
                });
            }
        }
    }
    firings
}

/// Success when the week is on track to land under budget: judged on the
/// household's projected spend when one is recorded, otherwise on the
/// optimized plan cost.
fn under_budget(ctx: &EvalContext) -> Vec<Firing> {
    if ctx.optimization.is_some_and(|r| r.over_budget) {
        return Vec::new();
    }
    let budget = ctx.snapshot.household.weekly_budget;
    let projected = ctx.snapshot.household.projected_spend;

    let message = if projected > Money::ZERO {
        let margin = budget - projected;
        if margin <= Money::ZERO {
            return Vec::new();
        }
        let mut message = format!(
            "Projected spend of {projected} leaves {margin} of the weekly budget of {budget}"
        );
        if let Some(result) = ctx.optimization {
            message.push_str(&format!(
                "; the optimized shop costs {}, saving {} over the default sources",
                result.total_cost, result.total_savings
            ));
        }
        message
    } else if let Some(result) = ctx.optimization {
        if budget - result.total_cost <= Money::ZERO {
            return Vec::new();
        }
        format!(
            "This week's plan costs {} against a budget of {budget}, saving {} over the default sources",
            result.total_cost, result.total_savings
        )
    } else {
        return Vec::new();
    };

    vec![Firing {
        person: None,
        title: "Week tracking under budget".to_owned(),
        message,
        suggested_action: None,
    }]
}

/// Warns when even the cheapest compliant plan exceeds the weekly budget.
fn over_budget(ctx: &EvalContext) -> Vec<Firing> {
    let Some(result) = ctx.optimization else {
        return Vec::new();
    };
    if !result.over_budget {
        return Vec::new();
    }
    let overshoot = result.total_cost - ctx.snapshot.household.weekly_budget;
    vec![Firing {
        person: None,
        title: "Shopping plan over budget".to_owned(),
        message: format!(
            "The cheapest compliant plan costs {}, {} over the weekly budget of {}",
            result.total_cost, overshoot, ctx.snapshot.household.weekly_budget
        ),
        suggested_action: Some(
            "Approve a pending ingredient swap or raise the weekly budget".to_owned(),
        ),
    }]
}
