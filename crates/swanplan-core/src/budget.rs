//! Budget optimization: cheapest compliant source per shopping item.
//!
//! Items are independent -- there is no shared discount pool -- so the
//! optimizer is a per-item greedy selection gated by the requirement
//! validator. Going over budget is a reportable condition carried in the
//! result, never an error.

use thiserror::Error;

use crate::models::{Ingredient, Money};
use crate::requirements::{self, RequirementSet};

/// One purchasable option for a shopping item at a specific source.
///
/// Each option carries its own ingredient (a source may stock a different
/// variant, e.g. a gluten-free substitute), so compliance is checked per
/// option, not per item.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceOption {
    pub source: String,
    pub cost: Money,
    pub ingredient: Ingredient,
}

/// A required shopping item with its candidate sources.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShoppingNeed {
    pub item: String,
    pub quantity: String,
    pub options: Vec<SourceOption>,
}

/// The chosen source for one item.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemSelection {
    pub item: String,
    pub quantity: String,
    pub source: String,
    pub cost: Money,
    /// Baseline-source cost minus selected cost. Zero when the baseline
    /// source does not stock the item.
    pub savings: Money,
}

/// Result of a full optimization pass.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OptimizationResult {
    pub selection: Vec<ItemSelection>,
    pub total_cost: Money,
    pub total_savings: Money,
    /// True when the best achievable total exceeds the weekly budget.
    /// Reportable, not fatal: the selection is still the best available.
    pub over_budget: bool,
}

/// Optimizer configuration.
#[derive(Debug, Clone)]
pub struct BudgetConfig {
    pub weekly_budget: Money,
    /// The default source savings are measured against.
    pub baseline_source: String,
}

/// Errors for malformed optimizer input. These fire at the boundary, before
/// any selection happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    #[error("weekly budget must not be negative (got {0})")]
    NegativeBudget(Money),

    #[error("shopping item {item:?} has no source options")]
    EmptyOptions { item: String },

    #[error("no compliant source for item {item:?} under the active requirements")]
    NoCompliantSource { item: String },
}

/// Select the minimum-cost compliant source for every shopping item.
///
/// Per item: options are filtered through the requirement validator, the
/// cheapest compliant option wins, and ties are broken by source name
/// ascending so identical inputs always yield the identical selection.
/// Savings per item are measured against the configured baseline source.
pub fn optimize(
    needs: &[ShoppingNeed],
    requirements: &RequirementSet,
    config: &BudgetConfig,
) -> Result<OptimizationResult, OptimizeError> {
    if config.weekly_budget.is_negative() {
        return Err(OptimizeError::NegativeBudget(config.weekly_budget));
    }

    let mut selection = Vec::with_capacity(needs.len());
    let mut total_cost = Money::ZERO;
    let mut total_savings = Money::ZERO;

    for need in needs {
        if need.options.is_empty() {
            return Err(OptimizeError::EmptyOptions {
                item: need.item.clone(),
            });
        }

        let mut compliant: Vec<&SourceOption> = need
            .options
            .iter()
            .filter(|opt| {
                requirements::is_compliant(std::slice::from_ref(&opt.ingredient), requirements)
            })
            .collect();

        if compliant.is_empty() {
            return Err(OptimizeError::NoCompliantSource {
                item: need.item.clone(),
            });
        }

        // Cheapest first; ties broken by source name ascending.
        compliant.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.source.cmp(&b.source)));
        let chosen = compliant[0];

        let baseline_cost = need
            .options
            .iter()
            .find(|opt| opt.source == config.baseline_source)
            .map(|opt| opt.cost);
        let savings = baseline_cost
            .map(|baseline| baseline - chosen.cost)
            .unwrap_or(Money::ZERO);

        total_cost += chosen.cost;
        total_savings += savings;
        selection.push(ItemSelection {
            item: need.item.clone(),
            quantity: need.quantity.clone(),
            source: chosen.source.clone(),
            cost: chosen.cost,
            savings,
        });
    }

    let over_budget = total_cost > config.weekly_budget;
    if over_budget {
        tracing::warn!(
            total_cost = %total_cost,
            budget = %config.weekly_budget,
            "optimized shopping list exceeds weekly budget"
        );
    }

    Ok(OptimizationResult {
        selection,
        total_cost,
        total_savings,
        over_budget,
    })
}

#[cfg(test)]
mod tests {
    use crate::models::{IngredientTag, RequirementCode};

    use super::*;

    fn opt(source: &str, cents: i64) -> SourceOption {
        SourceOption {
            source: source.to_owned(),
            cost: Money::from_cents(cents),
            ingredient: Ingredient::new("generic"),
        }
    }

    fn config(budget_cents: i64) -> BudgetConfig {
        BudgetConfig {
            weekly_budget: Money::from_cents(budget_cents),
            baseline_source: "Walmart".to_owned(),
        }
    }

    #[test]
    fn picks_cheapest_compliant_source() {
        let needs = vec![ShoppingNeed {
            item: "Chicken breast".to_owned(),
            quantity: "2.5 kg".to_owned(),
            options: vec![opt("Walmart", 2270), opt("Costco", 1850), opt("Aldi", 1999)],
        }];
        let result = optimize(&needs, &RequirementSet::new(), &config(17500)).expect("should optimize");
        assert_eq!(result.selection[0].source, "Costco");
        assert_eq!(result.selection[0].cost, Money::from_cents(1850));
        // Savings are measured against the Walmart baseline.
        assert_eq!(result.selection[0].savings, Money::from_cents(420));
        assert!(!result.over_budget);
    }

    #[test]
    fn never_selects_non_compliant_source_even_if_cheaper() {
        let mut cheap_but_glutenous = opt("Aldi", 299);
        cheap_but_glutenous.ingredient =
            Ingredient::with_tags("wheat pasta", [IngredientTag::Gluten]);
        let needs = vec![ShoppingNeed {
            item: "Pasta".to_owned(),
            quantity: "1 kg".to_owned(),
            options: vec![
                cheap_but_glutenous,
                SourceOption {
                    source: "Walmart".to_owned(),
                    cost: Money::from_cents(549),
                    ingredient: Ingredient::new("rice pasta"),
                },
            ],
        }];
        let reqs: RequirementSet = [RequirementCode::ExcludeGluten].into_iter().collect();
        let result = optimize(&needs, &reqs, &config(17500)).expect("should optimize");
        assert_eq!(result.selection[0].source, "Walmart");
        assert_eq!(result.selection[0].cost, Money::from_cents(549));
    }

    #[test]
    fn ties_break_by_source_name_ascending() {
        let needs = vec![ShoppingNeed {
            item: "Eggs".to_owned(),
            quantity: "1 pack".to_owned(),
            options: vec![opt("Walmart", 649), opt("Aldi", 649), opt("Costco", 649)],
        }];
        let result = optimize(&needs, &RequirementSet::new(), &config(17500)).expect("should optimize");
        assert_eq!(result.selection[0].source, "Aldi");
    }

    #[test]
    fn optimize_is_deterministic() {
        let needs = vec![
            ShoppingNeed {
                item: "Broccoli".to_owned(),
                quantity: "1.5 kg".to_owned(),
                options: vec![opt("Aldi", 449), opt("Walmart", 599)],
            },
            ShoppingNeed {
                item: "Olive oil".to_owned(),
                quantity: "750 ml".to_owned(),
                options: vec![opt("Costco", 899), opt("Walmart", 1099)],
            },
        ];
        let reqs = RequirementSet::new();
        let cfg = config(17500);
        let a = optimize(&needs, &reqs, &cfg).expect("should optimize");
        let b = optimize(&needs, &reqs, &cfg).expect("should optimize");
        assert_eq!(a, b);
    }

    #[test]
    fn over_budget_is_flagged_not_fatal() {
        let needs = vec![ShoppingNeed {
            item: "Salmon fillets".to_owned(),
            quantity: "800 g".to_owned(),
            options: vec![opt("Walmart", 17643)],
        }];
        let result = optimize(&needs, &RequirementSet::new(), &config(17500)).expect("should optimize");
        assert!(result.over_budget);
        assert_eq!(result.total_cost, Money::from_cents(17643));
    }

    #[test]
    fn missing_baseline_source_means_zero_savings() {
        let needs = vec![ShoppingNeed {
            item: "Spinach".to_owned(),
            quantity: "500 g".to_owned(),
            options: vec![opt("Aldi", 399), opt("Costco", 449)],
        }];
        let result = optimize(&needs, &RequirementSet::new(), &config(17500)).expect("should optimize");
        assert_eq!(result.selection[0].savings, Money::ZERO);
        assert_eq!(result.total_savings, Money::ZERO);
    }

    #[test]
    fn rejects_negative_budget() {
        let err = optimize(&[], &RequirementSet::new(), &config(-1)).unwrap_err();
        assert!(matches!(err, OptimizeError::NegativeBudget(_)));
    }

    #[test]
    fn rejects_item_without_options() {
        let needs = vec![ShoppingNeed {
            item: "Mystery".to_owned(),
            quantity: "1".to_owned(),
            options: vec![],
        }];
        let err = optimize(&needs, &RequirementSet::new(), &config(17500)).unwrap_err();
        assert!(matches!(err, OptimizeError::EmptyOptions { item } if item == "Mystery"));
    }

    #[test]
    fn rejects_item_with_no_compliant_source() {
        let needs = vec![ShoppingNeed {
            item: "Peanut butter".to_owned(),
            quantity: "1 jar".to_owned(),
            options: vec![SourceOption {
                source: "Costco".to_owned(),
                cost: Money::from_cents(799),
                ingredient: Ingredient::with_tags("peanuts", [IngredientTag::Nuts]),
            }],
        }];
        let reqs: RequirementSet = [RequirementCode::ExcludeNuts].into_iter().collect();
        let err = optimize(&needs, &reqs, &config(17500)).unwrap_err();
        assert!(matches!(err, OptimizeError::NoCompliantSource { item } if item == "Peanut butter"));
    }

    #[test]
    fn empty_shopping_list_is_trivially_within_budget() {
        let result = optimize(&[], &RequirementSet::new(), &config(0)).expect("should optimize");
        assert!(result.selection.is_empty());
        assert_eq!(result.total_cost, Money::ZERO);
        assert!(!result.over_budget);
    }
}
