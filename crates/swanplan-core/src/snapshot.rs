//! Point-in-time engine input.
//!
//! A [`HouseholdSnapshot`] bundles everything one planning pass reads: the
//! household, its people, the shopping needs, the known substitution
//! candidates, and the trailing intake window. Engines never mutate a
//! snapshot; each pass over the same snapshot produces the same output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::ShoppingNeed;
use crate::models::{ChangeScope, Household, Ingredient, IntakeDay, Money, Nutrient, Person};

/// A known ingredient swap with its weekly saving and nutritional impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionCandidate {
    pub scope: ChangeScope,
    pub from: Ingredient,
    pub to: Ingredient,
    pub weekly_saving: Money,
    /// Signed percent deltas relative to the replaced ingredient.
    pub calorie_delta_pct: f64,
    pub protein_delta_pct: f64,
    pub carbs_delta_pct: f64,
    pub fat_delta_pct: f64,
}

impl SubstitutionCandidate {
    pub fn delta_pct(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calorie_delta_pct,
            Nutrient::Protein => self.protein_delta_pct,
            Nutrient::Carbs => self.carbs_delta_pct,
            Nutrient::Fat => self.fat_delta_pct,
        }
    }

    /// Largest absolute nutrient impact, used to judge how disruptive the
    /// swap would be.
    pub fn max_abs_delta_pct(&self) -> f64 {
        Nutrient::ALL
            .iter()
            .map(|n| self.delta_pct(*n).abs())
            .fold(0.0, f64::max)
    }
}

// ---------------------------------------------------------------------------

/// Trailing window of logged daily intake, shared by all people.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviationWindow {
    pub days: Vec<IntakeDay>,
}

impl DeviationWindow {
    /// One person's logged days, oldest first.
    pub fn days_for(&self, person_id: Uuid) -> Vec<&IntakeDay> {
        let mut days: Vec<&IntakeDay> = self
            .days
            .iter()
            .filter(|d| d.person_id == person_id)
            .collect();
        days.sort_by_key(|d| d.date);
        days
    }

    pub fn latest_date(&self, person_id: Uuid) -> Option<NaiveDate> {
        self.days
            .iter()
            .filter(|d| d.person_id == person_id)
            .map(|d| d.date)
            .max()
    }

    /// Mean intake of one nutrient over the person's most recent `days`
    /// logged days. `None` when nothing is logged.
    pub fn recent_average(&self, person_id: Uuid, nutrient: Nutrient, days: usize) -> Option<f64> {
        let logged = self.days_for(person_id);
        if logged.is_empty() || days == 0 {
            return None;
        }
        let recent: Vec<f64> = logged
            .iter()
            .rev()
            .take(days)
            .map(|d| d.nutrient(nutrient))
            .collect();
        Some(recent.iter().sum::<f64>() / recent.len() as f64)
    }

    /// Consecutive most-recent logged days satisfying `pred` on the given
    /// nutrient. The streak breaks at the first non-matching day, counting
    /// backwards from the latest entry.
    pub fn trailing_streak(
        &self,
        person_id: Uuid,
        nutrient: Nutrient,
        pred: impl Fn(f64) -> bool,
    ) -> usize {
        self.days_for(person_id)
            .iter()
            .rev()
            .take_while(|d| pred(d.nutrient(nutrient)))
            .count()
    }
}

// ---------------------------------------------------------------------------

/// Everything one planning pass reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    /// Bumped whenever the underlying household data changes.
    pub version: u64,
    pub household: Household,
    pub people: Vec<Person>,
    pub needs: Vec<ShoppingNeed>,
    pub substitutions: Vec<SubstitutionCandidate>,
    pub window: DeviationWindow,
}

impl HouseholdSnapshot {
    pub fn person(&self, id: Uuid) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn person_by_name(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.name == name)
    }
}
