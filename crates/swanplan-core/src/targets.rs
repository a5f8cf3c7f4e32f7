//! Target resolution: base targets plus active temporary-state modifiers.
//!
//! Percentage modifiers always apply to the *base* target and compose
//! additively, so the effective targets do not depend on activation order.
//! Order (priority rank first, activation order within a rank) only decides
//! the sequence in which states are walked for conflict reporting.

use thiserror::Error;

use crate::models::{EffectiveTargets, Person, StateKind};

/// How a single state adjusts one nutrient: a percentage of the base target
/// plus an absolute delta. Either part may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adjust {
    pub pct: f64,
    pub abs: f64,
}

impl Adjust {
    const fn pct(pct: f64) -> Self {
        Adjust { pct, abs: 0.0 }
    }

    const fn abs(abs: f64) -> Self {
        Adjust { pct: 0.0, abs }
    }

    const fn none() -> Self {
        Adjust { pct: 0.0, abs: 0.0 }
    }
}

/// The full modifier set a temporary state applies to a person's targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateModifier {
    pub calories: Adjust,
    pub protein: Adjust,
    pub carbs: Adjust,
    pub fat: Adjust,
}

impl StateKind {
    /// The modifier this state applies.
    pub fn modifier(self) -> StateModifier {
        match self {
            // +10% calories, +15% carbs on a training load.
            Self::MarathonPrep => StateModifier {
                calories: Adjust::pct(10.0),
                protein: Adjust::none(),
                carbs: Adjust::pct(15.0),
                fat: Adjust::none(),
            },
            // +340 kcal/day and extra protein for the second trimester.
            Self::PregnancyTrimester2 => StateModifier {
                calories: Adjust::abs(340.0),
                protein: Adjust::abs(10.0),
                carbs: Adjust::none(),
                fat: Adjust::none(),
            },
            // +25% protein for tissue repair.
            Self::SurgeryRecovery => StateModifier {
                calories: Adjust::none(),
                protein: Adjust::pct(25.0),
                carbs: Adjust::none(),
                fat: Adjust::none(),
            },
            // -15% calories, protein held high.
            Self::Cutting => StateModifier {
                calories: Adjust::pct(-15.0),
                protein: Adjust::pct(10.0),
                carbs: Adjust::none(),
                fat: Adjust::none(),
            },
        }
    }

    /// Priority rank for ordering ties: lower is more physiologically
    /// constraining. Medical states outrank performance states.
    pub fn priority(self) -> u8 {
        match self {
            Self::PregnancyTrimester2 | Self::SurgeryRecovery => 0,
            Self::MarathonPrep | Self::Cutting => 1,
        }
    }

    /// Declared incompatibility between states. Symmetric.
    pub fn is_incompatible_with(self, other: StateKind) -> bool {
        matches!(
            (self, other),
            (Self::Cutting, Self::PregnancyTrimester2)
                | (Self::PregnancyTrimester2, Self::Cutting)
                | (Self::Cutting, Self::SurgeryRecovery)
                | (Self::SurgeryRecovery, Self::Cutting)
        )
    }

    /// Human-readable summary of the adjustment, used in insight messages.
    pub fn adjustment_summary(self) -> &'static str {
        match self {
            Self::MarathonPrep => "+10% calories, +15% carbs",
            Self::PregnancyTrimester2 => "+340 kcal/day, +10g protein",
            Self::SurgeryRecovery => "+25% protein",
            Self::Cutting => "-15% calories, +10% protein",
        }
    }
}

/// Errors from target resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "conflicting temporary states for {person}: {first} and {second} are mutually exclusive"
    )]
    ConflictingStates {
        person: String,
        first: StateKind,
        second: StateKind,
    },
}

/// Resolve a person's effective targets from their base targets and active
/// temporary states.
///
/// Pure function of the person record. With no active states the base
/// targets are returned unchanged. Fails with
/// [`ResolveError::ConflictingStates`] if any two active states are declared
/// mutually exclusive; the conflict is surfaced, never silently resolved.
pub fn resolve_targets(person: &Person) -> Result<EffectiveTargets, ResolveError> {
    let states = ordered_states(person);

    // Conflict check over all pairs, walked in resolution order so the
    // reported pair is deterministic.
    for (i, &first) in states.iter().enumerate() {
        for &second in &states[i + 1..] {
            if first.is_incompatible_with(second) {
                return Err(ResolveError::ConflictingStates {
                    person: person.name.clone(),
                    first,
                    second,
                });
            }
        }
    }

    let base_calories = person.base_calories;
    let base_protein = person.macros.protein.target;
    let base_carbs = person.macros.carbs.target;
    let base_fat = person.macros.fat.target;

    let mut calorie_pct = 0.0;
    let mut calorie_abs = 0.0;
    let mut protein_pct = 0.0;
    let mut protein_abs = 0.0;
    let mut carbs_pct = 0.0;
    let mut carbs_abs = 0.0;
    let mut fat_pct = 0.0;
    let mut fat_abs = 0.0;

    for state in &states {
        let m = state.modifier();
        calorie_pct += m.calories.pct;
        calorie_abs += m.calories.abs;
        protein_pct += m.protein.pct;
        protein_abs += m.protein.abs;
        carbs_pct += m.carbs.pct;
        carbs_abs += m.carbs.abs;
        fat_pct += m.fat.pct;
        fat_abs += m.fat.abs;
    }

    let targets = EffectiveTargets {
        calories: base_calories * (1.0 + calorie_pct / 100.0) + calorie_abs,
        protein_g: base_protein * (1.0 + protein_pct / 100.0) + protein_abs,
        carbs_g: base_carbs * (1.0 + carbs_pct / 100.0) + carbs_abs,
        fat_g: base_fat * (1.0 + fat_pct / 100.0) + fat_abs,
    };

    if !states.is_empty() {
        tracing::debug!(
            person = %person.name,
            states = ?states,
            calories = targets.calories,
            "resolved effective targets"
        );
    }

    Ok(targets)
}

/// Active states in resolution order: most constraining priority rank
/// first, activation order within a rank (the sort is stable).
pub fn ordered_states(person: &Person) -> Vec<StateKind> {
    let mut states = person.active_states.clone();
    states.sort_by_key(|state| state.priority());
    states
}
