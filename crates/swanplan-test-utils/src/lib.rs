//! Shared fixtures for swanplan integration tests.
//!
//! Provides a realistic multi-person household snapshot and a matching
//! `household.toml` string so tests exercise the same data through both the
//! programmatic and the file-based entry points.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use swanplan_core::budget::{ShoppingNeed, SourceOption};
use swanplan_core::models::{
    ChangeScope, DietPattern, DietPreferences, Household, Ingredient, IngredientTag, IntakeDay,
    MacroReading, Macros, Money, Person, PersonRole, RequirementCode, StateKind,
};
use swanplan_core::snapshot::{DeviationWindow, HouseholdSnapshot, SubstitutionCandidate};

/// Build a household member with sensible defaults.
pub fn person(name: &str, role: PersonRole, age: u8, base_calories: f64) -> Person {
    Person {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        role,
        age,
        base_calories,
        macros: Macros {
            protein: MacroReading {
                current: 0.0,
                target: base_calories * 0.06,
            },
            carbs: MacroReading {
                current: 0.0,
                target: base_calories * 0.125,
            },
            fat: MacroReading {
                current: 0.0,
                target: base_calories * 0.035,
            },
        },
        active_states: Vec::new(),
        preferences: DietPreferences::default(),
        requirements: BTreeSet::new(),
    }
}

/// Log `days` consecutive days of flat intake for one person, starting at
/// `start`.
pub fn log_flat_intake(
    window: &mut DeviationWindow,
    person_id: Uuid,
    start: NaiveDate,
    days: u32,
    calories: f64,
    protein_g: f64,
) {
    for offset in 0..days {
        window.days.push(IntakeDay {
            person_id,
            date: start + chrono::Days::new(offset as u64),
            calories,
            protein_g,
            carbs_g: calories * 0.125,
            fat_g: calories * 0.035,
        });
    }
}

fn need(item: &str, quantity: &str, options: &[(&str, i64)]) -> ShoppingNeed {
    ShoppingNeed {
        item: item.to_owned(),
        quantity: quantity.to_owned(),
        options: options
            .iter()
            .map(|(source, cents)| SourceOption {
                source: (*source).to_owned(),
                cost: Money::from_cents(*cents),
                ingredient: Ingredient::new(item.to_lowercase()),
            })
            .collect(),
    }
}

/// A five-person household in the middle of a realistic week.
///
/// - Wei: marathon prep, gluten excluded.
/// - Sarah: second-trimester pregnancy.
/// - Mark: cutting.
/// - Lily (teen) and Ben (child): no states.
///
/// Eight shopping needs across four sources, and two substitution
/// candidates (one violating Wei's gluten requirement).
pub fn sample_household() -> HouseholdSnapshot {
    let mut wei = person("Wei", PersonRole::Adult, 42, 2000.0);
    wei.active_states.push(StateKind::MarathonPrep);
    wei.requirements.insert(RequirementCode::ExcludeGluten);
    wei.preferences.patterns.push(DietPattern::Mediterranean);
    wei.preferences.liked.insert("salmon".to_owned());

    let mut sarah = person("Sarah", PersonRole::Adult, 38, 1900.0);
    sarah.active_states.push(StateKind::PregnancyTrimester2);
    sarah.preferences.disliked.insert("sardines".to_owned());

    let mut mark = person("Mark", PersonRole::Adult, 45, 2400.0);
    mark.active_states.push(StateKind::Cutting);

    let lily = person("Lily", PersonRole::Teen, 15, 2100.0);
    let ben = person("Ben", PersonRole::Child, 8, 1600.0);

    let needs = vec![
        need(
            "Chicken breast",
            "2.5 kg",
            &[("Costco", 1850), ("Walmart", 2270), ("Aldi", 1999)],
        ),
        need(
            "Salmon fillets",
            "800 g",
            &[("Costco", 2200), ("Walmart", 2450)],
        ),
        need(
            "Brown rice",
            "2 kg",
            &[("Walmart", 649), ("Aldi", 599), ("Trader Joe's", 699)],
        ),
        need("Eggs", "2 dozen", &[("Aldi", 649), ("Walmart", 649)]),
        need(
            "Greek yogurt",
            "1.5 kg",
            &[("Costco", 899), ("Trader Joe's", 1049)],
        ),
        need(
            "Broccoli",
            "1.5 kg",
            &[("Aldi", 449), ("Walmart", 599)],
        ),
        need(
            "Olive oil",
            "750 ml",
            &[("Costco", 1299), ("Walmart", 1399)],
        ),
        need(
            "Sweet potatoes",
            "2 kg",
            &[("Walmart", 549), ("Aldi", 499)],
        ),
    ];

    let substitutions = vec![
        SubstitutionCandidate {
            scope: ChangeScope::Household,
            from: Ingredient::new("salmon fillets"),
            to: Ingredient::new("sardines"),
            weekly_saving: Money::from_cents(1800),
            calorie_delta_pct: -2.0,
            protein_delta_pct: 1.0,
            carbs_delta_pct: 0.0,
            fat_delta_pct: -4.0,
        },
        // Cheaper but violates Wei's gluten exclusion.
        SubstitutionCandidate {
            scope: ChangeScope::Household,
            from: Ingredient::new("brown rice"),
            to: Ingredient::with_tags("wheat couscous", [IngredientTag::Gluten]),
            weekly_saving: Money::from_cents(250),
            calorie_delta_pct: 1.0,
            protein_delta_pct: 2.0,
            carbs_delta_pct: 3.0,
            fat_delta_pct: 0.0,
        },
    ];

    let mut window = DeviationWindow::default();
    let start = NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date");
    // Mark has been eating well over his cutting target all week.
    log_flat_intake(&mut window, mark.id, start, 7, 2350.0, 150.0);
    // Sarah is close to target.
    log_flat_intake(&mut window, sarah.id, start, 7, 2215.0, 130.0);
    // Wei is logging low protein.
    log_flat_intake(&mut window, wei.id, start, 7, 2180.0, 70.0);

    HouseholdSnapshot {
        version: 1,
        household: Household {
            id: Uuid::new_v4(),
            name: "Chen Family".to_owned(),
            weekly_budget: Money::from_cents(17500),
            current_spend: Money::from_cents(8920),
            projected_spend: Money::from_cents(16850),
            savings_to_date: Money::from_cents(4230),
        },
        people: vec![wei, sarah, mark, lily, ben],
        needs,
        substitutions,
        window,
    }
}

/// A `household.toml` describing a smaller two-person household, for tests
/// that go through the file parser.
pub fn household_toml() -> &'static str {
    r#"
[household]
name = "Chen Family"
weekly_budget = 175.00
current_spend = 89.20

[[people]]
name = "Wei"
role = "adult"
age = 42
base_calories = 2000
protein_target = 120
carbs_target = 250
fat_target = 70
states = ["marathon_prep"]
requirements = ["exclude_gluten"]
patterns = ["mediterranean"]
liked = ["salmon"]

[[people]]
name = "Sarah"
role = "adult"
age = 38
base_calories = 1900
protein_target = 115
carbs_target = 240
fat_target = 65
states = ["pregnancy_trimester2"]

[[needs]]
item = "Chicken breast"
quantity = "2.5 kg"

[[needs.options]]
source = "Costco"
cost = 18.50

[[needs.options]]
source = "Walmart"
cost = 22.70

[[needs]]
item = "Pasta"
quantity = "1 kg"

[[needs.options]]
source = "Aldi"
cost = 2.99
ingredient = "wheat pasta"
tags = ["gluten"]

[[needs.options]]
source = "Walmart"
cost = 5.49
ingredient = "rice pasta"

[[substitutions]]
from = "salmon fillets"
to = "sardines"
weekly_saving = 18.00
calorie_delta_pct = -2.0
fat_delta_pct = -4.0

[[intake]]
person = "Wei"
date = "2026-08-10"
calories = 1850
protein = 110
carbs = 230
fat = 65

[[intake]]
person = "Wei"
date = "2026-08-11"
calories = 1890
protein = 108
carbs = 235
fat = 66
"#
}
