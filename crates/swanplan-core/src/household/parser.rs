//! Household TOML parser with validation.
//!
//! Parses a `household.toml` string into a [`HouseholdSnapshot`] and
//! validates:
//! - Role, state, requirement, pattern, and tag values are valid enum
//!   variants.
//! - Person names and shopping item names are unique.
//! - No person lists the same state twice.
//! - Money amounts are not negative.
//! - Every shopping item has at least one source option.
//! - Substitution and intake references point to existing people.
//!
//! Conflicts between states (e.g. cutting while pregnant) are not a parse
//! error; the target resolver reports them with full context.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::budget::{ShoppingNeed, SourceOption};
use crate::models::{
    ChangeScope, DietPattern, DietPreferences, Household, Ingredient, IngredientTag, MacroReading,
    Macros, Money, Person, PersonRole, RequirementCode, StateKind,
};
use crate::snapshot::{DeviationWindow, HouseholdSnapshot, SubstitutionCandidate};

use super::toml_format::{HouseholdToml, PersonToml, SourceOptionToml};

/// Errors that can occur during household parsing and validation.
#[derive(Debug, Error)]
pub enum HouseholdParseError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("household must contain at least one person")]
    NoPeople,

    #[error("duplicate person name: {0:?}")]
    DuplicatePerson(String),

    #[error("invalid role {value:?} for person {person:?} (expected adult, teen, child, or toddler)")]
    InvalidRole { person: String, value: String },

    #[error("invalid state {value:?} for person {person:?}")]
    InvalidState { person: String, value: String },

    #[error("person {person:?} lists state {state} twice")]
    DuplicateState { person: String, state: StateKind },

    #[error("invalid requirement {value:?} for person {person:?}")]
    InvalidRequirement { person: String, value: String },

    #[error("invalid diet pattern {value:?} for person {person:?}")]
    InvalidPattern { person: String, value: String },

    #[error("invalid ingredient tag {value:?} on item {item:?}")]
    InvalidTag { item: String, value: String },

    #[error("negative amount {amount} for {field}")]
    NegativeMoney { field: String, amount: f64 },

    #[error("duplicate shopping item: {0:?}")]
    DuplicateNeed(String),

    #[error("shopping item {0:?} has no source options")]
    NoOptions(String),

    #[error("substitution {from:?} -> {to:?} names unknown person {person:?}")]
    UnknownSubstitutionPerson {
        from: String,
        to: String,
        person: String,
    },

    #[error("intake entry names unknown person {0:?}")]
    UnknownIntakePerson(String),

    #[error("invalid intake date {value:?} for person {person:?} (expected YYYY-MM-DD)")]
    InvalidIntakeDate { person: String, value: String },
}

/// Parse and validate a `household.toml` string.
///
/// Returns a fully resolved [`HouseholdSnapshot`] with fresh ids assigned,
/// or a descriptive error.
pub fn parse_household_toml(content: &str) -> Result<HouseholdSnapshot, HouseholdParseError> {
    let file: HouseholdToml = toml::from_str(content)?;

    if file.people.is_empty() {
        return Err(HouseholdParseError::NoPeople);
    }

    let mut seen = HashSet::new();
    for person in &file.people {
        if !seen.insert(person.name.as_str()) {
            return Err(HouseholdParseError::DuplicatePerson(person.name.clone()));
        }
    }

    let household = Household {
        id: Uuid::new_v4(),
        name: file.household.name.clone(),
        weekly_budget: parse_money("household.weekly_budget", file.household.weekly_budget)?,
        current_spend: parse_money("household.current_spend", file.household.current_spend)?,
        projected_spend: parse_money("household.projected_spend", file.household.projected_spend)?,
        savings_to_date: parse_money("household.savings_to_date", file.household.savings_to_date)?,
    };

    let people = file
        .people
        .iter()
        .map(parse_person)
        .collect::<Result<Vec<Person>, _>>()?;

    let mut seen_items = HashSet::new();
    let mut needs = Vec::with_capacity(file.needs.len());
    for need in &file.needs {
        if !seen_items.insert(need.item.as_str()) {
            return Err(HouseholdParseError::DuplicateNeed(need.item.clone()));
        }
        if need.options.is_empty() {
            return Err(HouseholdParseError::NoOptions(need.item.clone()));
        }
        let options = need
            .options
            .iter()
            .map(|opt| parse_option(&need.item, opt))
            .collect::<Result<Vec<SourceOption>, _>>()?;
        needs.push(ShoppingNeed {
            item: need.item.clone(),
            quantity: need.quantity.clone(),
            options,
        });
    }

    let mut substitutions = Vec::with_capacity(file.substitutions.len());
    for sub in &file.substitutions {
        let scope = match &sub.person {
            None => ChangeScope::Household,
            Some(name) => {
                let person = people.iter().find(|p| &p.name == name).ok_or_else(|| {
                    HouseholdParseError::UnknownSubstitutionPerson {
                        from: sub.from.clone(),
                        to: sub.to.clone(),
                        person: name.clone(),
                    }
                })?;
                ChangeScope::Person(person.id)
            }
        };
        let to_tags = sub
            .to_tags
            .iter()
            .map(|t| parse_tag(&sub.to, t))
            .collect::<Result<Vec<IngredientTag>, _>>()?;
        substitutions.push(SubstitutionCandidate {
            scope,
            from: Ingredient::new(sub.from.clone()),
            to: Ingredient::with_tags(sub.to.clone(), to_tags),
            weekly_saving: parse_money("substitutions.weekly_saving", sub.weekly_saving)?,
            calorie_delta_pct: sub.calorie_delta_pct,
            protein_delta_pct: sub.protein_delta_pct,
            carbs_delta_pct: sub.carbs_delta_pct,
            fat_delta_pct: sub.fat_delta_pct,
        });
    }

    let mut window = DeviationWindow::default();
    for entry in &file.intake {
        let person = people
            .iter()
            .find(|p| p.name == entry.person)
            .ok_or_else(|| HouseholdParseError::UnknownIntakePerson(entry.person.clone()))?;
        let date: NaiveDate =
            entry
                .date
                .parse()
                .map_err(|_| HouseholdParseError::InvalidIntakeDate {
                    person: entry.person.clone(),
                    value: entry.date.clone(),
                })?;
        window.days.push(crate::models::IntakeDay {
            person_id: person.id,
            date,
            calories: entry.calories,
            protein_g: entry.protein,
            carbs_g: entry.carbs,
            fat_g: entry.fat,
        });
    }

    Ok(HouseholdSnapshot {
        version: file.household.version,
        household,
        people,
        needs,
        substitutions,
        window,
    })
}

fn parse_person(p: &PersonToml) -> Result<Person, HouseholdParseError> {
    let role: PersonRole = p
        .role
        .parse()
        .map_err(|_| HouseholdParseError::InvalidRole {
            person: p.name.clone(),
            value: p.role.clone(),
        })?;

    let mut states = Vec::with_capacity(p.states.len());
    for raw in &p.states {
        let state: StateKind = raw.parse().map_err(|_| HouseholdParseError::InvalidState {
            person: p.name.clone(),
            value: raw.clone(),
        })?;
        if states.contains(&state) {
            return Err(HouseholdParseError::DuplicateState {
                person: p.name.clone(),
                state,
            });
        }
        states.push(state);
    }

    let requirements = p
        .requirements
        .iter()
        .map(|raw| {
            raw.parse::<RequirementCode>()
                .map_err(|_| HouseholdParseError::InvalidRequirement {
                    person: p.name.clone(),
                    value: raw.clone(),
                })
        })
        .collect::<Result<_, _>>()?;

    let patterns = p
        .patterns
        .iter()
        .map(|raw| {
            raw.parse::<DietPattern>()
                .map_err(|_| HouseholdParseError::InvalidPattern {
                    person: p.name.clone(),
                    value: raw.clone(),
                })
        })
        .collect::<Result<_, _>>()?;

    Ok(Person {
        id: Uuid::new_v4(),
        name: p.name.clone(),
        role,
        age: p.age,
        base_calories: p.base_calories,
        macros: Macros {
            protein: MacroReading {
                current: 0.0,
                target: p.protein_target,
            },
            carbs: MacroReading {
                current: 0.0,
                target: p.carbs_target,
            },
            fat: MacroReading {
                current: 0.0,
                target: p.fat_target,
            },
        },
        active_states: states,
        preferences: DietPreferences {
            patterns,
            liked: p.liked.iter().map(|s| s.to_lowercase()).collect(),
            disliked: p.disliked.iter().map(|s| s.to_lowercase()).collect(),
        },
        requirements,
    })
}

fn parse_option(item: &str, opt: &SourceOptionToml) -> Result<SourceOption, HouseholdParseError> {
    let tags = opt
        .tags
        .iter()
        .map(|t| parse_tag(item, t))
        .collect::<Result<Vec<IngredientTag>, _>>()?;
    let name = opt.ingredient.clone().unwrap_or_else(|| item.to_owned());
    Ok(SourceOption {
        source: opt.source.clone(),
        cost: parse_money("needs.options.cost", opt.cost)?,
        ingredient: Ingredient::with_tags(name, tags),
    })
}

fn parse_tag(item: &str, raw: &str) -> Result<IngredientTag, HouseholdParseError> {
    raw.parse().map_err(|_| HouseholdParseError::InvalidTag {
        item: item.to_owned(),
        value: raw.to_owned(),
    })
}

fn parse_money(field: &str, amount: f64) -> Result<Money, HouseholdParseError> {
    if amount < 0.0 {
        return Err(HouseholdParseError::NegativeMoney {
            field: field.to_owned(),
            amount,
        });
    }
    Ok(Money::from_dollars(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> String {
        r#"
[household]
name = "Chen Family"
weekly_budget = 175.00

[[people]]
name = "Wei"
role = "adult"
age = 42
base_calories = 2000
protein_target = 120
carbs_target = 250
fat_target = 70
"#
        .to_owned()
    }

    #[test]
    fn parses_a_minimal_household() {
        let snapshot = parse_household_toml(&minimal()).expect("should parse");
        assert_eq!(snapshot.household.name, "Chen Family");
        assert_eq!(snapshot.household.weekly_budget, Money::from_cents(17500));
        assert_eq!(snapshot.people.len(), 1);
        assert_eq!(snapshot.people[0].name, "Wei");
        assert_eq!(snapshot.people[0].role, PersonRole::Adult);
        assert_eq!(snapshot.version, 1);
    }

    #[test]
    fn parses_states_requirements_and_preferences() {
        let toml = r#"
[household]
name = "Chen Family"
weekly_budget = 175.00

[[people]]
name = "Sarah"
role = "adult"
age = 38
base_calories = 2200
protein_target = 130
carbs_target = 260
fat_target = 75
states = ["pregnancy_trimester2"]
requirements = ["exclude_gluten", "low_sodium"]
patterns = ["mediterranean"]
liked = ["Salmon"]
disliked = ["tofu"]
"#;
        let snapshot = parse_household_toml(toml).expect("should parse");
        let sarah = &snapshot.people[0];
        assert_eq!(sarah.active_states, vec![StateKind::PregnancyTrimester2]);
        assert!(sarah.requirements.contains(&RequirementCode::ExcludeGluten));
        assert!(sarah.requirements.contains(&RequirementCode::LowSodium));
        assert_eq!(sarah.preferences.patterns, vec![DietPattern::Mediterranean]);
        // Preference names are normalized to lowercase.
        assert!(sarah.preferences.liked.contains("salmon"));
    }

    #[test]
    fn parses_needs_substitutions_and_intake() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
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
from = "salmon"
to = "sardines"
weekly_saving = 18.00
fat_delta_pct = -4.0
person = "Wei"

[[intake]]
person = "Wei"
date = "2026-08-10"
calories = 1850
protein = 110
"#
        );
        let snapshot = parse_household_toml(&toml).expect("should parse");

        assert_eq!(snapshot.needs.len(), 1);
        let options = &snapshot.needs[0].options;
        assert_eq!(options[0].ingredient.name, "wheat pasta");
        assert!(options[0].ingredient.tags.contains(&IngredientTag::Gluten));
        // Ingredient name defaults to the item name when omitted... here it is set.
        assert_eq!(options[1].cost, Money::from_cents(549));

        assert_eq!(snapshot.substitutions.len(), 1);
        let sub = &snapshot.substitutions[0];
        assert_eq!(sub.weekly_saving, Money::from_cents(1800));
        assert_eq!(sub.scope, ChangeScope::Person(snapshot.people[0].id));

        assert_eq!(snapshot.window.days.len(), 1);
        assert_eq!(snapshot.window.days[0].person_id, snapshot.people[0].id);
        assert_eq!(snapshot.window.days[0].calories, 1850.0);
    }

    #[test]
    fn rejects_empty_household() {
        let toml = r#"
[household]
name = "Empty"
weekly_budget = 100.0
"#;
        let err = parse_household_toml(toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::NoPeople));
    }

    #[test]
    fn rejects_duplicate_person_names() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[people]]
name = "Wei"
role = "adult"
age = 42
base_calories = 2000
protein_target = 120
carbs_target = 250
fat_target = 70
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::DuplicatePerson(name) if name == "Wei"));
    }

    #[test]
    fn rejects_unknown_role() {
        let toml = minimal().replace("\"adult\"", "\"grandparent\"");
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::InvalidRole { value, .. } if value == "grandparent"));
    }

    #[test]
    fn rejects_unknown_state() {
        let toml = format!("{}states = [\"hibernation\"]\n", minimal());
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::InvalidState { value, .. } if value == "hibernation"));
    }

    #[test]
    fn rejects_duplicate_state() {
        let toml = format!("{}states = [\"cutting\", \"cutting\"]\n", minimal());
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(
            err,
            HouseholdParseError::DuplicateState {
                state: StateKind::Cutting,
                ..
            }
        ));
    }

    #[test]
    fn conflicting_states_are_not_a_parse_error() {
        // The resolver owns conflict reporting.
        let toml = format!(
            "{}states = [\"cutting\", \"pregnancy_trimester2\"]\n",
            minimal()
        );
        let snapshot = parse_household_toml(&toml).expect("should parse");
        assert_eq!(snapshot.people[0].active_states.len(), 2);
    }

    #[test]
    fn rejects_unknown_requirement() {
        let toml = format!("{}requirements = [\"exclude_joy\"]\n", minimal());
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::InvalidRequirement { value, .. } if value == "exclude_joy"));
    }

    #[test]
    fn rejects_negative_budget() {
        let toml = minimal().replace("175.00", "-10.0");
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::NegativeMoney { .. }));
    }

    #[test]
    fn rejects_need_without_options() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[needs]]
item = "Pasta"
quantity = "1 kg"
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::NoOptions(item) if item == "Pasta"));
    }

    #[test]
    fn rejects_duplicate_need() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[needs]]
item = "Pasta"
quantity = "1 kg"
[[needs.options]]
source = "Aldi"
cost = 2.99

[[needs]]
item = "Pasta"
quantity = "2 kg"
[[needs.options]]
source = "Costco"
cost = 4.99
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::DuplicateNeed(item) if item == "Pasta"));
    }

    #[test]
    fn rejects_unknown_tag() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[needs]]
item = "Pasta"
quantity = "1 kg"
[[needs.options]]
source = "Aldi"
cost = 2.99
tags = ["radioactive"]
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::InvalidTag { value, .. } if value == "radioactive"));
    }

    #[test]
    fn rejects_substitution_for_unknown_person() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[substitutions]]
from = "salmon"
to = "sardines"
weekly_saving = 18.00
person = "Nobody"
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(
            err,
            HouseholdParseError::UnknownSubstitutionPerson { person, .. } if person == "Nobody"
        ));
    }

    #[test]
    fn rejects_intake_for_unknown_person() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[intake]]
person = "Nobody"
date = "2026-08-10"
calories = 1850
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::UnknownIntakePerson(p) if p == "Nobody"));
    }

    #[test]
    fn rejects_malformed_intake_date() {
        let toml = format!(
            "{}{}",
            minimal(),
            r#"
[[intake]]
person = "Wei"
date = "10/08/2026"
calories = 1850
"#
        );
        let err = parse_household_toml(&toml).unwrap_err();
        assert!(matches!(err, HouseholdParseError::InvalidIntakeDate { value, .. } if value == "10/08/2026"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_household_toml("not = [valid").unwrap_err();
        assert!(matches!(err, HouseholdParseError::TomlError(_)));
    }
}
