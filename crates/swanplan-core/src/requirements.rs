//! Requirement validation: hard restriction codes and soft preferences.
//!
//! Compliance is absolute. Nothing in the engine -- bounds, autopilot
//! authority, budget pressure -- can override a failed compliance check,
//! and the API deliberately offers no way to express an override.

use std::collections::BTreeSet;

use crate::models::{DietPreferences, Ingredient, Person, RequirementCode};

/// The set of active restriction codes for one or more consumers.
pub type RequirementSet = BTreeSet<RequirementCode>;

/// Whether a candidate (as a list of ingredients) is compliant with a
/// requirement set.
///
/// Compliant iff no ingredient carries a tag that any active requirement
/// matches. Monotonic: adding a requirement can only turn a compliant
/// candidate non-compliant, never the reverse.
pub fn is_compliant(ingredients: &[Ingredient], requirements: &RequirementSet) -> bool {
    ingredients.iter().all(|ingredient| {
        requirements
            .iter()
            .all(|req| !ingredient.tags.contains(&req.violating_tag()))
    })
}

/// Requirement set for a shared meal: the union of every consumer's
/// requirements, since any one person's restriction must hold for the whole
/// meal (strictest wins).
///
/// Computed fresh on every call. Callers must not cache the result across
/// membership or requirement changes.
pub fn intersect_requirements<'a>(people: impl IntoIterator<Item = &'a Person>) -> RequirementSet {
    let mut set = RequirementSet::new();
    for person in people {
        set.extend(person.requirements.iter().copied());
    }
    set
}

/// Soft-preference score for a candidate: +1 per liked ingredient, -1 per
/// disliked ingredient. Degrades ranking, never disqualifies.
pub fn preference_score(ingredients: &[Ingredient], prefs: &DietPreferences) -> i32 {
    let mut score = 0;
    for ingredient in ingredients {
        let name = ingredient.name.to_lowercase();
        if prefs.liked.contains(&name) {
            score += 1;
        }
        if prefs.disliked.contains(&name) {
            score -= 1;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use uuid::Uuid;

    use crate::models::{
        IngredientTag, MacroReading, Macros, PersonRole,
    };

    use super::*;

    fn person_requiring(codes: &[RequirementCode]) -> Person {
        Person {
            id: Uuid::new_v4(),
            name: "test".to_owned(),
            role: PersonRole::Adult,
            age: 30,
            base_calories: 2000.0,
            macros: Macros {
                protein: MacroReading {
                    current: 0.0,
                    target: 100.0,
                },
                carbs: MacroReading {
                    current: 0.0,
                    target: 250.0,
                },
                fat: MacroReading {
                    current: 0.0,
                    target: 70.0,
                },
            },
            active_states: vec![],
            preferences: DietPreferences::default(),
            requirements: codes.iter().copied().collect(),
        }
    }

    #[test]
    fn empty_requirements_accept_everything() {
        let bread = Ingredient::with_tags("bread", [IngredientTag::Gluten]);
        assert!(is_compliant(&[bread], &RequirementSet::new()));
    }

    #[test]
    fn violating_ingredient_disqualifies() {
        let bread = Ingredient::with_tags("bread", [IngredientTag::Gluten]);
        let rice = Ingredient::new("rice");
        let reqs: RequirementSet = [RequirementCode::ExcludeGluten].into_iter().collect();
        assert!(!is_compliant(&[rice.clone(), bread], &reqs));
        assert!(is_compliant(&[rice], &reqs));
    }

    #[test]
    fn compliance_is_monotonic_in_requirements() {
        let candidate = vec![
            Ingredient::with_tags("peanut sauce", [IngredientTag::Nuts]),
            Ingredient::new("chicken"),
        ];
        let mut reqs = RequirementSet::new();
        assert!(is_compliant(&candidate, &reqs));
        reqs.insert(RequirementCode::ExcludeGluten);
        assert!(is_compliant(&candidate, &reqs));
        reqs.insert(RequirementCode::ExcludeNuts);
        assert!(!is_compliant(&candidate, &reqs));
        // Adding further requirements can never restore compliance.
        reqs.insert(RequirementCode::LowSodium);
        assert!(!is_compliant(&candidate, &reqs));
    }

    #[test]
    fn intersect_unions_across_people() {
        let a = person_requiring(&[RequirementCode::ExcludeGluten]);
        let b = person_requiring(&[RequirementCode::ExcludeNuts, RequirementCode::LowSodium]);
        let c = person_requiring(&[]);
        let set = intersect_requirements([&a, &b, &c]);
        let expected: RequirementSet = [
            RequirementCode::ExcludeGluten,
            RequirementCode::ExcludeNuts,
            RequirementCode::LowSodium,
        ]
        .into_iter()
        .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn intersect_of_nobody_is_empty() {
        assert!(intersect_requirements([]).is_empty());
    }

    #[test]
    fn preference_score_never_disqualifies() {
        let prefs = DietPreferences {
            patterns: vec![],
            liked: ["salmon".to_owned()].into_iter().collect(),
            disliked: ["cilantro".to_owned()].into_iter().collect(),
        };
        let disliked_candidate = vec![Ingredient::new("cilantro")];
        assert_eq!(preference_score(&disliked_candidate, &prefs), -1);
        // Still compliant: preferences are soft.
        assert!(is_compliant(&disliked_candidate, &RequirementSet::new()));

        let mixed = vec![Ingredient::new("salmon"), Ingredient::new("cilantro")];
        assert_eq!(preference_score(&mixed, &prefs), 0);
    }

    #[test]
    fn preference_score_is_case_insensitive_on_names() {
        let prefs = DietPreferences {
            patterns: vec![],
            liked: ["tofu".to_owned()].into_iter().collect(),
            disliked: BTreeSet::new(),
        };
        let candidate = vec![Ingredient::new("Tofu")];
        assert_eq!(preference_score(&candidate, &prefs), 1);
    }
}
