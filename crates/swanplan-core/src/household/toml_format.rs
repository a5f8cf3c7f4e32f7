//! TOML format types for household definition files.
//!
//! These types map directly to the `household.toml` on-disk format and are
//! deserialized via `serde` + the `toml` crate. Enum-valued fields are plain
//! strings here; the parser validates them against the model enums.

use serde::{Deserialize, Serialize};

/// Top-level structure of a `household.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HouseholdToml {
    /// Household metadata.
    pub household: HouseholdMeta,
    /// Household members.
    #[serde(default)]
    pub people: Vec<PersonToml>,
    /// Weekly shopping needs.
    #[serde(default)]
    pub needs: Vec<NeedToml>,
    /// Known ingredient substitutions.
    #[serde(default)]
    pub substitutions: Vec<SubstitutionToml>,
    /// Logged daily intake, most recent window.
    #[serde(default)]
    pub intake: Vec<IntakeToml>,
}

/// Household-level metadata in `[household]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HouseholdMeta {
    /// Human-readable household name.
    pub name: String,
    /// Weekly grocery budget in dollars.
    pub weekly_budget: f64,
    /// Spend so far this week, in dollars.
    #[serde(default)]
    pub current_spend: f64,
    /// Projected spend for the full week, in dollars.
    #[serde(default)]
    pub projected_spend: f64,
    /// Cumulative savings attributed to applied changes, in dollars.
    #[serde(default)]
    pub savings_to_date: f64,
    /// Snapshot version, bumped on edit.
    #[serde(default = "default_version")]
    pub version: u64,
}

/// A single `[[people]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonToml {
    /// Unique name within the household.
    pub name: String,
    /// Role: "adult", "teen", "child", or "toddler".
    pub role: String,
    pub age: u8,
    /// Baseline daily calorie target before state adjustments.
    pub base_calories: f64,
    /// Baseline daily protein target in grams.
    pub protein_target: f64,
    /// Baseline daily carbohydrate target in grams.
    pub carbs_target: f64,
    /// Baseline daily fat target in grams.
    pub fat_target: f64,
    /// Active temporary states, in activation order.
    #[serde(default)]
    pub states: Vec<String>,
    /// Hard requirement codes (e.g. "exclude_gluten", "low_sodium").
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Soft diet patterns (e.g. "mediterranean").
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub liked: Vec<String>,
    #[serde(default)]
    pub disliked: Vec<String>,
}

/// A single `[[needs]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeedToml {
    /// Shopping item name, unique across the file.
    pub item: String,
    /// Free-form quantity (e.g. "2.5 kg").
    pub quantity: String,
    /// Candidate sources for this item.
    #[serde(default)]
    pub options: Vec<SourceOptionToml>,
}

/// One `[[needs.options]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceOptionToml {
    /// Source name (e.g. "Costco").
    pub source: String,
    /// Cost in dollars at this source.
    pub cost: f64,
    /// Ingredient the source actually stocks; defaults to the item name.
    #[serde(default)]
    pub ingredient: Option<String>,
    /// Ingredient property tags (e.g. "gluten", "nuts").
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A single `[[substitutions]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubstitutionToml {
    /// Ingredient to replace.
    pub from: String,
    /// Replacement ingredient.
    pub to: String,
    /// Tags on the replacement ingredient.
    #[serde(default)]
    pub to_tags: Vec<String>,
    /// Weekly saving in dollars if applied.
    pub weekly_saving: f64,
    #[serde(default)]
    pub calorie_delta_pct: f64,
    #[serde(default)]
    pub protein_delta_pct: f64,
    #[serde(default)]
    pub carbs_delta_pct: f64,
    #[serde(default)]
    pub fat_delta_pct: f64,
    /// Person the swap applies to; household-wide when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
}

/// A single `[[intake]]` entry: one person's logged day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeToml {
    /// Person name, must match a `[[people]]` entry.
    pub person: String,
    /// ISO date, e.g. "2026-08-10".
    pub date: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

fn default_version() -> u64 {
    1
}
