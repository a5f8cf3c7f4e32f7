//! Core domain types shared across the engine.
//!
//! Enums are closed: every restriction code, dietary pattern, and temporary
//! state the system understands is a variant here, so matching is exhaustive
//! and there is no ad hoc string comparison anywhere in the engine.

use std::collections::BTreeSet;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// A currency amount in integer cents.
///
/// All budget arithmetic is done in cents so optimizer totals are exact and
/// repeated runs over the same input produce identical results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Hash,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from whole cents.
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Construct from a dollar amount, rounding to the nearest cent.
    pub fn from_dollars(dollars: f64) -> Self {
        Money((dollars * 100.0).round() as i64)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money(iter.map(|m| m.0).sum())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Role of a person within the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    Adult,
    Teen,
    Child,
    Toddler,
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Adult => "adult",
            Self::Teen => "teen",
            Self::Child => "child",
            Self::Toddler => "toddler",
        };
        f.write_str(s)
    }
}

impl FromStr for PersonRole {
    type Err = PersonRoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adult" => Ok(Self::Adult),
            "teen" => Ok(Self::Teen),
            "child" => Ok(Self::Child),
            "toddler" => Ok(Self::Toddler),
            other => Err(PersonRoleParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PersonRole`] string.
#[derive(Debug, Clone)]
pub struct PersonRoleParseError(pub String);

impl fmt::Display for PersonRoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid person role: {:?}", self.0)
    }
}

impl std::error::Error for PersonRoleParseError {}

// ---------------------------------------------------------------------------

/// A hard dietary restriction. Any candidate violating an active requirement
/// is disqualified absolutely; there is no override path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCode {
    ExcludeGluten,
    ExcludeLactose,
    ExcludeNuts,
    ExcludeSoy,
    ExcludeEggs,
    LowSodium,
    LowFodmap,
}

impl RequirementCode {
    /// The ingredient tag that violates this requirement.
    pub fn violating_tag(self) -> IngredientTag {
        match self {
            Self::ExcludeGluten => IngredientTag::Gluten,
            Self::ExcludeLactose => IngredientTag::Lactose,
            Self::ExcludeNuts => IngredientTag::Nuts,
            Self::ExcludeSoy => IngredientTag::Soy,
            Self::ExcludeEggs => IngredientTag::Eggs,
            Self::LowSodium => IngredientTag::HighSodium,
            Self::LowFodmap => IngredientTag::HighFodmap,
        }
    }
}

impl fmt::Display for RequirementCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ExcludeGluten => "exclude_gluten",
            Self::ExcludeLactose => "exclude_lactose",
            Self::ExcludeNuts => "exclude_nuts",
            Self::ExcludeSoy => "exclude_soy",
            Self::ExcludeEggs => "exclude_eggs",
            Self::LowSodium => "low_sodium",
            Self::LowFodmap => "low_fodmap",
        };
        f.write_str(s)
    }
}

impl FromStr for RequirementCode {
    type Err = RequirementCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude_gluten" => Ok(Self::ExcludeGluten),
            "exclude_lactose" => Ok(Self::ExcludeLactose),
            "exclude_nuts" => Ok(Self::ExcludeNuts),
            "exclude_soy" => Ok(Self::ExcludeSoy),
            "exclude_eggs" => Ok(Self::ExcludeEggs),
            "low_sodium" => Ok(Self::LowSodium),
            "low_fodmap" => Ok(Self::LowFodmap),
            other => Err(RequirementCodeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`RequirementCode`] string.
#[derive(Debug, Clone)]
pub struct RequirementCodeParseError(pub String);

impl fmt::Display for RequirementCodeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid requirement code: {:?}", self.0)
    }
}

impl std::error::Error for RequirementCodeParseError {}

// ---------------------------------------------------------------------------

/// A property of an ingredient that requirement codes match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IngredientTag {
    Gluten,
    Lactose,
    Nuts,
    Soy,
    Eggs,
    HighSodium,
    HighFodmap,
}

impl fmt::Display for IngredientTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Gluten => "gluten",
            Self::Lactose => "lactose",
            Self::Nuts => "nuts",
            Self::Soy => "soy",
            Self::Eggs => "eggs",
            Self::HighSodium => "high_sodium",
            Self::HighFodmap => "high_fodmap",
        };
        f.write_str(s)
    }
}

impl FromStr for IngredientTag {
    type Err = IngredientTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gluten" => Ok(Self::Gluten),
            "lactose" => Ok(Self::Lactose),
            "nuts" => Ok(Self::Nuts),
            "soy" => Ok(Self::Soy),
            "eggs" => Ok(Self::Eggs),
            "high_sodium" => Ok(Self::HighSodium),
            "high_fodmap" => Ok(Self::HighFodmap),
            other => Err(IngredientTagParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`IngredientTag`] string.
#[derive(Debug, Clone)]
pub struct IngredientTagParseError(pub String);

impl fmt::Display for IngredientTagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ingredient tag: {:?}", self.0)
    }
}

impl std::error::Error for IngredientTagParseError {}

// ---------------------------------------------------------------------------

/// A soft dietary pattern. Affects candidate scoring, never disqualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietPattern {
    Vegan,
    Vegetarian,
    Pescatarian,
    Mediterranean,
    Paleo,
    Keto,
}

impl fmt::Display for DietPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vegan => "vegan",
            Self::Vegetarian => "vegetarian",
            Self::Pescatarian => "pescatarian",
            Self::Mediterranean => "mediterranean",
            Self::Paleo => "paleo",
            Self::Keto => "keto",
        };
        f.write_str(s)
    }
}

impl FromStr for DietPattern {
    type Err = DietPatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vegan" => Ok(Self::Vegan),
            "vegetarian" => Ok(Self::Vegetarian),
            "pescatarian" => Ok(Self::Pescatarian),
            "mediterranean" => Ok(Self::Mediterranean),
            "paleo" => Ok(Self::Paleo),
            "keto" => Ok(Self::Keto),
            other => Err(DietPatternParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`DietPattern`] string.
#[derive(Debug, Clone)]
pub struct DietPatternParseError(pub String);

impl fmt::Display for DietPatternParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid diet pattern: {:?}", self.0)
    }
}

impl std::error::Error for DietPatternParseError {}

// ---------------------------------------------------------------------------

/// A temporary physiological state that modifies nutrition targets.
///
/// The modifier values, priority ranking, and incompatibility set for each
/// variant live in the `targets` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    MarathonPrep,
    PregnancyTrimester2,
    SurgeryRecovery,
    Cutting,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MarathonPrep => "marathon_prep",
            Self::PregnancyTrimester2 => "pregnancy_trimester2",
            Self::SurgeryRecovery => "surgery_recovery",
            Self::Cutting => "cutting",
        };
        f.write_str(s)
    }
}

impl FromStr for StateKind {
    type Err = StateKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marathon_prep" => Ok(Self::MarathonPrep),
            "pregnancy_trimester2" => Ok(Self::PregnancyTrimester2),
            "surgery_recovery" => Ok(Self::SurgeryRecovery),
            "cutting" => Ok(Self::Cutting),
            other => Err(StateKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`StateKind`] string.
#[derive(Debug, Clone)]
pub struct StateKindParseError(pub String);

impl fmt::Display for StateKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid temporary state: {:?}", self.0)
    }
}

impl std::error::Error for StateKindParseError {}

// ---------------------------------------------------------------------------

/// A tracked nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
    ];
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Calories => "calories",
            Self::Protein => "protein",
            Self::Carbs => "carbs",
            Self::Fat => "fat",
        };
        f.write_str(s)
    }
}

impl FromStr for Nutrient {
    type Err = NutrientParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calories" => Ok(Self::Calories),
            "protein" => Ok(Self::Protein),
            "carbs" => Ok(Self::Carbs),
            "fat" => Ok(Self::Fat),
            other => Err(NutrientParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Nutrient`] string.
#[derive(Debug, Clone)]
pub struct NutrientParseError(pub String);

impl fmt::Display for NutrientParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid nutrient: {:?}", self.0)
    }
}

impl std::error::Error for NutrientParseError {}

// ---------------------------------------------------------------------------

/// Severity of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(SeverityParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Severity`] string.
#[derive(Debug, Clone)]
pub struct SeverityParseError(pub String);

impl fmt::Display for SeverityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid severity: {:?}", self.0)
    }
}

impl std::error::Error for SeverityParseError {}

// ---------------------------------------------------------------------------

/// Category of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Nutrition,
    Budget,
    Adherence,
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Nutrition => "nutrition",
            Self::Budget => "budget",
            Self::Adherence => "adherence",
        };
        f.write_str(s)
    }
}

impl FromStr for InsightCategory {
    type Err = InsightCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nutrition" => Ok(Self::Nutrition),
            "budget" => Ok(Self::Budget),
            "adherence" => Ok(Self::Adherence),
            other => Err(InsightCategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`InsightCategory`] string.
#[derive(Debug, Clone)]
pub struct InsightCategoryParseError(pub String);

impl fmt::Display for InsightCategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid insight category: {:?}", self.0)
    }
}

impl std::error::Error for InsightCategoryParseError {}

// ---------------------------------------------------------------------------

/// Kind of an autopilot change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    RecipeSwap,
    PortionAdjustment,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RecipeSwap => "recipe_swap",
            Self::PortionAdjustment => "portion_adjustment",
        };
        f.write_str(s)
    }
}

impl FromStr for ChangeKind {
    type Err = ChangeKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recipe_swap" => Ok(Self::RecipeSwap),
            "portion_adjustment" => Ok(Self::PortionAdjustment),
            other => Err(ChangeKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ChangeKind`] string.
#[derive(Debug, Clone)]
pub struct ChangeKindParseError(pub String);

impl fmt::Display for ChangeKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid change kind: {:?}", self.0)
    }
}

impl std::error::Error for ChangeKindParseError {}

// ---------------------------------------------------------------------------

/// Lifecycle status of an autopilot change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Proposed,
    PendingApproval,
    Applied,
    Dismissed,
    Reverted,
}

impl ChangeStatus {
    /// Whether a change in this status still occupies its subject slot
    /// (i.e. blocks or is superseded by new proposals for the same subject).
    pub fn is_active(self) -> bool {
        matches!(self, Self::Proposed | Self::PendingApproval)
    }

    /// Whether this status is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dismissed | Self::Reverted)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Proposed => "proposed",
            Self::PendingApproval => "pending_approval",
            Self::Applied => "applied",
            Self::Dismissed => "dismissed",
            Self::Reverted => "reverted",
        };
        f.write_str(s)
    }
}

impl FromStr for ChangeStatus {
    type Err = ChangeStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposed" => Ok(Self::Proposed),
            "pending_approval" => Ok(Self::PendingApproval),
            "applied" => Ok(Self::Applied),
            "dismissed" => Ok(Self::Dismissed),
            "reverted" => Ok(Self::Reverted),
            other => Err(ChangeStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ChangeStatus`] string.
#[derive(Debug, Clone)]
pub struct ChangeStatusParseError(pub String);

impl fmt::Display for ChangeStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid change status: {:?}", self.0)
    }
}

impl std::error::Error for ChangeStatusParseError {}

// ---------------------------------------------------------------------------
// Household records
// ---------------------------------------------------------------------------

/// A household -- the budget-sharing unit.
///
/// The budget is advisory: `current_spend` and `projected_spend` may exceed
/// `weekly_budget` without anything being blocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub weekly_budget: Money,
    pub current_spend: Money,
    pub projected_spend: Money,
    pub savings_to_date: Money,
}

/// Current intake and target for a single macro, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroReading {
    pub current: f64,
    pub target: f64,
}

/// Per-macro readings for a person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: MacroReading,
    pub carbs: MacroReading,
    pub fat: MacroReading,
}

/// Soft dietary inclinations. Violating a preference degrades a candidate's
/// score but never disqualifies it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietPreferences {
    pub patterns: Vec<DietPattern>,
    pub liked: BTreeSet<String>,
    pub disliked: BTreeSet<String>,
}

/// A household member.
///
/// `active_states` preserves activation order; the target resolver walks
/// them most-constraining first by state priority rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub role: PersonRole,
    pub age: u8,
    pub base_calories: f64,
    pub macros: Macros,
    pub active_states: Vec<StateKind>,
    pub preferences: DietPreferences,
    pub requirements: BTreeSet<RequirementCode>,
}

/// A food item as the requirement validator sees it: a name plus the set of
/// properties restriction codes can match against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<IngredientTag>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags(name: impl Into<String>, tags: impl IntoIterator<Item = IngredientTag>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into_iter().collect(),
        }
    }
}

/// Nutrition goals after applying all active temporary-state modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveTargets {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl EffectiveTargets {
    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein_g,
            Nutrient::Carbs => self.carbs_g,
            Nutrient::Fat => self.fat_g,
        }
    }
}

// ---------------------------------------------------------------------------
// Autopilot and insight records
// ---------------------------------------------------------------------------

/// What a change applies to: the whole household or a single person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ChangeScope {
    Household,
    Person(Uuid),
}

impl fmt::Display for ChangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Household => f.write_str("household"),
            Self::Person(id) => write!(f, "person {id}"),
        }
    }
}

/// A system-proposed plan adjustment tracked through its approval lifecycle.
///
/// Records are append-only; only `status` and the lifecycle timestamps are
/// mutated, and only through the change state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotChange {
    pub id: Uuid,
    pub kind: ChangeKind,
    pub status: ChangeStatus,
    pub scope: ChangeScope,
    /// Dedup key within (scope, kind): the nutrient or item the change targets.
    pub subject: String,
    pub description: String,
    pub rationale: String,
    pub proposed_at: DateTime<Utc>,
    pub applied_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub revert_reason: Option<String>,
}

/// A generated explanation of why the system acted or flagged something.
///
/// Insights are never user-edited; recomputation supersedes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub severity: Severity,
    pub category: InsightCategory,
    pub person: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub suggested_action: Option<String>,
    pub emitted_at: DateTime<Utc>,
}

/// One day of recorded intake for one person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeDay {
    pub person_id: Uuid,
    pub date: NaiveDate,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl IntakeDay {
    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein_g,
            Nutrient::Carbs => self.carbs_g,
            Nutrient::Fat => self.fat_g,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(17643).to_string(), "$176.43");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-300).to_string(), "-$3.00");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn money_from_dollars_rounds_to_cents() {
        assert_eq!(Money::from_dollars(176.43), Money::from_cents(17643));
        assert_eq!(Money::from_dollars(18.505), Money::from_cents(1851));
        assert_eq!(Money::from_dollars(0.0), Money::ZERO);
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_cents(1850);
        let b = Money::from_cents(599);
        assert_eq!(a + b, Money::from_cents(2449));
        assert_eq!(a - b, Money::from_cents(1251));
        assert_eq!(-b, Money::from_cents(-599));
        let total: Money = [a, b, Money::from_cents(1)].into_iter().sum();
        assert_eq!(total, Money::from_cents(2450));
    }

    #[test]
    fn person_role_display_roundtrip() {
        let variants = [
            PersonRole::Adult,
            PersonRole::Teen,
            PersonRole::Child,
            PersonRole::Toddler,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: PersonRole = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn person_role_invalid() {
        assert!("grandparent".parse::<PersonRole>().is_err());
    }

    #[test]
    fn requirement_code_display_roundtrip() {
        let variants = [
            RequirementCode::ExcludeGluten,
            RequirementCode::ExcludeLactose,
            RequirementCode::ExcludeNuts,
            RequirementCode::ExcludeSoy,
            RequirementCode::ExcludeEggs,
            RequirementCode::LowSodium,
            RequirementCode::LowFodmap,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: RequirementCode = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn requirement_code_invalid() {
        assert!("no_sugar".parse::<RequirementCode>().is_err());
    }

    #[test]
    fn ingredient_tag_display_roundtrip() {
        let variants = [
            IngredientTag::Gluten,
            IngredientTag::Lactose,
            IngredientTag::Nuts,
            IngredientTag::Soy,
            IngredientTag::Eggs,
            IngredientTag::HighSodium,
            IngredientTag::HighFodmap,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: IngredientTag = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn diet_pattern_display_roundtrip() {
        let variants = [
            DietPattern::Vegan,
            DietPattern::Vegetarian,
            DietPattern::Pescatarian,
            DietPattern::Mediterranean,
            DietPattern::Paleo,
            DietPattern::Keto,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: DietPattern = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn state_kind_display_roundtrip() {
        let variants = [
            StateKind::MarathonPrep,
            StateKind::PregnancyTrimester2,
            StateKind::SurgeryRecovery,
            StateKind::Cutting,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: StateKind = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn state_kind_invalid() {
        assert!("bulking".parse::<StateKind>().is_err());
    }

    #[test]
    fn nutrient_display_roundtrip() {
        for v in &Nutrient::ALL {
            let s = v.to_string();
            let parsed: Nutrient = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn severity_display_roundtrip() {
        let variants = [
            Severity::Info,
            Severity::Success,
            Severity::Warning,
            Severity::Error,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: Severity = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn insight_category_display_roundtrip() {
        let variants = [
            InsightCategory::Nutrition,
            InsightCategory::Budget,
            InsightCategory::Adherence,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: InsightCategory = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn change_kind_display_roundtrip() {
        let variants = [ChangeKind::RecipeSwap, ChangeKind::PortionAdjustment];
        for v in &variants {
            let s = v.to_string();
            let parsed: ChangeKind = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn change_status_display_roundtrip() {
        let variants = [
            ChangeStatus::Proposed,
            ChangeStatus::PendingApproval,
            ChangeStatus::Applied,
            ChangeStatus::Dismissed,
            ChangeStatus::Reverted,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: ChangeStatus = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn change_status_activity() {
        assert!(ChangeStatus::Proposed.is_active());
        assert!(ChangeStatus::PendingApproval.is_active());
        assert!(!ChangeStatus::Applied.is_active());
        assert!(ChangeStatus::Dismissed.is_terminal());
        assert!(ChangeStatus::Reverted.is_terminal());
        assert!(!ChangeStatus::Applied.is_terminal());
    }

    #[test]
    fn requirement_violating_tags() {
        assert_eq!(
            RequirementCode::ExcludeGluten.violating_tag(),
            IngredientTag::Gluten
        );
        assert_eq!(
            RequirementCode::LowSodium.violating_tag(),
            IngredientTag::HighSodium
        );
    }
}
