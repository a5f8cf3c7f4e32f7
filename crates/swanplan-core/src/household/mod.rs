//! Household management: TOML parsing and validation.

pub mod parser;
pub mod toml_format;

pub use parser::{HouseholdParseError, parse_household_toml};
pub use toml_format::{HouseholdMeta, HouseholdToml, IntakeToml, NeedToml, PersonToml};
