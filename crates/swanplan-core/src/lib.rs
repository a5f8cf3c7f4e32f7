//! Core engine for household nutrition planning.
//!
//! Everything in this crate is synchronous and storage-agnostic: callers
//! hand in a [`snapshot::HouseholdSnapshot`] and get back resolved targets,
//! an optimized shopping plan, proposed changes, and insights. Persistence
//! of change logs and insight batches belongs to the caller.

pub mod autopilot;
pub mod budget;
pub mod household;
pub mod insight;
pub mod models;
pub mod requirements;
pub mod snapshot;
pub mod targets;
