//! `swanplan autopilot` commands: propose, list, approve, dismiss, revert.

use std::path::Path;

use anyhow::{Context, Result};
use uuid::Uuid;

use swanplan_core::autopilot::engine::propose_changes;
use swanplan_core::autopilot::Disposition;
use swanplan_core::models::ChangeStatus;

use crate::config::SwanConfig;
use crate::household_cmds::load_snapshot;
use crate::store::Store;

/// Run a proposal pass and record every proposal in the change log.
pub fn run_propose(file: &Path, store: &Store, config: &SwanConfig) -> Result<()> {
    let snapshot = load_snapshot(file)?;
    let proposals = propose_changes(&snapshot, &config.autopilot)?;

    let mut log = store.load_changes()?;
    let mut applied = 0usize;
    let mut pending = 0usize;
    for proposal in proposals {
        let disposition = proposal.disposition;
        let description = proposal.change.description.clone();
        log.record(proposal.change, disposition)?;
        match disposition {
            Disposition::AutoApply => {
                applied += 1;
                println!("  applied  {description}");
            }
            Disposition::RequireApproval => {
                pending += 1;
                println!("  pending  {description}");
            }
        }
    }
    store.save_changes(&log)?;
    tracing::info!(applied, pending, "proposal pass recorded");

    if applied == 0 && pending == 0 {
        println!("Nothing to propose; the household is on plan.");
    } else {
        println!();
        println!("{applied} applied automatically, {pending} awaiting approval.");
    }
    Ok(())
}

/// List changes: pending by default, everything with `all`.
pub fn run_list(store: &Store, all: bool) -> Result<()> {
    let log = store.load_changes()?;
    let changes: Vec<_> = if all {
        log.all().iter().collect()
    } else {
        log.pending().collect()
    };

    if changes.is_empty() {
        println!(
            "No {} changes.",
            if all { "recorded" } else { "pending" }
        );
        return Ok(());
    }

    for change in changes {
        let status_icon = match change.status {
            ChangeStatus::Proposed => "?",
            ChangeStatus::PendingApproval => ">",
            ChangeStatus::Applied => "+",
            ChangeStatus::Dismissed => "-",
            ChangeStatus::Reverted => "<",
        };
        println!(
            "  [{}] {} {} ({}, {})",
            status_icon, change.id, change.description, change.kind, change.status
        );
        println!("      {}", change.rationale);
    }
    Ok(())
}

/// Approve a pending change by id.
pub fn run_approve(store: &Store, change_id: &str) -> Result<()> {
    let id = parse_change_id(change_id)?;
    let mut log = store.load_changes()?;
    log.approve(id)?;
    store.save_changes(&log)?;
    println!("Change {change_id} approved and applied.");
    Ok(())
}

/// Dismiss a pending change by id.
pub fn run_dismiss(store: &Store, change_id: &str) -> Result<()> {
    let id = parse_change_id(change_id)?;
    let mut log = store.load_changes()?;
    log.dismiss(id)?;
    store.save_changes(&log)?;
    println!("Change {change_id} dismissed.");
    Ok(())
}

/// Revert an applied change by id, recording the reason.
pub fn run_revert(store: &Store, change_id: &str, reason: &str) -> Result<()> {
    let id = parse_change_id(change_id)?;
    let mut log = store.load_changes()?;
    log.revert(id, reason)?;
    store.save_changes(&log)?;
    println!("Change {change_id} reverted: {reason}");
    Ok(())
}

fn parse_change_id(change_id: &str) -> Result<Uuid> {
    Uuid::parse_str(change_id).with_context(|| format!("invalid change ID: {change_id}"))
}
