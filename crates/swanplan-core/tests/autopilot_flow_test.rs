//! Change lifecycle integration tests.
//!
//! Runs proposal passes into a change log and walks changes through
//! approval, dismissal, reversion, and supersede-on-resubmit.

use swanplan_core::autopilot::engine::{propose_changes, AutopilotConfig};
use swanplan_core::autopilot::{ChangeLog, Disposition, TransitionError};
use swanplan_core::models::{ChangeKind, ChangeStatus};

fn run_pass_into(log: &mut ChangeLog) -> Vec<uuid::Uuid> {
    let snapshot = swanplan_test_utils::sample_household();
    let proposals = propose_changes(&snapshot, &AutopilotConfig::default()).unwrap();
    proposals
        .into_iter()
        .map(|p| log.record(p.change, p.disposition).unwrap())
        .collect()
}

#[test]
fn a_pass_lands_every_proposal_in_the_log() {
    let mut log = ChangeLog::new();
    let ids = run_pass_into(&mut log);
    assert!(!ids.is_empty());
    assert_eq!(log.all().len(), ids.len());
    // Small corrections go straight to applied; the rest wait for a human.
    assert!(log.applied().count() > 0);
    assert!(log.pending().count() > 0);
    assert_eq!(log.applied().count() + log.pending().count(), ids.len());
}

#[test]
fn approving_a_swap_applies_it_and_blocks_a_second_approval() {
    let mut log = ChangeLog::new();
    run_pass_into(&mut log);

    let swap_id = log
        .pending()
        .find(|c| c.kind == ChangeKind::RecipeSwap)
        .map(|c| c.id)
        .expect("the pass proposed a swap");

    log.approve(swap_id).unwrap();
    let swap = log.get(swap_id).unwrap();
    assert_eq!(swap.status, ChangeStatus::Applied);
    assert!(swap.applied_at.is_some());

    let err = log.approve(swap_id).unwrap_err();
    assert_eq!(
        err,
        TransitionError::StaleStatus {
            id: swap_id,
            expected: ChangeStatus::PendingApproval,
            found: ChangeStatus::Applied,
        }
    );
}

#[test]
fn dismissed_changes_stay_dismissed() {
    let mut log = ChangeLog::new();
    run_pass_into(&mut log);

    let id = log.pending().next().map(|c| c.id).unwrap();
    log.dismiss(id).unwrap();
    assert_eq!(log.get(id).unwrap().status, ChangeStatus::Dismissed);

    // Terminal: neither approval nor a second dismissal is possible.
    assert!(log.approve(id).is_err());
    assert!(log.dismiss(id).is_err());
}

#[test]
fn reverting_an_applied_change_records_the_reason() {
    let mut log = ChangeLog::new();
    run_pass_into(&mut log);

    let id = log.pending().next().map(|c| c.id).unwrap();
    log.approve(id).unwrap();
    log.revert(id, "household pushed back").unwrap();

    let change = log.get(id).unwrap();
    assert_eq!(change.status, ChangeStatus::Reverted);
    assert_eq!(change.revert_reason.as_deref(), Some("household pushed back"));
}

#[test]
fn a_second_pass_supersedes_still_pending_changes() {
    let mut log = ChangeLog::new();
    let first = run_pass_into(&mut log);
    let pending_before: Vec<_> = log.pending().map(|c| c.id).collect();
    let second = run_pass_into(&mut log);
    assert_eq!(first.len(), second.len());

    // Every pending change from the first pass was superseded by its
    // successor; auto-applied ones are settled and stay applied.
    for id in &pending_before {
        let change = log.get(*id).unwrap();
        assert_eq!(change.status, ChangeStatus::Dismissed);
        assert!(change.rationale.contains("superseded by change"));
    }
    assert_eq!(log.pending().count(), pending_before.len());
}

#[test]
fn applied_changes_survive_a_new_pass() {
    let mut log = ChangeLog::new();
    run_pass_into(&mut log);
    let kept = log.pending().next().map(|c| c.id).unwrap();
    log.approve(kept).unwrap();

    run_pass_into(&mut log);
    assert_eq!(log.get(kept).unwrap().status, ChangeStatus::Applied);
}

#[test]
fn log_round_trips_through_json() {
    let mut log = ChangeLog::new();
    run_pass_into(&mut log);
    let id = log.pending().next().map(|c| c.id).unwrap();
    log.approve(id).unwrap();

    let json = serde_json::to_string(&log).unwrap();
    let restored: ChangeLog = serde_json::from_str(&json).unwrap();
    assert_eq!(log, restored);

    // A restored log keeps enforcing the graph.
    let mut restored = restored;
    assert!(restored.approve(id).is_err());
}

#[test]
fn auto_applied_changes_need_no_human() {
    let mut log = ChangeLog::new();
    let snapshot = swanplan_test_utils::sample_household();
    let proposals = propose_changes(&snapshot, &AutopilotConfig::default()).unwrap();

    let p = proposals
        .into_iter()
        .find(|p| p.disposition == Disposition::AutoApply)
        .expect("the fixture has an in-bounds correction");
    let id = log.record(p.change, p.disposition).unwrap();
    let change = log.get(id).unwrap();
    assert_eq!(change.status, ChangeStatus::Applied);
    assert!(change.applied_at.is_some());
}
