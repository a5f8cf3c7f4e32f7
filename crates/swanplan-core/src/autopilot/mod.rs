//! Autopilot change lifecycle.
//!
//! Validates and executes status transitions for autopilot changes,
//! enforcing the allowed transition graph, compare-and-set on the current
//! status, timestamp management, and supersede-on-resubmit.

pub mod engine;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AutopilotChange, ChangeKind, ChangeScope, ChangeStatus};

/// The change state machine.
///
/// Enforces the valid transition graph:
///
/// ```text
/// proposed         -> applied           (auto-apply)
/// proposed         -> pending_approval
/// proposed         -> dismissed         (superseded)
/// pending_approval -> applied           (human approval)
/// pending_approval -> dismissed
/// applied          -> reverted
/// ```
pub struct ChangeStateMachine;

impl ChangeStateMachine {
    /// Check whether a transition from `from` to `to` is a valid edge
    /// in the state graph.
    pub fn is_valid_transition(from: ChangeStatus, to: ChangeStatus) -> bool {
        matches!(
            (from, to),
            (ChangeStatus::Proposed, ChangeStatus::Applied)
                | (ChangeStatus::Proposed, ChangeStatus::PendingApproval)
                | (ChangeStatus::Proposed, ChangeStatus::Dismissed)
                | (ChangeStatus::PendingApproval, ChangeStatus::Applied)
                | (ChangeStatus::PendingApproval, ChangeStatus::Dismissed)
                | (ChangeStatus::Applied, ChangeStatus::Reverted)
        )
    }
}

/// Errors from change log operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("change {id} not found")]
    NotFound { id: Uuid },

    #[error("invalid change transition: {from} -> {to} for change {id}")]
    InvalidTransition {
        id: Uuid,
        from: ChangeStatus,
        to: ChangeStatus,
    },

    /// Compare-and-set failure: the change moved since the caller last
    /// looked at it.
    #[error("stale status for change {id}: status is {found}, expected {expected}")]
    StaleStatus {
        id: Uuid,
        expected: ChangeStatus,
        found: ChangeStatus,
    },
}

/// How a freshly proposed change enters the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Within configured bounds; applied without a human in the loop.
    AutoApply,
    /// Outside bounds or inherently disruptive; waits for approval.
    RequireApproval,
}

/// Ordered log of every change the autopilot has ever produced.
///
/// Transitions use compare-and-set on the current status so a caller
/// acting on a stale listing gets a [`TransitionError::StaleStatus`]
/// instead of silently clobbering a newer state.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChangeLog {
    changes: Vec<AutopilotChange>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[AutopilotChange] {
        &self.changes
    }

    pub fn get(&self, id: Uuid) -> Option<&AutopilotChange> {
        self.changes.iter().find(|c| c.id == id)
    }

    /// Changes still in play: proposed or awaiting approval.
    pub fn active(&self) -> impl Iterator<Item = &AutopilotChange> {
        self.changes.iter().filter(|c| c.status.is_active())
    }

    pub fn pending(&self) -> impl Iterator<Item = &AutopilotChange> {
        self.changes
            .iter()
            .filter(|c| c.status == ChangeStatus::PendingApproval)
    }

    pub fn applied(&self) -> impl Iterator<Item = &AutopilotChange> {
        self.changes
            .iter()
            .filter(|c| c.status == ChangeStatus::Applied)
    }

    /// Admit a proposed change, superseding any active change that targets
    /// the same (scope, kind, subject), then route it per `disposition`.
    ///
    /// Superseded changes are dismissed with a rationale note naming the
    /// successor, so the log keeps the full history.
    pub fn record(
        &mut self,
        change: AutopilotChange,
        disposition: Disposition,
    ) -> Result<Uuid, TransitionError> {
        debug_assert_eq!(change.status, ChangeStatus::Proposed);
        let id = change.id;

        let superseded: Vec<(Uuid, ChangeStatus)> = self
            .changes
            .iter()
            .filter(|c| {
                c.status.is_active()
                    && c.scope == change.scope
                    && c.kind == change.kind
                    && c.subject == change.subject
            })
            .map(|c| (c.id, c.status))
            .collect();
        for (old_id, old_status) in superseded {
            self.transition(old_id, old_status, ChangeStatus::Dismissed)?;
            let old = self.get_mut(old_id).ok_or(TransitionError::NotFound { id: old_id })?;
            old.rationale = format!("{} [superseded by change {}]", old.rationale, id);
            tracing::info!(change_id = %old_id, successor = %id, "superseded active change");
        }

        self.changes.push(change);
        match disposition {
            Disposition::AutoApply => {
                self.transition(id, ChangeStatus::Proposed, ChangeStatus::Applied)?;
            }
            Disposition::RequireApproval => {
                self.transition(id, ChangeStatus::Proposed, ChangeStatus::PendingApproval)?;
            }
        }
        Ok(id)
    }

    /// Approve a pending change. Fails if the change has moved on.
    pub fn approve(&mut self, id: Uuid) -> Result<(), TransitionError> {
        self.transition(id, ChangeStatus::PendingApproval, ChangeStatus::Applied)
    }

    /// Dismiss a pending change. Fails if the change has moved on.
    pub fn dismiss(&mut self, id: Uuid) -> Result<(), TransitionError> {
        self.transition(id, ChangeStatus::PendingApproval, ChangeStatus::Dismissed)
    }

    /// Revert an applied change, recording why.
    pub fn revert(&mut self, id: Uuid, reason: &str) -> Result<(), TransitionError> {
        self.transition(id, ChangeStatus::Applied, ChangeStatus::Reverted)?;
        let change = self.get_mut(id).ok_or(TransitionError::NotFound { id })?;
        change.revert_reason = Some(reason.to_owned());
        Ok(())
    }

    /// Execute a status transition with compare-and-set.
    ///
    /// - Validates the transition is a legal edge.
    /// - Sets `applied_at` when transitioning to `applied`.
    /// - Sets `resolved_at` when transitioning to `dismissed` or `reverted`.
    fn transition(
        &mut self,
        id: Uuid,
        from: ChangeStatus,
        to: ChangeStatus,
    ) -> Result<(), TransitionError> {
        if !ChangeStateMachine::is_valid_transition(from, to) {
            return Err(TransitionError::InvalidTransition { id, from, to });
        }

        let change = self
            .changes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TransitionError::NotFound { id })?;
        if change.status != from {
            return Err(TransitionError::StaleStatus {
                id,
                expected: from,
                found: change.status,
            });
        }

        let now = Utc::now();
        change.status = to;
        match to {
            ChangeStatus::Applied => change.applied_at = Some(now),
            ChangeStatus::Dismissed | ChangeStatus::Reverted => change.resolved_at = Some(now),
            _ => {}
        }
        tracing::debug!(change_id = %id, %from, %to, "change transitioned");
        Ok(())
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut AutopilotChange> {
        self.changes.iter_mut().find(|c| c.id == id)
    }
}

/// Build a fresh proposed change. Timestamps and the id are assigned here.
pub fn new_change(
    kind: ChangeKind,
    scope: ChangeScope,
    subject: impl Into<String>,
    description: impl Into<String>,
    rationale: impl Into<String>,
) -> AutopilotChange {
    AutopilotChange {
        id: Uuid::new_v4(),
        kind,
        status: ChangeStatus::Proposed,
        scope,
        subject: subject.into(),
        description: description.into(),
        rationale: rationale.into(),
        proposed_at: Utc::now(),
        applied_at: None,
        resolved_at: None,
        revert_reason: None,
    }
}
