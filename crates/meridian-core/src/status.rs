//! # Document Edit State Machine
//!
//! Document lifecycle states and the edit-lock predicate, as a first-class
//! type instead of inline status-string membership checks.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pending ──► Processing ──► Checking ──► Loading ──► InTransit ──►      │
//! │     │            │             │            Delivered ──► Completed    │
//! │     └────────────┴─────────────┴──► Cancelled                          │
//! │                                                                         │
//! │  LOCKED:  Loading, InTransit, Delivered, Completed, Cancelled          │
//! │                                                                         │
//! │  write permission = !locked  OR  privileged re-entry flag              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions are triggered by explicit status-change operations (approval,
//! pack completion, rejection), never by generic field edits. The lock is a
//! client-side fail-fast gate: the backing store enforces it too, so an
//! attempted mutation while locked must be rejected before any store call
//! is issued.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ActorContext;

// =============================================================================
// Document Status
// =============================================================================

/// The lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Freshly created, awaiting approval.
    Pending,
    /// Approved, being processed.
    Processing,
    /// Packed, awaiting verification.
    Checking,
    /// Being loaded for dispatch. First locked state.
    Loading,
    /// On the road.
    InTransit,
    /// Goods handed over.
    Delivered,
    /// Fully settled and closed.
    Completed,
    /// Rejected before dispatch. Terminal.
    Cancelled,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Pending
    }
}

impl DocumentStatus {
    /// True once ordinary line-item and header edits are disallowed.
    pub const fn is_locked(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Loading
                | DocumentStatus::InTransit
                | DocumentStatus::Delivered
                | DocumentStatus::Completed
                | DocumentStatus::Cancelled
        )
    }

    /// True for the terminal states no transition leaves.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Cancelled)
    }

    /// Explicit transition table.
    ///
    /// Cancellation is reachable from the early (unlocked) states only;
    /// once goods are moving the document runs to completion.
    pub const fn can_transition(&self, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (*self, to),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Checking)
                | (Processing, Cancelled)
                | (Checking, Loading)
                | (Checking, Cancelled)
                | (Loading, InTransit)
                | (InTransit, Delivered)
                | (Delivered, Completed)
        )
    }

    /// All statuses in lifecycle order, for display pickers.
    pub const ALL: [DocumentStatus; 8] = [
        DocumentStatus::Pending,
        DocumentStatus::Processing,
        DocumentStatus::Checking,
        DocumentStatus::Loading,
        DocumentStatus::InTransit,
        DocumentStatus::Delivered,
        DocumentStatus::Completed,
        DocumentStatus::Cancelled,
    ];
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Checking => "Checking",
            DocumentStatus::Loading => "Loading",
            DocumentStatus::InTransit => "In Transit",
            DocumentStatus::Delivered => "Delivered",
            DocumentStatus::Completed => "Completed",
            DocumentStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Edit Permission
// =============================================================================

/// Whether a caller may mutate a document right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum EditPermission {
    /// Writes allowed.
    Granted,
    /// Writes rejected; carries the status to explain why.
    Denied { status: DocumentStatus },
}

impl EditPermission {
    /// Evaluates the lock predicate for a status and caller context.
    ///
    /// Effective write permission = `!status.is_locked() || privileged`.
    /// The privileged re-entry flag comes from the injected [`ActorContext`],
    /// never from ambient session state.
    pub fn evaluate(status: DocumentStatus, ctx: &ActorContext) -> Self {
        if !status.is_locked() || ctx.privileged_reentry {
            EditPermission::Granted
        } else {
            EditPermission::Denied { status }
        }
    }

    /// True when writes are allowed.
    #[inline]
    pub const fn is_granted(&self) -> bool {
        matches!(self, EditPermission::Granted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_set() {
        assert!(!DocumentStatus::Pending.is_locked());
        assert!(!DocumentStatus::Processing.is_locked());
        assert!(!DocumentStatus::Checking.is_locked());
        assert!(DocumentStatus::Loading.is_locked());
        assert!(DocumentStatus::InTransit.is_locked());
        assert!(DocumentStatus::Delivered.is_locked());
        assert!(DocumentStatus::Completed.is_locked());
        assert!(DocumentStatus::Cancelled.is_locked());
    }

    #[test]
    fn test_transition_table_forward_path() {
        use DocumentStatus::*;
        assert!(Pending.can_transition(Processing));
        assert!(Processing.can_transition(Checking));
        assert!(Checking.can_transition(Loading));
        assert!(Loading.can_transition(InTransit));
        assert!(InTransit.can_transition(Delivered));
        assert!(Delivered.can_transition(Completed));
    }

    #[test]
    fn test_cancellation_only_from_early_states() {
        use DocumentStatus::*;
        assert!(Pending.can_transition(Cancelled));
        assert!(Processing.can_transition(Cancelled));
        assert!(Checking.can_transition(Cancelled));
        assert!(!Loading.can_transition(Cancelled));
        assert!(!InTransit.can_transition(Cancelled));
        assert!(!Delivered.can_transition(Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use DocumentStatus::*;
        for to in DocumentStatus::ALL {
            assert!(!Completed.can_transition(to));
            assert!(!Cancelled.can_transition(to));
        }
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn test_no_skipping_forward() {
        use DocumentStatus::*;
        assert!(!Pending.can_transition(Checking));
        assert!(!Pending.can_transition(Delivered));
        assert!(!Processing.can_transition(Loading));
    }

    #[test]
    fn test_permission_unlocked_always_granted() {
        let ordinary = ActorContext::ordinary("u-1");
        assert!(EditPermission::evaluate(DocumentStatus::Pending, &ordinary).is_granted());
        assert!(EditPermission::evaluate(DocumentStatus::Checking, &ordinary).is_granted());
    }

    #[test]
    fn test_permission_locked_denied_for_ordinary() {
        let ordinary = ActorContext::ordinary("u-1");
        let decision = EditPermission::evaluate(DocumentStatus::Delivered, &ordinary);
        assert_eq!(
            decision,
            EditPermission::Denied {
                status: DocumentStatus::Delivered
            }
        );
    }

    #[test]
    fn test_permission_privileged_reentry_overrides_lock() {
        // Same Delivered document, privileged path: writes allowed
        let privileged = ActorContext::privileged("u-1");
        assert!(EditPermission::evaluate(DocumentStatus::Delivered, &privileged).is_granted());
        assert!(EditPermission::evaluate(DocumentStatus::Cancelled, &privileged).is_granted());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        let back: DocumentStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(back, DocumentStatus::Delivered);
    }
}
