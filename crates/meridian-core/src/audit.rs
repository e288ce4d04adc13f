//! # Audit Trail Recorder
//!
//! Captures a reason and prior total whenever a finalized document is
//! mutated. Entries are append-only: never edited, never deleted, displayed
//! reverse-chronologically. Reading history back out belongs to the external
//! persistence collaborator; this module is the writer-side contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::ActorContext;
use crate::DEFAULT_AUDIT_REASON;

// =============================================================================
// Audit Entry
// =============================================================================

/// One record of a change to a document that already had business
/// consequences.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditEntry {
    pub id: String,
    pub document_id: String,
    #[ts(as = "String")]
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
    pub reason: String,
    /// The document's grand total before this change, in cents.
    pub previous_total_cents: i64,
}

impl AuditEntry {
    /// Builds an entry for a mutation happening now.
    ///
    /// A missing or blank reason falls back to the generic label rather
    /// than skipping the entry: auditing happens even when the operator
    /// types nothing.
    pub fn record(
        document_id: &str,
        actor: &ActorContext,
        reason: Option<&str>,
        previous_total: Money,
    ) -> Self {
        let reason = match reason.map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => DEFAULT_AUDIT_REASON.to_string(),
        };

        AuditEntry {
            id: Uuid::new_v4().to_string(),
            document_id: document_id.to_string(),
            changed_at: Utc::now(),
            changed_by: actor.actor_id.clone(),
            reason,
            previous_total_cents: previous_total.cents(),
        }
    }

    /// The prior total as Money.
    #[inline]
    pub fn previous_total(&self) -> Money {
        Money::from_cents(self.previous_total_cents)
    }
}

// =============================================================================
// Audit Trail
// =============================================================================

/// Append-only collection of audit entries for one edit session.
///
/// The session layer appends here after each successful finalized-document
/// save; the host application flushes entries to the store alongside the
/// document payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// An empty trail.
    pub fn new() -> Self {
        AuditTrail::default()
    }

    /// Appends an entry. There is no remove and no edit.
    pub fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
    }

    /// Entries in reverse-chronological display order (newest first).
    pub fn entries(&self) -> Vec<&AuditEntry> {
        let mut out: Vec<&AuditEntry> = self.entries.iter().collect();
        out.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        out
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
