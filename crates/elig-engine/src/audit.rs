//! # Decision Audit Trail
//!
//! Every `assign_attributes` and `claim_subsidy` decision, applied or
//! denied, appends one [`AuditRecord`] carrying a UTC [`Timestamp`].
//!
//! The log holds at most `capacity` records; once full, each new record
//! evicts the oldest. A capacity of zero keeps nothing.

use std::collections::{vec_deque, VecDeque};

use elig_core::{Amount, Bitmask, Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Records retained when no capacity is configured.
pub const DEFAULT_AUDIT_CAPACITY: usize = 1024;

/// What was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditAction {
    /// Authority toggled attributes for an applicant.
    Assign {
        /// Names as given, in order.
        attributes: Vec<String>,
    },
    /// Applicant claimed the subsidy.
    Claim {
        /// Configured payout.
        amount: Amount,
    },
}

/// How it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The subject's mask after the operation.
    Applied {
        /// Resulting mask.
        mask: Bitmask,
    },
    /// Rejected; state unchanged.
    Denied {
        /// Error message.
        reason: String,
    },
}

/// One decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When it was decided.
    pub at: Timestamp,
    /// Who invoked the operation.
    pub actor: Identity,
    /// Whose mask the operation concerned.
    pub subject: Identity,
    /// What was attempted.
    pub action: AuditAction,
    /// How it ended.
    pub outcome: AuditOutcome,
}

impl AuditRecord {
    /// Whether the operation took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, AuditOutcome::Applied { .. })
    }
}

/// Bounded, oldest-first list of [`AuditRecord`]s.
#[derive(Debug, Clone)]
pub struct AuditLog {
    records: VecDeque<AuditRecord>,
    capacity: usize,
    evicted: u64,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }
}

impl AuditLog {
    /// An empty log holding [`DEFAULT_AUDIT_CAPACITY`] records.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty log holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
            evicted: 0,
        }
    }

    /// Append a record stamped with the current time, evicting the oldest
    /// record if the log is full.
    pub fn record(
        &mut self,
        actor: &Identity,
        subject: &Identity,
        action: AuditAction,
        outcome: AuditOutcome,
    ) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
            self.evicted += 1;
        }
        self.records.push_back(AuditRecord {
            at: Timestamp::now(),
            actor: actor.clone(),
            subject: subject.clone(),
            action,
            outcome,
        });
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> vec_deque::Iter<'_, AuditRecord> {
        self.records.iter()
    }

    /// The `index`-th retained record, oldest first.
    pub fn get(&self, index: usize) -> Option<&AuditRecord> {
        self.records.get(index)
    }

    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records dropped to respect the capacity.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Records concerning `subject`, oldest first.
    pub fn for_subject<'a>(&'a self, subject: &'a Identity) -> impl Iterator<Item = &'a AuditRecord> {
        self.records.iter().filter(move |r| &r.subject == subject)
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&AuditRecord> {
        self.records.back()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize as JSON Lines, one record per line.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}
