//! # elig-engine — Subsidy Eligibility Engine
//!
//! Decides whether an applicant may claim the fixed subsidy and performs the
//! claim against an external ledger.
//!
//! ## Architecture
//!
//! - **Config** (`config.rs`): [`SubsidyConfig`], loaded from YAML or JSON:
//!   authority, ordered attribute list, required attributes, eligible
//!   attribute, subsidy amount, and policy.
//!
//! - **Policy** (`policy.rs`): [`EligibilityPolicy`], the named predicate
//!   comparing a holder mask with the required mask.
//!
//! - **Ledger** (`ledger.rs`): the two external primitives,
//!   [`CallContext::current_caller`] and [`Ledger::transfer_value`], plus
//!   [`InMemoryLedger`] for tests and simulations.
//!
//! - **Engine** (`engine.rs`): [`EligibilityEngine`], which owns the
//!   registry, mask store and audit log, and exposes `assign_attributes`
//!   and `claim_subsidy`.
//!
//! - **Shared** (`shared.rs`): [`SharedEngine`], a lock around the engine
//!   for multi-threaded hosts.
//!
//! - **Audit** (`audit.rs`): [`AuditLog`], one record per decision.
//!
//! ## Claim Ordering
//!
//! ```text
//! check policy ─▶ check eligible bit ─▶ transfer ─▶ clear eligible bit
//!      │                  │                 │
//!      ▼                  ▼                 ▼
//!  AccessDenied      AccessDenied     TransferFailed   (no state change)
//! ```
//!
//! The only mutation happens after the ledger has paid, so a failed claim
//! can always be retried.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod policy;
pub mod shared;

pub use audit::{AuditAction, AuditLog, AuditOutcome, AuditRecord, DEFAULT_AUDIT_CAPACITY};
pub use config::SubsidyConfig;
pub use engine::{required_mask, EligibilityEngine};
pub use error::{AssignError, ClaimError, DenialReason, EngineError};
pub use ledger::{CallContext, InMemoryLedger, Ledger, TransferRecord};
pub use policy::EligibilityPolicy;
pub use shared::SharedEngine;
