//! # Shared Engine
//!
//! Thread-safe, cloneable handle to one [`EligibilityEngine`].
//!
//! Every operation runs under a single `parking_lot::Mutex`, held from the
//! eligibility check through the ledger transfer to the bit clear. Two
//! concurrent claims by the same applicant therefore cannot both observe
//! the eligible bit. `parking_lot` locks do not poison, so a panicking
//! caller does not wedge the engine.
//!
//! This is the only way to share an engine: [`EligibilityEngine`] is not
//! `Clone`, so no second store can pay out the same eligible bit.

use std::sync::Arc;

use elig_core::{Bitmask, Identity};
use parking_lot::Mutex;

use crate::engine::EligibilityEngine;
use crate::error::{AssignError, ClaimError, DenialReason};
use crate::ledger::{CallContext, Ledger};

/// Cloneable handle; clones share the same engine.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<EligibilityEngine>>,
}

impl SharedEngine {
    /// Wrap `engine`.
    pub fn new(engine: EligibilityEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// See [`EligibilityEngine::assign_attributes`].
    pub fn assign_attributes<C, S>(
        &self,
        ctx: &C,
        applicant: &Identity,
        names: &[S],
    ) -> Result<Bitmask, AssignError>
    where
        C: CallContext + ?Sized,
        S: AsRef<str>,
    {
        self.inner.lock().assign_attributes(ctx, applicant, names)
    }

    /// See [`EligibilityEngine::claim_subsidy`].
    pub fn claim_subsidy<C, L>(&self, ctx: &C, ledger: &L) -> Result<(), ClaimError>
    where
        C: CallContext + ?Sized,
        L: Ledger + ?Sized,
    {
        self.inner.lock().claim_subsidy(ctx, ledger)
    }

    /// See [`EligibilityEngine::is_eligible`].
    pub fn is_eligible(&self, applicant: &Identity) -> Result<(), DenialReason> {
        self.inner.lock().is_eligible(applicant)
    }

    /// The applicant's current mask.
    pub fn mask_of(&self, applicant: &Identity) -> Bitmask {
        self.inner.lock().mask_of(applicant)
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&EligibilityEngine) -> R) -> R {
        f(&self.inner.lock())
    }
}
