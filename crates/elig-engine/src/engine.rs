//! # Eligibility Engine
//!
//! Owns the attribute registry, the applicant mask store and the audit log,
//! and implements the two external operations:
//!
//! - `assign_attributes` — authority only; toggles named attribute bits.
//! - `claim_subsidy` — any caller; pays the subsidy once per eligible bit.
//!
//! ## Claim Contract
//!
//! 1. `holder = store[caller]`, `required = OR(required attributes)`.
//! 2. The configured [`EligibilityPolicy`] must admit `(holder, required)`.
//! 3. The eligible bit must be set in `holder`.
//! 4. The ledger pays `subsidy_amount` to the caller.
//! 5. Only then is the eligible bit cleared, with `holder & !eligible`.
//!
//! A failure at steps 2–4 leaves the store exactly as it was. Step 5 cannot
//! fail. Operations take `&mut self`, so check, transfer and clear run as
//! one unit; see [`SharedEngine`](crate::SharedEngine) for threads.

use elig_core::{Bitmask, Identity};
use elig_registry::{ApplicantMaskStore, AttributeRegistry, Unauthorized, UnknownAttribute};

use crate::audit::{AuditAction, AuditLog, AuditOutcome};
use crate::config::SubsidyConfig;
use crate::error::{AssignError, ClaimError, DenialReason, EngineError};
use crate::ledger::{CallContext, Ledger};
use crate::policy::EligibilityPolicy;

/// OR of `registry.mask_of(n)` over `names`.
pub fn required_mask<I, S>(registry: &AttributeRegistry, names: I) -> Result<Bitmask, UnknownAttribute>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    registry.mask_of_all(names)
}

/// The subsidy eligibility engine.
///
/// Not `Clone`: a copy would own a second store able to pay the same
/// eligible bit. Share one engine through [`SharedEngine`](crate::SharedEngine).
#[derive(Debug)]
pub struct EligibilityEngine {
    config: SubsidyConfig,
    registry: AttributeRegistry,
    store: ApplicantMaskStore,
    audit: AuditLog,
    required: Bitmask,
    eligible: Bitmask,
}

impl EligibilityEngine {
    /// Validate `config` and build an engine with an empty store.
    pub fn new(config: SubsidyConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let registry = config.registry()?;
        let required = required_mask(&registry, &config.required)?;
        let eligible = registry.mask_of(&config.eligible_attribute)?;
        let store = ApplicantMaskStore::new(config.authority.clone());

        tracing::info!(
            authority = %config.authority,
            attributes = registry.len(),
            policy = %config.policy,
            amount = %config.subsidy_amount,
            %required,
            "eligibility engine initialized"
        );
        Ok(Self {
            audit: AuditLog::with_capacity(config.audit_capacity),
            config,
            registry,
            store,
            required,
            eligible,
        })
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &SubsidyConfig {
        &self.config
    }

    /// The attribute registry.
    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// The applicant mask store.
    pub fn store(&self) -> &ApplicantMaskStore {
        &self.store
    }

    /// The most recent decisions, up to the configured capacity.
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// The policy in force.
    pub fn policy(&self) -> EligibilityPolicy {
        self.config.policy
    }

    /// The required mask, resolved at construction.
    pub fn required(&self) -> Bitmask {
        self.required
    }

    /// The eligible bit, resolved at construction.
    pub fn eligible_bit(&self) -> Bitmask {
        self.eligible
    }

    /// The applicant's current mask.
    pub fn mask_of(&self, applicant: &Identity) -> Bitmask {
        self.store.get(applicant)
    }

    /// Names of the attributes the applicant currently holds.
    pub fn attributes_of(&self, applicant: &Identity) -> Vec<&str> {
        self.registry.decode(self.store.get(applicant))
    }

    /// Toggle each named attribute for `applicant`, returning the new mask.
    ///
    /// Every name is resolved before anything changes, so a rejected call
    /// leaves the store untouched. A name given twice toggles twice.
    ///
    /// # Errors
    ///
    /// - [`AssignError::Unauthorized`] if the caller is not the authority.
    /// - [`AssignError::UnknownAttribute`] if a name is unregistered.
    pub fn assign_attributes<C, S>(
        &mut self,
        ctx: &C,
        applicant: &Identity,
        names: &[S],
    ) -> Result<Bitmask, AssignError>
    where
        C: CallContext + ?Sized,
        S: AsRef<str>,
    {
        let caller = ctx.current_caller();
        let action = AuditAction::Assign {
            attributes: names.iter().map(|n| n.as_ref().to_string()).collect(),
        };

        match self.toggle_names(&caller, applicant, names) {
            Ok(mask) => {
                self.audit
                    .record(&caller, applicant, action, AuditOutcome::Applied { mask });
                Ok(mask)
            }
            Err(e) => {
                tracing::warn!(%caller, %applicant, error = %e, "attribute assignment rejected");
                self.audit.record(
                    &caller,
                    applicant,
                    action,
                    AuditOutcome::Denied {
                        reason: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    fn toggle_names<S: AsRef<str>>(
        &mut self,
        caller: &Identity,
        applicant: &Identity,
        names: &[S],
    ) -> Result<Bitmask, AssignError> {
        if !self.store.is_authority(caller) {
            return Err(Unauthorized {
                actor: caller.clone(),
            }
            .into());
        }
        // XOR of the individual bits equals toggling them one at a time.
        let mut delta = Bitmask::ZERO;
        for name in names {
            delta ^= self.registry.mask_of(name.as_ref())?;
        }
        Ok(self.store.toggle(caller, applicant, delta)?)
    }

    /// Run the eligibility checks for `applicant` without paying or mutating.
    pub fn is_eligible(&self, applicant: &Identity) -> Result<(), DenialReason> {
        let holder = self.store.get(applicant);
        if !self.config.policy.admits(holder, self.required) {
            return Err(DenialReason::PolicyRejected {
                policy: self.config.policy,
                holder,
                required: self.required,
            });
        }
        if !holder.contains_all(self.eligible) {
            return Err(DenialReason::EligibleBitAbsent { holder });
        }
        Ok(())
    }

    /// Claim the subsidy for the invoking identity.
    pub fn claim_subsidy<C, L>(&mut self, ctx: &C, ledger: &L) -> Result<(), ClaimError>
    where
        C: CallContext + ?Sized,
        L: Ledger + ?Sized,
    {
        let caller = ctx.current_caller();
        self.claim(&caller, ledger)
    }

    /// Claim the subsidy for `caller`.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::AccessDenied`] if the checks fail.
    /// - [`ClaimError::TransferFailed`] if the ledger refuses the payout.
    ///
    /// In both cases the caller's mask is unchanged.
    pub fn claim<L>(&mut self, caller: &Identity, ledger: &L) -> Result<(), ClaimError>
    where
        L: Ledger + ?Sized,
    {
        let amount = self.config.subsidy_amount;
        let action = AuditAction::Claim { amount };

        if let Err(reason) = self.is_eligible(caller) {
            tracing::warn!(%caller, %reason, "subsidy claim denied");
            self.audit.record(
                caller,
                caller,
                action,
                AuditOutcome::Denied {
                    reason: reason.to_string(),
                },
            );
            return Err(ClaimError::AccessDenied(reason));
        }

        if let Err(e) = ledger.transfer_value(caller, amount) {
            tracing::warn!(%caller, %amount, error = %e, "subsidy transfer failed; mask left intact");
            self.audit.record(
                caller,
                caller,
                action,
                AuditOutcome::Denied {
                    reason: e.to_string(),
                },
            );
            return Err(ClaimError::TransferFailed(e));
        }

        let mask = self.store.clear_bits(caller, self.eligible);
        tracing::info!(%caller, %amount, %mask, "subsidy claimed");
        self.audit
            .record(caller, caller, action, AuditOutcome::Applied { mask });
        Ok(())
    }
}
