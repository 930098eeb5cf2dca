//! # Applicant Mask Store
//!
//! Maps applicant identity to accumulated attribute mask.
//!
//! ## Semantics
//!
//! - Unseen applicants read as `0`: absence means "no attributes", never an
//!   error. An entry that returns to `0` is dropped, so absent and zero
//!   cannot be told apart.
//! - Only the authority fixed at construction may [`toggle`]. A toggle XORs
//!   the mask in, so applying the same mask twice is a no-op overall.
//! - [`clear_bits`] is the consumption primitive: AND with the complement,
//!   correct whether or not the bits are currently set.
//!
//! [`toggle`]: ApplicantMaskStore::toggle
//! [`clear_bits`]: ApplicantMaskStore::clear_bits

use std::collections::HashMap;

use elig_core::{Bitmask, Identity};

use crate::error::Unauthorized;

/// Applicant → mask table guarded by a single authority.
#[derive(Debug, Clone)]
pub struct ApplicantMaskStore {
    authority: Identity,
    masks: HashMap<Identity, Bitmask>,
}

impl ApplicantMaskStore {
    /// An empty store mutable only by `authority`.
    pub fn new(authority: Identity) -> Self {
        Self {
            authority,
            masks: HashMap::new(),
        }
    }

    /// The identity allowed to toggle masks.
    pub fn authority(&self) -> &Identity {
        &self.authority
    }

    /// Whether `actor` is the authority.
    pub fn is_authority(&self, actor: &Identity) -> bool {
        *actor == self.authority
    }

    /// `store[applicant] ^= mask`, returning the new mask.
    ///
    /// # Errors
    ///
    /// [`Unauthorized`] unless `actor` is the authority. Nothing changes.
    pub fn toggle(
        &mut self,
        actor: &Identity,
        applicant: &Identity,
        mask: Bitmask,
    ) -> Result<Bitmask, Unauthorized> {
        if !self.is_authority(actor) {
            tracing::warn!(%actor, %applicant, "mask toggle by non-authority rejected");
            return Err(Unauthorized {
                actor: actor.clone(),
            });
        }

        let before = self.get(applicant);
        let after = before ^ mask;
        self.put(applicant, after);
        tracing::debug!(%applicant, %before, %after, "applicant mask toggled");
        Ok(after)
    }

    /// The applicant's mask, `0` if never written.
    pub fn get(&self, applicant: &Identity) -> Bitmask {
        self.masks.get(applicant).copied().unwrap_or(Bitmask::ZERO)
    }

    /// Clear every bit of `mask` for `applicant`, returning the new mask.
    ///
    /// Bits already clear stay clear; no other bit is touched.
    pub fn clear_bits(&mut self, applicant: &Identity, mask: Bitmask) -> Bitmask {
        let after = self.get(applicant).clear(mask);
        self.put(applicant, after);
        after
    }

    /// Number of applicants with a non-zero mask.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Whether every applicant reads as `0`.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Applicants with non-zero masks, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, Bitmask)> {
        self.masks.iter().map(|(id, mask)| (id, *mask))
    }

    fn put(&mut self, applicant: &Identity, mask: Bitmask) {
        if mask.is_zero() {
            self.masks.remove(applicant);
        } else {
            self.masks.insert(applicant.clone(), mask);
        }
    }
}
