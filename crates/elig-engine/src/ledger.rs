//! # Ledger Primitives
//!
//! The engine reaches the external ledger platform through exactly two
//! operations:
//!
//! - [`CallContext::current_caller`] — who invoked the current operation.
//! - [`Ledger::transfer_value`] — pay an identity, all or nothing.
//!
//! [`InMemoryLedger`] implements [`Ledger`] over a single treasury account
//! for tests and local simulation. It is not a settlement system.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use elig_core::{Amount, Identity, TransferError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Source of the invoking identity.
pub trait CallContext {
    /// The identity on whose behalf the current operation runs.
    fn current_caller(&self) -> Identity;
}

/// An identity is its own call context.
impl CallContext for Identity {
    fn current_caller(&self) -> Identity {
        self.clone()
    }
}

/// The external value-transfer primitive.
///
/// A transfer either fully happens or returns an error with nothing moved.
/// Implementations synchronize internally, so the method takes `&self`.
pub trait Ledger {
    /// Pay `amount` to `to`.
    fn transfer_value(&self, to: &Identity, amount: Amount) -> Result<(), TransferError>;
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn transfer_value(&self, to: &Identity, amount: Amount) -> Result<(), TransferError> {
        (**self).transfer_value(to, amount)
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn transfer_value(&self, to: &Identity, amount: Amount) -> Result<(), TransferError> {
        (**self).transfer_value(to, amount)
    }
}

/// One completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Recipient.
    pub to: Identity,
    /// Amount paid.
    pub amount: Amount,
}

#[derive(Debug, Default)]
struct LedgerState {
    treasury: Amount,
    balances: HashMap<Identity, Amount>,
    blocked: HashSet<Identity>,
    transfers: Vec<TransferRecord>,
}

/// A treasury paying out to in-memory balances.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// A ledger whose treasury starts with `treasury` units.
    pub fn with_treasury(treasury: Amount) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                treasury,
                ..LedgerState::default()
            }),
        }
    }

    /// Units left in the treasury.
    pub fn treasury(&self) -> Amount {
        self.state.lock().treasury
    }

    /// Units received by `id`.
    pub fn balance_of(&self, id: &Identity) -> Amount {
        self.state
            .lock()
            .balances
            .get(id)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Refuse every future transfer to `id`.
    pub fn block(&self, id: &Identity) {
        self.state.lock().blocked.insert(id.clone());
    }

    /// Accept transfers to `id` again.
    pub fn unblock(&self, id: &Identity) {
        self.state.lock().blocked.remove(id);
    }

    /// Completed transfers, oldest first.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.state.lock().transfers.clone()
    }
}

impl Ledger for InMemoryLedger {
    fn transfer_value(&self, to: &Identity, amount: Amount) -> Result<(), TransferError> {
        let mut state = self.state.lock();

        if state.blocked.contains(to) {
            return Err(TransferError::Rejected {
                to: to.clone(),
                reason: "destination blocked".to_string(),
            });
        }
        let treasury = state
            .treasury
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                requested: amount,
                available: state.treasury,
            })?;
        let current = state.balances.get(to).copied().unwrap_or(Amount::ZERO);
        let balance = current
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow { to: to.clone() })?;

        state.treasury = treasury;
        state.balances.insert(to.clone(), balance);
        state.transfers.push(TransferRecord {
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_its_own_context() {
        let id = Identity::new();
        assert_eq!(id.current_caller(), id);
    }

    #[test]
    fn test_transfer_moves_value() {
        let ledger = InMemoryLedger::with_treasury(Amount(100));
        let to = Identity::new();
        ledger.transfer_value(&to, Amount(30)).unwrap();
        assert_eq!(ledger.treasury(), Amount(70));
        assert_eq!(ledger.balance_of(&to), Amount(30));
        assert_eq!(
            ledger.transfers(),
            vec![TransferRecord {
                to,
                amount: Amount(30)
            }]
        );
    }

    #[test]
    fn test_insufficient_funds_moves_nothing() {
        let ledger = InMemoryLedger::with_treasury(Amount(10));
        let to = Identity::new();
        assert_eq!(
            ledger.transfer_value(&to, Amount(11)),
            Err(TransferError::InsufficientFunds {
                requested: Amount(11),
                available: Amount(10),
            })
        );
        assert_eq!(ledger.treasury(), Amount(10));
        assert_eq!(ledger.balance_of(&to), Amount::ZERO);
        assert!(ledger.transfers().is_empty());
    }

    #[test]
    fn test_blocked_destination() {
        let ledger = InMemoryLedger::with_treasury(Amount(10));
        let to = Identity::new();
        ledger.block(&to);
        assert!(matches!(
            ledger.transfer_value(&to, Amount(1)),
            Err(TransferError::Rejected { .. })
        ));
        ledger.unblock(&to);
        ledger.transfer_value(&to, Amount(1)).unwrap();
        assert_eq!(ledger.balance_of(&to), Amount(1));
    }

    #[test]
    fn test_shared_ledger_via_arc() {
        let ledger = Arc::new(InMemoryLedger::with_treasury(Amount(5)));
        let to = Identity::new();
        let handle = Arc::clone(&ledger);
        handle.transfer_value(&to, Amount(5)).unwrap();
        assert_eq!(ledger.balance_of(&to), Amount(5));
    }
}
