//! # Error Types
//!
//! Errors shared across the workspace. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Transfer errors come from the external ledger and are carried
//!   unchanged to the caller of a claim.
//! - Parse errors keep the rejected input for diagnostics.

use thiserror::Error;

use crate::identity::{Amount, Identity};

/// Failure reported by the external ledger when moving value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The paying account cannot cover the amount.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the transfer asked for.
        requested: Amount,
        /// Amount the payer holds.
        available: Amount,
    },

    /// The ledger refused the destination.
    #[error("transfer to {to} rejected: {reason}")]
    Rejected {
        /// Intended recipient.
        to: Identity,
        /// Ledger-provided reason.
        reason: String,
    },

    /// Crediting the destination would overflow its balance.
    #[error("balance overflow crediting {to}")]
    Overflow {
        /// Intended recipient.
        to: Identity,
    },
}

/// A string could not be parsed as a [`crate::Bitmask`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid bitmask {input:?}: {reason}")]
pub struct BitmaskParseError {
    /// The rejected input.
    pub input: String,
    /// Why parsing failed.
    pub reason: String,
}
