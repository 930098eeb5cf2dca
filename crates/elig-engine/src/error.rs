//! # Engine Errors
//!
//! - [`EngineError`] is fatal and surfaces while loading configuration or
//!   building the engine.
//! - [`AssignError`] and [`ClaimError`] reject one request. Neither leaves a
//!   partial mutation behind: a claim mutates state only after the ledger
//!   transfer succeeded.

use std::path::PathBuf;

use elig_core::{Bitmask, TransferError};
use elig_registry::{ConfigError, Unauthorized, UnknownAttribute};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::EligibilityPolicy;

/// Configuration could not be loaded or is inconsistent.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The attribute list is malformed.
    #[error("attribute registry: {0}")]
    Config(#[from] ConfigError),

    /// A required or eligible attribute is not in the attribute list.
    #[error("configuration references {0}")]
    UnknownAttribute(#[from] UnknownAttribute),

    /// A field value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("reading {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file extension names no supported format.
    #[error("unsupported configuration format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    /// YAML parse failure.
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// `assign_attributes` was rejected. The store is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    /// The caller is not the authority.
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),

    /// A name is not registered.
    #[error(transparent)]
    UnknownAttribute(#[from] UnknownAttribute),
}

/// Why a claim was refused before any transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// The holder mask fails the configured policy.
    #[error("{policy} policy rejects holder mask {holder} against required mask {required}")]
    PolicyRejected {
        /// Policy in force.
        policy: EligibilityPolicy,
        /// The claimant's mask.
        holder: Bitmask,
        /// The required mask.
        required: Bitmask,
    },

    /// The eligible bit is not set (never granted, or already consumed).
    #[error("eligible bit absent from holder mask {holder}")]
    EligibleBitAbsent {
        /// The claimant's mask.
        holder: Bitmask,
    },
}

/// `claim_subsidy` failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// Eligibility check failed. No state change.
    #[error("access denied: {0}")]
    AccessDenied(DenialReason),

    /// The ledger refused the payout. No state change; the claim may be
    /// retried.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}
