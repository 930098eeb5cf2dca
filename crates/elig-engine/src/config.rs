//! # Subsidy Configuration
//!
//! Everything fixed at construction: the authority, the ordered attribute
//! list that becomes the registry, the attributes composing the eligibility
//! requirement, the attribute designating the eligible bit, the subsidy
//! amount, and the policy.
//!
//! ## File Format
//!
//! ```yaml
//! authority: 6f1c2a8e-4b7d-4e0a-9c55-3b2f0d1e7a90
//! attributes: [male, female, single, married, no kids, 1 kid, 2 kids, 3+ kids, employed, toReceive]
//! required: [female, married, 2 kids, toReceive]
//! eligible_attribute: toReceive
//! subsidy_amount: 1000000000000000000
//! policy: subset          # optional, default subset
//! audit_capacity: 1024    # optional, default 1024
//! ```
//!
//! JSON with the same field names is accepted as well. Unknown fields are
//! rejected.

use std::path::Path;

use elig_core::{Amount, Identity};
use elig_registry::AttributeRegistry;
use serde::{Deserialize, Serialize};

use crate::audit::DEFAULT_AUDIT_CAPACITY;
use crate::error::EngineError;
use crate::policy::EligibilityPolicy;

/// Attribute list of the reference deployment, in bit order.
pub const REFERENCE_ATTRIBUTES: [&str; 10] = [
    "male",
    "female",
    "single",
    "married",
    "no kids",
    "1 kid",
    "2 kids",
    "3+ kids",
    "employed",
    "toReceive",
];

/// Attributes whose OR forms the reference requirement (mask 586).
pub const REFERENCE_REQUIRED: [&str; 4] = ["female", "married", "2 kids", "toReceive"];

/// Attribute consumed by a successful claim in the reference deployment.
pub const REFERENCE_ELIGIBLE: &str = "toReceive";

/// Reference subsidy: 10^18 base units.
pub const REFERENCE_SUBSIDY: Amount = Amount(1_000_000_000_000_000_000);

/// Construction-time settings of an [`EligibilityEngine`](crate::EligibilityEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubsidyConfig {
    /// The only identity allowed to assign attributes.
    pub authority: Identity,
    /// Attribute names; position `i` owns bit `i`.
    pub attributes: Vec<String>,
    /// Attributes OR-combined into the required mask.
    pub required: Vec<String>,
    /// Attribute whose bit gates and is consumed by a claim.
    pub eligible_attribute: String,
    /// Paid to each successful claimant.
    pub subsidy_amount: Amount,
    /// Holder-vs-required predicate.
    #[serde(default)]
    pub policy: EligibilityPolicy,
    /// Audit records retained before the oldest is evicted.
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,
}

fn default_audit_capacity() -> usize {
    DEFAULT_AUDIT_CAPACITY
}

impl SubsidyConfig {
    /// The reference deployment governed by `authority`.
    pub fn reference(authority: Identity) -> Self {
        Self {
            authority,
            attributes: REFERENCE_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            required: REFERENCE_REQUIRED.iter().map(|s| s.to_string()).collect(),
            eligible_attribute: REFERENCE_ELIGIBLE.to_string(),
            subsidy_amount: REFERENCE_SUBSIDY,
            policy: EligibilityPolicy::default(),
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: EligibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the audit capacity.
    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity;
        self
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(s: &str) -> Result<Self, EngineError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(s: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match format.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => return Err(EngineError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::info!(path = %path.display(), "subsidy configuration loaded");
        Ok(config)
    }

    /// Build the attribute registry described by `attributes`.
    pub fn registry(&self) -> Result<AttributeRegistry, EngineError> {
        Ok(AttributeRegistry::register(self.attributes.iter().cloned())?)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// - The attribute list is malformed ([`EngineError::Config`]).
    /// - A required or eligible name is unregistered
    ///   ([`EngineError::UnknownAttribute`]).
    /// - The amount is zero, the requirement is empty, or the eligible
    ///   attribute is not part of the requirement
    ///   ([`EngineError::InvalidConfig`]).
    pub fn validate(&self) -> Result<(), EngineError> {
        let registry = self.registry()?;
        if self.subsidy_amount.is_zero() {
            return Err(EngineError::InvalidConfig(
                "subsidy_amount must be positive".to_string(),
            ));
        }
        if self.required.is_empty() {
            return Err(EngineError::InvalidConfig(
                "required must name at least one attribute".to_string(),
            ));
        }
        registry.mask_of_all(&self.required)?;
        registry.mask_of(&self.eligible_attribute)?;
        if !self.required.contains(&self.eligible_attribute) {
            return Err(EngineError::InvalidConfig(format!(
                "eligible_attribute {:?} must be one of the required attributes",
                self.eligible_attribute
            )));
        }
        Ok(())
    }
}
