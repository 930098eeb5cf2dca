//! # Attribute Registry
//!
//! The closed mapping from attribute name to a single-bit mask. Position `i`
//! in the registration order owns bit `i`, so masks are `1 << i`:
//!
//! ```text
//! male    female  single  married  no kids  1 kid  2 kids  3+ kids  employed  toReceive
//!   1       2       4       8        16       32     64      128      256       512
//! ```
//!
//! ## Invariants
//!
//! - Every name maps to exactly one bit, and no two names share a bit.
//! - Positions never change after construction. There is no insert or
//!   remove; a different attribute set means a different registry.
//! - At most [`WIDTH`] names.

use std::collections::HashMap;

use elig_core::{Bitmask, WIDTH};

use crate::error::{ConfigError, UnknownAttribute};

/// Immutable name → bit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRegistry {
    /// Names indexed by bit position.
    names: Vec<String>,
    positions: HashMap<String, u32>,
}

impl AttributeRegistry {
    /// Assign bit `i` to `names[i]`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TooManyAttributes`] if there are more names than bits.
    /// - [`ConfigError::DuplicateAttribute`] if a name repeats.
    /// - [`ConfigError::EmptyName`] if a name is blank.
    pub fn register<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > WIDTH as usize {
            return Err(ConfigError::TooManyAttributes {
                count: names.len(),
                width: WIDTH,
            });
        }

        let mut positions = HashMap::with_capacity(names.len());
        for (position, name) in (0u32..).zip(&names) {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyName {
                    position: position as usize,
                });
            }
            if let Some(first) = positions.insert(name.clone(), position) {
                return Err(ConfigError::DuplicateAttribute {
                    name: name.clone(),
                    first,
                    second: position,
                });
            }
        }

        tracing::debug!(count = names.len(), "attribute registry built");
        Ok(Self { names, positions })
    }

    /// The single-bit mask of `name`.
    pub fn mask_of(&self, name: &str) -> Result<Bitmask, UnknownAttribute> {
        self.position_of(name)
            .map(Bitmask::bit)
            .ok_or_else(|| UnknownAttribute(name.to_string()))
    }

    /// OR of the masks of every name. Fails on the first unknown name.
    pub fn mask_of_all<I, S>(&self, names: I) -> Result<Bitmask, UnknownAttribute>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = Bitmask::ZERO;
        for name in names {
            mask |= self.mask_of(name.as_ref())?;
        }
        Ok(mask)
    }

    /// Bit position of `name`, if registered.
    pub fn position_of(&self, name: &str) -> Option<u32> {
        self.positions.get(name).copied()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Names of the registered attributes set in `mask`, in bit order.
    /// Set bits with no registered name are ignored.
    pub fn decode(&self, mask: Bitmask) -> Vec<&str> {
        self.iter()
            .filter(|(_, bit)| mask.contains_all(*bit))
            .map(|(name, _)| name)
            .collect()
    }

    /// The part of `mask` covered by no registered attribute.
    pub fn unregistered_bits(&self, mask: Bitmask) -> Bitmask {
        mask.clear(self.full_mask())
    }

    /// OR of every registered bit.
    pub fn full_mask(&self) -> Bitmask {
        self.iter().fold(Bitmask::ZERO, |acc, (_, bit)| acc | bit)
    }

    /// Names in bit order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// `(name, mask)` pairs in bit order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Bitmask)> {
        (0u32..)
            .zip(&self.names)
            .map(|(position, name)| (name.as_str(), Bitmask::bit(position)))
    }

    /// Number of registered attributes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no attribute is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
