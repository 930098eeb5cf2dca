//! # Registry Errors
//!
//! - [`ConfigError`] is fatal and surfaces when the registry is built.
//! - [`UnknownAttribute`] and [`Unauthorized`] reject a single request and
//!   leave state untouched.

use elig_core::Identity;
use thiserror::Error;

/// The attribute list handed to [`crate::AttributeRegistry::register`] is
/// malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// More names than bits.
    #[error("{count} attributes do not fit a {width}-bit mask")]
    TooManyAttributes {
        /// Number of names supplied.
        count: usize,
        /// Mask width in bits.
        width: u32,
    },

    /// The same name appears twice.
    #[error("duplicate attribute {name:?} at positions {first} and {second}")]
    DuplicateAttribute {
        /// The repeated name.
        name: String,
        /// Position of the first occurrence.
        first: u32,
        /// Position of the repeat.
        second: u32,
    },

    /// A name is empty or whitespace only.
    #[error("attribute at position {position} has an empty name")]
    EmptyName {
        /// Position of the offending entry.
        position: usize,
    },
}

/// A lookup named an attribute that was never registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown attribute {0:?}")]
pub struct UnknownAttribute(pub String);

/// A mask mutation was attempted by someone other than the authority.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{actor} is not the registry authority")]
pub struct Unauthorized {
    /// Who attempted the mutation.
    pub actor: Identity,
}
