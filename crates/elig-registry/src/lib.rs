//! # elig-registry — Attribute Registry and Applicant Masks
//!
//! Holds the two tables the eligibility engine reads:
//!
//! - **Attributes** (`attributes.rs`): the closed, ordered mapping from
//!   attribute name to a single-bit [`Bitmask`](elig_core::Bitmask). Built
//!   once and never mutated.
//!
//! - **Store** (`store.rs`): the mapping from applicant
//!   [`Identity`](elig_core::Identity) to accumulated mask. Only the
//!   authority recorded at construction may toggle bits.
//!
//! ## Crate Policy
//!
//! - Depends only on `elig-core` internally.
//! - No global state. Both tables are owned values.

pub mod attributes;
pub mod error;
pub mod store;

pub use attributes::AttributeRegistry;
pub use error::{ConfigError, Unauthorized, UnknownAttribute};
pub use store::ApplicantMaskStore;
