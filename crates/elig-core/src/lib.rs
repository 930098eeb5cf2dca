//! # elig-core — Foundational Types for the Eligibility Registry
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One fixed width.** Every attribute mask is a [`Bitmask`], a signed
//!    two's-complement integer of exactly [`WIDTH`] bits. There is no
//!    ambient "int" whose width depends on the host.
//!
//! 2. **Total bit arithmetic.** Shifts saturate when the count reaches the
//!    width instead of wrapping the count. Narrow-width complements take an
//!    explicit [`Width`] so a call site can never mix widths silently.
//!
//! 3. **Newtype wrappers for domain primitives.** `Identity` and `Amount` are
//!    distinct types. No bare UUIDs or integers cross crate boundaries.
//!
//! 4. **UTC-only timestamps.** Audit records use [`Timestamp`], UTC with
//!    seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `elig-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bits;
pub mod error;
pub mod identity;
pub mod temporal;

pub use bits::{Bitmask, Width, WIDTH};
pub use error::{BitmaskParseError, TransferError};
pub use identity::{Amount, Identity};
pub use temporal::Timestamp;
