//! # Eligibility Policies
//!
//! How a holder mask is compared with the required mask. The predicate is a
//! named, configured choice because the reasonable readings disagree:
//!
//! | policy     | predicate                         | holder `74` vs required `586` |
//! |------------|-----------------------------------|-------------------------------|
//! | `subset`   | `holder & !required == 0`         | admitted                      |
//! | `superset` | `holder & required == required`   | rejected                      |
//! | `exact`    | `holder == required`              | rejected                      |
//!
//! `subset` is the default. It rejects holders with any attribute outside
//! the required set but does not demand every required attribute; the
//! engine's separate eligible-bit gate still applies.

use std::fmt;
use std::str::FromStr;

use elig_core::Bitmask;
use serde::{Deserialize, Serialize};

/// The predicate relating holder and required masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// No holder bit outside the required set.
    #[default]
    Subset,
    /// Every required bit present in the holder.
    Superset,
    /// Holder and required masks identical.
    Exact,
}

impl EligibilityPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [EligibilityPolicy; 3] = [Self::Subset, Self::Superset, Self::Exact];

    /// Whether `holder` satisfies this policy against `required`.
    pub fn admits(&self, holder: Bitmask, required: Bitmask) -> bool {
        match self {
            Self::Subset => holder.is_subset_of(required),
            Self::Superset => holder.contains_all(required),
            Self::Exact => holder == required,
        }
    }

    /// The configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subset => "subset",
            Self::Superset => "superset",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for EligibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EligibilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown eligibility policy: {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m(v: i64) -> Bitmask {
        Bitmask::from(v)
    }

    const REQUIRED: i64 = 2 | 8 | 64 | 512;

    #[test]
    fn test_subset_admits_missing_bits() {
        let p = EligibilityPolicy::Subset;
        assert!(p.admits(m(586), m(REQUIRED)));
        assert!(p.admits(m(74), m(REQUIRED)));
        assert!(p.admits(Bitmask::ZERO, m(REQUIRED)));
    }

    #[test]
    fn test_subset_rejects_extraneous_bits() {
        // Also male (1): outside the required set.
        assert!(!EligibilityPolicy::Subset.admits(m(586 | 1), m(REQUIRED)));
        assert!(!EligibilityPolicy::Subset.admits(m(-1), m(REQUIRED)));
    }

    #[test]
    fn test_superset() {
        let p = EligibilityPolicy::Superset;
        assert!(p.admits(m(586), m(REQUIRED)));
        assert!(p.admits(m(586 | 1), m(REQUIRED)));
        assert!(!p.admits(m(74), m(REQUIRED)));
    }

    #[test]
    fn test_exact() {
        let p = EligibilityPolicy::Exact;
        assert!(p.admits(m(586), m(REQUIRED)));
        assert!(!p.admits(m(586 | 1), m(REQUIRED)));
        assert!(!p.admits(m(74), m(REQUIRED)));
    }

    #[test]
    fn test_default_is_subset() {
        assert_eq!(EligibilityPolicy::default(), EligibilityPolicy::Subset);
    }

    #[test]
    fn test_parse_and_serde_spelling() {
        for p in EligibilityPolicy::ALL {
            assert_eq!(p.as_str().parse::<EligibilityPolicy>().unwrap(), p);
            assert_eq!(serde_json::to_string(&p).unwrap(), format!("\"{p}\""));
        }
        assert!("Subset".parse::<EligibilityPolicy>().is_err());
    }

    proptest! {
        /// Exact is exactly the conjunction of the other two.
        #[test]
        fn exact_is_subset_and_superset(holder in any::<i64>(), required in any::<i64>()) {
            let (h, r) = (m(holder), m(required));
            let subset = EligibilityPolicy::Subset.admits(h, r);
            let superset = EligibilityPolicy::Superset.admits(h, r);
            prop_assert_eq!(EligibilityPolicy::Exact.admits(h, r), subset && superset);
        }

        /// Every policy admits the required mask itself.
        #[test]
        fn required_mask_always_admitted(required in any::<i64>()) {
            for p in EligibilityPolicy::ALL {
                prop_assert!(p.admits(m(required), m(required)));
            }
        }
    }
}
