//! # Bit Arithmetic — Fixed-Width Two's-Complement Masks
//!
//! Defines [`Bitmask`], the 256-bit signed integer that packs every boolean
//! attribute of an applicant, and the total functions the registry uses to
//! build and inspect masks: shift left, arithmetic shift right, AND, OR, XOR
//! and NOT.
//!
//! ## Width Invariant
//!
//! All operations act on exactly [`WIDTH`] bits in two's-complement form.
//! Host shift instructions reduce the shift count modulo the register width;
//! these functions do not. A count at or past the width saturates:
//!
//! | operation              | `positions >= WIDTH`                 |
//! |------------------------|--------------------------------------|
//! | [`shift_left`]         | `0`                                  |
//! | [`shift_right`]        | `0` if `value >= 0`, `-1` otherwise  |
//!
//! Bits shifted out of the top by [`shift_left`] are discarded, so the
//! result may differ in sign from `value * 2^positions`. That is not an
//! error.
//!
//! ## Narrow Widths
//!
//! Complementing a value at a narrower width and then reading the result at
//! the full width gives a different number depending on whether the narrow
//! value is read as signed or unsigned:
//!
//! ```text
//! not(15)                    == -16
//! not_in(15, Width::BYTE)    == -16   (sign-extended from 8 bits)
//! not_unsigned_in(15, BYTE)  == 240   (zero-extended from 8 bits)
//! ```
//!
//! Every narrow call site names its [`Width`] and its extension explicitly.

use std::fmt;
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, Shr,
};
use std::str::FromStr;

use ethnum::I256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BitmaskParseError;

/// Width of every [`Bitmask`], in bits.
pub const WIDTH: u32 = 256;

/// A fixed-width signed attribute mask.
///
/// Each registered attribute owns exactly one bit. The mask of an applicant
/// is the OR (or XOR accumulation) of the attribute bits they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bitmask(I256);

impl Bitmask {
    /// The empty mask: no attributes.
    pub const ZERO: Bitmask = Bitmask(I256::ZERO);
    /// The mask with only bit 0 set.
    pub const ONE: Bitmask = Bitmask(I256::ONE);
    /// All bits set (`-1` in two's complement).
    pub const ALL: Bitmask = Bitmask(I256::MINUS_ONE);

    /// Build a mask from a signed 128-bit value, sign-extending to [`WIDTH`].
    pub const fn from_i128(value: i128) -> Self {
        Self(I256::new(value))
    }

    /// The mask with only bit `position` set. Zero if `position >= WIDTH`.
    ///
    /// `bit(WIDTH - 1)` is the sign bit, so that mask is negative.
    pub fn bit(position: u32) -> Self {
        shift_left(Self::ONE, position)
    }

    /// Access the inner 256-bit integer.
    pub fn as_i256(&self) -> I256 {
        self.0
    }

    /// The value as `i128`, if it fits without loss.
    pub fn to_i128(&self) -> Option<i128> {
        let narrow = self.0.as_i128();
        (I256::new(narrow) == self.0).then_some(narrow)
    }

    /// Whether no bit is set.
    pub fn is_zero(&self) -> bool {
        self.0 == I256::ZERO
    }

    /// Whether the sign bit is set.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Whether bit `position` is set. Always false past the width.
    pub fn is_bit_set(&self, position: u32) -> bool {
        position < WIDTH && !and(*self, Self::bit(position)).is_zero()
    }

    /// Whether every bit of `other` is also set in `self`.
    pub fn contains_all(&self, other: Bitmask) -> bool {
        and(*self, other) == other
    }

    /// Whether `self` and `other` share at least one bit.
    pub fn intersects(&self, other: Bitmask) -> bool {
        !and(*self, other).is_zero()
    }

    /// Whether every bit of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: Bitmask) -> bool {
        and(*self, not(other)).is_zero()
    }

    /// `self` with every bit of `mask` cleared, whatever their current value.
    pub fn clear(&self, mask: Bitmask) -> Bitmask {
        and(*self, not(mask))
    }

    /// Number of set bits across the full width.
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    /// Positions of the set bits, lowest first.
    pub fn set_bits(&self) -> impl Iterator<Item = u32> + '_ {
        (0..WIDTH).filter(move |&i| self.is_bit_set(i))
    }
}

impl Default for Bitmask {
    fn default() -> Self {
        Self::ZERO
    }
}

// ─── Width ───────────────────────────────────────────────────────────

/// An explicit bit width in `1..=WIDTH`, chosen per call site for
/// narrow-width operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Width(u32);

impl Width {
    /// 8 bits.
    pub const BYTE: Width = Width(8);
    /// 64 bits.
    pub const WORD: Width = Width(64);
    /// The full mask width.
    pub const FULL: Width = Width(WIDTH);

    /// A width of `bits` bits, or `None` outside `1..=WIDTH`.
    pub fn new(bits: u32) -> Option<Self> {
        (1..=WIDTH).contains(&bits).then_some(Self(bits))
    }

    /// The number of bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.0)
    }
}

// ─── Operations ──────────────────────────────────────────────────────

/// Shift left by `positions`, discarding bits that leave the top and
/// filling the bottom with zeros. Saturates to `0` at `positions >= WIDTH`.
pub fn shift_left(value: Bitmask, positions: u32) -> Bitmask {
    if positions >= WIDTH {
        return Bitmask::ZERO;
    }
    Bitmask(value.0.wrapping_shl(positions))
}

/// Arithmetic shift right by `positions`: `floor(value / 2^positions)`.
///
/// Vacated high bits take the sign bit. At `positions >= WIDTH` the result
/// is `0` for non-negative values and `-1` for negative ones.
pub fn shift_right(value: Bitmask, positions: u32) -> Bitmask {
    if positions >= WIDTH {
        return if value.is_negative() {
            Bitmask::ALL
        } else {
            Bitmask::ZERO
        };
    }
    Bitmask(value.0.wrapping_shr(positions))
}

/// Bitwise AND.
pub fn and(a: Bitmask, b: Bitmask) -> Bitmask {
    Bitmask(a.0 & b.0)
}

/// Bitwise OR.
pub fn or(a: Bitmask, b: Bitmask) -> Bitmask {
    Bitmask(a.0 | b.0)
}

/// Bitwise XOR.
pub fn xor(a: Bitmask, b: Bitmask) -> Bitmask {
    Bitmask(a.0 ^ b.0)
}

/// Bitwise complement at the full width: `not(v) == -v - 1`.
pub fn not(value: Bitmask) -> Bitmask {
    Bitmask(!value.0)
}

/// Keep the low `width` bits and zero everything above.
pub fn truncate_unsigned(value: Bitmask, width: Width) -> Bitmask {
    and(value, not(shift_left(Bitmask::ALL, width.bits())))
}

/// Keep the low `width` bits and sign-extend from bit `width - 1`.
pub fn truncate_signed(value: Bitmask, width: Width) -> Bitmask {
    let excess = WIDTH - width.bits();
    shift_right(shift_left(value, excess), excess)
}

/// Complement read back as a signed `width`-bit value.
pub fn not_in(value: Bitmask, width: Width) -> Bitmask {
    truncate_signed(not(value), width)
}

/// Complement read back as an unsigned `width`-bit value.
pub fn not_unsigned_in(value: Bitmask, width: Width) -> Bitmask {
    truncate_unsigned(not(value), width)
}

// ─── Operator impls ──────────────────────────────────────────────────

impl BitAnd for Bitmask {
    type Output = Bitmask;
    fn bitand(self, rhs: Bitmask) -> Bitmask {
        and(self, rhs)
    }
}

impl BitOr for Bitmask {
    type Output = Bitmask;
    fn bitor(self, rhs: Bitmask) -> Bitmask {
        or(self, rhs)
    }
}

impl BitXor for Bitmask {
    type Output = Bitmask;
    fn bitxor(self, rhs: Bitmask) -> Bitmask {
        xor(self, rhs)
    }
}

impl Not for Bitmask {
    type Output = Bitmask;
    fn not(self) -> Bitmask {
        not(self)
    }
}

impl BitAndAssign for Bitmask {
    fn bitand_assign(&mut self, rhs: Bitmask) {
        *self = and(*self, rhs);
    }
}

impl BitOrAssign for Bitmask {
    fn bitor_assign(&mut self, rhs: Bitmask) {
        *self = or(*self, rhs);
    }
}

impl BitXorAssign for Bitmask {
    fn bitxor_assign(&mut self, rhs: Bitmask) {
        *self = xor(*self, rhs);
    }
}

/// Saturating, see [`shift_left`].
impl Shl<u32> for Bitmask {
    type Output = Bitmask;
    fn shl(self, positions: u32) -> Bitmask {
        shift_left(self, positions)
    }
}

/// Saturating and sign-propagating, see [`shift_right`].
impl Shr<u32> for Bitmask {
    type Output = Bitmask;
    fn shr(self, positions: u32) -> Bitmask {
        shift_right(self, positions)
    }
}

impl From<i64> for Bitmask {
    fn from(value: i64) -> Self {
        Self::from_i128(i128::from(value))
    }
}

impl From<i128> for Bitmask {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<I256> for Bitmask {
    fn from(value: I256) -> Self {
        Self(value)
    }
}

// ─── Text and serde ──────────────────────────────────────────────────

impl fmt::Display for Bitmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Bitmask {
    type Err = BitmaskParseError;

    /// Parse a signed decimal integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<I256>()
            .map(Self)
            .map_err(|e| BitmaskParseError {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Serialized as a decimal string; 256-bit values do not fit JSON numbers.
impl Serialize for Bitmask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bitmask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BitmaskVisitor;

        impl<'de> Visitor<'de> for BitmaskVisitor {
            type Value = Bitmask;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal bitmask string or an integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Bitmask, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Bitmask, E> {
                Ok(Bitmask::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Bitmask, E> {
                Ok(Bitmask::from(i128::from(v)))
            }
        }

        deserializer.deserialize_any(BitmaskVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(v: i128) -> Bitmask {
        Bitmask::from(v)
    }

    #[test]
    fn test_shift_left_basic() {
        assert_eq!(shift_left(m(1), 0), m(1));
        assert_eq!(shift_left(m(1), 9), m(512));
        assert_eq!(shift_left(m(-3), 2), m(-12));
    }

    #[test]
    fn test_shift_left_saturates_at_width() {
        for v in [0, 1, -1, 586, i128::MAX, i128::MIN] {
            assert_eq!(shift_left(m(v), WIDTH), Bitmask::ZERO);
            assert_eq!(shift_left(m(v), WIDTH + 1), Bitmask::ZERO);
            assert_eq!(shift_left(m(v), u32::MAX), Bitmask::ZERO);
        }
    }

    #[test]
    fn test_shift_left_into_sign_bit() {
        let top = shift_left(m(1), WIDTH - 1);
        assert!(top.is_negative());
        assert_eq!(top, Bitmask::bit(WIDTH - 1));
        // The bit leaves the top entirely on the next shift.
        assert_eq!(shift_left(top, 1), Bitmask::ZERO);
    }

    #[test]
    fn test_shift_right_floors_negative() {
        assert_eq!(shift_right(m(-17), 3), m(-3));
        assert_eq!(shift_right(m(17), 3), m(2));
        assert_eq!(shift_right(m(-1), 1), m(-1));
        assert_eq!(shift_right(m(-8), 3), m(-1));
        assert_eq!(shift_right(m(-9), 3), m(-2));
    }

    #[test]
    fn test_shift_right_saturates_at_width() {
        assert_eq!(shift_right(m(-1), WIDTH), m(-1));
        assert_eq!(shift_right(m(i128::MIN), WIDTH + 7), m(-1));
        assert_eq!(shift_right(m(i128::MAX), WIDTH), Bitmask::ZERO);
        assert_eq!(shift_right(m(0), u32::MAX), Bitmask::ZERO);
    }

    #[test]
    fn test_shift_right_just_below_width() {
        assert_eq!(shift_right(Bitmask::bit(WIDTH - 1), WIDTH - 1), m(-1));
        assert_eq!(shift_right(m(1), WIDTH - 1), Bitmask::ZERO);
    }

    #[test]
    fn test_logic_ops() {
        assert_eq!(and(m(0b1100), m(0b1010)), m(0b1000));
        assert_eq!(or(m(0b1100), m(0b1010)), m(0b1110));
        assert_eq!(xor(m(0b1100), m(0b1010)), m(0b0110));
        assert_eq!(and(m(-1), m(586)), m(586));
    }

    #[test]
    fn test_not_is_negate_minus_one() {
        for v in [0, 1, -1, 15, 586, -586, i128::MAX, i128::MIN] {
            assert_eq!(not(m(v)).as_i256(), -I256::new(v) - I256::ONE);
        }
    }

    #[test]
    fn test_narrow_not_pitfall() {
        assert_eq!(not(m(15)), m(-16));
        assert_eq!(not_in(m(15), Width::BYTE), m(-16));
        assert_eq!(not_unsigned_in(m(15), Width::BYTE), m(240));
    }

    #[test]
    fn test_narrow_not_discards_high_bits() {
        // 200 does not fit a signed byte; its complement read back at 8 bits
        // is 55, not the full-width -201.
        assert_eq!(not(m(200)), m(-201));
        assert_eq!(not_in(m(200), Width::BYTE), m(55));
        assert_eq!(not_unsigned_in(m(200), Width::BYTE), m(55));
    }

    #[test]
    fn test_full_width_narrow_ops_are_identity() {
        for v in [0, 7, -7, i128::MIN] {
            assert_eq!(not_in(m(v), Width::FULL), not(m(v)));
            assert_eq!(truncate_signed(m(v), Width::FULL), m(v));
            assert_eq!(truncate_unsigned(m(v), Width::FULL), m(v));
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_unsigned(m(-1), Width::BYTE), m(255));
        assert_eq!(truncate_signed(m(255), Width::BYTE), m(-1));
        assert_eq!(truncate_signed(m(127), Width::BYTE), m(127));
        assert_eq!(truncate_unsigned(m(0x1_0000_0001), Width::WORD), m(0x1_0000_0001));
    }

    #[test]
    fn test_width_bounds() {
        assert!(Width::new(0).is_none());
        assert!(Width::new(WIDTH + 1).is_none());
        assert_eq!(Width::new(WIDTH), Some(Width::FULL));
        assert_eq!(Width::new(8).map(Width::bits), Some(8));
    }

    #[test]
    fn test_helpers() {
        let holder = m(586);
        assert!(holder.contains_all(m(512)));
        assert!(!holder.contains_all(m(513)));
        assert!(holder.intersects(m(2)));
        assert!(m(74).is_subset_of(holder));
        assert!(!holder.is_subset_of(m(74)));
        assert_eq!(holder.clear(m(512)), m(74));
        assert_eq!(m(74).clear(m(512)), m(74));
        assert_eq!(holder.count_ones(), 4);
        assert_eq!(holder.set_bits().collect::<Vec<_>>(), vec![1, 3, 6, 9]);
        assert!(!holder.is_bit_set(WIDTH));
    }

    #[test]
    fn test_bit_out_of_range_is_zero() {
        assert_eq!(Bitmask::bit(WIDTH), Bitmask::ZERO);
        assert_eq!(Bitmask::bit(9), m(512));
    }

    #[test]
    fn test_operators_match_functions() {
        let (a, b) = (m(0b1100), m(0b1010));
        assert_eq!(a & b, and(a, b));
        assert_eq!(a | b, or(a, b));
        assert_eq!(a ^ b, xor(a, b));
        assert_eq!(!a, not(a));
        assert_eq!(a << WIDTH, Bitmask::ZERO);
        assert_eq!(m(-17) >> 3, m(-3));

        let mut c = a;
        c ^= b;
        c ^= b;
        assert_eq!(c, a);
    }

    #[test]
    fn test_to_i128() {
        assert_eq!(m(-586).to_i128(), Some(-586));
        assert_eq!(Bitmask::bit(200).to_i128(), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("586".parse::<Bitmask>().unwrap(), m(586));
        assert_eq!(" -3 ".parse::<Bitmask>().unwrap(), m(-3));
        assert!("abc".parse::<Bitmask>().is_err());
        assert!("".parse::<Bitmask>().is_err());
        assert_eq!(m(-586).to_string(), "-586");
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let json = serde_json::to_string(&m(586)).unwrap();
        assert_eq!(json, "\"586\"");
        let parsed: Bitmask = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, m(586));
        let from_number: Bitmask = serde_json::from_str("74").unwrap();
        assert_eq!(from_number, m(74));
        let big = Bitmask::bit(255);
        let parsed: Bitmask = serde_json::from_str(&serde_json::to_string(&big).unwrap()).unwrap();
        assert_eq!(parsed, big);
    }
}
