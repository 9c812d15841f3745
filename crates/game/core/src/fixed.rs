//! Two-decimal fixed-point numbers for deterministic attribute arithmetic.
//!
//! Every ledger value is a [`FixedPoint2`]. Values are stored as integer
//! hundredths so that addition, subtraction and comparison are exact and
//! identical on every platform. Multiplication and division go through an
//! `i128` intermediate and round half away from zero. Every operator
//! saturates at [`FixedPoint2::MIN`]/[`FixedPoint2::MAX`] instead of wrapping.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Fixed-point value with scale 100.
///
/// Represents decimal values as integers: 0.25 → 25, 1.0 → 100.
///
/// Human-readable formats (RON, TOML, JSON) see a decimal number; binary
/// formats carry the raw integer so replicated values are exact.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint2(i64);

impl FixedPoint2 {
    /// Scale factor: 100 = 1.0
    pub const SCALE: i64 = 100;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(Self::SCALE);
    /// Smallest representable positive step (0.01).
    pub const EPSILON: Self = Self(1);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    /// Create from raw scaled value
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Create from integer (e.g., 5 → 500)
    #[inline]
    pub const fn from_int(v: i64) -> Self {
        Self(v.saturating_mul(Self::SCALE))
    }

    /// Convert from f64, rounding half away from zero.
    ///
    /// NaN and infinities map to zero; out-of-range values saturate.
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            return Self::ZERO;
        }

        let scaled = (v * Self::SCALE as f64).round();
        if scaled >= i64::MAX as f64 {
            return Self::MAX;
        }
        if scaled <= i64::MIN as f64 {
            return Self::MIN;
        }

        Self(scaled as i64)
    }

    /// Convert from f32 (widened to f64 before scaling).
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Self::from_f64(f64::from(v))
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Raw integer value
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Returns the larger of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 { self } else { other }
    }

    /// Returns the smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    #[inline]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub const fn saturating_neg(self) -> Self {
        Self(self.0.saturating_neg())
    }

    /// Multiply by a float factor and round back onto the fixed grid.
    ///
    /// Used for configured coefficients, which are authored as floats.
    #[inline]
    pub fn mul_f32(self, factor: f32) -> Self {
        Self::from_f64(self.to_f64() * f64::from(factor))
    }

    /// Divide by a float factor. Division by zero yields zero.
    #[inline]
    pub fn div_f32(self, factor: f32) -> Self {
        if factor == 0.0 {
            return Self::ZERO;
        }
        Self::from_f64(self.to_f64() / f64::from(factor))
    }
}

/// Integer division rounding half away from zero.
fn div_round(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        if (numerator < 0) == (denominator < 0) {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}

fn narrow(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

impl Add for FixedPoint2 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for FixedPoint2 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl Sub for FixedPoint2 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        self.saturating_sub(other)
    }
}

impl SubAssign for FixedPoint2 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = self.saturating_sub(other);
    }
}

impl Neg for FixedPoint2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.saturating_neg()
    }
}

impl Mul for FixedPoint2 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        let product = self.0 as i128 * other.0 as i128;
        Self(narrow(div_round(product, Self::SCALE as i128)))
    }
}

impl MulAssign for FixedPoint2 {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Div for FixedPoint2 {
    type Output = Self;
    #[inline]
    fn div(self, other: Self) -> Self {
        if other.0 == 0 {
            return Self::ZERO;
        }
        let scaled = self.0 as i128 * Self::SCALE as i128;
        Self(narrow(div_round(scaled, other.0 as i128)))
    }
}

impl DivAssign for FixedPoint2 {
    #[inline]
    fn div_assign(&mut self, other: Self) {
        *self = *self / other;
    }
}

impl Sum for FixedPoint2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a FixedPoint2> for FixedPoint2 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<i32> for FixedPoint2 {
    fn from(v: i32) -> Self {
        Self::from_int(i64::from(v))
    }
}

impl From<f64> for FixedPoint2 {
    fn from(v: f64) -> Self {
        Self::from_f64(v)
    }
}

impl From<f32> for FixedPoint2 {
    fn from(v: f32) -> Self {
        Self::from_f32(v)
    }
}

impl From<FixedPoint2> for f64 {
    fn from(v: FixedPoint2) -> Self {
        v.to_f64()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FixedPoint2 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_f64(self.to_f64())
        } else {
            serializer.serialize_i64(self.0)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FixedPoint2 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            <f64 as serde::Deserialize>::deserialize(deserializer).map(Self::from_f64)
        } else {
            <i64 as serde::Deserialize>::deserialize(deserializer).map(Self::from_raw)
        }
    }
}

impl fmt::Debug for FixedPoint2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedPoint2({} = {})", self.0, self)
    }
}

impl fmt::Display for FixedPoint2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = magnitude / scale;
        let frac = magnitude % scale;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}")
        }
    }
}
