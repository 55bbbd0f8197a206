//! 16.16 Fixed-Point Numbers
//!
//! Deterministic stand-in for `f32` in the indexed renderer. The raw `i32`
//! holds `value * 65536`, so ordering and equality compare raw integers.
//!
//! Addition, subtraction and negation wrap silently on overflow. Use the
//! `checked_*` / `saturating_*` variants where overflow must be observed.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Signed 16.16 fixed-point value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed16(i32);

impl Fixed16 {
    pub const FRAC_BITS: u32 = 16;
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << Self::FRAC_BITS);
    pub const HALF: Self = Self(1 << (Self::FRAC_BITS - 1));
    pub const MIN: Self = Self(i32::MIN);
    pub const MAX: Self = Self(i32::MAX);

    const SCALE: f32 = (1u32 << Self::FRAC_BITS) as f32;
    const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer to fixed: shift left 16 bits (wraps outside +-32767)
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Self(v.wrapping_shl(Self::FRAC_BITS))
    }

    /// Float to fixed: scale by 65536 and truncate toward zero
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Self((v * Self::SCALE) as i32)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::SCALE
    }

    /// Fixed to integer by arithmetic shift, i.e. floor.
    /// `-0.5` becomes `-1`; see [`Fixed16::trunc_int`] for rounding toward zero.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Fixed to integer, truncating toward zero
    #[inline]
    pub const fn trunc_int(self) -> i32 {
        self.0 / (1 << Self::FRAC_BITS)
    }

    /// Largest whole value not greater than `self`
    #[inline]
    pub const fn floor(self) -> Self {
        Self(self.0 & !Self::FRAC_MASK)
    }

    /// Fractional part in `[0, 1)`
    #[inline]
    pub const fn fract(self) -> Self {
        Self(self.0 & Self::FRAC_MASK)
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.0 < other.0 {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.0 > other.0 {
            self
        } else {
            other
        }
    }

    /// Median of three (unrolled insertion sort)
    pub fn mid(a: Self, b: Self, c: Self) -> Self {
        let mut v = [a, b, c];
        if v[0] > v[1] {
            v.swap(0, 1);
        }
        let mut j = 2;
        while j > 0 && v[j - 1] > v[j] {
            v.swap(j, j - 1);
            j -= 1;
        }
        v[1]
    }

    /// Sine of a turn fraction (`1.0` is a full 360 degree turn)
    pub fn sin(self) -> Self {
        Self::from_f32((self.to_f32() * std::f32::consts::TAU).sin())
    }

    /// Cosine of a turn fraction (`1.0` is a full 360 degree turn)
    pub fn cos(self) -> Self {
        Self::from_f32((self.to_f32() * std::f32::consts::TAU).cos())
    }

    /// Angle of the vector `(dx, dy)` as a turn fraction in `[0, 1)`
    pub fn atan2(dy: Self, dx: Self) -> Self {
        let turns = dy.to_f32().atan2(dx.to_f32()) / std::f32::consts::TAU;
        Self::from_f32(turns.rem_euclid(1.0))
    }

    // ------------------------------------------------------------------------
    // Overflow-aware variants
    // ------------------------------------------------------------------------

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let wide = (self.0 as i64 * rhs.0 as i64) >> Self::FRAC_BITS;
        i32::try_from(wide).ok().map(Self)
    }

    /// `None` for a zero divisor or a quotient outside the 16.16 range
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        let wide = ((self.0 as i64) << Self::FRAC_BITS) / rhs.0 as i64;
        i32::try_from(wide).ok().map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

// ============================================================================
// Operators
// ============================================================================

impl Add for Fixed16 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed16 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Fixed16 {
    type Output = Self;
    /// 64-bit intermediate, shifted back down to 16 fractional bits
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> Self::FRAC_BITS) as i32)
    }
}

impl Mul<i32> for Fixed16 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl Div for Fixed16 {
    type Output = Self;
    /// `(a << 16) / b` in 64 bits.
    ///
    /// # Panics
    /// Panics when `rhs` is zero, like integer division.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        assert!(rhs.0 != 0, "Fixed16 division by zero");
        Self((((self.0 as i64) << Self::FRAC_BITS) / rhs.0 as i64) as i32)
    }
}

impl Neg for Fixed16 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl AddAssign for Fixed16 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed16 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed16 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fixed16 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i32> for Fixed16 {
    fn from(v: i32) -> Self {
        Self::from_int(v)
    }
}

impl From<u8> for Fixed16 {
    fn from(v: u8) -> Self {
        Self::from_int(v as i32)
    }
}

impl From<f32> for Fixed16 {
    fn from(v: f32) -> Self {
        Self::from_f32(v)
    }
}

impl From<Fixed16> for f32 {
    fn from(v: Fixed16) -> Self {
        v.to_f32()
    }
}

impl fmt::Display for Fixed16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}
