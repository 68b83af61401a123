// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Fixed-precision p-adic numbers.

use crate::errors::{FieldError, FieldResult};
use crate::field_extension::{Algebraic, BaseRing};
use crate::macros::forward_binary_ops;
use crate::number::Number;
use crate::precision::PAdicContext;
use crate::roots::RootFinder;
use crate::utils::{power, to_base};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `mantissa * p^valuation`, known to `precision` base-`p` digits.
///
/// A value with precision zero carries no significant digits and only records
/// the power of `p` it is known to be divisible by, written `O(p^n)`.
///
/// Equality is structural: two values are equal when mantissa, prime, precision
/// and valuation all match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        into = "(BigInt, BigInt, u64, i64)",
        try_from = "(BigInt, BigInt, u64, i64)"
    )
)]
pub struct PAdic {
    /// In `[0, p^k)`, not divisible by `p` unless zero.
    num: BigInt,
    p: BigInt,
    k: u64,
    n: i64,
}

/// Result of scaling a p-adic by a scalar.
///
/// An exact zero has unlimited precision, so it is kept apart instead of being
/// turned into a value that would cap the precision of later sums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scaled {
    ExactZero,
    Value(PAdic),
}

impl Scaled {
    pub fn into_value(self) -> Option<PAdic> {
        match self {
            Scaled::ExactZero => None,
            Scaled::Value(x) => Some(x),
        }
    }

    /// `self + other`, where an exact zero leaves `other` untouched.
    pub fn add_to(&self, other: &PAdic) -> FieldResult<PAdic> {
        match self {
            Scaled::ExactZero => Ok(other.clone()),
            Scaled::Value(x) => x.try_add(other),
        }
    }
}

impl PAdic {
    /// Builds `num * p^n` with `k` significant digits under honest precision.
    ///
    /// `num` may be any [`Number`]: fractions are divided out, complex values
    /// need a square root of -1 in the p-adics.
    pub fn new(num: impl Into<Number>, p: impl Into<BigInt>, k: u64, n: i64) -> FieldResult<Self> {
        PAdicContext::honest().padic(num, p, k, n)
    }

    pub fn new_with(
        num: impl Into<Number>,
        p: impl Into<BigInt>,
        k: u64,
        n: i64,
        finder: &dyn RootFinder,
    ) -> FieldResult<Self> {
        PAdicContext::honest().padic_with(num, p, k, n, finder)
    }

    pub(crate) fn from_normalized(num: BigInt, p: BigInt, k: u64, n: i64) -> Self {
        Self { num, p, k, n }
    }

    /// Builds a value from already normalised parts, checking every invariant.
    pub fn from_parts(num: BigInt, p: BigInt, k: u64, n: i64) -> FieldResult<Self> {
        if p < BigInt::from(2) {
            return Err(FieldError::InvalidModulus { modulus: p });
        }
        if num.is_negative() || num >= power(&p, k) {
            return Err(FieldError::invalid_state(format!(
                "mantissa {num} outside [0, {p}^{k})"
            )));
        }
        if k > 0 && num.is_multiple_of(&p) {
            return Err(FieldError::invalid_state(format!(
                "mantissa {num} is divisible by {p}"
            )));
        }
        Ok(Self { num, p, k, n })
    }

    /// Rebuilds a value from its `(mantissa, prime, precision, valuation)` tuple.
    pub fn from_state(state: (BigInt, BigInt, u64, i64)) -> FieldResult<Self> {
        let (num, p, k, n) = state;
        Self::from_parts(num, p, k, n)
    }

    pub fn to_state(&self) -> (BigInt, BigInt, u64, i64) {
        (self.num.clone(), self.p.clone(), self.k, self.n)
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.num
    }

    pub fn prime(&self) -> &BigInt {
        &self.p
    }

    /// Number of significant digits.
    pub fn precision(&self) -> u64 {
        self.k
    }

    pub fn valuation(&self) -> i64 {
        self.n
    }

    /// True when no significant digit is left.
    pub fn is_zero(&self) -> bool {
        self.k == 0
    }

    /// Precision a coerced operand needs so that it never limits `self`.
    pub(crate) fn precision_bound(&self) -> u64 {
        (self.n + self.k as i64).max(self.k as i64) as u64
    }

    /// The `k` significant digits, least significant first.
    pub fn digits(&self) -> Vec<BigInt> {
        to_base(&self.num, &self.p, self.k as usize)
    }

    /// Significant digits keyed by the power of `p` they multiply.
    pub fn digits_by_power(&self) -> BTreeMap<i64, BigInt> {
        (self.n..).zip(self.digits()).collect()
    }

    /// Digits starting from `p^0`, with the leading zeros the valuation implies.
    pub fn digits_from_zero(&self) -> FieldResult<Vec<BigInt>> {
        let zeros = usize::try_from(self.n).map_err(|_| {
            FieldError::conversion(format!("{self} has digits below p^0"))
        })?;
        let mut digits = vec![BigInt::zero(); zeros];
        digits.extend(self.digits());
        Ok(digits)
    }

    /// `mantissa * p^valuation` as an integer.
    pub fn to_integer(&self) -> FieldResult<BigInt> {
        let exponent = u64::try_from(self.n)
            .map_err(|_| FieldError::conversion(format!("{self} is not a p-adic integer")))?;
        Ok(&self.num * power(&self.p, exponent))
    }

    /// The p-adic absolute value `p^-n`, carried as the valuation of a digitless value.
    pub fn abs(&self) -> PAdic {
        Self::from_normalized(BigInt::zero(), self.p.clone(), 0, self.n)
    }

    /// `other` in the same prime with enough precision not to limit `self`.
    pub fn coerce(&self, other: impl Into<Number>) -> FieldResult<PAdic> {
        PAdicContext::honest().coerce(self, other)
    }

    pub fn try_add(&self, other: &Self) -> FieldResult<Self> {
        PAdicContext::honest().add(self, other)
    }

    pub fn try_sub(&self, other: &Self) -> FieldResult<Self> {
        PAdicContext::honest().sub(self, other)
    }

    pub fn try_mul(&self, other: &Self) -> FieldResult<Self> {
        PAdicContext::honest().mul(self, other)
    }

    pub fn try_div(&self, other: &Self) -> FieldResult<Self> {
        PAdicContext::honest().div(self, other)
    }

    pub fn mul_scalar(&self, scalar: impl Into<Number>) -> FieldResult<Scaled> {
        PAdicContext::honest().mul_scalar(self, scalar)
    }

    pub fn pow(&self, exp: i64) -> FieldResult<Self> {
        PAdicContext::honest().pow(self, exp)
    }

    pub fn pow_big(&self, exp: &BigInt) -> FieldResult<Self> {
        PAdicContext::honest().pow_big(self, exp)
    }

    /// Compares p-adic absolute values, so a higher valuation orders as smaller.
    pub fn try_cmp(&self, other: &Self) -> FieldResult<Ordering> {
        PAdicContext::honest().cmp(self, other)
    }

    pub fn sqrt(&self) -> FieldResult<Algebraic<PAdic>> {
        PAdicContext::honest().sqrt(self)
    }

    pub fn sqrt_with(&self, finder: &dyn RootFinder) -> FieldResult<Algebraic<PAdic>> {
        PAdicContext::honest().sqrt_with(self, finder)
    }

    pub fn log(&self) -> FieldResult<PAdic> {
        PAdicContext::honest().log(self)
    }

    pub fn log_base(&self, base: impl Into<Number>) -> FieldResult<PAdic> {
        PAdicContext::honest().log_base(self, base)
    }
}

impl std::ops::Neg for &PAdic {
    type Output = PAdic;

    fn neg(self) -> PAdic {
        PAdicContext::honest().neg(self)
    }
}

impl std::ops::Neg for PAdic {
    type Output = PAdic;

    fn neg(self) -> PAdic {
        -&self
    }
}

forward_binary_ops!(PAdic;
    Add, add, try_add;
    Sub, sub, try_sub;
    Mul, mul, try_mul;
    Div, div, try_div;
);

impl From<PAdic> for (BigInt, BigInt, u64, i64) {
    fn from(x: PAdic) -> Self {
        (x.num, x.p, x.k, x.n)
    }
}

impl TryFrom<(BigInt, BigInt, u64, i64)> for PAdic {
    type Error = FieldError;

    fn try_from(state: (BigInt, BigInt, u64, i64)) -> Result<Self, Self::Error> {
        Self::from_state(state)
    }
}

impl BaseRing for PAdic {
    fn zero_like(&self) -> Self {
        PAdicContext::honest().coerce_integer(self, BigInt::zero())
    }

    fn one_like(&self) -> Self {
        PAdicContext::honest().coerce_integer(self, 1.into())
    }

    fn is_zero(&self) -> bool {
        PAdic::is_zero(self)
    }

    fn ring_add(&self, other: &Self) -> FieldResult<Self> {
        self.try_add(other)
    }

    fn ring_mul(&self, other: &Self) -> FieldResult<Self> {
        self.try_mul(other)
    }

    fn ring_div(&self, other: &Self) -> FieldResult<Self> {
        self.try_div(other)
    }

    fn ring_neg(&self) -> Self {
        -self
    }

    fn check_same_domain(&self, other: &Self) -> FieldResult<()> {
        PAdicContext::check_same_prime(self, other)
    }

    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.p
            .cmp(&other.p)
            .then_with(|| self.n.cmp(&other.n))
            .then_with(|| self.num.cmp(&other.num))
            .then_with(|| self.k.cmp(&other.k))
    }
}
