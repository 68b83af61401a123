// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Prime field elements.

use crate::errors::{FieldError, FieldResult};
use crate::field_extension::{Algebraic, FieldExtension};
use crate::macros::forward_binary_ops;
use crate::number::{Exact, Number};
use crate::padic::PAdic;
use crate::roots::{PrimeFieldRootFinder, RootFinder};
use crate::utils::{mod_inverse, power, reduce};
use num::rational::BigRational;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An element of the finite field with `modulus` elements.
///
/// The modulus is assumed to be prime and is not checked. A composite modulus
/// shows up as a [`FieldError::NotInvertible`] the first time a zero divisor
/// gets inverted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "(BigInt, BigInt)", try_from = "(BigInt, BigInt)")
)]
pub struct ModP {
    /// Always in `[0, modulus)`.
    value: BigInt,
    modulus: BigInt,
}

impl ModP {
    /// Reduces `n` into the field of integers modulo `p`.
    ///
    /// Fractions become `numerator * denominator^-1`. Complex inputs need a square
    /// root of -1 in the field and fail with [`FieldError::ExtensionRequired`]
    /// when there is none.
    pub fn new(n: impl Into<Number>, p: impl Into<BigInt>) -> FieldResult<Self> {
        Self::new_with(n, p, &PrimeFieldRootFinder)
    }

    /// Same as [`ModP::new`], with an explicit root finder for complex inputs.
    pub fn new_with(
        n: impl Into<Number>,
        p: impl Into<BigInt>,
        finder: &dyn RootFinder,
    ) -> FieldResult<Self> {
        let modulus: BigInt = p.into();
        if !modulus.is_positive() {
            return Err(FieldError::InvalidModulus { modulus });
        }
        let n: Number = n.into();
        Self::from_exact(n.into_exact()?, &modulus, finder)
    }

    pub(crate) fn from_reduced(value: BigInt, modulus: &BigInt) -> Self {
        Self {
            value: reduce(&value, modulus),
            modulus: modulus.clone(),
        }
    }

    fn from_exact(exact: Exact, modulus: &BigInt, finder: &dyn RootFinder) -> FieldResult<Self> {
        match exact {
            Exact::Integer(n) => Ok(Self::from_reduced(n, modulus)),
            Exact::Rational(q) => Self::from_rational(&q, modulus),
            Exact::Complex(c) => {
                let re = Self::from_rational(&c.re, modulus)?;
                let im = Self::from_rational(&c.im, modulus)?;
                let minus_one = Self::from_reduced(-BigInt::one(), modulus);
                let i = finder
                    .roots(&minus_one, 2)?
                    .and_then(|roots| roots.into_iter().next())
                    .ok_or_else(|| {
                        FieldError::extension_required(format!(
                            "{} + {}i mod {modulus} (no square root of -1)",
                            c.re, c.im
                        ))
                    })?;
                re.try_add(&i.try_mul(&im)?)
            }
        }
    }

    fn from_rational(q: &BigRational, modulus: &BigInt) -> FieldResult<Self> {
        let numer = Self::from_reduced(q.numer().clone(), modulus);
        let denom = Self::from_reduced(q.denom().clone(), modulus);
        numer.try_div(&denom)
    }

    /// The residue of a p-adic integer: `mantissa * p^n` modulo `p^(n + k)`.
    pub fn from_padic(x: &PAdic) -> FieldResult<Self> {
        let value = x.to_integer()?;
        let exponent = u64::try_from(x.valuation() + x.precision() as i64).map_err(|_| {
            FieldError::conversion(format!("{x} has no residue modulo a power of its prime"))
        })?;
        Ok(Self::from_reduced(value, &power(x.prime(), exponent)))
    }

    /// Rebuilds an element from its `(value, modulus)` state tuple.
    pub fn from_state(state: (BigInt, BigInt)) -> FieldResult<Self> {
        let (value, modulus) = state;
        Self::new(value, modulus)
    }

    pub fn to_state(&self) -> (BigInt, BigInt) {
        (self.value.clone(), self.modulus.clone())
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Another element of the same field.
    pub fn coerce(&self, n: impl Into<Number>) -> FieldResult<Self> {
        let n: Number = n.into();
        Self::from_exact(n.into_exact()?, &self.modulus, &PrimeFieldRootFinder)
    }

    pub(crate) fn check_same_field(&self, other: &Self) -> FieldResult<()> {
        if self.modulus != other.modulus {
            return Err(FieldError::mismatch(&self.modulus, &other.modulus));
        }
        Ok(())
    }

    pub fn try_add(&self, other: &Self) -> FieldResult<Self> {
        self.check_same_field(other)?;
        Ok(Self::from_reduced(&self.value + &other.value, &self.modulus))
    }

    pub fn try_sub(&self, other: &Self) -> FieldResult<Self> {
        self.check_same_field(other)?;
        Ok(Self::from_reduced(&self.value - &other.value, &self.modulus))
    }

    pub fn try_mul(&self, other: &Self) -> FieldResult<Self> {
        self.check_same_field(other)?;
        Ok(Self::from_reduced(&self.value * &other.value, &self.modulus))
    }

    pub fn try_div(&self, other: &Self) -> FieldResult<Self> {
        self.check_same_field(other)?;
        self.try_mul(&other.inverse()?)
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    pub fn inverse(&self) -> FieldResult<Self> {
        mod_inverse(&self.value, &self.modulus)
            .map(|value| Self {
                value,
                modulus: self.modulus.clone(),
            })
            .ok_or_else(|| FieldError::not_invertible(&self.value, &self.modulus))
    }

    /// `self^exp`; negative exponents invert first.
    pub fn pow(&self, exp: i64) -> FieldResult<Self> {
        let base = if exp < 0 { self.inverse()? } else { self.clone() };
        let exp = BigInt::from(exp.unsigned_abs());
        Ok(Self {
            value: base.value.modpow(&exp, &self.modulus),
            modulus: self.modulus.clone(),
        })
    }

    /// Equality that refuses to compare elements of different fields.
    pub fn try_eq(&self, other: &Self) -> FieldResult<bool> {
        self.check_same_field(other)?;
        Ok(self.value == other.value)
    }

    /// Orders representatives in `[0, p)`; different fields are an error.
    pub fn try_cmp(&self, other: &Self) -> FieldResult<Ordering> {
        self.check_same_field(other)?;
        Ok(self.value.cmp(&other.value))
    }

    /// All solutions of `x^degree = self`, sorted, or `None` when there are none.
    pub fn roots(&self, degree: u32) -> FieldResult<Option<Vec<ModP>>> {
        PrimeFieldRootFinder.roots(self, degree)
    }

    pub fn sqrt(&self) -> FieldResult<Algebraic<ModP>> {
        self.nth_root_with(2, &PrimeFieldRootFinder)
    }

    pub fn sqrt_with(&self, finder: &dyn RootFinder) -> FieldResult<Algebraic<ModP>> {
        self.nth_root_with(2, finder)
    }

    pub fn nth_root(&self, degree: u32) -> FieldResult<Algebraic<ModP>> {
        self.nth_root_with(degree, &PrimeFieldRootFinder)
    }

    /// The smallest root of `x^degree = self`.
    ///
    /// Square roots that don't exist in the field are returned as the formal
    /// extension adjoining `self`. Higher degree roots have no extension type and
    /// fail with [`FieldError::ExtensionRequired`].
    pub fn nth_root_with(
        &self,
        degree: u32,
        finder: &dyn RootFinder,
    ) -> FieldResult<Algebraic<ModP>> {
        let roots = finder.roots(self, degree)?;
        match roots.and_then(|roots| roots.into_iter().next()) {
            Some(root) => Ok(Algebraic::Scalar(root)),
            None if degree == 2 => {
                debug!("{self} is not a square, adjoining its square root");
                Ok(FieldExtension::adjoin(self.clone()))
            }
            None => Err(FieldError::extension_required(format!(
                "root of degree {degree} of {self}"
            ))),
        }
    }

    /// Parses `"v % p"`, `"v mod p"`, or, with a modulus supplied, a bare integer
    /// or fraction such as `"-3/4"`.
    pub fn parse(input: &str, modulus: Option<&BigInt>) -> FieldResult<Self> {
        if input.contains('%') || input.contains("mod") {
            let parsed: ModP = input.parse()?;
            if let Some(modulus) = modulus {
                parsed.check_same_field(&Self::from_reduced(BigInt::zero(), modulus))?;
            }
            return Ok(parsed);
        }
        let modulus =
            modulus.ok_or_else(|| FieldError::parse(input, "a modulus is required"))?;
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let value = BigRational::from_str(&compact)
            .map_err(|e| FieldError::parse(input, e.to_string()))?;
        Self::new(value, modulus.clone())
    }
}

impl fmt::Display for ModP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} % {}", self.value, self.modulus)
    }
}

impl FromStr for ModP {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let parts: Vec<&str> = if compact.contains('%') {
            compact.split('%').collect()
        } else {
            compact.split("mod").collect()
        };
        let [value, modulus] = parts.as_slice() else {
            return Err(FieldError::parse(s, "expected '<int> % <modulus>'"));
        };
        let value = BigInt::from_str(value).map_err(|e| FieldError::parse(s, e.to_string()))?;
        let modulus =
            BigInt::from_str(modulus).map_err(|e| FieldError::parse(s, e.to_string()))?;
        Self::new(value, modulus)
    }
}

impl std::ops::Neg for &ModP {
    type Output = ModP;

    fn neg(self) -> ModP {
        ModP::from_reduced(-&self.value, &self.modulus)
    }
}

impl std::ops::Neg for ModP {
    type Output = ModP;

    fn neg(self) -> ModP {
        -&self
    }
}

forward_binary_ops!(ModP;
    Add, add, try_add;
    Sub, sub, try_sub;
    Mul, mul, try_mul;
    Div, div, try_div;
);

impl From<ModP> for (BigInt, BigInt) {
    fn from(x: ModP) -> Self {
        (x.value, x.modulus)
    }
}

impl TryFrom<(BigInt, BigInt)> for ModP {
    type Error = FieldError;

    fn try_from(state: (BigInt, BigInt)) -> Result<Self, Self::Error> {
        Self::from_state(state)
    }
}

impl From<&ModP> for Number {
    fn from(x: &ModP) -> Self {
        Number::Integer(x.value.clone())
    }
}

impl From<ModP> for Number {
    fn from(x: ModP) -> Self {
        Number::Integer(x.value)
    }
}
