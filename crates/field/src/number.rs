// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Numeric inputs accepted by the field constructors.
//!
//! Every constructor and every `coerce` goes through [`Number`], so heterogeneous
//! operands are normalised in one place before any arithmetic happens.

use crate::errors::{FieldError, FieldResult};
use num::complex::Complex;
use num::rational::BigRational;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// An exact or floating point input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    Rational(BigRational),
    Complex(Complex<BigRational>),
    Float(f64),
}

/// A [`Number`] after float resolution and simplification.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Exact {
    Integer(BigInt),
    Rational(BigRational),
    Complex(Complex<BigRational>),
}

impl Number {
    /// Returns true for the integer or rational zero. Floats are never exact zeros.
    pub fn is_exact_zero(&self) -> bool {
        match self {
            Number::Integer(n) => n.is_zero(),
            Number::Rational(q) => q.is_zero(),
            _ => false,
        }
    }

    pub(crate) fn into_exact(self) -> FieldResult<Exact> {
        match self {
            Number::Integer(n) => Ok(Exact::Integer(n)),
            Number::Rational(q) => Ok(Exact::real(q)),
            Number::Float(f) => Ok(Exact::real(float_to_rational(f)?)),
            Number::Complex(c) if c.im.is_zero() => Ok(Exact::real(c.re)),
            Number::Complex(c) => Ok(Exact::Complex(c)),
        }
    }
}

impl Exact {
    pub(crate) fn real(q: BigRational) -> Self {
        if q.denom().is_one() {
            Exact::Integer(q.to_integer())
        } else {
            Exact::Rational(q)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::Rational(q) => write!(f, "{q}"),
            Number::Complex(c) => write!(f, "{} + {}i", c.re, c.im),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Resolves a float to the rational it most plausibly stands for.
///
/// The best approximations with denominators bounded by 10^3, 10^5 and 10^8 must
/// agree, otherwise the float is rejected as ambiguous.
pub fn float_to_rational(value: f64) -> FieldResult<BigRational> {
    let exact = BigRational::from_float(value)
        .ok_or_else(|| FieldError::conversion(format!("{value} is not a finite number")))?;
    let coarse = limit_denominator(&exact, &BigInt::from(1_000));
    let medium = limit_denominator(&exact, &BigInt::from(100_000));
    let fine = limit_denominator(&exact, &BigInt::from(100_000_000));
    if coarse != medium || medium != fine {
        return Err(FieldError::conversion(format!(
            "It's unclear to which rational {value} corresponds to"
        )));
    }
    Ok(coarse)
}

/// The closest fraction to `value` with denominator at most `max_denominator`.
pub fn limit_denominator(value: &BigRational, max_denominator: &BigInt) -> BigRational {
    if value.denom() <= max_denominator {
        return value.clone();
    }

    let (mut p0, mut q0, mut p1, mut q1) = (
        BigInt::zero(),
        BigInt::one(),
        BigInt::one(),
        BigInt::zero(),
    );
    let (mut n, mut d) = (value.numer().clone(), value.denom().clone());
    loop {
        let a = n.div_floor(&d);
        let q2 = &q0 + &a * &q1;
        if &q2 > max_denominator {
            break;
        }
        let p2 = &p0 + &a * &p1;
        p0 = std::mem::replace(&mut p1, p2);
        q0 = std::mem::replace(&mut q1, q2);
        let remainder = &n - &a * &d;
        n = std::mem::replace(&mut d, remainder);
    }

    let k = (max_denominator - &q0).div_floor(&q1);
    let bound1 = BigRational::new(&p0 + &k * &p1, &q0 + &k * &q1);
    let bound2 = BigRational::new(p1, q1);
    if (&bound2 - value).abs() <= (&bound1 - value).abs() {
        bound2
    } else {
        bound1
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Number::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Integer(value)
    }
}

impl From<&BigInt> for Number {
    fn from(value: &BigInt) -> Self {
        Number::Integer(value.clone())
    }
}

impl From<BigRational> for Number {
    fn from(value: BigRational) -> Self {
        Number::Rational(value)
    }
}

impl From<&BigRational> for Number {
    fn from(value: &BigRational) -> Self {
        Number::Rational(value.clone())
    }
}

impl From<Complex<BigRational>> for Number {
    fn from(value: Complex<BigRational>) -> Self {
        Number::Complex(value)
    }
}

impl From<Complex<i64>> for Number {
    fn from(value: Complex<i64>) -> Self {
        let part = |x: i64| BigRational::from_integer(BigInt::from(x));
        Number::Complex(Complex::new(part(value.re), part(value.im)))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
