// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Precision-tracking p-adic arithmetic.
//!
//! Every operation that can destroy digits goes through [`PAdicContext`], which
//! carries the [`PrecisionConfig`] deciding how lost digits are reported.

use crate::errors::{FieldError, FieldResult};
use crate::field_extension::{Algebraic, FieldExtension};
use crate::finite_field::ModP;
use crate::number::{Exact, Number};
use crate::padic::{PAdic, Scaled};
use crate::roots::{PrimeFieldRootFinder, RootFinder};
use crate::utils::{ceil_log2, count_factors, mod_inverse, power};
use ffs_config::{PrecisionConfig, PrecisionMode};
use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Entry point for p-adic arithmetic under an explicit precision configuration.
///
/// The methods on [`PAdic`] itself use the default, honest configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PAdicContext {
    precision: PrecisionConfig,
}

impl PAdicContext {
    pub fn new(precision: PrecisionConfig) -> Self {
        Self { precision }
    }

    pub fn honest() -> Self {
        Self::default()
    }

    pub fn fixed_relative(seed: u64) -> Self {
        Self::new(PrecisionConfig::fixed_relative(seed))
    }

    pub fn precision(&self) -> &PrecisionConfig {
        &self.precision
    }

    /// The p-adic number `num * p^n` known to `k` significant digits.
    pub fn padic(
        &self,
        num: impl Into<Number>,
        p: impl Into<BigInt>,
        k: u64,
        n: i64,
    ) -> FieldResult<PAdic> {
        self.padic_with(num, p, k, n, &PrimeFieldRootFinder)
    }

    /// Same as [`PAdicContext::padic`] with an explicit root finder, used for
    /// the square root of -1 that complex inputs need.
    pub fn padic_with(
        &self,
        num: impl Into<Number>,
        p: impl Into<BigInt>,
        k: u64,
        n: i64,
        finder: &dyn RootFinder,
    ) -> FieldResult<PAdic> {
        let p: BigInt = p.into();
        if p < BigInt::from(2) {
            return Err(FieldError::InvalidModulus { modulus: p });
        }
        let num: Number = num.into();
        self.from_exact(num.into_exact()?, &p, k, n, finder)
    }

    fn from_exact(
        &self,
        exact: Exact,
        p: &BigInt,
        k: u64,
        n: i64,
        finder: &dyn RootFinder,
    ) -> FieldResult<PAdic> {
        match exact {
            Exact::Integer(num) => Ok(self.normalize(num, p, k, n, false)),
            Exact::Rational(q) => {
                let numer = self.normalize(q.numer().clone(), p, k, n, false);
                let denom = self.normalize(q.denom().clone(), p, k, 0, false);
                self.div(&numer, &denom)
            }
            Exact::Complex(c) => {
                let re = self.from_exact(Exact::real(c.re.clone()), p, k, n, finder)?;
                let im = self.from_exact(Exact::real(c.im.clone()), p, k, n, finder)?;
                let minus_one = self.normalize(-BigInt::one(), p, k, 0, false);
                match self.sqrt_with(&minus_one, finder)? {
                    Algebraic::Scalar(i) => self.add(&re, &self.mul(&i, &im)?),
                    Algebraic::Extension(_) => Err(FieldError::extension_required(format!(
                        "{} + {}i as a {p}-adic (no square root of -1)",
                        c.re, c.im
                    ))),
                }
            }
        }
    }

    /// Strips factors of `p` from `num` into the valuation.
    ///
    /// When the factors come from cancellation in an addition they are digits
    /// that were lost, so they are taken off the precision instead of being
    /// treated as known zeros.
    pub(crate) fn normalize(
        &self,
        num: BigInt,
        p: &BigInt,
        k: u64,
        n: i64,
        from_addition: bool,
    ) -> PAdic {
        let mut from_addition = from_addition;
        let num = if from_addition {
            num.mod_floor(&power(p, k))
        } else {
            num
        };
        let factors = count_factors(&num, p).unwrap_or_else(|| {
            from_addition = true;
            k
        });

        let mut k = if from_addition {
            k.saturating_sub(factors)
        } else {
            k
        };
        let mut num = (num / power(p, factors)).mod_floor(&power(p, k));
        let n = n + factors as i64;

        if let PrecisionMode::FixedRelative { seed } = self.precision.mode {
            if from_addition && factors > 0 {
                debug!("backfilling {factors} lost digits of a {p}-adic");
                num += power(p, k) * random_filling(p, factors, seed);
                k += factors;
            }
        }

        let result = PAdic::from_normalized(num, p.clone(), k, n);
        if self.precision.warn_on_total_loss && k == 0 {
            warn!("Lost all precision @ {result}");
        }
        result
    }

    pub(crate) fn check_same_prime(a: &PAdic, b: &PAdic) -> FieldResult<()> {
        if a.prime() != b.prime() {
            return Err(FieldError::mismatch(a.prime(), b.prime()));
        }
        Ok(())
    }

    /// `other` as a p-adic with the same prime and enough digits to not limit
    /// the precision of `like`.
    pub fn coerce(&self, like: &PAdic, other: impl Into<Number>) -> FieldResult<PAdic> {
        self.padic(other, like.prime().clone(), like.precision_bound(), 0)
    }

    pub(crate) fn coerce_integer(&self, like: &PAdic, value: BigInt) -> PAdic {
        self.normalize(value, like.prime(), like.precision_bound(), 0, false)
    }

    /// Aligns to the smaller valuation. The result is known up to the smaller of
    /// the two absolute precisions `n + k`.
    ///
    /// Full cancellation such as `x + (-x)` keeps no digits and lands at
    /// `O(p^(n + k))`, equal to `PAdic::new(0, p, k, n)`.
    pub fn add(&self, a: &PAdic, b: &PAdic) -> FieldResult<PAdic> {
        Self::check_same_prime(a, b)?;
        let (a, b) = if a.valuation() > b.valuation() {
            (b, a)
        } else {
            (a, b)
        };
        let shift = (b.valuation() - a.valuation()) as u64;
        let num = a.mantissa() + b.mantissa() * power(a.prime(), shift);
        let k = a.precision().min(shift + b.precision());
        Ok(self.normalize(num, a.prime(), k, a.valuation(), true))
    }

    pub fn sub(&self, a: &PAdic, b: &PAdic) -> FieldResult<PAdic> {
        self.add(a, &self.neg(b))
    }

    pub fn neg(&self, a: &PAdic) -> PAdic {
        let num = (-a.mantissa()).mod_floor(&power(a.prime(), a.precision()));
        PAdic::from_normalized(num, a.prime().clone(), a.precision(), a.valuation())
    }

    /// Valuations add, precision is `min(k1, k2)`.
    pub fn mul(&self, a: &PAdic, b: &PAdic) -> FieldResult<PAdic> {
        Self::check_same_prime(a, b)?;
        let num = (a.mantissa() * b.mantissa()).mod_floor(&power(a.prime(), a.precision()));
        Ok(self.normalize(
            num,
            a.prime(),
            a.precision().min(b.precision()),
            a.valuation() + b.valuation(),
            false,
        ))
    }

    /// Valuations subtract, the unit of `b` is inverted modulo `p^k2`.
    pub fn div(&self, a: &PAdic, b: &PAdic) -> FieldResult<PAdic> {
        Self::check_same_prime(a, b)?;
        let modulus = power(b.prime(), b.precision());
        let inverse = mod_inverse(b.mantissa(), &modulus)
            .ok_or_else(|| FieldError::not_invertible(b.mantissa(), &modulus))?;
        let num = (a.mantissa() * inverse).mod_floor(&power(a.prime(), a.precision()));
        Ok(self.normalize(
            num,
            a.prime(),
            a.precision().min(b.precision()),
            a.valuation() - b.valuation(),
            false,
        ))
    }

    /// Multiplies by a scalar. An exact zero gives [`Scaled::ExactZero`] instead
    /// of a value without significant digits.
    pub fn mul_scalar(&self, a: &PAdic, scalar: impl Into<Number>) -> FieldResult<Scaled> {
        let scalar: Number = scalar.into();
        if scalar.is_exact_zero() {
            return Ok(Scaled::ExactZero);
        }
        let scalar = self.coerce(a, scalar)?;
        Ok(Scaled::Value(self.mul(a, &scalar)?))
    }

    pub fn pow(&self, a: &PAdic, exp: i64) -> FieldResult<PAdic> {
        self.pow_big(a, &BigInt::from(exp))
    }

    /// `a^exp`; negative exponents invert the positive power.
    pub fn pow_big(&self, a: &PAdic, exp: &BigInt) -> FieldResult<PAdic> {
        if exp.is_zero() {
            return Ok(self.normalize(BigInt::one(), a.prime(), a.precision(), 0, false));
        }
        if exp.is_negative() {
            let positive = self.pow_big(a, &-exp)?;
            let one = self.coerce_integer(&positive, BigInt::one());
            return self.div(&one, &positive);
        }

        let n = if a.valuation() == 0 {
            0
        } else {
            exp.to_i64()
                .and_then(|e| e.checked_mul(a.valuation()))
                .ok_or_else(|| {
                    FieldError::conversion(format!("valuation of {a} to the power {exp} overflows"))
                })?
        };
        let num = a
            .mantissa()
            .modpow(exp, &power(a.prime(), a.precision()));
        Ok(self.normalize(num, a.prime(), a.precision(), n, false))
    }

    /// Orders by valuation only: a higher valuation is a smaller p-adic absolute value.
    pub fn cmp(&self, a: &PAdic, b: &PAdic) -> FieldResult<Ordering> {
        Self::check_same_prime(a, b)?;
        Ok(b.valuation().cmp(&a.valuation()))
    }

    pub fn sqrt(&self, x: &PAdic) -> FieldResult<Algebraic<PAdic>> {
        self.sqrt_with(x, &PrimeFieldRootFinder)
    }

    /// Square root by Hensel lifting the root of the leading digit.
    ///
    /// A leading digit without a square root means there is no root in the
    /// p-adics either, and the formal extension adjoining `x` is returned.
    pub fn sqrt_with(&self, x: &PAdic, finder: &dyn RootFinder) -> FieldResult<Algebraic<PAdic>> {
        if x.precision() == 0 {
            return Err(FieldError::unsupported(format!(
                "square root of {x}, which has no significant digits"
            )));
        }
        let leading = ModP::from_reduced(x.mantissa().mod_floor(x.prime()), x.prime());
        let root = finder
            .roots(&leading, 2)?
            .and_then(|roots| roots.into_iter().next());
        let Some(root) = root else {
            debug!("leading digit of {x} is not a square, adjoining its square root");
            return Ok(FieldExtension::adjoin(x.clone()));
        };
        if x.valuation() % 2 != 0 {
            return Err(FieldError::unsupported(format!(
                "square root of {x} with odd valuation needs an unramified extension"
            )));
        }

        let mut s = self.normalize(
            root.value().clone(),
            x.prime(),
            x.precision(),
            x.valuation() / 2,
            false,
        );
        for _ in 0..ceil_log2(x.precision()) {
            let two = self.coerce_integer(&s, BigInt::from(2));
            let residual = self.sub(x, &self.mul(&s, &s)?)?;
            let correction = self.div(&residual, &self.mul(&s, &two)?)?;
            s = self.add(&s, &correction)?;
        }
        Ok(Algebraic::Scalar(s))
    }

    /// The p-adic logarithm.
    ///
    /// Units are brought into the radius of convergence with
    /// `log(w) = log(w^(p-1)) / (p-1)`; other values use
    /// `log(w) = n + log(w / p^n)`.
    pub fn log(&self, w: &PAdic) -> FieldResult<PAdic> {
        if *w == self.coerce_integer(w, BigInt::one()) {
            return Ok(self.coerce_integer(w, BigInt::zero()));
        }
        if w.valuation() != 0 {
            let unit =
                PAdic::from_normalized(w.mantissa().clone(), w.prime().clone(), w.precision(), 0);
            let log_unit = self.log(&unit)?;
            let shift = self.coerce_integer(&log_unit, BigInt::from(w.valuation()));
            return self.add(&shift, &log_unit);
        }

        let p_minus_one: BigInt = w.prime() - 1u32;
        let lifted = self.pow_big(w, &p_minus_one)?;
        let x = self.sub(&lifted, &self.coerce_integer(&lifted, BigInt::one()))?;

        let mut sum: Option<PAdic> = None;
        for i in 1..w.precision() {
            let x_i = self.pow(&x, i as i64)?;
            let signed = if i % 2 == 1 { x_i } else { self.neg(&x_i) };
            let term = self.div(&signed, &self.coerce_integer(&signed, BigInt::from(i)))?;
            sum = Some(match sum {
                None => term,
                Some(acc) => self.add(&acc, &term)?,
            });
        }
        match sum {
            Some(sum) => self.div(&sum, &self.coerce_integer(&sum, p_minus_one)),
            None => Ok(self.coerce_integer(w, BigInt::zero())),
        }
    }

    /// `log(w) / log(base)`, with `base` taken to the precision of `w`.
    pub fn log_base(&self, w: &PAdic, base: impl Into<Number>) -> FieldResult<PAdic> {
        let base = self.padic(base, w.prime().clone(), w.precision(), 0)?;
        self.div(&self.log(w)?, &self.log(&base)?)
    }
}

/// A number with `count` base-`p` digits, none of them zero.
fn random_filling(p: &BigInt, count: u64, seed: u64) -> BigInt {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ count.rotate_left(32));
    let one = BigInt::one();
    (0..count).fold(BigInt::zero(), |acc, i| {
        acc + rng.gen_bigint_range(&one, p) * power(p, i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padic(num: i64, p: i64, k: u64, n: i64) -> PAdic {
        PAdic::new(num, p, k, n).unwrap()
    }

    fn parts(x: &PAdic) -> (BigInt, BigInt, u64, i64) {
        (
            x.mantissa().clone(),
            x.prime().clone(),
            x.precision(),
            x.valuation(),
        )
    }

    #[test]
    fn test_normalisation_on_construction() {
        assert_eq!(parts(&padic(17, 7, 3, 0)), (17.into(), 7.into(), 3, 0));
        assert_eq!(parts(&padic(3 * 49, 7, 3, 0)), (3.into(), 7.into(), 3, 2));
        assert_eq!(parts(&padic(0, 7, 4, 0)), (0.into(), 7.into(), 0, 4));
        assert_eq!(parts(&padic(-1, 7, 2, 0)), (48.into(), 7.into(), 2, 0));
        assert!(matches!(
            PAdic::new(3, 1, 3, 0),
            Err(FieldError::InvalidModulus { .. })
        ));
    }

    #[test]
    fn test_cancellation_loses_digits() {
        let ctx = PAdicContext::honest();
        let a = padic(1 + 7 + 2 * 49, 7, 5, 0);
        let b = padic(1 + 7 + 3 * 49, 7, 5, 0);
        let difference = ctx.sub(&b, &a).unwrap();
        assert_eq!(parts(&difference), (1.into(), 7.into(), 3, 2));
    }

    #[test]
    fn test_fixed_relative_backfills_digits() {
        let ctx = PAdicContext::fixed_relative(11);
        let a = padic(1 + 7 + 2 * 49, 7, 5, 0);
        let b = padic(1 + 7 + 3 * 49, 7, 5, 0);
        let difference = ctx.sub(&b, &a).unwrap();
        assert_eq!(difference.precision(), 5);
        assert_eq!(difference.valuation(), 2);
        let digits = difference.digits();
        assert_eq!(digits[..3], [BigInt::from(1), BigInt::zero(), BigInt::zero()]);
        assert!(digits[3..].iter().all(|d| !d.is_zero()));
        assert_eq!(difference, ctx.sub(&b, &a).unwrap());

        let zero = ctx.sub(&a, &a).unwrap();
        assert_eq!(zero.precision(), 5);
        assert_eq!(zero.valuation(), 5);
    }

    #[test]
    fn test_total_loss_warning() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();
        let ctx = PAdicContext::new(PrecisionConfig::honest().with_total_loss_warning(true));
        let a = padic(5, 7, 3, 0);
        let zero = ctx.sub(&a, &a).unwrap();
        assert_eq!(zero.precision(), 0);
    }

    #[test]
    fn test_mul_scalar_exact_zero() {
        let ctx = PAdicContext::honest();
        let a = padic(5, 7, 3, 0);
        assert_eq!(ctx.mul_scalar(&a, 0).unwrap(), Scaled::ExactZero);
        assert_eq!(
            ctx.mul_scalar(&a, ModP::new(0, 7).unwrap()).unwrap(),
            Scaled::ExactZero
        );
        assert_eq!(
            ctx.mul_scalar(&a, 2).unwrap(),
            Scaled::Value(padic(10, 7, 3, 0))
        );
        // the zero scalar must not cap the precision of a later sum
        let b = padic(3, 7, 10, 0);
        let sum = ctx.mul_scalar(&a, 0).unwrap().add_to(&b).unwrap();
        assert_eq!(sum, b);
    }

    #[test]
    fn test_pow_and_negative_pow() {
        let ctx = PAdicContext::honest();
        let a = padic(3 * 7, 7, 4, 0);
        let cube = ctx.pow(&a, 3).unwrap();
        assert_eq!(cube.valuation(), 3);
        assert_eq!(cube.mantissa(), &BigInt::from(27));
        let inverse = ctx.pow(&a, -1).unwrap();
        assert_eq!(inverse.valuation(), -1);
        let one = ctx.mul(&a, &inverse).unwrap();
        assert_eq!(parts(&one), (1.into(), 7.into(), 4, 0));
        assert_eq!(ctx.pow(&a, 0).unwrap(), padic(1, 7, 4, 0));
    }

    #[test]
    fn test_cross_prime_errors() {
        let ctx = PAdicContext::honest();
        let a = padic(1, 7, 3, 0);
        let b = padic(1, 11, 3, 0);
        assert!(matches!(
            ctx.add(&a, &b),
            Err(FieldError::ModulusMismatch { .. })
        ));
        assert!(ctx.mul(&a, &b).is_err());
        assert!(ctx.div(&a, &b).is_err());
        assert!(ctx.cmp(&a, &b).is_err());
    }

    #[test]
    fn test_random_filling_has_no_zero_digit() {
        let p = BigInt::from(3);
        let filling = random_filling(&p, 20, 5);
        let digits = crate::utils::to_base(&filling, &p, 20);
        assert!(digits.iter().all(|d| !d.is_zero()));
        assert_eq!(filling, random_filling(&p, 20, 5));
    }
}
