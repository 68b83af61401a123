// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Rational reconstruction: recovering `r/s` from `r * s^-1 mod m`.
//!
//! Three algorithms are provided. They agree on fractions well inside their
//! bounds, but on other inputs each may return a different fraction that
//! still satisfies the congruence.
//!
//! - [`mqrr`]: maximal quotient rational reconstruction (Monagan).
//! - [`lgrr`]: Gauss reduction of the 2-d lattice spanned by `(u, 1)` and `(m, 0)`.
//! - [`eearr`]: the extended Euclidean algorithm stopped at `sqrt(m/2)` (Wang).

use crate::crt::chained_chinese_remainder;
use crate::errors::{ReconstructError, ReconstructResult};
use ffs_config::{FailureMode, ReconstructionAlgorithm, ReconstructionConfig};
use ffs_field::utils::{ceil_log2_bigint, power, round_half_even};
use ffs_field::{ModP, PAdic};
use num::rational::BigRational;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::mem;
use tracing::debug;

/// Residue and modulus after sign handling. A zero modulus means the residue is
/// an integer already.
fn prepare(u: &BigInt, m: &BigInt) -> Option<(BigInt, BigInt)> {
    let m = m.abs();
    if m.is_zero() {
        return None;
    }
    Some((u.mod_floor(&m), m))
}

/// One step of the extended Euclidean algorithm on remainders `r` and cofactors `t`.
fn euclid_step(q: &BigInt, r0: &mut BigInt, r1: &mut BigInt, t0: &mut BigInt, t1: &mut BigInt) {
    let r2 = &*r0 - q * &*r1;
    *r0 = mem::replace(r1, r2);
    let t2 = &*t0 - q * &*t1;
    *t0 = mem::replace(t1, t2);
}

/// Maximal quotient rational reconstruction.
///
/// Runs the extended Euclidean algorithm on `(m, u)` and keeps the fraction
/// preceding the largest quotient above the threshold `T`, which defaults to
/// `2 * ceil(log2(m))`. Returns `None` when no quotient exceeds `T` or the
/// resulting fraction is not in lowest terms.
pub fn mqrr(u: &BigInt, m: &BigInt, threshold: Option<&BigInt>) -> Option<BigRational> {
    let Some((u, m)) = prepare(u, m) else {
        return Some(BigRational::from_integer(u.clone()));
    };
    let mut t = threshold
        .cloned()
        .unwrap_or_else(|| BigInt::from(2 * ceil_log2_bigint(&m)));
    if u.is_zero() {
        return (m > t).then(BigRational::zero);
    }

    let (mut n, mut d) = (BigInt::zero(), BigInt::zero());
    let (mut t0, mut r0) = (BigInt::zero(), m);
    let (mut t1, mut r1) = (BigInt::one(), u);
    while !r1.is_zero() && r0 > t {
        let q = r0.div_floor(&r1);
        if q > t {
            n = r1.clone();
            d = t1.clone();
            t = q.clone();
        }
        euclid_step(&q, &mut r0, &mut r1, &mut t0, &mut t1);
    }

    if d.is_negative() {
        n = -n;
        d = -d;
    }
    if d.is_zero() {
        return None;
    }
    let g = n.gcd(&d);
    if !g.is_one() && g != d {
        return None;
    }
    Some(BigRational::new(n, d))
}

fn dot(a: &[BigInt; 2], b: &[BigInt; 2]) -> BigInt {
    &a[0] * &b[0] + &a[1] * &b[1]
}

/// Gauss reduction of a 2-d lattice basis, the two-dimensional case of LLL.
///
/// Returns the reduced basis with the shortest vector first. The input vectors
/// must be linearly independent.
pub fn lattice_gauss_reduction(u: [BigInt; 2], v: [BigInt; 2]) -> ([BigInt; 2], [BigInt; 2]) {
    let (mut u, mut v) = if dot(&v, &v) > dot(&u, &u) {
        (v, u)
    } else {
        (u, v)
    };
    while dot(&v, &v) < dot(&u, &u) {
        mem::swap(&mut u, &mut v);
        let q = round_half_even(&dot(&u, &v), &dot(&u, &u));
        v = [&v[0] - &q * &u[0], &v[1] - &q * &u[1]];
    }
    (u, v)
}

/// Lattice Gauss rational reconstruction.
///
/// Always returns a fraction congruent to `a` modulo `m`: the shortest vector
/// `(r, s)` of the lattice spanned by `(a, 1)` and `(m, 0)`, read as `r/s`.
pub fn lgrr(a: &BigInt, m: &BigInt) -> BigRational {
    let Some((a, m)) = prepare(a, m) else {
        return BigRational::from_integer(a.clone());
    };
    let (u, v) = lattice_gauss_reduction([a, BigInt::one()], [m, BigInt::zero()]);
    let [numer, denom] = if u[1].is_zero() { v } else { u };
    BigRational::new(numer, denom)
}

/// Extended Euclidean rational reconstruction.
///
/// Stops at the first remainder `r` with `2r^2 < m` and returns `r/t` for its
/// cofactor `t`. With `strict_bound` the denominator must also satisfy
/// `2t^2 < m` and the fraction must be in lowest terms; the result is then the
/// unique fraction with both parts below `sqrt(m/2)`.
pub fn eearr(u: &BigInt, m: &BigInt, strict_bound: bool) -> Option<BigRational> {
    let Some((u, m)) = prepare(u, m) else {
        return Some(BigRational::from_integer(u.clone()));
    };
    let (mut r0, mut r1) = (m.clone(), u);
    let (mut t0, mut t1) = (BigInt::zero(), BigInt::one());
    while &r1 * &r1 * 2u32 >= m {
        let q = r0.div_floor(&r1);
        euclid_step(&q, &mut r0, &mut r1, &mut t0, &mut t1);
    }

    if t1.is_zero() {
        return None;
    }
    if strict_bound && (&t1 * &t1 * 2u32 >= m || !r1.gcd(&t1).is_one()) {
        return None;
    }
    Some(BigRational::new(r1, t1))
}

/// Runs the configured reconstruction algorithm and applies the failure mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rationaliser {
    config: ReconstructionConfig,
}

impl Rationaliser {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    pub fn with_algorithm(algorithm: ReconstructionAlgorithm) -> Self {
        Self::new(ReconstructionConfig::default().with_algorithm(algorithm))
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstructs a fraction from `residue mod modulus`.
    ///
    /// `Ok(None)` is the failure sentinel; with [`FailureMode::Error`] a failure
    /// is reported as [`ReconstructError::BoundExceeded`] instead.
    pub fn rationalise_residue(
        &self,
        residue: &BigInt,
        modulus: &BigInt,
    ) -> ReconstructResult<Option<BigRational>> {
        let algorithm = self.config.algorithm;
        let fraction = match algorithm {
            ReconstructionAlgorithm::Mqrr => {
                let threshold = self.config.mqrr_threshold.map(BigInt::from);
                mqrr(residue, modulus, threshold.as_ref())
            }
            ReconstructionAlgorithm::Lgrr => Some(lgrr(residue, modulus)),
            ReconstructionAlgorithm::Eearr => eearr(residue, modulus, self.config.strict_bound),
        };

        match (fraction, self.config.on_failure) {
            (Some(fraction), _) => Ok(Some(fraction)),
            (None, FailureMode::Sentinel) => {
                debug!("{algorithm} could not reconstruct {residue} mod {modulus}");
                Ok(None)
            }
            (None, FailureMode::Error) => Err(ReconstructError::BoundExceeded {
                algorithm,
                residue: residue.clone(),
                modulus: modulus.clone(),
            }),
        }
    }

    pub fn rationalise<T: Rationalise + ?Sized>(
        &self,
        value: &T,
    ) -> ReconstructResult<Option<BigRational>> {
        value.rationalise_with(self)
    }

    /// Combines residues modulo coprime moduli, then reconstructs the result.
    pub fn rationalise_crt(&self, residues: &[ModP]) -> ReconstructResult<Option<BigRational>> {
        let combined = chained_chinese_remainder(residues)?;
        self.rationalise(&combined)
    }
}

/// Values that stand for an exact rational.
pub trait Rationalise {
    fn rationalise_with(&self, rationaliser: &Rationaliser)
        -> ReconstructResult<Option<BigRational>>;

    /// Reconstructs with the default configuration: MQRR, failing with `None`.
    fn rationalise(&self) -> ReconstructResult<Option<BigRational>> {
        self.rationalise_with(&Rationaliser::default())
    }
}

impl Rationalise for BigInt {
    fn rationalise_with(&self, _: &Rationaliser) -> ReconstructResult<Option<BigRational>> {
        Ok(Some(BigRational::from_integer(self.clone())))
    }
}

impl Rationalise for ModP {
    fn rationalise_with(
        &self,
        rationaliser: &Rationaliser,
    ) -> ReconstructResult<Option<BigRational>> {
        rationaliser.rationalise_residue(self.value(), self.modulus())
    }
}

/// The mantissa is reconstructed modulo `p^k` and then scaled by `p^n`.
impl Rationalise for PAdic {
    fn rationalise_with(
        &self,
        rationaliser: &Rationaliser,
    ) -> ReconstructResult<Option<BigRational>> {
        let modulus = power(self.prime(), self.precision());
        let Some(mantissa) = rationaliser.rationalise_residue(self.mantissa(), &modulus)? else {
            return Ok(None);
        };
        let scale = BigRational::from_integer(power(
            self.prime(),
            self.valuation().unsigned_abs(),
        ));
        Ok(Some(if self.valuation() < 0 {
            mantissa / scale
        } else {
            mantissa * scale
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: i64 = 2147483647;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    fn residue(fraction: &BigRational, m: i64) -> BigInt {
        ModP::new(fraction.clone(), m).unwrap().value().clone()
    }

    #[test]
    fn test_algorithms_diverge_outside_bounds() {
        let u = BigInt::from(298260199);
        let m = BigInt::from(P);
        assert_eq!(mqrr(&u, &m, None), Some(q(-51071, 36)));
        assert_eq!(lgrr(&u, &m), q(11326, 42041));
        assert_eq!(eearr(&u, &m, true), None);
        assert_eq!(eearr(&u, &m, false), Some(q(11326, 42041)));

        for fraction in [q(-51071, 36), q(11326, 42041)] {
            assert_eq!(residue(&fraction, P), u);
        }
    }

    #[test]
    fn test_small_fractions_agree() {
        let m = BigInt::from(P);
        for fraction in [q(1, 2), q(-3, 7), q(12345, 678), q(0, 1), q(-1, 1)] {
            let u = residue(&fraction, P);
            assert_eq!(mqrr(&u, &m, None), Some(fraction.clone()));
            assert_eq!(lgrr(&u, &m), fraction);
            assert_eq!(eearr(&u, &m, true), Some(fraction));
        }
    }

    #[test]
    fn test_mqrr_zero_residue() {
        assert_eq!(mqrr(&BigInt::zero(), &BigInt::from(P), None), Some(q(0, 1)));
        assert_eq!(mqrr(&BigInt::zero(), &BigInt::from(2), None), None);
        let threshold = BigInt::from(1);
        assert_eq!(
            mqrr(&BigInt::zero(), &BigInt::from(2), Some(&threshold)),
            Some(q(0, 1))
        );
    }

    #[test]
    fn test_lattice_reduction_is_short() {
        let (u, v) = lattice_gauss_reduction(
            [BigInt::from(298260199), BigInt::one()],
            [BigInt::from(P), BigInt::zero()],
        );
        assert!(dot(&u, &u) <= dot(&v, &v));
        assert_eq!(u, [BigInt::from(11326), BigInt::from(42041)]);
    }

    #[test]
    fn test_rationaliser_failure_modes() {
        let zero = ModP::new(0, 2).unwrap();
        assert_eq!(Rationaliser::default().rationalise(&zero).unwrap(), None);

        let strict = Rationaliser::new(
            ReconstructionConfig::default().with_failure_mode(FailureMode::Error),
        );
        assert!(matches!(
            strict.rationalise(&zero),
            Err(ReconstructError::BoundExceeded {
                algorithm: ReconstructionAlgorithm::Mqrr,
                ..
            })
        ));
        let lattice = Rationaliser::with_algorithm(ReconstructionAlgorithm::Lgrr);
        assert_eq!(lattice.rationalise(&zero).unwrap(), Some(q(0, 1)));
    }

    #[test]
    fn test_rationalise_modp() {
        let x = ModP::new(q(-3, 7), P).unwrap();
        assert_eq!(x.rationalise().unwrap(), Some(q(-3, 7)));
        let eearr = Rationaliser::with_algorithm(ReconstructionAlgorithm::Eearr);
        assert_eq!(eearr.rationalise(&x).unwrap(), Some(q(-3, 7)));
        assert_eq!(
            BigInt::from(-5).rationalise().unwrap(),
            Some(q(-5, 1))
        );
    }

    #[test]
    fn test_rationalise_padic() {
        let unit = PAdic::new(q(5, 3), 7, 10, 0).unwrap();
        assert_eq!(unit.rationalise().unwrap(), Some(q(5, 3)));
        let shifted = PAdic::new(q(5 * 49, 3), 7, 10, 0).unwrap();
        assert_eq!(shifted.valuation(), 2);
        assert_eq!(shifted.rationalise().unwrap(), Some(q(245, 3)));
        let fractional = PAdic::new(q(5, 21), 7, 10, 0).unwrap();
        assert_eq!(fractional.valuation(), -1);
        assert_eq!(fractional.rationalise().unwrap(), Some(q(5, 21)));
    }

    #[test]
    fn test_zero_modulus_is_exact() {
        let seven = BigInt::from(7);
        assert_eq!(lgrr(&seven, &BigInt::zero()), q(7, 1));
        assert_eq!(mqrr(&seven, &BigInt::zero(), None), Some(q(7, 1)));
        assert_eq!(eearr(&seven, &BigInt::zero(), true), Some(q(7, 1)));
    }
}
