// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Integer helpers shared by the field types.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Reduces a number modulo a modulus.
///
/// # Returns
///
/// The reduced number in the range [0, modulus)
pub fn reduce(x: &BigInt, modulus: &BigInt) -> BigInt {
    x.mod_floor(modulus)
}

/// Modular inverse a^{-1} mod m; None if gcd(a, m) != 1.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    let g = a.extended_gcd(m);
    if !g.gcd.is_one() {
        return None;
    }
    Some(g.x.mod_floor(m))
}

/// `base^exp` for a non-negative exponent.
pub fn power(base: &BigInt, exp: u64) -> BigInt {
    num_traits::pow(base.clone(), exp as usize)
}

/// Number of times `p` divides `x`, or `None` when `x` is zero.
pub fn count_factors(x: &BigInt, p: &BigInt) -> Option<u64> {
    if x.is_zero() {
        return None;
    }
    let mut rest = x.abs();
    let mut count = 0;
    loop {
        let (quotient, remainder) = rest.div_rem(p);
        if !remainder.is_zero() {
            return Some(count);
        }
        rest = quotient;
        count += 1;
    }
}

/// The first `len` base-`p` digits of a non-negative number, least significant first.
pub fn to_base(x: &BigInt, p: &BigInt, len: usize) -> Vec<BigInt> {
    let mut digits = Vec::with_capacity(len);
    let mut rest = x.clone();
    for _ in 0..len {
        let (quotient, digit) = rest.div_mod_floor(p);
        digits.push(digit);
        rest = quotient;
    }
    digits
}

/// `ceil(log2(k))` for `k >= 1`, zero otherwise.
pub fn ceil_log2(k: u64) -> u32 {
    if k <= 1 {
        0
    } else {
        64 - (k - 1).leading_zeros()
    }
}

/// `ceil(log2(m))` for a positive big integer.
pub fn ceil_log2_bigint(m: &BigInt) -> u64 {
    if m <= &BigInt::one() {
        0
    } else {
        (m - 1u32).bits()
    }
}

/// Rounds `numerator / denominator` to the nearest integer, ties to even.
pub fn round_half_even(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let (numerator, denominator) = if denominator.is_negative() {
        (-numerator, -denominator)
    } else {
        (numerator.clone(), denominator.clone())
    };
    let (quotient, remainder) = numerator.div_mod_floor(&denominator);
    let twice: BigInt = remainder * 2u32;
    if twice > denominator || (twice == denominator && quotient.is_odd()) {
        quotient + 1u32
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_negative() {
        assert_eq!(
            reduce(&BigInt::from(-3), &BigInt::from(7)),
            BigInt::from(4)
        );
        assert_eq!(reduce(&BigInt::from(10), &BigInt::from(7)), BigInt::from(3));
    }

    #[test]
    fn test_mod_inverse() {
        let m = BigInt::from(10007);
        let inv = mod_inverse(&BigInt::from(1234), &m).unwrap();
        assert_eq!((inv * BigInt::from(1234)).mod_floor(&m), BigInt::one());
        assert_eq!(mod_inverse(&BigInt::from(6), &BigInt::from(9)), None);
    }

    #[test]
    fn test_count_factors() {
        let p = BigInt::from(7);
        assert_eq!(count_factors(&BigInt::from(0), &p), None);
        assert_eq!(count_factors(&BigInt::from(5), &p), Some(0));
        assert_eq!(count_factors(&BigInt::from(-98), &p), Some(2));
    }

    #[test]
    fn test_to_base() {
        let digits = to_base(&BigInt::from(100), &BigInt::from(7), 4);
        assert_eq!(
            digits,
            vec![
                BigInt::from(2),
                BigInt::from(0),
                BigInt::from(2),
                BigInt::from(0)
            ]
        );
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(0), 0);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2_bigint(&BigInt::from(2147483647)), 31);
        assert_eq!(ceil_log2_bigint(&BigInt::from(1024)), 10);
    }

    #[test]
    fn test_round_half_even() {
        let r = |a: i64, b: i64| round_half_even(&BigInt::from(a), &BigInt::from(b));
        assert_eq!(r(5, 2), BigInt::from(2));
        assert_eq!(r(7, 2), BigInt::from(4));
        assert_eq!(r(-5, 2), BigInt::from(-2));
        assert_eq!(r(7, 3), BigInt::from(2));
        assert_eq!(r(8, -3), BigInt::from(-3));
    }
}
