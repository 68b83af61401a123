// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Text form of p-adic numbers: `3 + 2*7 + 5*7^3 + O(7^4)`.
//!
//! Zero digits are left out and the big-O term records the absolute precision
//! `n + k`. A value without significant digits prints as the big-O term alone.

use crate::errors::{FieldError, FieldResult};
use crate::padic::PAdic;
use crate::utils::power;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static BIG_O: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^O\((\d+)(?:\^(-?\d+))?\)$").expect("valid big-O pattern"));

static DIGIT_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\*(\d+)(?:\^(-?\d+))?)?$").expect("valid digit term pattern")
});

fn write_power(f: &mut fmt::Formatter<'_>, p: &BigInt, exp: i64) -> fmt::Result {
    match exp {
        0 => Ok(()),
        1 => write!(f, "*{p}"),
        _ => write!(f, "*{p}^{exp}"),
    }
}

fn write_big_o(f: &mut fmt::Formatter<'_>, p: &BigInt, exp: i64) -> fmt::Result {
    match exp {
        0 => write!(f, "O(1)"),
        1 => write!(f, "O({p})"),
        _ => write!(f, "O({p}^{exp})"),
    }
}

impl fmt::Display for PAdic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (exp, digit) in self.digits_by_power() {
            if digit.is_zero() {
                continue;
            }
            write!(f, "{digit}")?;
            write_power(f, self.prime(), exp)?;
            write!(f, " + ")?;
        }
        write_big_o(f, self.prime(), self.valuation() + self.precision() as i64)
    }
}

impl FromStr for PAdic {
    type Err = FieldError;

    /// Parses the printed form. The prime is read off the big-O term, or off the
    /// first `d*p` term when the big-O term is `O(1)`.
    ///
    /// A value with no digits and absolute precision zero prints as a bare
    /// `O(1)`, which names no prime. Such strings are rejected here; read them
    /// back with [`PAdic::parse_with_prime`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_padic(s, None)
    }
}

impl PAdic {
    /// Parses the printed form with a known prime, which is the only way to read
    /// a bare `O(1)`.
    pub fn parse_with_prime(input: &str, p: &BigInt) -> FieldResult<Self> {
        parse_padic(input, Some(p))
    }
}

struct Term {
    digit: BigInt,
    base: Option<BigInt>,
    exp: i64,
}

fn parse_exponent(input: &str, exp: Option<regex::Match<'_>>, default: i64) -> FieldResult<i64> {
    exp.map_or(Ok(default), |m| {
        m.as_str()
            .parse()
            .map_err(|_| FieldError::parse(input, format!("bad exponent '{}'", m.as_str())))
    })
}

fn parse_int(input: &str, digits: &str) -> FieldResult<BigInt> {
    BigInt::from_str(digits).map_err(|e| FieldError::parse(input, e.to_string()))
}

fn parse_padic(input: &str, prime: Option<&BigInt>) -> FieldResult<PAdic> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts: Vec<&str> = compact.split('+').collect();
    let big_o = parts
        .pop()
        .ok_or_else(|| FieldError::parse(input, "empty input"))?;
    let caps = BIG_O
        .captures(big_o)
        .ok_or_else(|| FieldError::parse(input, "missing trailing 'O(...)' term"))?;

    let base = parse_int(input, &caps[1])?;
    let (o_prime, total) = match caps.get(2) {
        Some(_) => (Some(base), parse_exponent(input, caps.get(2), 1)?),
        None if base.is_one() => (None, 0),
        None => (Some(base), 1),
    };

    let terms = parts
        .iter()
        .map(|part| -> FieldResult<Term> {
            let caps = DIGIT_TERM
                .captures(part)
                .ok_or_else(|| FieldError::parse(input, format!("bad term '{part}'")))?;
            let base = caps.get(2).map(|m| parse_int(input, m.as_str())).transpose()?;
            let exp = match base {
                Some(_) => parse_exponent(input, caps.get(3), 1)?,
                None => 0,
            };
            Ok(Term {
                digit: parse_int(input, &caps[1])?,
                base,
                exp,
            })
        })
        .collect::<FieldResult<Vec<_>>>()?;

    let p = prime
        .cloned()
        .or(o_prime)
        .or_else(|| terms.iter().find_map(|t| t.base.clone()))
        .ok_or_else(|| {
            FieldError::parse(input, "the prime is ambiguous, use parse_with_prime")
        })?;
    if p < BigInt::from(2) {
        return Err(FieldError::parse(input, format!("{p} is not a prime")));
    }

    let Some(first) = terms.first() else {
        return PAdic::from_parts(BigInt::zero(), p, 0, total)
            .map_err(|e| FieldError::parse(input, e.to_string()));
    };
    let n = first.exp;
    let k = u64::try_from(total - n)
        .ok()
        .filter(|k| *k > 0)
        .ok_or_else(|| FieldError::parse(input, "big-O term below the first digit"))?;

    let mut num = BigInt::zero();
    let mut previous = None;
    for term in &terms {
        if term.base.as_ref().is_some_and(|b| *b != p) {
            return Err(FieldError::parse(input, "terms use different primes"));
        }
        if term.digit >= p {
            return Err(FieldError::parse(input, format!("digit {} >= {p}", term.digit)));
        }
        if previous.is_some_and(|prev| term.exp <= prev) || term.exp >= total {
            return Err(FieldError::parse(input, "exponents must increase below the big-O term"));
        }
        previous = Some(term.exp);
        num += &term.digit * power(&p, (term.exp - n) as u64);
    }

    PAdic::from_parts(num, p, k, n).map_err(|e| FieldError::parse(input, e.to_string()))
}
