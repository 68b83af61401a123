// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Formal square-root extensions `Base[√s1, ..., √sm]`.
//!
//! An element is a map from basis keys (sorted sets of adjoined radicands) to
//! coefficients in the base ring. Products of basis keys use `√r · √r = r`, so
//! the key of a product is the symmetric difference of the factor keys and the
//! shared radicands move into the coefficient.
//!
//! Arithmetic returns [`Algebraic`], which collapses to [`Algebraic::Scalar`]
//! whenever no adjoined root survives.

use crate::errors::{FieldError, FieldResult};
use crate::finite_field::ModP;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// The ring operations an extension needs from its coefficients.
pub trait BaseRing: Clone + fmt::Debug + fmt::Display + PartialEq {
    /// Additive identity of the ring `self` lives in.
    fn zero_like(&self) -> Self;
    /// Multiplicative identity of the ring `self` lives in.
    fn one_like(&self) -> Self;
    fn is_zero(&self) -> bool;
    fn ring_add(&self, other: &Self) -> FieldResult<Self>;
    fn ring_mul(&self, other: &Self) -> FieldResult<Self>;
    fn ring_div(&self, other: &Self) -> FieldResult<Self>;
    fn ring_neg(&self) -> Self;
    /// Fails with [`FieldError::ModulusMismatch`] unless both values live in the
    /// same ring.
    fn check_same_domain(&self, other: &Self) -> FieldResult<()>;
    /// Total order used to sort radicands into canonical basis keys.
    fn canonical_cmp(&self, other: &Self) -> Ordering;
}

impl BaseRing for ModP {
    fn zero_like(&self) -> Self {
        ModP::from_reduced(0.into(), self.modulus())
    }

    fn one_like(&self) -> Self {
        ModP::from_reduced(1.into(), self.modulus())
    }

    fn is_zero(&self) -> bool {
        ModP::is_zero(self)
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
        self.check_same_field(other)
    }

    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.modulus()
            .cmp(other.modulus())
            .then_with(|| self.value().cmp(other.value()))
    }
}

/// A sorted, duplicate free set of radicands.
#[derive(Clone, Debug)]
pub struct BasisKey<B>(Vec<B>);

impl<B: BaseRing> BasisKey<B> {
    fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn radicands(&self) -> &[B] {
        &self.0
    }

    fn contains(&self, radicand: &B) -> bool {
        self.0
            .binary_search_by(|r| r.canonical_cmp(radicand))
            .is_ok()
    }

    /// Radicands in both keys, and the key of the product `√A · √B`.
    fn product(&self, other: &Self) -> (Vec<B>, BasisKey<B>) {
        let mut shared = Vec::new();
        let mut key = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].canonical_cmp(&other.0[j]) {
                Ordering::Less => {
                    key.push(self.0[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    key.push(other.0[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    shared.push(self.0[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        key.extend_from_slice(&self.0[i..]);
        key.extend_from_slice(&other.0[j..]);
        (shared, BasisKey(key))
    }
}

impl<B: BaseRing> PartialEq for BasisKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<B: BaseRing> Eq for BasisKey<B> {}

impl<B: BaseRing> PartialOrd for BasisKey<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: BaseRing> Ord for BasisKey<B> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.canonical_cmp(b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| self.0.len().cmp(&other.0.len()))
    }
}

type Terms<B> = BTreeMap<BasisKey<B>, B>;

/// An element of `Base[√s1, ..., √sm]` that actually involves adjoined roots.
///
/// Only nonzero coefficients are stored and `radicands` is exactly the set of
/// radicands used by those coefficients' keys.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldExtension<B: BaseRing> {
    radicands: Vec<B>,
    terms: Terms<B>,
}

/// Either a plain base ring value or a genuine extension element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algebraic<B: BaseRing> {
    Scalar(B),
    Extension(FieldExtension<B>),
}

impl<B: BaseRing> FieldExtension<B> {
    /// `√radicand` as an element of the extension by `radicand`.
    pub fn adjoin(radicand: B) -> Algebraic<B> {
        let one = radicand.one_like();
        if radicand.is_zero() || radicand == one {
            return Algebraic::Scalar(radicand);
        }
        let mut terms = Terms::new();
        terms.insert(BasisKey(vec![radicand.clone()]), one);
        Algebraic::Extension(Self {
            radicands: vec![radicand],
            terms,
        })
    }

    /// The element `Σ coefficient · √(Π key)`.
    ///
    /// Every key must be a duplicate free subset of `radicands`. Terms with equal
    /// keys are summed. Radicands equal to one contribute nothing to a key and a
    /// zero radicand annihilates its term.
    pub fn from_terms(
        radicands: Vec<B>,
        terms: impl IntoIterator<Item = (Vec<B>, B)>,
    ) -> FieldResult<Algebraic<B>> {
        let mut radicands = radicands;
        if let Some((first, rest)) = radicands.split_first() {
            rest.iter().try_for_each(|r| first.check_same_domain(r))?;
        }
        radicands.sort_by(|a, b| a.canonical_cmp(b));
        let allowed = BasisKey(radicands);

        let mut collected = Terms::new();
        let mut reference = allowed.0.first().cloned();
        for (key, coefficient) in terms {
            reference
                .get_or_insert_with(|| coefficient.clone())
                .check_same_domain(&coefficient)?;
            let mut key = key;
            key.sort_by(|a, b| a.canonical_cmp(b));
            if key.windows(2).any(|w| w[0].canonical_cmp(&w[1]).is_eq()) {
                return Err(FieldError::invalid_state(
                    "basis keys must not repeat a radicand",
                ));
            }
            if let Some(unknown) = key.iter().find(|r| !allowed.contains(r)) {
                return Err(FieldError::invalid_state(format!(
                    "basis key uses {unknown} which is not an adjoined radicand"
                )));
            }
            if key.iter().any(|r| r.is_zero()) {
                continue;
            }
            key.retain(|r| *r != r.one_like());
            accumulate(&mut collected, BasisKey(key), coefficient)?;
        }

        let zero = reference
            .map(|r| r.zero_like())
            .ok_or_else(|| FieldError::invalid_state("an extension needs at least one term"))?;
        Ok(build(&zero, collected))
    }

    pub fn radicands(&self) -> &[B] {
        &self.radicands
    }

    /// Number of adjoined radicands. The basis has `2^rank` elements.
    pub fn rank(&self) -> usize {
        self.radicands.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&[B], &B)> {
        self.terms.iter().map(|(key, c)| (key.radicands(), c))
    }

    /// The coefficient of `√(Π key)`, if nonzero.
    pub fn coefficient(&self, key: &[B]) -> Option<&B> {
        let mut key = key.to_vec();
        key.sort_by(|a, b| a.canonical_cmp(b));
        self.terms.get(&BasisKey(key))
    }

    fn reference(&self) -> &B {
        // never empty, see `build`
        self.terms
            .values()
            .next()
            .unwrap_or_else(|| &self.radicands[0])
    }

    fn uses(&self, radicand: &B) -> bool {
        self.terms.keys().any(|key| key.contains(radicand))
    }

    /// Flips the sign of every term whose key contains `radicand`.
    fn flip(&self, radicand: &B) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|(key, c)| {
                let c = if key.contains(radicand) {
                    c.ring_neg()
                } else {
                    c.clone()
                };
                (key.clone(), c)
            })
            .collect();
        Self {
            radicands: self.radicands.clone(),
            terms,
        }
    }

    /// Product of the naive conjugates over each radicand in turn, together with
    /// `self` times that product, which lies in the base ring.
    fn conjugate_and_norm(&self) -> FieldResult<(Option<Algebraic<B>>, B)> {
        let mut running = Algebraic::Extension(self.clone());
        let mut conjugate: Option<Algebraic<B>> = None;
        for radicand in &self.radicands {
            let Algebraic::Extension(current) = &running else {
                break;
            };
            if !current.uses(radicand) {
                continue;
            }
            let flipped = Algebraic::Extension(current.flip(radicand));
            conjugate = Some(match conjugate {
                None => flipped.clone(),
                Some(c) => c.try_mul(&flipped)?,
            });
            running = running.try_mul(&flipped)?;
        }
        match running {
            Algebraic::Scalar(norm) => Ok((conjugate, norm)),
            Algebraic::Extension(rest) => Err(FieldError::inconsistent(format!(
                "conjugate product of {self} did not collapse to the base ring: {rest}"
            ))),
        }
    }

    /// The element `c` with `self * c` in the base ring.
    pub fn conjugate(&self) -> FieldResult<Algebraic<B>> {
        let (conjugate, _) = self.conjugate_and_norm()?;
        Ok(conjugate.unwrap_or_else(|| Algebraic::Scalar(self.reference().one_like())))
    }

    /// `self * self.conjugate()`.
    pub fn norm(&self) -> FieldResult<B> {
        Ok(self.conjugate_and_norm()?.1)
    }

    pub fn inverse(&self) -> FieldResult<Algebraic<B>> {
        let (conjugate, norm) = self.conjugate_and_norm()?;
        match conjugate {
            Some(conjugate) => conjugate.div_scalar(&norm),
            None => Ok(Algebraic::Scalar(norm.one_like().ring_div(&norm)?)),
        }
    }

    pub fn pow(&self, exp: i64) -> FieldResult<Algebraic<B>> {
        Algebraic::Extension(self.clone()).pow(exp)
    }
}

fn accumulate<B: BaseRing>(terms: &mut Terms<B>, key: BasisKey<B>, coefficient: B) -> FieldResult<()> {
    match terms.get_mut(&key) {
        Some(existing) => *existing = existing.ring_add(&coefficient)?,
        None => {
            terms.insert(key, coefficient);
        }
    }
    Ok(())
}

/// Checks every coefficient and radicand of `terms` against `reference`.
fn check_terms<B: BaseRing>(reference: &B, terms: &Terms<B>) -> FieldResult<()> {
    for (key, c) in terms {
        reference.check_same_domain(c)?;
        key.0
            .iter()
            .try_for_each(|r| reference.check_same_domain(r))?;
    }
    Ok(())
}

/// Drops zero terms and collapses to a scalar where possible.
fn build<B: BaseRing>(zero: &B, terms: Terms<B>) -> Algebraic<B> {
    let terms: Terms<B> = terms.into_iter().filter(|(_, c)| !c.is_zero()).collect();
    if terms.is_empty() {
        return Algebraic::Scalar(zero.clone());
    }
    if terms.len() == 1 {
        if let Some(c) = terms.get(&BasisKey::empty()) {
            return Algebraic::Scalar(c.clone());
        }
    }

    let mut radicands: Vec<B> = terms.keys().flat_map(|key| key.0.iter().cloned()).collect();
    radicands.sort_by(|a, b| a.canonical_cmp(b));
    radicands.dedup_by(|a, b| a.canonical_cmp(b).is_eq());
    Algebraic::Extension(FieldExtension { radicands, terms })
}

impl<B: BaseRing> Algebraic<B> {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Algebraic::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&B> {
        match self {
            Algebraic::Scalar(b) => Some(b),
            Algebraic::Extension(_) => None,
        }
    }

    pub fn into_scalar(self) -> Option<B> {
        match self {
            Algebraic::Scalar(b) => Some(b),
            Algebraic::Extension(_) => None,
        }
    }

    fn reference(&self) -> &B {
        match self {
            Algebraic::Scalar(b) => b,
            Algebraic::Extension(fe) => fe.reference(),
        }
    }

    fn terms(&self) -> Terms<B> {
        match self {
            Algebraic::Scalar(b) => Terms::from([(BasisKey::empty(), b.clone())]),
            Algebraic::Extension(fe) => fe.terms.clone(),
        }
    }

    pub fn try_add(&self, other: &Self) -> FieldResult<Self> {
        if let (Algebraic::Scalar(a), Algebraic::Scalar(b)) = (self, other) {
            return Ok(Algebraic::Scalar(a.ring_add(b)?));
        }
        let reference = self.reference();
        let mut terms = self.terms();
        let incoming = other.terms();
        check_terms(reference, &incoming)?;
        for (key, c) in incoming {
            accumulate(&mut terms, key, c)?;
        }
        Ok(build(&reference.zero_like(), terms))
    }

    pub fn try_sub(&self, other: &Self) -> FieldResult<Self> {
        self.try_add(&-other)
    }

    pub fn try_mul(&self, other: &Self) -> FieldResult<Self> {
        if let (Algebraic::Scalar(a), Algebraic::Scalar(b)) = (self, other) {
            return Ok(Algebraic::Scalar(a.ring_mul(b)?));
        }
        let incoming = other.terms();
        check_terms(self.reference(), &incoming)?;
        let mut product = Terms::new();
        for (key_a, a) in self.terms() {
            for (key_b, b) in &incoming {
                let (shared, key) = key_a.product(key_b);
                let mut c = a.ring_mul(b)?;
                for radicand in &shared {
                    c = c.ring_mul(radicand)?;
                }
                accumulate(&mut product, key, c)?;
            }
        }
        Ok(build(&self.reference().zero_like(), product))
    }

    /// Divides every coefficient by a base ring value.
    pub fn div_scalar(&self, divisor: &B) -> FieldResult<Self> {
        match self {
            Algebraic::Scalar(b) => Ok(Algebraic::Scalar(b.ring_div(divisor)?)),
            Algebraic::Extension(fe) => {
                let mut terms = Terms::new();
                for (key, c) in &fe.terms {
                    terms.insert(key.clone(), c.ring_div(divisor)?);
                }
                Ok(build(&divisor.zero_like(), terms))
            }
        }
    }

    pub fn try_div(&self, other: &Self) -> FieldResult<Self> {
        match other {
            Algebraic::Scalar(b) => self.div_scalar(b),
            Algebraic::Extension(fe) => self.try_mul(&fe.inverse()?),
        }
    }

    pub fn inverse(&self) -> FieldResult<Self> {
        match self {
            Algebraic::Scalar(b) => Ok(Algebraic::Scalar(b.one_like().ring_div(b)?)),
            Algebraic::Extension(fe) => fe.inverse(),
        }
    }

    /// Binary exponentiation; negative exponents invert first.
    pub fn pow(&self, exp: i64) -> FieldResult<Self> {
        let mut base = if exp < 0 {
            self.inverse()?
        } else {
            self.clone()
        };
        let mut remaining = exp.unsigned_abs();
        let mut result: Option<Self> = None;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = Some(match result {
                    None => base.clone(),
                    Some(r) => r.try_mul(&base)?,
                });
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.try_mul(&base)?;
            }
        }
        Ok(result.unwrap_or_else(|| Algebraic::Scalar(self.reference().one_like())))
    }
}

impl<B: BaseRing> From<B> for Algebraic<B> {
    fn from(value: B) -> Self {
        Algebraic::Scalar(value)
    }
}

impl<B: BaseRing> fmt::Display for FieldExtension<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, c)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "({c})")?;
            for radicand in &key.0 {
                write!(f, "·√({radicand})")?;
            }
        }
        Ok(())
    }
}

impl<B: BaseRing> fmt::Display for Algebraic<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algebraic::Scalar(b) => write!(f, "{b}"),
            Algebraic::Extension(fe) => write!(f, "{fe}"),
        }
    }
}

macro_rules! forward_algebraic_ops {
    ($($trait:ident, $method:ident, $try_method:ident);* $(;)?) => {
        $(
            impl<B: BaseRing> std::ops::$trait<&Algebraic<B>> for &Algebraic<B> {
                type Output = Algebraic<B>;

                fn $method(self, rhs: &Algebraic<B>) -> Algebraic<B> {
                    self.$try_method(rhs).unwrap_or_else(|e| panic!("{e}"))
                }
            }

            impl<B: BaseRing> std::ops::$trait for Algebraic<B> {
                type Output = Algebraic<B>;

                fn $method(self, rhs: Algebraic<B>) -> Algebraic<B> {
                    self.$try_method(&rhs).unwrap_or_else(|e| panic!("{e}"))
                }
            }
        )*
    };
}

forward_algebraic_ops!(
    Add, add, try_add;
    Sub, sub, try_sub;
    Mul, mul, try_mul;
    Div, div, try_div;
);

impl<B: BaseRing> std::ops::Neg for &Algebraic<B> {
    type Output = Algebraic<B>;

    fn neg(self) -> Algebraic<B> {
        match self {
            Algebraic::Scalar(b) => Algebraic::Scalar(b.ring_neg()),
            Algebraic::Extension(fe) => Algebraic::Extension(FieldExtension {
                radicands: fe.radicands.clone(),
                terms: fe
                    .terms
                    .iter()
                    .map(|(key, c)| (key.clone(), c.ring_neg()))
                    .collect(),
            }),
        }
    }
}

impl<B: BaseRing> std::ops::Neg for Algebraic<B> {
    type Output = Algebraic<B>;

    fn neg(self) -> Algebraic<B> {
        -&self
    }
}

#[cfg(feature = "serde")]
impl<B: BaseRing + Serialize> Serialize for FieldExtension<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let terms: Vec<(&[B], &B)> = self.terms().collect();
        (&self.radicands, terms).serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, B: BaseRing + Deserialize<'de>> Deserialize<'de> for FieldExtension<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (radicands, terms): (Vec<B>, Vec<(Vec<B>, B)>) = Deserialize::deserialize(deserializer)?;
        match FieldExtension::from_terms(radicands, terms).map_err(D::Error::custom)? {
            Algebraic::Extension(fe) => Ok(fe),
            Algebraic::Scalar(_) => Err(D::Error::custom(
                "field extension state collapses to a base ring value",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const P: i64 = 2147483647;

    fn ff(n: i64) -> ModP {
        ModP::new(n, P).unwrap()
    }

    fn sqrt(n: i64) -> Algebraic<ModP> {
        ff(n).sqrt().unwrap()
    }

    fn one() -> Algebraic<ModP> {
        Algebraic::Scalar(ff(1))
    }

    #[test]
    fn test_adjoin_collapses_trivial_radicands() {
        assert_eq!(FieldExtension::adjoin(ff(0)), Algebraic::Scalar(ff(0)));
        assert_eq!(FieldExtension::adjoin(ff(1)), Algebraic::Scalar(ff(1)));
        let Algebraic::Extension(root) = FieldExtension::adjoin(ff(3)) else {
            panic!("expected an extension");
        };
        assert_eq!(root.rank(), 1);
        assert_eq!(root.coefficient(&[ff(3)]), Some(&ff(1)));
        assert_eq!(root.coefficient(&[]), None);
    }

    #[test]
    fn test_square_of_root_is_radicand() {
        let root = sqrt(3);
        assert_eq!(root.try_mul(&root).unwrap(), Algebraic::Scalar(ff(3)));
    }

    #[test]
    fn test_smart_constructor_collapses() {
        let root = sqrt(5);
        let difference = root.try_sub(&root).unwrap();
        assert_eq!(difference, Algebraic::Scalar(ff(0)));

        let collapsed = FieldExtension::from_terms(
            vec![ff(3)],
            vec![(vec![], ff(7)), (vec![ff(3)], ff(0))],
        )
        .unwrap();
        assert_eq!(collapsed, Algebraic::Scalar(ff(7)));
    }

    #[test]
    fn test_minimal_radicands() {
        // (1 + √3)·√5 - √3·√5 = √5, so 3 is no longer tracked
        let x = one()
            .try_add(&sqrt(3))
            .unwrap()
            .try_mul(&sqrt(5))
            .unwrap()
            .try_sub(&sqrt(3).try_mul(&sqrt(5)).unwrap())
            .unwrap();
        let Algebraic::Extension(fe) = x else {
            panic!("expected an extension");
        };
        assert_eq!(fe.radicands(), &[ff(5)]);
    }

    #[test]
    fn test_canonical_key_order() {
        let a = sqrt(3).try_mul(&sqrt(5)).unwrap();
        let b = sqrt(5).try_mul(&sqrt(3)).unwrap();
        assert_eq!(a, b);
        let Algebraic::Extension(fe) = a else {
            panic!("expected an extension");
        };
        assert_eq!(fe.coefficient(&[ff(5), ff(3)]), Some(&ff(1)));
    }

    #[test]
    fn test_from_terms_validation() {
        assert!(FieldExtension::from_terms(vec![ff(3)], vec![(vec![ff(5)], ff(1))]).is_err());
        assert!(
            FieldExtension::from_terms(vec![ff(3)], vec![(vec![ff(3), ff(3)], ff(1))]).is_err()
        );
        assert!(FieldExtension::<ModP>::from_terms(vec![], vec![]).is_err());
    }

    #[test]
    fn test_mixed_moduli_are_rejected() {
        fn small(n: i64, p: i64) -> ModP {
            ModP::new(n, p).unwrap()
        }
        let lhs = Algebraic::Scalar(small(1, 7));
        // 2 is not a square modulo 11
        let root = small(2, 11).sqrt().unwrap();
        assert!(!root.is_scalar());

        for result in [
            lhs.try_add(&root),
            lhs.try_sub(&root),
            lhs.try_mul(&root),
            root.try_add(&lhs),
            root.try_mul(&lhs),
        ] {
            assert!(matches!(result, Err(FieldError::ModulusMismatch { .. })));
        }

        assert!(matches!(
            FieldExtension::from_terms(
                vec![small(3, 11)],
                vec![(vec![], small(1, 7)), (vec![small(3, 11)], small(2, 13))],
            ),
            Err(FieldError::ModulusMismatch { .. })
        ));
        assert!(matches!(
            FieldExtension::from_terms(
                vec![small(3, 11), small(2, 13)],
                vec![(vec![small(3, 11)], small(1, 11))],
            ),
            Err(FieldError::ModulusMismatch { .. })
        ));
    }

    #[test]
    fn test_negation() {
        let x = one().try_add(&sqrt(3)).unwrap();
        let negated = -&x;
        assert_eq!(x.try_add(&negated).unwrap(), Algebraic::Scalar(ff(0)));
        assert_eq!(-negated, x);
    }

    #[test]
    fn test_rank_three_inverse() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let radicands = vec![ff(3), ff(5), ff(7)];
        let mut terms = Vec::new();
        for mask in 0u8..8 {
            let key: Vec<ModP> = radicands
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| r.clone())
                .collect();
            terms.push((key, ff(rng.gen_range(1..P))));
        }
        let x = FieldExtension::from_terms(radicands, terms).unwrap();
        let Algebraic::Extension(fe) = &x else {
            panic!("expected an extension");
        };
        assert_eq!(fe.rank(), 3);
        assert!(fe.norm().is_ok());
        let inverse = x.inverse().unwrap();
        assert_eq!(inverse.try_mul(&x).unwrap(), one());
        assert_eq!(x.try_mul(&fe.conjugate().unwrap()).unwrap(), Algebraic::Scalar(fe.norm().unwrap()));
    }

    #[test]
    fn test_inverse_of_two_term_element() {
        // 1 / (1 - √3) = (1 + √3) / (1 - 3)
        let x = one().try_sub(&sqrt(3)).unwrap();
        let inverse = x.inverse().unwrap();
        let Algebraic::Extension(fe) = &inverse else {
            panic!("expected an extension");
        };
        assert_eq!(fe.coefficient(&[]), fe.coefficient(&[ff(3)]));
        assert_eq!(fe.coefficient(&[]), Some(&(ff(1) / ff(-2))));
    }

    #[test]
    fn test_pow() {
        let root = sqrt(3);
        assert_eq!(root.pow(0).unwrap(), one());
        assert_eq!(root.pow(2).unwrap(), Algebraic::Scalar(ff(3)));
        assert_eq!(
            root.pow(3).unwrap(),
            root.try_mul(&root).unwrap().try_mul(&root).unwrap()
        );
        assert_eq!(root.pow(-1).unwrap(), one().try_div(&root).unwrap());
        assert_eq!(root.pow(-2).unwrap(), Algebraic::Scalar(ff(1) / ff(3)));
    }

    #[test]
    fn test_operators() {
        let root = sqrt(7);
        let x = root.clone() + one();
        let y = root.clone() - one();
        assert_eq!(x * y, Algebraic::Scalar(ff(6)));
        assert_eq!(-root.clone() + root, Algebraic::Scalar(ff(0)));
    }

    #[test]
    fn test_display() {
        let x = one().try_add(&sqrt(3)).unwrap();
        assert_eq!(x.to_string(), "(1 % 2147483647) + (1 % 2147483647)·√(3 % 2147483647)");
    }

    #[cfg(feature = "serde")]
    mod serialization_tests {
        use super::*;

        #[test]
        fn test_extension_bincode_round_trip() {
            let x = one().try_add(&sqrt(3)).unwrap().try_mul(&sqrt(5)).unwrap();
            let bytes = bincode::serialize(&x).expect("Failed to serialize");
            let restored: Algebraic<ModP> =
                bincode::deserialize(&bytes).expect("Failed to deserialize");
            assert_eq!(x, restored);
        }
    }
}
