// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Roots of `x^n = a` over prime fields.

use crate::errors::{FieldError, FieldResult};
use crate::finite_field::ModP;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Solves `x^degree = value` in the field of `value`.
///
/// Returns every root, sorted by representative, or `None` when there is no root.
pub trait RootFinder {
    fn roots(&self, value: &ModP, degree: u32) -> FieldResult<Option<Vec<ModP>>>;
}

impl<T: RootFinder + ?Sized> RootFinder for &T {
    fn roots(&self, value: &ModP, degree: u32) -> FieldResult<Option<Vec<ModP>>> {
        (**self).roots(value, degree)
    }
}

impl<T: RootFinder + ?Sized> RootFinder for Arc<T> {
    fn roots(&self, value: &ModP, degree: u32) -> FieldResult<Option<Vec<ModP>>> {
        (**self).roots(value, degree)
    }
}

/// Stateless root finder.
///
/// Square roots use Tonelli-Shanks. A degree `n` is supported whenever
/// `gcd(n, p - 1)` is a power of two: the 2-power part is taken with repeated
/// square roots and the odd part is inverted with a Bezout exponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeFieldRootFinder;

impl RootFinder for PrimeFieldRootFinder {
    fn roots(&self, value: &ModP, degree: u32) -> FieldResult<Option<Vec<ModP>>> {
        if degree == 0 {
            return Err(FieldError::unsupported("roots of degree zero"));
        }
        if value.is_zero() {
            return Ok(Some(vec![value.clone()]));
        }

        let p = value.modulus();
        let order: BigInt = p - 1u32;
        let degree_big = BigInt::from(degree);
        let g = degree_big.gcd(&order);
        let Some(e) = power_of_two_exponent(&g) else {
            return Err(FieldError::unsupported(format!(
                "roots of degree {degree} modulo {p}: gcd({degree}, {order}) = {g}"
            )));
        };

        let candidates = power_of_two_roots(value, e)?;
        let Some(first) = candidates.first() else {
            return Ok(None);
        };

        // degree * u = g (mod p - 1), so (y^u)^degree = y^g = value
        let u = degree_big.extended_gcd(&order).x.mod_floor(&order);
        let base = ModP::from_reduced(first.value().modpow(&u, p), p);
        let unity = power_of_two_roots(&ModP::from_reduced(BigInt::one(), p), e)?;

        let mut roots = unity
            .iter()
            .map(|zeta| base.try_mul(zeta))
            .collect::<FieldResult<Vec<_>>>()?;
        roots.sort_by(|a, b| a.value().cmp(b.value()));
        roots.dedup();
        Ok(Some(roots))
    }
}

fn power_of_two_exponent(g: &BigInt) -> Option<u64> {
    let e = g.trailing_zeros()?;
    (g >> e).is_one().then_some(e)
}

/// Every `y` with `y^(2^e) = value`.
fn power_of_two_roots(value: &ModP, e: u64) -> FieldResult<Vec<ModP>> {
    let mut level = vec![value.clone()];
    for _ in 0..e {
        let mut next = Vec::with_capacity(level.len() * 2);
        for square in &level {
            if let Some(root) = tonelli_shanks(square)? {
                let negated = -&root;
                if negated != root {
                    next.push(negated);
                }
                next.push(root);
            }
        }
        if next.is_empty() {
            return Ok(next);
        }
        level = next;
    }
    Ok(level)
}

/// Square root modulo an odd prime, `None` for quadratic non-residues.
fn tonelli_shanks(a: &ModP) -> FieldResult<Option<ModP>> {
    let p = a.modulus();
    if a.is_zero() || p == &BigInt::from(2) {
        return Ok(Some(a.clone()));
    }

    let one = BigInt::one();
    let minus_one: BigInt = p - 1u32;
    let half: BigInt = &minus_one >> 1;
    if a.value().modpow(&half, p) != one {
        return Ok(None);
    }

    // p - 1 = q * 2^s with q odd
    let s = minus_one.trailing_zeros().unwrap_or(0);
    let q: BigInt = &minus_one >> s;

    let mut z = BigInt::from(2);
    while z.modpow(&half, p) != minus_one {
        z += 1u32;
        if &z >= p {
            return Err(FieldError::unsupported(format!(
                "no quadratic non-residue modulo {p}; is it prime?"
            )));
        }
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.value().modpow(&q, p);
    let mut r = a.value().modpow(&((&q + 1u32) >> 1), p);

    while t != one {
        let mut i = 0;
        let mut probe = t.clone();
        while probe != one {
            probe = (&probe * &probe) % p;
            i += 1;
            if i >= m {
                return Err(FieldError::unsupported(format!(
                    "square root iteration diverged modulo {p}; is it prime?"
                )));
            }
        }

        let mut b = c.clone();
        for _ in 0..(m - i - 1) {
            b = (&b * &b) % p;
        }
        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }

    Ok(Some(ModP::from_reduced(r, p)))
}

type RootKey = (BigInt, BigInt, u32);
type RootSet = Option<Vec<ModP>>;

/// Memoises another root finder, keyed by `(value, modulus, degree)`.
///
/// Safe to share between threads. Concurrent requests for the same key compute
/// the roots once; the other callers wait for that result. Errors are not cached.
#[derive(Debug, Default)]
pub struct CachedRootFinder<F = PrimeFieldRootFinder> {
    inner: F,
    cache: Mutex<HashMap<RootKey, Arc<OnceCell<RootSet>>>>,
}

impl<F: RootFinder> CachedRootFinder<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cell(&self, key: RootKey) -> Arc<OnceCell<RootSet>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.entry(key).or_default().clone()
    }

    /// Drops the slot left behind by a failed lookup, unless another caller
    /// has replaced or filled it since.
    fn evict_empty(&self, key: &RootKey, cell: &Arc<OnceCell<RootSet>>) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache
            .get(key)
            .is_some_and(|slot| Arc::ptr_eq(slot, cell) && slot.get().is_none())
        {
            cache.remove(key);
        }
    }
}

impl<F: RootFinder> RootFinder for CachedRootFinder<F> {
    fn roots(&self, value: &ModP, degree: u32) -> FieldResult<Option<Vec<ModP>>> {
        let key = (value.value().clone(), value.modulus().clone(), degree);
        let cell = self.cell(key.clone());
        if let Some(roots) = cell.get() {
            trace!("root cache hit for x^{degree} = {value}");
            return Ok(roots.clone());
        }
        let result = cell.get_or_try_init(|| {
            trace!("root cache miss for x^{degree} = {value}");
            self.inner.roots(value, degree)
        });
        match result {
            Ok(roots) => Ok(roots.clone()),
            Err(e) => {
                self.evict_empty(&key, &cell);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn ff(n: i64, p: i64) -> ModP {
        ModP::new(n, p).unwrap()
    }

    fn values(roots: Option<Vec<ModP>>) -> Option<Vec<i64>> {
        roots.map(|roots| {
            roots
                .iter()
                .map(|r| i64::try_from(r.value()).unwrap())
                .collect()
        })
    }

    #[test]
    fn test_square_roots() {
        let finder = PrimeFieldRootFinder;
        assert_eq!(values(finder.roots(&ff(2, 17), 2).unwrap()), Some(vec![6, 11]));
        assert_eq!(values(finder.roots(&ff(3, 7), 2).unwrap()), None);
        assert_eq!(values(finder.roots(&ff(0, 7), 2).unwrap()), Some(vec![0]));
        assert_eq!(values(finder.roots(&ff(1, 2), 2).unwrap()), Some(vec![1]));
    }

    #[test]
    fn test_tonelli_shanks_large_two_adicity() {
        // 2^31 - 19 = 1 (mod 4)
        let p = 2147483629i64;
        let finder = PrimeFieldRootFinder;
        let roots = finder.roots(&ff(-1, p), 2).unwrap().unwrap();
        assert_eq!(roots.len(), 2);
        for root in roots {
            assert_eq!(&root * &root, ff(-1, p));
        }
        let square = ff(987654321, p).pow(2).unwrap();
        let roots = finder.roots(&square, 2).unwrap().unwrap();
        assert!(roots.contains(&ff(987654321, p)));
    }

    #[test]
    fn test_higher_degrees() {
        let finder = PrimeFieldRootFinder;
        assert_eq!(
            values(finder.roots(&ff(16, 17), 4).unwrap()),
            Some(vec![2, 8, 9, 15])
        );
        let cube = ff(5, 10007).pow(3).unwrap();
        assert_eq!(values(finder.roots(&cube, 3).unwrap()), Some(vec![5]));
        assert!(matches!(
            finder.roots(&ff(2, 7), 3),
            Err(FieldError::Unsupported { .. })
        ));
        assert!(finder.roots(&ff(2, 7), 0).is_err());
    }

    struct CountingFinder(AtomicUsize);

    impl RootFinder for CountingFinder {
        fn roots(&self, value: &ModP, degree: u32) -> FieldResult<Option<Vec<ModP>>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            PrimeFieldRootFinder.roots(value, degree)
        }
    }

    #[test]
    fn test_cache_memoises() {
        let cache = CachedRootFinder::new(CountingFinder(AtomicUsize::new(0)));
        assert!(cache.is_empty());
        let first = cache.roots(&ff(2, 17), 2).unwrap();
        let second = cache.roots(&ff(2, 17), 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.inner.0.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        cache.roots(&ff(2, 17), 4).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        cache.roots(&ff(2, 17), 2).unwrap();
        assert_eq!(cache.inner.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let cache: CachedRootFinder = CachedRootFinder::default();
        assert!(cache.roots(&ff(2, 7), 3).is_err());
        assert!(cache.roots(&ff(3, 7), 3).is_err());
        assert!(cache.is_empty());
        assert!(cache.cache.lock().unwrap().is_empty());

        cache.roots(&ff(2, 17), 2).unwrap();
        assert!(cache.roots(&ff(2, 7), 3).is_err());
        assert_eq!(cache.cache.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_cache_single_flight_across_threads() {
        let cache = Arc::new(CachedRootFinder::new(CountingFinder(AtomicUsize::new(0))));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.roots(&ff(-1, 2147483629), 2).unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.inner.0.load(Ordering::SeqCst), 1);
    }
}
