// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Chinese remaindering of prime field residues.

use crate::errors::{ReconstructError, ReconstructResult};
use ffs_field::ModP;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

/// Given `a mod n1` and `b mod n2` with coprime moduli, returns the unique
/// residue modulo `n1 * n2` reducing to both.
pub fn chinese_remainder(a: &ModP, b: &ModP) -> ReconstructResult<ModP> {
    let (n1, n2) = (a.modulus(), b.modulus());
    let bezout = n1.extended_gcd(n2);
    if !bezout.gcd.is_one() {
        return Err(ReconstructError::ModuliNotCoprime {
            lhs: n1.clone(),
            rhs: n2.clone(),
        });
    }
    // x * n1 + y * n2 = 1
    let value = a.value() * &bezout.y * n2 + b.value() * &bezout.x * n1;
    Ok(ModP::new(value, n1 * n2)?)
}

/// Folds residues left to right into one residue modulo the product of their moduli.
pub fn chained_chinese_remainder(values: &[ModP]) -> ReconstructResult<ModP> {
    let (first, rest) = values
        .split_first()
        .ok_or(ReconstructError::EmptyInput)?;
    rest.iter()
        .try_fold(first.clone(), |acc, value| chinese_remainder(&acc, value))
}

/// Same as [`chained_chinese_remainder`] with residues and moduli given apart.
pub fn chained_chinese_remainder_with_moduli(
    values: &[BigInt],
    moduli: &[BigInt],
) -> ReconstructResult<ModP> {
    if values.len() != moduli.len() {
        return Err(ReconstructError::LengthMismatch {
            values_len: values.len(),
            moduli_len: moduli.len(),
        });
    }
    let residues = values
        .iter()
        .zip(moduli)
        .map(|(value, modulus)| ModP::new(value, modulus.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    chained_chinese_remainder(&residues)
}
