// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use ffs_config::ReconstructionAlgorithm;
use ffs_field::FieldError;
use num_bigint::BigInt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    /// Raised instead of the `None` sentinel when the failure mode is `error`
    #[error("{algorithm} found no fraction within its bound for {residue} mod {modulus}")]
    BoundExceeded {
        algorithm: ReconstructionAlgorithm,
        residue: BigInt,
        modulus: BigInt,
    },

    #[error("Moduli {lhs} and {rhs} are not coprime")]
    ModuliNotCoprime { lhs: BigInt, rhs: BigInt },

    #[error("No residues to combine")]
    EmptyInput,

    #[error("Got {values_len} residues but {moduli_len} moduli")]
    LengthMismatch {
        values_len: usize,
        moduli_len: usize,
    },

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type ReconstructResult<T> = Result<T, ReconstructError>;
