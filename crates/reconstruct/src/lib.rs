// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Rational Reconstruction
//!
//! Turns residues back into exact fractions. A rational `r/s` evaluated in a
//! prime field is the residue `r * s^-1 mod p`; when `|r|` and `|s|` are small
//! compared to `p`, the fraction can be recovered from the residue alone.
//! Residues from several primes are first combined with the Chinese remainder
//! theorem so that larger fractions fit under the bound.
//!
//! P-adic values reconstruct their mantissa modulo `p^k` and scale the result
//! by `p^n`.

pub mod crt;
pub mod errors;
pub mod rational;

pub use crt::{chained_chinese_remainder, chained_chinese_remainder_with_moduli, chinese_remainder};
pub use errors::{ReconstructError, ReconstructResult};
pub use rational::{eearr, lattice_gauss_reduction, lgrr, mqrr, Rationalise, Rationaliser};
