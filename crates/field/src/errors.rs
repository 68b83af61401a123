// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for field, p-adic and extension arithmetic.

use num_bigint::BigInt;
use thiserror::Error;

/// Errors that can occur during arithmetic over finite fields, p-adics and their extensions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The two operands live over different moduli or primes
    #[error("Can't combine elements of different fields: modulus {lhs} and modulus {rhs}")]
    ModulusMismatch { lhs: BigInt, rhs: BigInt },

    /// `gcd(value, modulus) != 1`
    #[error("Inverse of {value} mod {modulus} does not exist. Are you sure {modulus} is prime?")]
    NotInvertible { value: BigInt, modulus: BigInt },

    /// A square root is needed that the container type cannot represent
    #[error("A field extension is required to represent {value}")]
    ExtensionRequired { value: String },

    /// Malformed textual input
    #[error("Could not parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Moduli and primes must be positive (primes at least 2)
    #[error("Invalid modulus: {modulus}")]
    InvalidModulus { modulus: BigInt },

    /// A value violates its representation invariants
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// A value can't be converted to the requested representation
    #[error("Conversion error: {message}")]
    Conversion { message: String },

    /// The operation is mathematically meaningful but not implemented
    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    /// Internal bookkeeping failed. Always a bug.
    #[error("Internal consistency failure: {message}")]
    Inconsistent { message: String },
}

impl FieldError {
    pub fn mismatch(lhs: &BigInt, rhs: &BigInt) -> Self {
        Self::ModulusMismatch {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        }
    }

    pub fn not_invertible(value: &BigInt, modulus: &BigInt) -> Self {
        Self::NotInvertible {
            value: value.clone(),
            modulus: modulus.clone(),
        }
    }

    pub fn extension_required(value: impl ToString) -> Self {
        Self::ExtensionRequired {
            value: value.to_string(),
        }
    }

    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent {
            message: message.into(),
        }
    }
}

pub type FieldResult<T> = Result<T, FieldError>;
