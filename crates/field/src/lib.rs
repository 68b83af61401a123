// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! # Exact Field Arithmetic
//!
//! Number types for computations that must not lose information to rounding:
//!
//! - [`ModP`]: elements of a prime field `Z/pZ`.
//! - [`PAdic`]: p-adic numbers truncated to a finite number of digits, with the
//!   precision of every result tracked from the precision of its operands.
//! - [`FieldExtension`]: formal square roots adjoined to either of the above, for
//!   when a square root does not exist in the base ring.
//!
//! ## Precision
//!
//! P-adic addition can cancel leading digits. Under the default, honest mode
//! those digits are gone and the result reports fewer significant digits. The
//! fixed-relative mode of [`PAdicContext`] refills them with seeded random
//! digits so the number of digits stays constant.
//!
//! ## Serialization
//!
//! With the `serde` feature every type serializes as its state tuple:
//! `(value, modulus)` for [`ModP`] and `(mantissa, prime, precision, valuation)`
//! for [`PAdic`].

pub mod errors;
pub mod field_extension;
pub mod finite_field;
mod macros;
pub mod number;
pub mod padic;
mod padic_format;
pub mod precision;
pub mod roots;
pub mod utils;

pub use errors::{FieldError, FieldResult};
pub use field_extension::{Algebraic, BaseRing, BasisKey, FieldExtension};
pub use finite_field::ModP;
pub use number::Number;
pub use padic::{PAdic, Scaled};
pub use precision::PAdicContext;
pub use roots::{CachedRootFinder, PrimeFieldRootFinder, RootFinder};
