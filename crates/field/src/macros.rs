// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// Implements the std operator traits for owned and borrowed operands on top of
/// fallible `try_*` methods. Operators panic with the error message, the same way
/// integer division by zero does.
macro_rules! forward_binary_ops {
    ($ty:ty; $($trait:ident, $method:ident, $try_method:ident);* $(;)?) => {
        $(
            impl std::ops::$trait<&$ty> for &$ty {
                type Output = $ty;

                fn $method(self, rhs: &$ty) -> $ty {
                    self.$try_method(rhs).unwrap_or_else(|e| panic!("{e}"))
                }
            }

            impl std::ops::$trait<$ty> for $ty {
                type Output = $ty;

                fn $method(self, rhs: $ty) -> $ty {
                    <&$ty as std::ops::$trait<&$ty>>::$method(&self, &rhs)
                }
            }

            impl std::ops::$trait<&$ty> for $ty {
                type Output = $ty;

                fn $method(self, rhs: &$ty) -> $ty {
                    <&$ty as std::ops::$trait<&$ty>>::$method(&self, rhs)
                }
            }

            impl std::ops::$trait<$ty> for &$ty {
                type Output = $ty;

                fn $method(self, rhs: $ty) -> $ty {
                    <&$ty as std::ops::$trait<&$ty>>::$method(self, &rhs)
                }
            }
        )*
    };
}

pub(crate) use forward_binary_ops;
