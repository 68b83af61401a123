// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use ffs_field::{ModP, PAdic, PAdicContext};
use proptest::prelude::*;

const P: i64 = 2147483647;

fn arb_modp() -> impl Strategy<Value = ModP> {
    (0..P).prop_map(|v| ModP::new(v, P).unwrap())
}

fn arb_padic() -> impl Strategy<Value = PAdic> {
    (
        any::<i64>().prop_filter("non-zero", |v| *v != 0),
        1u64..8,
        -3i64..3,
    )
        .prop_map(|(num, k, n)| PAdic::new(num, 7, k, n).unwrap())
}

proptest! {
    #[test]
    fn modp_ring_axioms(a in arb_modp(), b in arb_modp(), c in arb_modp()) {
        prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
        prop_assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
        prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        prop_assert_eq!(&(&a - &b) + &b, a.clone());
        prop_assert!((&a + &(-&a)).is_zero());
    }

    #[test]
    fn modp_division_inverts_multiplication(a in arb_modp(), b in arb_modp()) {
        prop_assume!(!b.is_zero());
        prop_assert_eq!(&(&a / &b) * &b, a.clone());
        prop_assert!((&b * &b.inverse().unwrap()).is_one());
    }

    #[test]
    fn modp_parse_round_trip(a in arb_modp()) {
        let parsed: ModP = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    #[test]
    fn padic_multiplication_keeps_smaller_precision(a in arb_padic(), b in arb_padic()) {
        let product = &a * &b;
        prop_assert_eq!(product.precision(), a.precision().min(b.precision()));
        prop_assert_eq!(product.valuation(), a.valuation() + b.valuation());
        let quotient = &a / &b;
        prop_assert_eq!(quotient.precision(), a.precision().min(b.precision()));
        prop_assert_eq!(quotient.valuation(), a.valuation() - b.valuation());
    }

    #[test]
    fn padic_sum_keeps_smaller_absolute_precision(a in arb_padic(), b in arb_padic()) {
        let sum = &a + &b;
        let bound = (a.valuation() + a.precision() as i64).min(b.valuation() + b.precision() as i64);
        prop_assert_eq!(sum.valuation() + sum.precision() as i64, bound);
    }

    #[test]
    fn padic_self_cancellation_has_no_digits(a in arb_padic()) {
        let zero = &a - &a;
        prop_assert!(zero.is_zero());
        prop_assert_eq!(zero.valuation(), a.valuation() + a.precision() as i64);
        prop_assert_eq!(-(-&a), a);
    }

    #[test]
    fn padic_fixed_relative_keeps_precision(a in arb_padic(), seed in any::<u64>()) {
        let ctx = PAdicContext::fixed_relative(seed);
        let zero = ctx.sub(&a, &a).unwrap();
        prop_assert_eq!(zero.precision(), a.precision());
    }

    #[test]
    fn padic_text_and_state_round_trip(a in arb_padic()) {
        let parsed: PAdic = a.to_string().parse().unwrap();
        prop_assert_eq!(&parsed, &a);
        prop_assert_eq!(PAdic::from_state(a.to_state()).unwrap(), a);
    }
}
