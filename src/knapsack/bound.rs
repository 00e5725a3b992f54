//! Linear-relaxation upper bound for the knapsack oracle.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::arith::Rational;

/// Greedy fractional-relaxation upper bound on the knapsack profit:
/// sort items by profit density descending, take whole items while capacity
/// allows, then a fractional slice of the first item that doesn't fit.
///
/// This always overestimates the true (integral) optimum, which is exactly
/// what lets the coarse search phases use it as a conservative "definitely
/// still valid" / "maybe invalid" test without running the expensive exact
/// oracle.
pub fn knapsack_upper_bound(weights: &[BigInt], profits: &[u64], capacity: &BigInt) -> Rational {
    let n = weights.len();
    assert_eq!(profits.len(), n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        // p_a / w_a vs p_b / w_b, compared without floats via cross-multiplication.
        let lhs = Rational::from_integer(BigInt::from(profits[a])) * &weights[b];
        let rhs = Rational::from_integer(BigInt::from(profits[b])) * &weights[a];
        rhs.cmp(&lhs)
    });

    let mut remaining = capacity.clone();
    let mut profit = Rational::from_integer(BigInt::from(0));

    for i in order {
        let w = &weights[i];
        let p = Rational::from_integer(BigInt::from(profits[i]));

        if w.is_zero() {
            // Zero-weight items are always free to include, regardless of
            // (even negative) remaining capacity.
            profit += p;
        } else if &remaining >= w {
            remaining -= w;
            profit += p;
        } else {
            profit += p * Rational::new(remaining.clone(), w.clone());
            break;
        }
    }

    profit
}
