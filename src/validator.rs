//! Decides whether a candidate allocation satisfies the Weight Restriction
//! property (component D).

use num_bigint::BigInt;

use crate::arith::{floor_rational_u64, Rational};
use crate::instance::WeightRestriction;
use crate::knapsack::knapsack;

/// `is_valid(inst, t)`: true iff the largest adversarial coalition with
/// weight strictly less than `alpha_w * W` wins strictly fewer than
/// `alpha_n * sum(t)` tickets.
///
/// Capacity is `ceil(alpha_w * W) - 1`, the largest integer strictly below
/// the (possibly non-integer) weight budget. The knapsack cap is
/// `floor(alpha_n * sum(t)) + 1`, just past the threshold the caller cares
/// about distinguishing.
pub fn is_valid(inst: &WeightRestriction, t: &[u64], no_jit: bool) -> bool {
    let capacity = inst.adversary_capacity();
    let sum_t: u64 = t.iter().sum();
    let target = &inst.tn * Rational::from_integer(BigInt::from(sum_t));
    let upper_bound = floor_rational_u64(&target) + 1;

    let adversary_best = knapsack(&inst.weights, t, &capacity, upper_bound, no_jit);
    Rational::from_integer(BigInt::from(adversary_best)) < target
}
