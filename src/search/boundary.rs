//! Phase 2: binary search over which prefix of the boundary set rounds up
//! (component F).

use log::debug;
use num_bigint::BigInt;

use crate::arith::{floor_rational_u64, Rational};
use crate::instance::WeightRestriction;
use crate::knapsack::{knapsack, knapsack_upper_bound};

use super::scale::ScaleResult;

/// For `k` in `0..=|B|`, builds the allocation equal to `t_high` on `B[0..k)`
/// and `t_low` on `B[k..)`. `boundary_rank[i]` is `i`'s position within `B`,
/// or `None` if party `i` is not in `B` — precomputed once so the repeated
/// "is `i` in `B[k..)`" test during the search is a single integer
/// comparison rather than a scan of `B`.
fn allocation_at_k(
    t_low: &[u64],
    t_high: &[u64],
    boundary_rank: &[Option<usize>],
    k: usize,
) -> Vec<u64> {
    (0..t_low.len())
        .map(|i| match boundary_rank[i] {
            Some(rank) if rank >= k => t_low[i],
            _ => t_high[i],
        })
        .collect()
}

fn boundary_ranks(n: usize, boundary_set: &[usize]) -> Vec<Option<usize>> {
    let mut ranks = vec![None; n];
    for (rank, &i) in boundary_set.iter().enumerate() {
        ranks[i] = Some(rank);
    }
    ranks
}

/// Runs Phase 2a (coarse) and, unless `linear` is set, Phase 2b (exact,
/// accelerated) binary search over `k`, the number of boundary parties that
/// round up. Returns the final allocation.
pub fn refine_boundary(
    inst: &WeightRestriction,
    scale_result: &ScaleResult,
    linear: bool,
    no_jit: bool,
) -> Vec<u64> {
    let ScaleResult {
        t_low,
        t_high,
        boundary_set,
    } = scale_result;

    if boundary_set.is_empty() {
        return t_high.clone();
    }

    let boundary_rank = boundary_ranks(inst.n(), boundary_set);
    let threshold_weight_non_strict = inst.adversary_capacity();

    let mut k_low = 0usize;
    let mut k_high = boundary_set.len();

    debug!("binary search for k*: coarse phase using the knapsack upper bound");
    let mut steps = 0u64;
    while k_high - k_low > 1 {
        steps += 1;
        let k_mid = (k_high + k_low) / 2;
        let t_mid = allocation_at_k(t_low, t_high, &boundary_rank, k_mid);
        let sum_t_mid = Rational::from_integer(BigInt::from(t_mid.iter().sum::<u64>()));
        let target = &inst.tn * &sum_t_mid;

        let ub = knapsack_upper_bound(&inst.weights, &t_mid, &threshold_weight_non_strict);
        if ub < target {
            k_high = k_mid;
        } else {
            k_low = k_mid;
        }
    }
    debug!("coarse phase finished in {steps} steps, k* <= {k_high}/{}", boundary_set.len());

    if linear {
        debug!("linear mode: skipping the exact refinement of k*");
    } else {
        debug!("binary search for k*: exact accelerated phase");
        k_low = 0;
        let mut speed = 1usize;

        let mut steps = 0u64;
        while k_high - k_low > 1 {
            steps += 1;
            let k_mid = if 2 * speed < k_high - k_low {
                let m = k_high - speed;
                speed *= 2;
                m
            } else {
                (k_high + k_low) / 2
            };

            let t_mid = allocation_at_k(t_low, t_high, &boundary_rank, k_mid);
            let sum_t_mid: u64 = t_mid.iter().sum();
            let target = &inst.tn * Rational::from_integer(BigInt::from(sum_t_mid));
            let upper_bound = floor_rational_u64(&target) + 1;

            let res = knapsack(&inst.weights, &t_mid, &threshold_weight_non_strict, upper_bound, no_jit);
            if Rational::from_integer(BigInt::from(res)) < target {
                k_high = k_mid;
            } else {
                k_low = k_mid;
            }
        }
        debug!("exact phase finished in {steps} steps, k* = {k_high}/{}", boundary_set.len());
    }

    allocation_at_k(t_low, t_high, &boundary_rank, k_high)
}
