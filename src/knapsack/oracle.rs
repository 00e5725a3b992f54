//! The bounded 0/1 knapsack exact solver.

use ndarray::Array1;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::arith::reverse_range;

use super::backend::{select_backend, Backend};

/// A ring of weights the dynamic program can run over: zero, addition, and a
/// total order. Satisfied by both `i64` (the fast path) and [`BigInt`] (the
/// arbitrary-precision fallback).
pub trait KnapsackWeight: Clone + Ord {
    fn zero() -> Self;
    fn add(&self, other: &Self) -> Self;
}

impl KnapsackWeight for i64 {
    fn zero() -> Self {
        0
    }

    fn add(&self, other: &Self) -> Self {
        // Backend selection already verified every sum involved fits in an
        // i64, so this can never overflow.
        self + other
    }
}

impl KnapsackWeight for BigInt {
    fn zero() -> Self {
        BigInt::zero()
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }
}

/// Solves `knapsack(w, p, C, U)`: the maximum profit of a 0/1 subset with
/// weight at most `capacity`, exact up to `upper_bound` (see the module-level
/// contract in the design doc — above `upper_bound` any value in
/// `(upper_bound, sum(profits)]` is an acceptable answer).
///
/// `weights` and `capacity` are arbitrary-precision; the backend selector
/// transparently runs the fast `i64` kernel when everything fits, or falls
/// back to the `BigInt` kernel otherwise. `no_jit` forces the fallback.
pub fn knapsack(
    weights: &[BigInt],
    profits: &[u64],
    capacity: &BigInt,
    upper_bound: u64,
    no_jit: bool,
) -> u64 {
    assert!(!weights.is_empty());
    assert_eq!(weights.len(), profits.len());

    match select_backend(weights, profits, capacity, no_jit) {
        Backend::Fast => {
            let weights_i64: Vec<i64> = weights
                .iter()
                .map(|w| w.to_i64().expect("backend selector verified this fits in i64"))
                .collect();
            let capacity_i64: i64 = capacity
                .to_i64()
                .expect("backend selector verified this fits in i64");
            let sum: i64 = weights_i64.iter().sum();
            knapsack_dp(&weights_i64, profits, &capacity_i64, upper_bound, sum + 1)
        }
        Backend::BigInt => {
            let sum: BigInt = weights.iter().sum();
            knapsack_dp(weights, profits, capacity, upper_bound, sum + 1)
        }
    }
}

/// The dynamic program itself (algorithm in component C of the design doc),
/// generic over the weight ring.
///
/// `dp[q]` is the minimum total weight of a subset with profit at least `q`,
/// among the items considered so far; `infinity` is any sentinel value
/// strictly greater than any achievable subset weight (the caller passes the
/// sum of all weights plus one).
fn knapsack_dp<T: KnapsackWeight>(
    weights: &[T],
    profits: &[u64],
    capacity: &T,
    upper_bound: u64,
    infinity: T,
) -> u64 {
    // Fast exit: a single item alone beats the cap.
    for (w, &p) in weights.iter().zip(profits) {
        if w <= capacity && p > upper_bound {
            return p;
        }
    }

    let slots = upper_bound as usize + 2;
    let mut dp: Array1<T> = Array1::from_elem(slots, infinity.clone());
    dp[0] = T::zero();

    for (w, &p) in weights.iter().zip(profits) {
        if p == 0 {
            // Zero-profit items can never help reach a profit of q >= 1.
            continue;
        }
        let p = p as usize;

        for q in reverse_range(0, slots as i64, 1).map(|q| q as usize) {
            if p >= q {
                if w < &dp[q] {
                    dp[q] = w.clone();
                }
            } else {
                let prev = &dp[q - p];
                if prev < &infinity {
                    let candidate = prev.add(w);
                    if candidate < dp[q] {
                        dp[q] = candidate;
                    }
                }
            }
        }
    }

    // dp[0] = 0 qualifies whenever capacity >= 0. A negative capacity (only
    // reachable when alpha_w = 0, i.e. no coalition can ever be "below"
    // the weighted threshold) has no feasible subset at all; reporting 0
    // is the conservative answer that keeps every downstream `< T` check
    // correct.
    reverse_range(0, slots as i64, 1)
        .map(|q| q as usize)
        .find(|&q| &dp[q] <= capacity)
        .unwrap_or(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn bi(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn brute_force(weights: &[i64], profits: &[u64], capacity: i64) -> u64 {
        let n = weights.len();
        let mut best = 0u64;
        for mask in 0u32..(1 << n) {
            let mut w = 0i64;
            let mut p = 0u64;
            for i in 0..n {
                if mask & (1 << i) != 0 {
                    w += weights[i];
                    p += profits[i];
                }
            }
            if w <= capacity {
                best = best.max(p);
            }
        }
        best
    }

    #[test]
    fn matches_brute_force_on_small_instances() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let n = rng.gen_range(1..=8);
            let weights: Vec<i64> = (0..n).map(|_| rng.gen_range(1..=20)).collect();
            let profits: Vec<u64> = (0..n).map(|_| rng.gen_range(0..=20)).collect();
            let capacity = rng.gen_range(0..=50i64);

            let expected = brute_force(&weights, &profits, capacity);
            let upper_bound = expected.max(1);

            let big_weights: Vec<BigInt> = weights.iter().map(|&w| bi(w)).collect();
            let got = knapsack(&big_weights, &profits, &bi(capacity), upper_bound, true);
            assert_eq!(got.min(upper_bound), expected.min(upper_bound));
        }
    }

    #[test]
    fn single_item_exceeding_upper_bound_returns_immediately() {
        let weights = vec![bi(1)];
        let profits = vec![100u64];
        assert_eq!(knapsack(&weights, &profits, &bi(5), 10, true), 100);
    }

    #[test]
    fn zero_profit_items_are_ignored() {
        let weights = vec![bi(1), bi(1)];
        let profits = vec![0u64, 5u64];
        assert_eq!(knapsack(&weights, &profits, &bi(10), 10, true), 5);
    }

    #[test]
    fn fast_and_bigint_backends_agree() {
        let weights: Vec<BigInt> = vec![bi(3), bi(4), bi(5), bi(8)];
        let profits: Vec<u64> = vec![4, 5, 6, 10];
        let capacity = bi(10);
        let fast = knapsack(&weights, &profits, &capacity, 20, false);
        let forced_bigint = knapsack(&weights, &profits, &capacity, 20, true);
        assert_eq!(fast, forced_bigint);
    }
}
