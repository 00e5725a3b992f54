//! Phase 1: binary search over the continuous scale `s` (component E).

use log::debug;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::arith::{ceil_rational, floor_rational_u64, Rational};
use crate::instance::WeightRestriction;
use crate::knapsack::{knapsack, knapsack_upper_bound};

/// `allocate(s)_i = floor(w_i * s + alpha_w)`, monotone nondecreasing in `s`.
pub fn allocate(inst: &WeightRestriction, s: &Rational) -> Vec<u64> {
    inst.weights
        .iter()
        .map(|w| {
            let wi = Rational::from_integer(w.clone());
            floor_rational_u64(&(wi * s + &inst.tw))
        })
        .collect()
}

/// Analytical upper bound on `s*`:
/// `alpha_n * (1 - alpha_w) * n / ((alpha_n - alpha_w) * W)`.
pub fn analytical_scale_bound(inst: &WeightRestriction) -> Rational {
    let one = Rational::from_integer(BigInt::from(1));
    let n = Rational::from_integer(BigInt::from(inst.n() as u64));
    let w = Rational::from_integer(inst.total_weight.clone());
    &inst.tn * (&one - &inst.tw) * n / ((&inst.tn - &inst.tw) * w)
}

/// `ceil(alpha_w * (1 - alpha_w) / (alpha_n - alpha_w) * n)`, the global
/// upper bound on the total number of tickets any valid allocation needs.
pub fn solution_upper_bound(inst: &WeightRestriction) -> BigInt {
    let one = Rational::from_integer(BigInt::from(1));
    let n = Rational::from_integer(BigInt::from(inst.n() as u64));
    ceil_rational(&(&inst.tw * (&one - &inst.tw) / (&inst.tn - &inst.tw) * n))
}

pub struct ScaleResult {
    pub t_low: Vec<u64>,
    pub t_high: Vec<u64>,
    pub boundary_set: Vec<usize>,
}

/// Runs Phase 1a (coarse, upper-bound-only) and, unless `linear` is set,
/// Phase 1b (exact, accelerated) binary search for `s*`.
pub fn search_scale(inst: &WeightRestriction, linear: bool, no_jit: bool) -> ScaleResult {
    let max_weight = inst
        .weights
        .iter()
        .max()
        .expect("instance construction guarantees a nonempty weight vector");
    let eps = Rational::new(BigInt::from(1), max_weight.clone());

    let threshold_weight_non_strict = inst.adversary_capacity();

    let mut s_low = Rational::zero();
    let mut s_high = analytical_scale_bound(inst);

    debug!("binary search for s*: coarse phase using the knapsack upper bound");
    let mut steps = 0u64;
    while &s_high - &s_low >= eps {
        steps += 1;
        let s_mid = (&s_high + &s_low) / Rational::from_integer(BigInt::from(2));
        let t_mid = allocate(inst, &s_mid);
        let sum_t_mid = Rational::from_integer(BigInt::from(t_mid.iter().sum::<u64>()));
        let target = &inst.tn * &sum_t_mid;

        let ub = knapsack_upper_bound(&inst.weights, &t_mid, &threshold_weight_non_strict);
        if ub < target {
            s_high = s_mid;
        } else {
            s_low = s_mid;
        }
    }
    debug!("coarse phase finished in {steps} steps, s* <= {s_high}");

    if linear {
        debug!("linear mode: skipping the exact refinement of s*");
    } else {
        debug!("binary search for s*: exact accelerated phase");
        let mut speed = eps.clone();
        s_low = Rational::zero();

        let mut steps = 0u64;
        while &s_high - &s_low >= eps {
            steps += 1;
            let two = Rational::from_integer(BigInt::from(2));
            let s_mid = if &two * &speed < &s_high - &s_low {
                let m = &s_high - &speed;
                speed = &speed * &two;
                m
            } else {
                (&s_high + &s_low) / &two
            };

            let t_mid = allocate(inst, &s_mid);
            let sum_t_mid: u64 = t_mid.iter().sum();
            let target = &inst.tn * Rational::from_integer(BigInt::from(sum_t_mid));
            let upper_bound = floor_rational_u64(&target) + 1;

            let res = knapsack(&inst.weights, &t_mid, &threshold_weight_non_strict, upper_bound, no_jit);
            if Rational::from_integer(BigInt::from(res)) < target {
                s_high = s_mid;
            } else {
                s_low = s_mid;
            }
        }
        debug!("exact phase finished in {steps} steps, s* = {s_high}");
    }

    let t_low = allocate(inst, &s_low);
    let t_high = allocate(inst, &s_high);
    let boundary_set: Vec<usize> = (0..inst.n()).filter(|&i| t_low[i] != t_high[i]).collect();
    debug_assert!(boundary_set.iter().all(|&i| t_high[i] == t_low[i] + 1));

    ScaleResult {
        t_low,
        t_high,
        boundary_set,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> Rational {
        Rational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn allocate_is_monotone_in_scale() {
        let inst = WeightRestriction::new(
            vec![BigInt::from(1), BigInt::from(2), BigInt::from(3)],
            rat(1, 10),
            rat(1, 2),
        )
        .unwrap();
        let s1 = rat(1, 4);
        let s2 = rat(3, 4);
        let t1 = allocate(&inst, &s1);
        let t2 = allocate(&inst, &s2);
        for i in 0..inst.n() {
            assert!(t1[i] <= t2[i]);
        }
    }

    #[test]
    fn scale_search_finds_a_valid_allocation() {
        use crate::validator::is_valid;
        let inst = WeightRestriction::new(vec![BigInt::from(1); 5], rat(1, 5), rat(2, 5)).unwrap();
        let result = search_scale(&inst, false, true);
        assert!(is_valid(&inst, &result.t_high, true));
    }

    #[test]
    fn linear_mode_still_produces_a_valid_allocation() {
        use crate::validator::is_valid;
        let inst = WeightRestriction::new(
            vec![BigInt::from(1), BigInt::from(2), BigInt::from(3), BigInt::from(4)],
            rat(1, 10),
            rat(1, 2),
        )
        .unwrap();
        let result = search_scale(&inst, true, true);
        assert!(is_valid(&inst, &result.t_high, true));
    }
}
