//! Orchestrates the two search phases end to end (component G).

use log::debug;
use num_bigint::BigInt;
use thiserror::Error;

use crate::arith::Rational;
use crate::instance::{DomainError, WeightQualification, WeightRestriction};
use crate::search::scale::solution_upper_bound;
use crate::search::{refine_boundary, search_scale};
use crate::validator::is_valid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Flags common to both `wr` and `wq` solves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// Skip Phases 1b and 2b, accepting a possibly larger valid total.
    pub linear: bool,
    /// Force the arbitrary-precision knapsack backend unconditionally.
    pub no_jit: bool,
    /// Re-run the validator after each phase and check the global ticket
    /// upper bound; panics on failure rather than returning an error, since
    /// a failure here is a bug in the solver, not bad user input.
    pub verify: bool,
}

/// Runs the full two-phase optimizer against an already-constructed WR
/// instance and returns the minimal ticket vector.
pub fn solve(inst: &WeightRestriction, opts: SolveOptions) -> Vec<u64> {
    debug!(
        "solving WR instance: n={}, tw={}, tn={}",
        inst.n(),
        inst.tw,
        inst.tn
    );

    let scale_result = search_scale(inst, opts.linear, opts.no_jit);
    if opts.verify {
        assert!(
            is_valid(inst, &scale_result.t_high, opts.no_jit),
            "scale search produced an invalid allocation"
        );
    }

    let t = refine_boundary(inst, &scale_result, opts.linear, opts.no_jit);
    if opts.verify {
        assert!(is_valid(inst, &t, opts.no_jit), "boundary refinement produced an invalid allocation");
        let total = Rational::from_integer(BigInt::from(t.iter().sum::<u64>()));
        let bound = Rational::from_integer(solution_upper_bound(inst));
        assert!(total <= bound, "ticket total exceeds the analytical upper bound");
    }

    let total: u64 = t.iter().sum();
    debug!("final allocation total: {total}");
    t
}

/// Reduces a WQ instance to WR, then solves it.
pub fn solve_wq(inst: &WeightQualification, opts: SolveOptions) -> Vec<u64> {
    solve(&inst.to_wr(), opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64, d: i64) -> Rational {
        Rational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn solves_s1_five_equal_weights() {
        let inst = WeightRestriction::new(vec![BigInt::from(1); 5], rat(1, 5), rat(2, 5)).unwrap();
        let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        assert_eq!(t, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn solves_s2_scaled_weights_match_s1() {
        let inst = WeightRestriction::new(
            vec![BigInt::from(10); 5],
            rat(1, 5),
            rat(2, 5),
        )
        .unwrap();
        let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        assert_eq!(t, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn solves_s3_minimizer_is_single_ticket() {
        let inst = WeightRestriction::new(
            vec![BigInt::from(1), BigInt::from(2), BigInt::from(3), BigInt::from(4)],
            rat(1, 10),
            rat(1, 2),
        )
        .unwrap();
        let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        assert_eq!(t, vec![0, 0, 0, 1]);
        assert_eq!(t.iter().sum::<u64>(), 1);
    }

    #[test]
    fn solves_s4_wq_matches_equivalent_wr() {
        let wq = WeightQualification::new(vec![BigInt::from(1); 5], rat(4, 5), rat(3, 5)).unwrap();
        let wr = WeightRestriction::new(vec![BigInt::from(1); 5], rat(1, 5), rat(2, 5)).unwrap();
        let t_wq = solve_wq(&wq, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        let t_wr = solve(&wr, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        assert_eq!(t_wq, t_wr);
    }

    #[test]
    fn solves_s5_heavy_party_carries_alone() {
        let weights = vec![
            BigInt::from(1_000_000),
            BigInt::from(1),
            BigInt::from(1),
            BigInt::from(1),
            BigInt::from(1),
            BigInt::from(1),
        ];
        let inst = WeightRestriction::new(weights, rat(1, 3), rat(2, 3)).unwrap();
        let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        assert_eq!(t[0], 1);
        assert!(t[1..].iter().all(|&x| x == 0));
    }

    #[test]
    fn solves_s6_linear_mode_stays_within_the_analytical_bound() {
        let inst = WeightRestriction::new(
            vec![BigInt::from(1), BigInt::from(2), BigInt::from(3), BigInt::from(4)],
            rat(1, 10),
            rat(1, 2),
        )
        .unwrap();
        let linear = solve(&inst, SolveOptions { linear: true, no_jit: true, verify: true });
        let full = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        let bound = solution_upper_bound(&inst);
        assert!(BigInt::from(linear.iter().sum::<u64>()) <= bound);
        assert!(full.iter().sum::<u64>() <= linear.iter().sum::<u64>());
    }
}
