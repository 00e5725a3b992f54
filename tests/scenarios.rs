//! End-to-end scenarios driven through the public solver entry points.

use num_bigint::BigInt;
use swiper::arith::{parse_rationals, Rational};
use swiper::driver::{solve, solve_wq, SolveOptions};
use swiper::instance::{WeightQualification, WeightRestriction};

fn weights(raw: &[i64]) -> Vec<BigInt> {
    raw.iter().map(|&w| BigInt::from(w)).collect()
}

fn rat(token: &str) -> Rational {
    parse_rationals(token).unwrap().remove(0)
}

#[test]
fn s1_five_equal_weights_need_one_ticket_each() {
    let inst = WeightRestriction::new(weights(&[1, 1, 1, 1, 1]), rat("1/5"), rat("2/5")).unwrap();
    let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
    assert_eq!(t, vec![1, 1, 1, 1, 1]);
}

#[test]
fn s2_scaling_all_weights_does_not_change_the_allocation() {
    let inst = WeightRestriction::new(weights(&[10, 10, 10, 10, 10]), rat("1/5"), rat("2/5")).unwrap();
    let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
    assert_eq!(t, vec![1, 1, 1, 1, 1]);
}

#[test]
fn s3_the_unique_minimizer_gives_the_heaviest_party_one_ticket() {
    let inst = WeightRestriction::new(weights(&[1, 2, 3, 4]), rat("1/10"), rat("1/2")).unwrap();
    let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
    assert_eq!(t, vec![0, 0, 0, 1]);
    assert_eq!(t.iter().sum::<u64>(), 1);
}

#[test]
fn s4_wq_matches_the_dual_wr_instance() {
    let wq = WeightQualification::new(weights(&[1, 1, 1, 1, 1]), rat("4/5"), rat("3/5")).unwrap();
    let wr = WeightRestriction::new(weights(&[1, 1, 1, 1, 1]), rat("1/5"), rat("2/5")).unwrap();

    let t_wq = solve_wq(&wq, SolveOptions { no_jit: true, verify: true, ..Default::default() });
    let t_wr = solve(&wr, SolveOptions { no_jit: true, verify: true, ..Default::default() });
    assert_eq!(t_wq, t_wr);
}

#[test]
fn s5_a_single_heavy_party_carries_every_ticket() {
    let inst = WeightRestriction::new(
        weights(&[1_000_000, 1, 1, 1, 1, 1]),
        rat("1/3"),
        rat("2/3"),
    )
    .unwrap();
    let t = solve(&inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
    assert_eq!(t[0], 1);
    assert!(t[1..].iter().all(|&x| x == 0));
}

#[test]
fn s6_linear_mode_allocations_stay_within_the_analytical_bound_and_are_never_smaller() {
    use swiper::search::scale::solution_upper_bound;

    let instances = [
        WeightRestriction::new(weights(&[1, 1, 1, 1, 1]), rat("1/5"), rat("2/5")).unwrap(),
        WeightRestriction::new(weights(&[10, 10, 10, 10, 10]), rat("1/5"), rat("2/5")).unwrap(),
        WeightRestriction::new(weights(&[1, 2, 3, 4]), rat("1/10"), rat("1/2")).unwrap(),
        WeightRestriction::new(weights(&[1_000_000, 1, 1, 1, 1, 1]), rat("1/3"), rat("2/3")).unwrap(),
    ];

    for inst in &instances {
        let linear = solve(inst, SolveOptions { linear: true, no_jit: true, verify: true });
        let full = solve(inst, SolveOptions { no_jit: true, verify: true, ..Default::default() });
        let bound = solution_upper_bound(inst);

        assert!(BigInt::from(linear.iter().sum::<u64>()) <= bound);
        assert!(full.iter().sum::<u64>() <= linear.iter().sum::<u64>());
    }
}
