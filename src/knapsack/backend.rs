//! Numeric backend selector (component H).
//!
//! Chooses between the accelerated `i64` knapsack kernel and the
//! arbitrary-precision `BigInt` fallback. Selection is a pure function of
//! the call's inputs: if every quantity involved fits in a 64-bit signed
//! integer, run the fast kernel; otherwise fall back, logging a warning the
//! first time this happens during a solve.

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::BigInt;

/// Which knapsack kernel to run for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Fast,
    BigInt,
}

/// Latches so the overflow warning is logged once per process, not once per
/// knapsack call (a single solve can probe the oracle hundreds of times).
static OVERFLOW_WARNED: AtomicBool = AtomicBool::new(false);

const MAX_FAST: i64 = i64::MAX;

/// Picks the backend for a call with the given weights, profits, and
/// capacity. `no_jit` forces [`Backend::BigInt`] unconditionally.
pub fn select_backend(weights: &[BigInt], profits: &[u64], capacity: &BigInt, no_jit: bool) -> Backend {
    if no_jit {
        return Backend::BigInt;
    }

    let max_fast = BigInt::from(MAX_FAST);
    let weight_sum: BigInt = weights.iter().sum();
    let profit_sum: BigInt = profits.iter().map(|&p| BigInt::from(p)).sum();

    // `weight_sum` is compared strictly so the fast path's `sum + 1` sentinel
    // (the DP's "infinity" value) never overflows i64.
    if weight_sum >= max_fast || profit_sum > max_fast || *capacity > max_fast {
        if !OVERFLOW_WARNED.swap(true, Ordering::Relaxed) {
            log::warn!(
                "integer overflow while converting weights/profits to 64-bit integers; \
                 falling back to arbitrary-precision arithmetic for the remainder of this solve"
            );
        }
        return Backend::BigInt;
    }

    Backend::Fast
}

/// Resets the one-shot overflow warning latch. Used by tests that need to
/// observe the warning fire more than once across process lifetime.
#[cfg(test)]
pub fn reset_overflow_latch() {
    OVERFLOW_WARNED.store(false, Ordering::Relaxed);
}
