//! Bounded 0/1 knapsack oracle (component C) and its numeric backend
//! selector (component H).
//!
//! The dynamic program is expressed once, generic over a "ring" of weights
//! that supports zero, addition, and ordering — satisfied by both a 64-bit
//! signed integer (the fast path) and an arbitrary-precision integer (the
//! fallback path). [`backend`] decides, per call, which instantiation runs.

pub mod backend;
pub mod bound;
pub mod oracle;

pub use bound::knapsack_upper_bound;
pub use oracle::knapsack;
