//! Phase 1 (scale search) and Phase 2 (boundary refinement) of the
//! optimizer, components E and F of the design doc.

pub mod boundary;
pub mod scale;

pub use boundary::refine_boundary;
pub use scale::{allocate, search_scale, ScaleResult};
