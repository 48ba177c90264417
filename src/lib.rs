//! Ridge height-field generation by diffusion-limited aggregation
//!
//! Particles random-walk on a small grid and stick to the growing aggregate,
//! while a stick graph records which particle attached to which. Each
//! refinement pass doubles the grid and the graph, bridges the stretched
//! edges with midpoints, redraws the grid from the graph and aggregates new
//! detail at the finer resolution. A separately upscaled and blurred copy
//! is blended with the sharp ridges to give them slopes.

#![forbid(unsafe_code)]

/// Aggregation, stick graph, refinement and compositing
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Integer pairing used for node identity
pub mod math;
/// Coordinates, the occupancy grid and blur stencils
pub mod spatial;

pub use algorithm::refinement::{GeneratorConfig, RidgeGenerator};
pub use io::error::{Result, RidgeError};
