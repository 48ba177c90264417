//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Integer coordinates
//! - The square occupancy grid and its doubling
//! - Blur stencils used for convolution

/// Integer coordinates with optional weight
pub mod coordinate;
/// Occupancy grid storage and operations
pub mod grid;
/// Blur stencil shapes
pub mod kernel;

pub use coordinate::Coordinate;
pub use grid::OccupancyGrid;
