//! Generation constants and runtime configuration defaults

// Grid intensity limits
/// Intensity written for a node whose weight is at the top of the range
pub const MAX_INTENSITY: u8 = 255;
/// Ceiling applied when blending the sharp field into the fuzzy field
pub const BLEND_CEILING: u8 = 200;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid side length
pub const MAX_GRID_DIMENSION: usize = 16_384;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Side length of the starting grid
pub const DEFAULT_INITIAL_SIZE: usize = 4;
/// Number of refinement passes
pub const DEFAULT_PASSES: usize = 5;
/// Particle density relative to grid area
pub const DEFAULT_DENSITY: f64 = 1.0;
/// Divisor applied to the grid area when computing the particle count
pub const DEFAULT_AREA_DIVISOR: usize = 2;
/// Area divisor used by the sparser ridge variant
pub const SPARSE_AREA_DIVISOR: usize = 16;
/// Intensity of aggregated particles
pub const DEFAULT_PARTICLE_WEIGHT: u8 = 1;
/// Intensity of the seed particle
pub const DEFAULT_SEED_WEIGHT: u8 = 1;
/// Bound on spawn samples and walk steps per particle
pub const DEFAULT_MAX_TRIES: usize = 10_000;
/// Cells excluded from the high edge of the spawn area
pub const DEFAULT_SPAWN_BORDER: usize = 0;
/// Midpoint displacement requested during refinement
pub const DEFAULT_JIGGLE: f32 = 0.0;

// Weight strategy settings
/// Brightness lost per hop away from the seed
pub const SEED_DISTANCE_FALLOFF: i32 = 8;

// Output settings
/// Suffix added to the raw sharp-field export
pub const SHARP_SUFFIX: &str = "_sharp";
/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
