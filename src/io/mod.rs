//! Input/output operations, configuration and error handling

/// Command-line interface
pub mod cli;
/// Generation constants and defaults
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Bitmap conversion, resizing and raster export
pub mod image;
/// Progress display for refinement passes
pub mod progress;
/// Text rendering for debugging
pub mod visualization;
