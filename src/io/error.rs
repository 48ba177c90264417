//! Error types and context management for generation operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum RidgeError {
    /// Grid index outside `[0, size)`
    ///
    /// Never clamped silently. During a refinement re-render this means the
    /// grid and the stick graph fell out of sync.
    OutOfBounds {
        /// Requested column
        x: i32,
        /// Requested row
        y: i32,
        /// Side length of the grid at the time of the call
        size: usize,
        /// Grid operation that was attempted
        operation: &'static str,
    },

    /// No empty cell found while sampling spawn positions
    SpawnSaturation {
        /// Number of samples taken
        tries: usize,
        /// Side length of the grid
        size: usize,
    },

    /// A walking particle never touched the aggregate
    WalkTimeout {
        /// Final column of the particle
        x: i32,
        /// Final row of the particle
        y: i32,
        /// Number of steps taken
        tries: usize,
    },

    /// `attach` referenced a neighbour position that holds no node
    MissingNeighbor {
        /// Column of the node being attached
        x: i32,
        /// Row of the node being attached
        y: i32,
        /// Position of the missing neighbour
        neighbor: [i32; 2],
    },

    /// A second node was requested at a position that already holds one
    DuplicateNode {
        /// Column of the duplicate
        x: i32,
        /// Row of the duplicate
        y: i32,
    },

    /// Two grids of different side lengths were combined
    SizeMismatch {
        /// Side length of the receiving grid
        expected: usize,
        /// Side length of the other grid
        actual: usize,
        /// Operation that required equal sizes
        operation: &'static str,
    },

    /// Grid and stick graph disagree after a refinement pass
    InternalConsistency {
        /// Refinement pass during which the desync was detected
        pass: usize,
        /// Description of the desync
        reason: String,
    },

    /// Operation is not allowed in the generator's current phase
    InvalidPhase {
        /// Phase the generator was in
        phase: &'static str,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to encode or save an image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl RidgeError {
    /// Whether the error is a per-particle failure that a batch may absorb
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SpawnSaturation { .. } | Self::WalkTimeout { .. }
        )
    }
}

impl fmt::Display for RidgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                size,
                operation,
            } => {
                write!(
                    f,
                    "Position ({x}, {y}) is out of bounds for {size}x{size} grid during {operation}"
                )
            }
            Self::SpawnSaturation { tries, size } => {
                write!(
                    f,
                    "No empty cell found after {tries} samples on {size}x{size} grid (grid likely full)"
                )
            }
            Self::WalkTimeout { x, y, tries } => {
                write!(
                    f,
                    "Timed out: no neighbour found after {tries} steps, final coordinates ({x}, {y})"
                )
            }
            Self::MissingNeighbor { x, y, neighbor } => {
                write!(
                    f,
                    "Cannot attach ({x}, {y}): no node at neighbour ({}, {})",
                    neighbor[0], neighbor[1]
                )
            }
            Self::DuplicateNode { x, y } => {
                write!(f, "A node already exists at ({x}, {y})")
            }
            Self::SizeMismatch {
                expected,
                actual,
                operation,
            } => {
                write!(
                    f,
                    "Grid size mismatch during {operation}: expected {expected}, got {actual}"
                )
            }
            Self::InternalConsistency { pass, reason } => {
                write!(f, "Grid and graph out of sync at pass {pass}: {reason}")
            }
            Self::InvalidPhase { phase, operation } => {
                write!(f, "Cannot {operation} while generator is {phase}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for RidgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, RidgeError>;

/// Enriches error messages with generator state information
pub trait WithContext<T> {
    /// Stamp the refinement pass onto a consistency failure
    ///
    /// # Errors
    ///
    /// Propagates the original error with the pass context applied
    fn with_pass(self, pass: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<RidgeError>,
{
    fn with_pass(self, pass: usize) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            if let RidgeError::InternalConsistency { pass: p, .. } = &mut error {
                *p = pass;
            }
            error
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> RidgeError {
    RidgeError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
