//! Secondary blurred field that gives the sharp ridges smooth slopes

use crate::io::error::Result;
use crate::io::image::{ResizeFilter, resize_grid};
use crate::spatial::grid::OccupancyGrid;
use crate::spatial::kernel::BlurKernel;

/// Independently upscaled and blurred copy of the sharp field
#[derive(Debug, Clone)]
pub struct FuzzyField {
    field: OccupancyGrid,
    // Field as it stood before the latest advance
    previous: Option<OccupancyGrid>,
    filter: ResizeFilter,
    kernel: BlurKernel,
}

impl FuzzyField {
    /// Start from a snapshot of the sharp grid
    pub fn new(sharp: &OccupancyGrid, filter: ResizeFilter, kernel: BlurKernel) -> Self {
        Self {
            field: sharp.clone(),
            previous: None,
            filter,
            kernel,
        }
    }

    /// Current blended field
    pub const fn field(&self) -> &OccupancyGrid {
        &self.field
    }

    /// Side length of the field
    pub const fn size(&self) -> usize {
        self.field.size()
    }

    /// Interpolate up to `size` and blur
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a zero size
    pub fn upscale(&mut self, size: usize) -> Result<()> {
        let resized = resize_grid(&self.field, size, self.filter)?;
        self.field = resized.convolve(self.kernel);
        Ok(())
    }

    /// Add the sharp grid on top, clamped to the blend ceiling
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if the sharp grid has a different size
    pub fn blend(&mut self, sharp: &OccupancyGrid) -> Result<()> {
        self.field.blend(sharp)
    }

    /// Bring the field to the sharp grid's size and blend the sharp grid in
    ///
    /// # Errors
    ///
    /// Propagates resize and blend failures
    pub fn advance(&mut self, sharp: &OccupancyGrid) -> Result<()> {
        self.previous = Some(self.field.clone());
        self.upscale(sharp.size())?;
        self.blend(sharp)?;
        log::debug!(
            "fuzzy field now {}x{} with {} lit cells",
            self.field.size(),
            self.field.size(),
            self.field.occupied_count()
        );
        Ok(())
    }

    /// Replace the latest advance with one against a redrawn `sharp` grid
    ///
    /// Without an earlier advance the sharp grid is blended in directly.
    ///
    /// # Errors
    ///
    /// Propagates resize and blend failures
    pub fn redo_advance(&mut self, sharp: &OccupancyGrid) -> Result<()> {
        match self.previous.take() {
            Some(previous) => {
                self.field = previous;
                self.advance(sharp)
            }
            None => self.blend(sharp),
        }
    }
}
