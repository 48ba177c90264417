//! Square occupancy grid holding the aggregated intensity field
//!
//! A cell value of `0` means empty and `1..=255` means occupied with that
//! intensity. All accessors are bounds-checked and report `OutOfBounds`
//! instead of clamping, since an out-of-range index during refinement means
//! the grid and the stick graph disagree.

use ndarray::Array2;

use crate::io::configuration::BLEND_CEILING;
use crate::io::error::{Result, RidgeError};
use crate::spatial::kernel::BlurKernel;

/// Where existing content lands when the grid doubles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoublingPolicy {
    /// Cell `(x, y)` moves to `(x + N, y + N)`
    ///
    /// This is the placement the stick graph's coordinate doubling is paired
    /// with. It fills the far quadrant; it does not centre the content.
    #[default]
    QuadrantShift,
    /// Cell `(x, y)` stays at `(x, y)`; only for grids with no graph attached
    Origin,
}

impl DoublingPolicy {
    /// Multiplier applied to the old side length to get the copy offset
    const fn offset_factor(self) -> usize {
        match self {
            Self::QuadrantShift => 1,
            Self::Origin => 0,
        }
    }
}

/// Grid behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridConfig {
    /// Stencil used by [`OccupancyGrid::convolve_default`]
    pub kernel: BlurKernel,
    /// Placement rule used by [`OccupancyGrid::double`]
    pub doubling: DoublingPolicy,
}

/// Square field of 8-bit intensities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    /// Intensities indexed `[row, col]`, i.e. `[y, x]`
    cells: Array2<u8>,
    size: usize,
    occupied: usize,
    config: GridConfig,
}

impl OccupancyGrid {
    /// Create an empty grid with default configuration
    pub fn new(size: usize) -> Self {
        Self::with_config(size, GridConfig::default())
    }

    /// Create an empty grid with explicit configuration
    pub fn with_config(size: usize, config: GridConfig) -> Self {
        Self {
            cells: Array2::zeros((size, size)),
            size,
            occupied: 0,
            config,
        }
    }

    /// Wrap an existing square array
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if the array is not square
    pub fn from_array(cells: Array2<u8>, config: GridConfig) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows != cols {
            return Err(RidgeError::SizeMismatch {
                expected: rows,
                actual: cols,
                operation: "wrap array",
            });
        }
        let occupied = cells.iter().filter(|&&v| v > 0).count();
        Ok(Self {
            cells,
            size: rows,
            occupied,
            config,
        })
    }

    /// Side length
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of non-empty cells
    pub const fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Configuration this grid was created with
    pub const fn config(&self) -> GridConfig {
        self.config
    }

    /// Read-only view of the intensities, indexed `[y, x]`
    pub const fn cells(&self) -> &Array2<u8> {
        &self.cells
    }

    /// True when `(x, y)` is inside the grid
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    fn index(&self, x: i32, y: i32, operation: &'static str) -> Result<[usize; 2]> {
        if self.contains(x, y) {
            Ok([y as usize, x as usize])
        } else {
            Err(RidgeError::OutOfBounds {
                x,
                y,
                size: self.size,
                operation,
            })
        }
    }

    /// Write `intensity` if the cell is empty, returning whether it was written
    ///
    /// Writing `0` never counts as a placement.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `(x, y)` is outside the grid
    pub fn place(&mut self, x: i32, y: i32, intensity: u8) -> Result<bool> {
        let index = self.index(x, y, "place")?;
        match self.cells.get_mut(index) {
            Some(cell) if *cell == 0 && intensity > 0 => {
                *cell = intensity;
                self.occupied += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Overwrite an occupied cell, returning whether it was written
    ///
    /// Updating to `0` empties the cell.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `(x, y)` is outside the grid
    pub fn update(&mut self, x: i32, y: i32, intensity: u8) -> Result<bool> {
        let index = self.index(x, y, "update")?;
        match self.cells.get_mut(index) {
            Some(cell) if *cell != 0 => {
                *cell = intensity;
                if intensity == 0 {
                    self.occupied -= 1;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Intensity at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `(x, y)` is outside the grid
    pub fn read(&self, x: i32, y: i32) -> Result<u8> {
        let index = self.index(x, y, "read")?;
        Ok(self.cells.get(index).copied().unwrap_or(0))
    }

    /// Whether `(x, y)` holds a non-zero intensity
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `(x, y)` is outside the grid
    pub fn is_occupied(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.read(x, y)? > 0)
    }

    /// Empty every cell, keeping the side length
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.occupied = 0;
    }

    /// Grow to side `2N`, copying content according to the doubling policy
    pub fn double(&mut self) {
        let old = self.size;
        let new_size = old * 2;
        let offset = old * self.config.doubling.offset_factor();
        let mut doubled = Array2::zeros((new_size, new_size));

        for ((row, col), &value) in self.cells.indexed_iter() {
            if let Some(cell) = doubled.get_mut([row + offset, col + offset]) {
                *cell = value;
            }
        }

        self.cells = doubled;
        self.size = new_size;
    }

    /// Add `other` into this grid wherever `other` is occupied, capped at the blend ceiling
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if the grids differ in side length
    pub fn blend(&mut self, other: &Self) -> Result<()> {
        if other.size != self.size {
            return Err(RidgeError::SizeMismatch {
                expected: self.size,
                actual: other.size,
                operation: "blend",
            });
        }

        for (cell, &incoming) in self.cells.iter_mut().zip(other.cells.iter()) {
            if incoming > 0 {
                if *cell == 0 {
                    self.occupied += 1;
                }
                let sum = u16::from(*cell) + u16::from(incoming);
                *cell = sum.min(u16::from(BLEND_CEILING)) as u8;
            }
        }
        Ok(())
    }

    /// Blur with the given stencil into a new grid
    ///
    /// Each output cell is the plain mean of the in-bounds cells the stencil
    /// selects around it.
    pub fn convolve(&self, kernel: BlurKernel) -> Self {
        let offsets = kernel.offsets();
        let mut blurred = Array2::zeros((self.size, self.size));
        let mut samples = Vec::with_capacity(offsets.len());

        for ((row, col), out) in blurred.indexed_iter_mut() {
            samples.clear();
            for &(dx, dy) in &offsets {
                let x = col as i32 + dx;
                let y = row as i32 + dy;
                if !self.contains(x, y) {
                    continue;
                }
                if let Some(&value) = self.cells.get([y as usize, x as usize]) {
                    samples.push(f64::from(value));
                }
            }
            if samples.is_empty() {
                continue;
            }
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            *out = num_traits::clamp(mean, 0.0, 255.0) as u8;
        }

        let occupied = blurred.iter().filter(|&&v| v > 0).count();
        Self {
            cells: blurred,
            size: self.size,
            occupied,
            config: self.config,
        }
    }

    /// Blur with the configured stencil
    pub fn convolve_default(&self) -> Self {
        self.convolve(self.config.kernel)
    }

    /// Iterate over occupied cells as `(x, y, intensity)` in row-major order
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, v)| **v > 0)
            .map(|((row, col), &v)| (col as i32, row as i32, v))
    }
}
