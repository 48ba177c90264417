//! Grid to bitmap conversion, interpolated resizing and raster export

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, ImageFormat, Luma, Rgba, RgbaImage};
use ndarray::Array2;

use crate::io::error::{Result, RidgeError};
use crate::spatial::grid::{GridConfig, OccupancyGrid};

/// Interpolation used when resizing a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResizeFilter {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest-neighbour sampling
    Nearest,
}

impl ResizeFilter {
    const fn filter_type(self) -> FilterType {
        match self {
            Self::Bilinear => FilterType::Triangle,
            Self::Nearest => FilterType::Nearest,
        }
    }
}

/// Encoding used for exported rasters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Lossless PNG
    Png,
    /// JPEG at the given quality (1-100)
    Jpeg {
        /// Encoder quality
        quality: u8,
    },
}

impl RasterFormat {
    /// Pick a format from a file extension, PNG unless the extension says JPEG
    pub fn from_path(path: &Path, quality: u8) -> Self {
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Jpeg) => Self::Jpeg { quality },
            _ => Self::Png,
        }
    }
}

/// Grayscale RGBA bitmap with every channel set from the intensity
pub fn grid_to_rgba(grid: &OccupancyGrid) -> RgbaImage {
    let size = grid.size() as u32;
    ImageBuffer::from_fn(size, size, |x, y| {
        let v = grid
            .cells()
            .get([y as usize, x as usize])
            .copied()
            .unwrap_or(0);
        Rgba([v, v, v, v])
    })
}

/// Single-channel bitmap of the intensities
pub fn grid_to_luma(grid: &OccupancyGrid) -> GrayImage {
    let size = grid.size() as u32;
    ImageBuffer::from_fn(size, size, |x, y| {
        Luma([grid
            .cells()
            .get([y as usize, x as usize])
            .copied()
            .unwrap_or(0)])
    })
}

/// Read the red channel of a square bitmap back into a grid
///
/// # Errors
///
/// Returns `SizeMismatch` if the image is not square
pub fn red_channel_to_grid(image: &RgbaImage, config: GridConfig) -> Result<OccupancyGrid> {
    let (width, height) = image.dimensions();
    if width != height {
        return Err(RidgeError::SizeMismatch {
            expected: width as usize,
            actual: height as usize,
            operation: "bitmap to grid",
        });
    }
    let size = width as usize;
    let cells = Array2::from_shape_fn((size, size), |(row, col)| {
        image.get_pixel(col as u32, row as u32).0[0]
    });
    OccupancyGrid::from_array(cells, config)
}

/// Resize a grid by round-tripping through a bitmap
///
/// # Errors
///
/// Returns `InvalidParameter` for a zero target size
pub fn resize_grid(grid: &OccupancyGrid, size: usize, filter: ResizeFilter) -> Result<OccupancyGrid> {
    if size == 0 {
        return Err(crate::io::error::invalid_parameter(
            "size",
            &size,
            &"resize target must be positive",
        ));
    }
    if size == grid.size() {
        return Ok(grid.clone());
    }
    let bitmap = grid_to_rgba(grid);
    let resized = imageops::resize(&bitmap, size as u32, size as u32, filter.filter_type());
    red_channel_to_grid(&resized, grid.config())
}

/// Save a grid as a grayscale image
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The file cannot be created
/// - Encoding fails
pub fn export_grid(grid: &OccupancyGrid, output_path: &Path, format: RasterFormat) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| RidgeError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let luma = grid_to_luma(grid);
    let export_error = |source| RidgeError::ImageExport {
        path: output_path.to_path_buf(),
        source,
    };

    match format {
        RasterFormat::Png => luma
            .save_with_format(output_path, ImageFormat::Png)
            .map_err(export_error),
        RasterFormat::Jpeg { quality } => {
            let file = std::fs::File::create(output_path).map_err(|e| RidgeError::FileSystem {
                path: output_path.to_path_buf(),
                operation: "create file",
                source: e,
            })?;
            let mut writer = std::io::BufWriter::new(file);
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
            luma.write_with_encoder(encoder).map_err(export_error)
        }
    }
}
