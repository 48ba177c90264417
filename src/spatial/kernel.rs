//! Blur stencils used by grid convolution
//!
//! A stencil only selects which neighbours are sampled. The sampled values
//! are averaged without weighting, so cells near the border average fewer
//! neighbours rather than being darkened by implicit zero padding.

/// 13-tap circular stencil, 5x5
const CIRCULAR_5: [[u8; 5]; 5] = [
    [0, 0, 1, 0, 0],
    [0, 1, 1, 1, 0],
    [1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0],
    [0, 0, 1, 0, 0],
];

/// 5-tap plus stencil, 3x3
const CROSS_3: [[u8; 3]; 3] = [[0, 1, 0], [1, 1, 1], [0, 1, 0]];

/// Selectable blur stencil shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BlurKernel {
    /// Softer 13-tap circular stencil
    #[default]
    Circular5,
    /// Tighter 5-tap plus stencil
    Cross3,
}

impl BlurKernel {
    /// Offsets `(dx, dy)` of every sampled cell relative to the centre, row-major
    pub fn offsets(self) -> Vec<(i32, i32)> {
        match self {
            Self::Circular5 => collect_offsets(&CIRCULAR_5),
            Self::Cross3 => collect_offsets(&CROSS_3),
        }
    }

    /// Number of cells sampled away from the border
    pub fn taps(self) -> usize {
        self.offsets().len()
    }
}

fn collect_offsets<const K: usize>(stencil: &[[u8; K]; K]) -> Vec<(i32, i32)> {
    let radius = (K / 2) as i32;
    let mut offsets = Vec::new();
    for (row, line) in stencil.iter().enumerate() {
        for (col, &tap) in line.iter().enumerate() {
            if tap != 0 {
                offsets.push((col as i32 - radius, row as i32 - radius));
            }
        }
    }
    offsets
}
