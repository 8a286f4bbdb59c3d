//! Deterministic crop grid over a 3-D cube region.
//!
//! The requested region is described by per-axis `[min, max)` bounds in cube
//! coordinates. A fixed crop shape is strided across it in row-major axis
//! order (first line axis slowest, depth fastest). When `extent - shape` is
//! not a stride multiple on an axis, one extra origin is emitted, clamped so
//! the final window's far edge lands exactly on the region bound; partial
//! tiles are never dropped, so the window union always covers the region.
//!
//! The grid is built once per run and read-only afterwards; the window
//! order is the contract that later ties per-crop predictions back to their
//! position during assembly.

use serde::{Deserialize, Serialize};

/// Axis-aligned cube region with per-axis `[min, max)` bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region3 {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl Region3 {
    pub fn new(min: [usize; 3], max: [usize; 3]) -> Self {
        Self { min, max }
    }

    /// Per-axis extent, saturating when bounds are inverted.
    #[inline]
    pub fn extent(&self) -> [usize; 3] {
        [
            self.max[0].saturating_sub(self.min[0]),
            self.max[1].saturating_sub(self.min[1]),
            self.max[2].saturating_sub(self.min[2]),
        ]
    }

    /// Number of (i1, i2) trace columns in the region footprint.
    #[inline]
    pub fn footprint_area(&self) -> usize {
        let e = self.extent();
        e[0] * e[1]
    }
}

/// One inference unit: a fixed-shape window at an absolute cube origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub origin: [usize; 3],
    pub shape: [usize; 3],
}

/// Ordered window sequence plus the geometry needed to invert the tiling.
#[derive(Clone, Debug)]
pub struct CropGrid {
    pub region: Region3,
    pub crop_shape: [usize; 3],
    pub crop_stride: [usize; 3],
    windows: Vec<CropWindow>,
}

impl CropGrid {
    /// Windows in generation order.
    #[inline]
    pub fn windows(&self) -> &[CropWindow] {
        &self.windows
    }

    /// Total window count; bounds the inference iteration.
    #[inline]
    pub fn grid_iters(&self) -> usize {
        self.windows.len()
    }
}

/// Reasons why grid construction may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    EmptyRegion {
        axis: usize,
    },
    ZeroCropDimension {
        axis: usize,
    },
    ZeroStride {
        axis: usize,
    },
    CropExceedsRegion {
        axis: usize,
        crop: usize,
        extent: usize,
    },
    StrideExceedsCrop {
        axis: usize,
        stride: usize,
        crop: usize,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::EmptyRegion { axis } => {
                write!(f, "region is empty along axis {axis}")
            }
            GridError::ZeroCropDimension { axis } => {
                write!(f, "crop shape is zero along axis {axis}")
            }
            GridError::ZeroStride { axis } => {
                write!(f, "stride is zero along axis {axis}")
            }
            GridError::CropExceedsRegion { axis, crop, extent } => write!(
                f,
                "crop shape {crop} exceeds region extent {extent} along axis {axis}"
            ),
            GridError::StrideExceedsCrop { axis, stride, crop } => write!(
                f,
                "stride {stride} exceeds crop shape {crop} along axis {axis} (windows would leave gaps)"
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Build the window grid covering `region` with the given crop shape and
/// stride. Pure function of its parameters; two calls with the same inputs
/// produce identical window sequences.
pub fn build_grid(
    region: Region3,
    crop_shape: [usize; 3],
    crop_stride: [usize; 3],
) -> Result<CropGrid, GridError> {
    let extent = region.extent();
    for axis in 0..3 {
        if extent[axis] == 0 {
            return Err(GridError::EmptyRegion { axis });
        }
        if crop_shape[axis] == 0 {
            return Err(GridError::ZeroCropDimension { axis });
        }
        if crop_stride[axis] == 0 {
            return Err(GridError::ZeroStride { axis });
        }
        if crop_shape[axis] > extent[axis] {
            return Err(GridError::CropExceedsRegion {
                axis,
                crop: crop_shape[axis],
                extent: extent[axis],
            });
        }
        if crop_stride[axis] > crop_shape[axis] {
            return Err(GridError::StrideExceedsCrop {
                axis,
                stride: crop_stride[axis],
                crop: crop_shape[axis],
            });
        }
    }

    let offs1 = axis_offsets(extent[0], crop_shape[0], crop_stride[0]);
    let offs2 = axis_offsets(extent[1], crop_shape[1], crop_stride[1]);
    let offsd = axis_offsets(extent[2], crop_shape[2], crop_stride[2]);

    let mut windows = Vec::with_capacity(offs1.len() * offs2.len() * offsd.len());
    for &o1 in &offs1 {
        for &o2 in &offs2 {
            for &od in &offsd {
                windows.push(CropWindow {
                    origin: [region.min[0] + o1, region.min[1] + o2, region.min[2] + od],
                    shape: crop_shape,
                });
            }
        }
    }

    Ok(CropGrid {
        region,
        crop_shape,
        crop_stride,
        windows,
    })
}

/// Window offsets along one axis, relative to the region minimum.
///
/// Strides until the window tail would pass the extent, then emits the
/// clamped final offset `extent - crop`.
fn axis_offsets(extent: usize, crop: usize, stride: usize) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut pos = 0usize;
    loop {
        if pos + crop >= extent {
            offsets.push(extent - crop);
            break;
        }
        offsets.push(pos);
        pos += stride;
    }
    offsets
}
