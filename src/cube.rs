//! Cube geometry and the crop-loading boundary.
//!
//! Loading a survey from disk (SEG-Y or a converted store) is a collaborator
//! concern; the pipeline only needs per-window sample access plus enough
//! geometry to translate cube indices into survey line numbers and trace
//! time. [`InMemoryCube`] is the reference implementation used by the demo
//! and the test suite.

use crate::grid::CropWindow;
use crate::volume::VolumeF32;
use serde::{Deserialize, Serialize};

/// Survey geometry for one cube.
///
/// Axis order matches the volume layout: inline, crossline, depth. Line
/// numbering starts at the configured first line; the depth axis maps to
/// two-way time through `delay + index * sample_interval`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CubeGeometry {
    /// Survey line number of inline index 0.
    pub iline_first: usize,
    /// Survey line number of crossline index 0.
    pub xline_first: usize,
    /// Two-way time of depth sample 0, in milliseconds.
    pub delay_ms: f32,
    /// Sample interval along the depth axis, in milliseconds.
    pub sample_ms: f32,
    /// Full cube extents as `[n_ilines, n_xlines, n_samples]`.
    pub shape: [usize; 3],
}

impl CubeGeometry {
    /// Survey inline number for a cube index.
    #[inline]
    pub fn iline(&self, i1: usize) -> usize {
        self.iline_first + i1
    }

    /// Survey crossline number for a cube index.
    #[inline]
    pub fn xline(&self, i2: usize) -> usize {
        self.xline_first + i2
    }

    /// Two-way time of a depth sample, in milliseconds.
    #[inline]
    pub fn time_ms(&self, d: usize) -> f32 {
        self.delay_ms + d as f32 * self.sample_ms
    }
}

/// Reasons why crop loading may fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CubeError {
    WindowOutOfBounds {
        origin: [usize; 3],
        shape: [usize; 3],
        cube: [usize; 3],
    },
}

impl std::fmt::Display for CubeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CubeError::WindowOutOfBounds {
                origin,
                shape,
                cube,
            } => write!(
                f,
                "window at {origin:?} with shape {shape:?} exceeds cube extents {cube:?}"
            ),
        }
    }
}

impl std::error::Error for CubeError {}

/// Per-window sample access into one seismic cube.
pub trait CubeSource {
    fn geometry(&self) -> &CubeGeometry;

    /// Extract the raw samples under a crop window, depth-fastest.
    fn load_crop(&self, window: &CropWindow) -> Result<VolumeF32, CubeError>;
}

/// A cube held fully in memory.
#[derive(Clone, Debug)]
pub struct InMemoryCube {
    geometry: CubeGeometry,
    data: VolumeF32,
}

impl InMemoryCube {
    /// Wrap an owned volume. The geometry shape must match the volume.
    pub fn new(geometry: CubeGeometry, data: VolumeF32) -> Self {
        debug_assert_eq!(geometry.shape, data.shape());
        Self { geometry, data }
    }

    pub fn data(&self) -> &VolumeF32 {
        &self.data
    }
}

impl CubeSource for InMemoryCube {
    fn geometry(&self) -> &CubeGeometry {
        &self.geometry
    }

    fn load_crop(&self, window: &CropWindow) -> Result<VolumeF32, CubeError> {
        let cube = self.data.shape();
        for axis in 0..3 {
            if window.origin[axis] + window.shape[axis] > cube[axis] {
                return Err(CubeError::WindowOutOfBounds {
                    origin: window.origin,
                    shape: window.shape,
                    cube,
                });
            }
        }
        let mut crop = VolumeF32::from_shape(window.shape);
        for a in 0..window.shape[0] {
            for b in 0..window.shape[1] {
                let src_base = self
                    .data
                    .idx(window.origin[0] + a, window.origin[1] + b, window.origin[2]);
                let dst_base = crop.idx(a, b, 0);
                crop.data[dst_base..dst_base + window.shape[2]]
                    .copy_from_slice(&self.data.data[src_base..src_base + window.shape[2]]);
            }
        }
        Ok(crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(shape: [usize; 3]) -> CubeGeometry {
        CubeGeometry {
            iline_first: 100,
            xline_first: 200,
            delay_ms: 50.0,
            sample_ms: 2.0,
            shape,
        }
    }

    #[test]
    fn crop_slices_the_expected_samples() {
        let mut data = VolumeF32::new(4, 4, 6);
        for i in 0..data.data.len() {
            data.data[i] = i as f32;
        }
        let cube = InMemoryCube::new(geometry([4, 4, 6]), data);
        let window = CropWindow {
            origin: [1, 2, 3],
            shape: [2, 2, 2],
        };
        let crop = cube.load_crop(&window).unwrap();
        assert_eq!(crop.shape(), [2, 2, 2]);
        assert_eq!(crop.get(0, 0, 0), cube.data().get(1, 2, 3));
        assert_eq!(crop.get(1, 1, 1), cube.data().get(2, 3, 4));
    }

    #[test]
    fn out_of_bounds_window_is_rejected() {
        let cube = InMemoryCube::new(geometry([4, 4, 6]), VolumeF32::new(4, 4, 6));
        let window = CropWindow {
            origin: [3, 0, 0],
            shape: [2, 2, 2],
        };
        assert!(matches!(
            cube.load_crop(&window),
            Err(CubeError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn geometry_maps_indices_to_survey_coordinates() {
        let g = geometry([4, 4, 6]);
        assert_eq!(g.iline(3), 103);
        assert_eq!(g.xline(1), 201);
        assert!((g.time_ms(5) - 60.0).abs() < 1e-6);
    }
}
