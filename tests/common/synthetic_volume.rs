//! Synthetic cubes and model doubles for the end-to-end tests.

use horizon_detector::cube::{CubeGeometry, InMemoryCube};
use horizon_detector::model::{CropModel, ModelError};
use horizon_detector::volume::VolumeF32;
use std::collections::VecDeque;

pub fn geometry(shape: [usize; 3]) -> CubeGeometry {
    CubeGeometry {
        iline_first: 1000,
        xline_first: 2000,
        delay_ms: 0.0,
        sample_ms: 2.0,
        shape,
    }
}

/// A zero cube with a high-amplitude spike along `plane(i1, i2)`.
pub fn cube_with_plane(
    shape: [usize; 3],
    plane: impl Fn(usize, usize) -> usize,
) -> InMemoryCube {
    let mut volume = VolumeF32::from_shape(shape);
    for i1 in 0..shape[0] {
        for i2 in 0..shape[1] {
            let d = plane(i1, i2);
            if d < shape[2] {
                volume.set(i1, i2, d, 100.0);
            }
        }
    }
    InMemoryCube::new(geometry(shape), volume)
}

/// Replays a fixed sequence of prediction crops, ignoring its input.
pub struct ScriptedModel {
    crops: VecDeque<VolumeF32>,
    pub calls: usize,
}

impl ScriptedModel {
    pub fn new(crops: Vec<VolumeF32>) -> Self {
        Self {
            crops: crops.into(),
            calls: 0,
        }
    }
}

impl CropModel for ScriptedModel {
    fn predict(&mut self, batch: &[VolumeF32]) -> Result<Vec<VolumeF32>, ModelError> {
        self.calls += 1;
        let mut out = Vec::with_capacity(batch.len());
        for _ in batch {
            match self.crops.pop_front() {
                Some(crop) => out.push(crop),
                None => {
                    return Err(ModelError::Inference("script exhausted".into()));
                }
            }
        }
        Ok(out)
    }
}

/// Maps each normalized sample through a logistic squash, so spikes from
/// [`cube_with_plane`] turn into near-one probabilities while the flat
/// background stays below one half.
pub struct SigmoidModel;

impl CropModel for SigmoidModel {
    fn predict(&mut self, batch: &[VolumeF32]) -> Result<Vec<VolumeF32>, ModelError> {
        Ok(batch
            .iter()
            .map(|crop| {
                let mut out = crop.clone();
                for v in &mut out.data {
                    *v = 1.0 / (1.0 + (-*v).exp());
                }
                out
            })
            .collect())
    }
}

/// Counts calls without predicting anything useful.
pub struct CountingModel {
    pub calls: usize,
}

impl CountingModel {
    pub fn new() -> Self {
        Self { calls: 0 }
    }
}

impl CropModel for CountingModel {
    fn predict(&mut self, batch: &[VolumeF32]) -> Result<Vec<VolumeF32>, ModelError> {
        self.calls += 1;
        Ok(batch
            .iter()
            .map(|crop| VolumeF32::from_shape(crop.shape()))
            .collect())
    }
}
