//! Owned single-channel f32 volume with the depth axis contiguous.
//!
//! Suited for numeric processing in the pipeline: crops sliced from a cube,
//! per-crop model probabilities, and the assembled region all use this
//! layout. Samples are indexed by (inline, crossline, depth), with depth
//! varying fastest.
#[derive(Clone, Debug)]
pub struct VolumeF32 {
    /// Extent along the first line axis (inlines)
    pub n1: usize,
    /// Extent along the second line axis (crosslines)
    pub n2: usize,
    /// Extent along the depth axis (samples per trace)
    pub nd: usize,
    /// Backing storage, depth-fastest order
    pub data: Vec<f32>,
}

impl VolumeF32 {
    /// Construct a zero-initialized volume of shape `n1 × n2 × nd`.
    pub fn new(n1: usize, n2: usize, nd: usize) -> Self {
        Self {
            n1,
            n2,
            nd,
            data: vec![0.0; n1 * n2 * nd],
        }
    }

    /// Construct a volume of the given shape.
    pub fn from_shape(shape: [usize; 3]) -> Self {
        Self::new(shape[0], shape[1], shape[2])
    }

    /// Volume shape as `[n1, n2, nd]`.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        [self.n1, self.n2, self.nd]
    }

    #[inline]
    /// Convert (i1, i2, d) to a linear index into `data`.
    pub fn idx(&self, i1: usize, i2: usize, d: usize) -> usize {
        (i1 * self.n2 + i2) * self.nd + d
    }

    #[inline]
    /// Get the sample value at (i1, i2, d).
    pub fn get(&self, i1: usize, i2: usize, d: usize) -> f32 {
        self.data[self.idx(i1, i2, d)]
    }

    #[inline]
    /// Set the sample value at (i1, i2, d).
    pub fn set(&mut self, i1: usize, i2: usize, d: usize, v: f32) {
        let i = self.idx(i1, i2, d);
        self.data[i] = v;
    }

    /// Mean and standard deviation over all samples.
    ///
    /// The deviation is floored at a small epsilon so callers can divide by
    /// it without guarding flat crops separately.
    pub fn mean_std(&self) -> (f32, f32) {
        if self.data.is_empty() {
            return (0.0, 1.0);
        }
        let n = self.data.len() as f64;
        let mean = self.data.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        (mean as f32, (var.sqrt() as f32).max(1e-6))
    }
}

impl crate::volume::traits::VolumeView for VolumeF32 {
    #[inline]
    fn dims(&self) -> [usize; 3] {
        [self.n1, self.n2, self.nd]
    }

    #[inline]
    fn column(&self, i1: usize, i2: usize) -> &[f32] {
        let start = (i1 * self.n2 + i2) * self.nd;
        &self.data[start..start + self.nd]
    }

    #[inline]
    fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl crate::volume::traits::VolumeViewMut for VolumeF32 {
    #[inline]
    fn column_mut(&mut self, i1: usize, i2: usize) -> &mut [f32] {
        let start = (i1 * self.n2 + i2) * self.nd;
        let end = start + self.nd;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_is_depth_fastest() {
        let mut v = VolumeF32::new(2, 3, 4);
        v.set(1, 2, 3, 9.0);
        assert_eq!(v.idx(0, 0, 1), 1);
        assert_eq!(v.idx(0, 1, 0), 4);
        assert_eq!(v.idx(1, 0, 0), 12);
        assert_eq!(v.data[v.idx(1, 2, 3)], 9.0);
        assert_eq!(v.get(1, 2, 3), 9.0);
    }

    #[test]
    fn mean_std_of_flat_volume_has_floored_deviation() {
        let mut v = VolumeF32::new(2, 2, 2);
        v.data.fill(3.0);
        let (mean, std) = v.mean_std();
        assert!((mean - 3.0).abs() < 1e-6);
        assert!(std >= 1e-6);
    }
}
