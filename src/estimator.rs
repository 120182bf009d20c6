use crate::geometry::Geometry;

use ndarray::{Array2, ArrayView2};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("image has zero dynamic range, normalization is undefined")]
    DegenerateImage,

    #[error("arithmetic failure: {0}")]
    Compute(String),
}

/// Outcome of a volume estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeEstimate {
    /// Sum of the label map weighted by the voxel volume, in mm³.
    pub volume_mm3: f64,
    /// Number of 4-connected components above the threshold.
    pub component_count: u32,
}

pub struct VolumeEstimator;

impl VolumeEstimator {
    /// Estimate the thresholded region volume of a single image
    ///
    /// Pixel intensities are min-max normalized into [0, 1], binarized where
    /// strictly greater than `threshold`, and segmented into 4-connected
    /// components. The volume is the sum of the label map multiplied by the
    /// voxel volume. Thresholds outside [0, 1] are accepted and simply yield
    /// trivial masks at the extremes.
    ///
    /// # Errors
    ///
    /// Returns an error if the image has no dynamic range or the arithmetic
    /// produces a non-finite result.
    pub fn estimate(
        pixels: &Array2<f32>,
        geometry: &Geometry,
        threshold: f32,
    ) -> Result<VolumeEstimate, EstimateError> {
        let normalized = Self::normalize(pixels)?;
        let mask = normalized.mapv(|value| value > threshold);
        let (labels, component_count) = Self::label_components(&mask.view());

        let voxel_volume = geometry.voxel_volume();
        let label_sum: u64 = labels.iter().map(|&label| u64::from(label)).sum();
        let volume_mm3 = label_sum as f64 * voxel_volume;
        if !volume_mm3.is_finite() {
            return Err(EstimateError::Compute(format!(
                "non-finite volume from voxel volume {voxel_volume}"
            )));
        }

        Ok(VolumeEstimate {
            volume_mm3,
            component_count,
        })
    }

    fn normalize(pixels: &Array2<f32>) -> Result<Array2<f32>, EstimateError> {
        if pixels.is_empty() {
            return Err(EstimateError::DegenerateImage);
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &value in pixels.iter() {
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(EstimateError::Compute(format!(
                "non-finite intensity range [{min}, {max}]"
            )));
        }
        if max == min {
            return Err(EstimateError::DegenerateImage);
        }

        let range = max - min;
        Ok(pixels.mapv(|value| (value - min) / range))
    }

    /// Label 4-connected mask components in raster-scan order.
    ///
    /// Returns the label map (background 0, components 1..=n) and the
    /// component count.
    fn label_components(mask: &ArrayView2<bool>) -> (Array2<u32>, u32) {
        let (rows, cols) = mask.dim();
        let mut labels = Array2::<u32>::zeros((rows, cols));
        let mut current = 0u32;
        let mut pending: Vec<(usize, usize)> = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                if !mask[[row, col]] || labels[[row, col]] != 0 {
                    continue;
                }
                current += 1;
                labels[[row, col]] = current;
                pending.push((row, col));
                while let Some((r, c)) = pending.pop() {
                    for (nr, nc) in Self::neighbors(r, c, rows, cols) {
                        if mask[[nr, nc]] && labels[[nr, nc]] == 0 {
                            labels[[nr, nc]] = current;
                            pending.push((nr, nc));
                        }
                    }
                }
            }
        }

        (labels, current)
    }

    fn neighbors(
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        let up = row.checked_sub(1).map(|r| (r, col));
        let left = col.checked_sub(1).map(|c| (row, c));
        let down = (row + 1 < rows).then_some((row + 1, col));
        let right = (col + 1 < cols).then_some((row, col + 1));

        [up, left, down, right].into_iter().flatten()
    }
}
