use crate::decoder::{DecodeError, SliceDecoder};
use crate::estimator::{EstimateError, VolumeEstimate, VolumeEstimator};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Run the decode-and-estimate pipeline on an uploaded DICOM stream.
///
/// Pure per invocation: no state is shared across calls.
///
/// # Errors
///
/// Returns an error if the stream cannot be decoded or the estimation
/// fails; every failure carries a descriptive message for the caller.
pub fn process(bytes: &[u8], threshold: f32) -> Result<VolumeEstimate, PipelineError> {
    let image = SliceDecoder::decode(bytes)?;
    let estimate = VolumeEstimator::estimate(&image.pixels, &image.geometry, threshold)?;

    debug!(
        rows = image.pixels.nrows(),
        cols = image.pixels.ncols(),
        geometry = %image.geometry,
        components = estimate.component_count,
        volume_mm3 = estimate.volume_mm3,
        "estimated region volume"
    );

    Ok(estimate)
}
