use ndarray::ArrayView2;
use tracing::trace;

use crate::constants::{DEFAULT_THRESHOLD, MASK_MAX_VALUE};
use crate::centroid::{binarize, moments};
use crate::particle_filter::Observation;

/// Turns a grayscale frame into a single target position.
///
/// The frame is binarized with `pixel >= threshold` and the centroid of the
/// resulting mask is reported. Stateless apart from the threshold.
#[derive(Debug, Clone, Copy)]
pub struct CentroidExtractor {
    threshold: u8,
}

impl Default for CentroidExtractor {
    fn default() -> Self {
        CentroidExtractor::new(DEFAULT_THRESHOLD)
    }
}

impl CentroidExtractor {
    pub fn new(threshold: u8) -> Self {
        CentroidExtractor { threshold }
    }
    pub fn get_threshold(&self) -> u8 {
        self.threshold
    }
    pub fn extract(&self, frame: &ArrayView2<u8>) -> Option<Observation> {
        extract_centroid(frame, self.threshold)
    }
}

/// Mask centroid of a grayscale frame, or `None` when no pixel reaches `threshold`
pub fn extract_centroid(frame: &ArrayView2<u8>, threshold: u8) -> Option<Observation> {
    let mask = binarize(frame, threshold, MASK_MAX_VALUE);
    let m = moments(&mask.view());
    let (cx, cy) = m.centroid()?;
    trace!(m00 = m.m00, cx, cy, "mask centroid");
    Some(Observation::new(cx as f32, cy as f32))
}
