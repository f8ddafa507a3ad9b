use ndarray::ArrayView2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::centroid::CentroidExtractor;
use crate::particle_filter::{Observation, ParticleFilter};
use crate::processors::FrameProcessor;

/// Tracks the bright blob of a grayscale frame.
///
/// While enabled every frame runs extract -> update (if the blob is visible) -> predict.
/// While disabled the filter is left untouched.
pub struct ParticleFilterProcessor<R: Rng = StdRng> {
    enabled: bool,
    extractor: CentroidExtractor,
    filter: ParticleFilter<R>,
    last_observation: Option<Observation>,
}

impl<R: Rng> ParticleFilterProcessor<R> {
    pub fn new(extractor: CentroidExtractor, filter: ParticleFilter<R>, enabled: bool) -> Self {
        ParticleFilterProcessor {
            enabled,
            extractor,
            filter,
            last_observation: None,
        }
    }
    /// Returns the observation extracted from `frame`, `None` when disabled or the blob is absent
    pub fn process(&mut self, frame: &ArrayView2<u8>) -> Option<Observation> {
        if !self.enabled {
            return None;
        }
        let observation = self.extractor.extract(frame);
        self.filter.step(observation.as_ref());
        self.last_observation = observation;
        observation
    }
    pub fn get_filter(&self) -> &ParticleFilter<R> {
        &self.filter
    }
    pub fn get_extractor(&self) -> &CentroidExtractor {
        &self.extractor
    }
    pub fn get_last_observation(&self) -> Option<Observation> {
        self.last_observation
    }
}

impl<R: Rng> FrameProcessor for ParticleFilterProcessor<R> {
    fn name(&self) -> &'static str {
        "particle_filter"
    }
    fn is_enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, s};
    use crate::particle_filter::{FrameBounds, ParticleFilterParams};

    fn new_processor(enabled: bool) -> ParticleFilterProcessor {
        let filter = ParticleFilter::with_seed(300, FrameBounds::new(64.0, 48.0), ParticleFilterParams::default(), 77).unwrap();
        ParticleFilterProcessor::new(CentroidExtractor::default(), filter, enabled)
    }

    #[test]
    fn test_disabled_is_passthrough() {
        let mut processor = new_processor(false);
        let before = processor.get_filter().particles().to_vec();
        let frame = Array2::<u8>::from_elem((48, 64), 255);
        assert!(processor.process(&frame.view()).is_none());
        assert_eq!(processor.get_filter().particles(), &before[..]);
    }
    #[test]
    fn test_toggle() {
        let mut processor = new_processor(false);
        processor.toggle();
        assert!(processor.is_enabled());
        processor.toggle();
        assert!(!processor.is_enabled());
    }
    #[test]
    fn test_tracks_bright_blob() {
        let mut processor = new_processor(true);
        let mut frame = Array2::<u8>::zeros((48, 64));
        frame.slice_mut(s![30..35, 40..45]).fill(250);
        for _ in 0..10 {
            let observation = processor.process(&frame.view()).unwrap();
            assert_eq!(observation, Observation::new(42.0, 32.0));
        }
        assert_eq!(processor.get_last_observation(), Some(Observation::new(42.0, 32.0)));
        assert_eq!(processor.get_filter().num_particles(), 300);
        let estimate = processor.get_filter().estimate();
        assert!((estimate.x - 42.0).abs() < 15.0);
        assert!((estimate.y - 32.0).abs() < 15.0);
    }
    #[test]
    fn test_dark_frame_still_predicts() {
        let mut processor = new_processor(true);
        let before = processor.get_filter().particles().to_vec();
        let frame = Array2::<u8>::zeros((48, 64));
        assert!(processor.process(&frame.view()).is_none());
        assert!(processor.get_last_observation().is_none());
        assert_eq!(processor.get_filter().num_particles(), before.len());
        assert!(processor.get_filter().particles().iter().zip(before.iter()).all(|(a, b)| a != b));
    }
}
