use nalgebra::Point2;

use crate::constants::{DEFAULT_LIKELIHOOD_DECAY, DEFAULT_MOTION_NOISE_STD};
use crate::error::{Result, TrackerError};

/// One hypothesized target position in frame-pixel coordinates
pub type Particle = Point2<f32>;

/// Measured target position, e.g. the centroid of a thresholded frame
pub type Observation = Point2<f32>;

/// Frame extent used to seed the initial particle cloud.
/// Not enforced afterwards: particles may drift outside of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBounds {
    pub width: f32,
    pub height: f32,
}

impl FrameBounds {
    pub fn new(width: f32, height: f32) -> Self {
        FrameBounds { width, height }
    }
    pub fn validate(&self) -> Result<()> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(TrackerError::InvalidBounds { width: self.width, height: self.height });
        }
        Ok(())
    }
    pub fn contains(&self, p: &Particle) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }
}

/// Tunables of the motion and observation models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFilterParams {
    /// Standard deviation (pixels) of the per-axis Gaussian random walk
    pub motion_noise_std: f32,
    /// Particle weight is `exp(-likelihood_decay * distance)`
    pub likelihood_decay: f32,
}

impl Default for ParticleFilterParams {
    fn default() -> Self {
        ParticleFilterParams {
            motion_noise_std: DEFAULT_MOTION_NOISE_STD,
            likelihood_decay: DEFAULT_LIKELIHOOD_DECAY,
        }
    }
}

impl ParticleFilterParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.motion_noise_std.is_finite() && self.motion_noise_std > 0.0) {
            return Err(TrackerError::InvalidParameter {
                name: "motion_noise_std",
                reason: format!("must be finite and positive, got {}", self.motion_noise_std),
            });
        }
        if !(self.likelihood_decay.is_finite() && self.likelihood_decay > 0.0) {
            return Err(TrackerError::InvalidParameter {
                name: "likelihood_decay",
                reason: format!("must be finite and positive, got {}", self.likelihood_decay),
            });
        }
        Ok(())
    }
}
