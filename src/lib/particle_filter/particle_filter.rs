use std::fmt;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, warn};

use crate::error::{Result, TrackerError};
use crate::particle_filter::{
    FrameBounds,
    Observation,
    Particle,
    ParticleFilterParams,
    multinomial_resample,
    normalized_weights,
};

/// Sequential Monte Carlo tracker of a single 2D position.
///
/// Particles follow an isotropic Gaussian random walk (`predict`) and are
/// reweighted by `exp(-decay * distance)` to the observation, then
/// multinomially resampled (`update`). The random source is injected so
/// runs can be made deterministic.
#[derive(Debug)]
pub struct ParticleFilter<R: Rng = StdRng> {
    particles: Vec<Particle>,
    params: ParticleFilterParams,
    motion_noise: Normal<f32>,
    rng: R,
}

impl ParticleFilter<StdRng> {
    /// Deterministic filter seeded with `seed`
    pub fn with_seed(num_particles: usize, bounds: FrameBounds, params: ParticleFilterParams, seed: u64) -> Result<Self> {
        ParticleFilter::new(num_particles, bounds, params, StdRng::seed_from_u64(seed))
    }
    /// Filter seeded from operating system entropy
    pub fn from_os_rng(num_particles: usize, bounds: FrameBounds, params: ParticleFilterParams) -> Result<Self> {
        ParticleFilter::new(num_particles, bounds, params, StdRng::from_os_rng())
    }
}

impl<R: Rng> ParticleFilter<R> {
    /// Spreads `num_particles` uniformly over `[0, width) x [0, height)`
    pub fn new(num_particles: usize, bounds: FrameBounds, params: ParticleFilterParams, mut rng: R) -> Result<Self> {
        if num_particles == 0 {
            return Err(TrackerError::InvalidParticleCount(num_particles));
        }
        bounds.validate()?;
        let particles = (0..num_particles)
            .map(|_| {
                let x = rng.random_range(0.0..bounds.width);
                let y = rng.random_range(0.0..bounds.height);
                Particle::new(x, y)
            })
            .collect();
        ParticleFilter::from_particles(particles, params, rng)
    }
    /// Starts from an explicit particle set
    pub fn from_particles(particles: Vec<Particle>, params: ParticleFilterParams, rng: R) -> Result<Self> {
        if particles.is_empty() {
            return Err(TrackerError::InvalidParticleCount(0));
        }
        if particles.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(TrackerError::InvalidParameter {
                name: "particles",
                reason: "all coordinates must be finite".to_string(),
            });
        }
        params.validate()?;
        let motion_noise = Normal::new(0.0, params.motion_noise_std).map_err(|err| TrackerError::InvalidParameter {
            name: "motion_noise_std",
            reason: err.to_string(),
        })?;
        Ok(ParticleFilter {
            particles,
            params,
            motion_noise,
            rng,
        })
    }
    /// Random walk: adds `N(0, sigma^2)` to both axes of every particle
    pub fn predict(&mut self) {
        for p in self.particles.iter_mut() {
            p.x += self.motion_noise.sample(&mut self.rng);
            p.y += self.motion_noise.sample(&mut self.rng);
        }
    }
    /// Reweights particles against `observation` and resamples them.
    /// Non-finite observations are ignored.
    pub fn update(&mut self, observation: &Observation) {
        if !(observation.x.is_finite() && observation.y.is_finite()) {
            warn!("Skipping update with non-finite observation: ({}, {})", observation.x, observation.y);
            return;
        }
        let weights = normalized_weights(&self.particles, observation, self.params.likelihood_decay);
        let resampled = multinomial_resample(&self.particles, &weights, &mut self.rng);
        self.particles = resampled;
        debug!(x = observation.x, y = observation.y, "Particles resampled");
    }
    /// One frame of tracking: update when there is an observation, then predict
    pub fn step(&mut self, observation: Option<&Observation>) {
        if let Some(obs) = observation {
            self.update(obs);
        }
        self.predict();
    }
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }
    pub fn params(&self) -> &ParticleFilterParams {
        &self.params
    }
    /// Mean position of the particle cloud
    pub fn estimate(&self) -> Particle {
        let n = self.particles.len() as f32;
        let (sx, sy) = self.particles.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Particle::new(sx / n, sy / n)
    }
}

impl<R: Rng> fmt::Display for ParticleFilter<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Number of particles: {}\n\tMotion noise std: {}\n\tLikelihood decay: {}",
            self.particles.len(),
            self.params.motion_noise_std,
            self.params.likelihood_decay,
        )
    }
}
