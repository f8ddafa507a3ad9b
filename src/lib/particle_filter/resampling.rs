use nalgebra::distance;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use tracing::warn;

use crate::particle_filter::{Observation, Particle};

/// Normalized weights `exp(-decay * ||p - observation||)` for every particle.
///
/// Distances are taken relative to the closest particle before exponentiating,
/// so the largest unnormalized weight is always 1 and far observations don't
/// underflow. If the sum is still not finite (e.g. infinite distances) the
/// weights fall back to uniform `1 / N`, so the result always sums to 1.
pub fn normalized_weights(particles: &[Particle], observation: &Observation, decay: f32) -> Vec<f32> {
    let distances: Vec<f32> = particles
        .iter()
        .map(|p| distance(p, observation))
        .collect();
    let min_distance = distances.iter().copied().fold(f32::INFINITY, f32::min);
    let mut weights: Vec<f32> = distances
        .iter()
        .map(|d| f32::exp(-decay * (d - min_distance)))
        .collect();
    let total: f32 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        for w in weights.iter_mut() {
            *w /= total;
        }
    } else {
        warn!(total, "Degenerate particle weights, falling back to uniform");
        let uniform = 1.0 / particles.len() as f32;
        weights.iter_mut().for_each(|w| *w = uniform);
    }
    weights
}

/// Multinomial resampling with replacement.
///
/// Draws `particles.len()` indices proportionally to `weights` and returns a
/// freshly built particle vector. Weights that can't form a distribution
/// are treated as uniform.
pub fn multinomial_resample<R: Rng>(particles: &[Particle], weights: &[f32], rng: &mut R) -> Vec<Particle> {
    let n = particles.len();
    match WeightedIndex::new(weights) {
        Ok(dist) => (0..n).map(|_| particles[dist.sample(rng)]).collect(),
        Err(err) => {
            warn!("Can't build weighted index due to the error: {}. Sampling uniformly", err);
            (0..n).map(|_| particles[rng.random_range(0..n)]).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use crate::constants::EPSILON;
    #[test]
    fn test_weights_sum_to_one() {
        let particles = vec![Particle::new(0.0, 0.0), Particle::new(1.0, 0.0), Particle::new(3.0, 4.0)];
        let weights = normalized_weights(&particles, &Observation::new(0.0, 0.0), 1.0);
        assert_eq!(weights.len(), 3);
        assert!((weights.iter().sum::<f32>() - 1.0).abs() < EPSILON);
        assert!(weights[0] > weights[1] && weights[1] > weights[2]);
        // exp(-0) : exp(-1)
        assert!((weights[0] / weights[1] - std::f32::consts::E).abs() < 1e-4);
    }
    #[test]
    fn test_weights_far_observation_favor_nearest() {
        // every particle is more than 104px away, plain f32 exp(-d) would be zero for all
        let mut particles = vec![Particle::new(110.0, 0.0)];
        particles.extend((0..99).map(|_| Particle::new(0.0, 200.0)));
        let observation = Observation::new(0.0, 0.0);
        let weights = normalized_weights(&particles, &observation, 1.0);
        assert!((weights.iter().sum::<f32>() - 1.0).abs() < EPSILON);
        assert!(weights[0] > 0.999, "nearest weight {}", weights[0]);
        assert!(weights[1..].iter().all(|w| *w < 1e-30));

        let mut rng = StdRng::seed_from_u64(21);
        let resampled = multinomial_resample(&particles, &weights, &mut rng);
        assert_eq!(resampled.len(), 100);
        assert!(resampled.iter().all(|p| *p == Particle::new(110.0, 0.0)));
    }
    #[test]
    fn test_weights_relative_to_nearest() {
        let particles = vec![Particle::new(150.0, 0.0), Particle::new(151.0, 0.0)];
        let weights = normalized_weights(&particles, &Observation::new(0.0, 0.0), 1.0);
        // same ratio as exp(-150) : exp(-151)
        assert!((weights[0] / weights[1] - std::f32::consts::E).abs() < 1e-4);
    }
    #[test]
    fn test_weights_non_finite_fallback() {
        let particles = vec![Particle::new(0.0, 0.0), Particle::new(10.0, 10.0), Particle::new(20.0, 5.0), Particle::new(7.0, 1.0)];
        // distances overflow to infinity for every particle
        let weights = normalized_weights(&particles, &Observation::new(f32::MAX, f32::MAX), 1.0);
        for w in weights.iter() {
            assert_eq!(*w, 0.25);
        }
    }
    #[test]
    fn test_resample_picks_only_weighted() {
        let mut rng = StdRng::seed_from_u64(7);
        let particles = vec![Particle::new(1.0, 1.0), Particle::new(2.0, 2.0), Particle::new(3.0, 3.0)];
        let weights = vec![0.0, 1.0, 0.0];
        let resampled = multinomial_resample(&particles, &weights, &mut rng);
        assert_eq!(resampled.len(), 3);
        assert!(resampled.iter().all(|p| *p == Particle::new(2.0, 2.0)));
    }
    #[test]
    fn test_resample_invalid_weights_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let particles: Vec<Particle> = (0..20).map(|i| Particle::new(i as f32, 0.0)).collect();
        let weights = vec![0.0; 20];
        let resampled = multinomial_resample(&particles, &weights, &mut rng);
        assert_eq!(resampled.len(), 20);
        assert!(resampled.iter().all(|p| particles.contains(p)));
    }
}
