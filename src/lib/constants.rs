//! Shared numeric constants and tracker defaults.

/// Epsilon for general floating-point comparisons.
/// Use for: pixel coordinates, distances, weight sums.
pub const EPSILON: f32 = 1e-6;

/// Default binarization threshold for the centroid extractor (inclusive).
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Value written to mask pixels that pass the threshold.
pub const MASK_MAX_VALUE: u8 = 255;

/// Default standard deviation of the random-walk motion model, in pixels.
pub const DEFAULT_MOTION_NOISE_STD: f32 = 20.0;

/// Default decay of the exponential likelihood `exp(-decay * distance)`.
pub const DEFAULT_LIKELIHOOD_DECAY: f32 = 1.0;

/// Default number of particles used by the application.
pub const DEFAULT_NUM_PARTICLES: usize = 1000;

/// CLAHE defaults: clip limit and tile grid (columns x rows).
pub const DEFAULT_CLAHE_CLIP_LIMIT: f64 = 4.0;
pub const DEFAULT_CLAHE_TILE_GRID: [i32; 2] = [8, 6];
