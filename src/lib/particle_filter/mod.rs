mod particle;
mod resampling;
mod particle_filter;

pub use self::{particle::*, resampling::*, particle_filter::*};
