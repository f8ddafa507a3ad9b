use opencv::{
    core::Mat,
    core::Point,
    core::Scalar,
    imgproc::FILLED,
    imgproc::LINE_8,
    imgproc::circle,
};

use crate::error::Result;
use crate::particle_filter::{Observation, Particle};

/// Red dot per particle. Particles outside of the frame are clipped by OpenCV
pub fn draw_particles(img: &mut Mat, particles: &[Particle], color: Scalar) -> Result<()> {
    for p in particles.iter() {
        let cv_pt = Point::new(p.x as i32, p.y as i32);
        circle(img, cv_pt, 1, color, FILLED, LINE_8, 0)?;
    }
    Ok(())
}

pub fn draw_estimate(img: &mut Mat, estimate: &Particle, color: Scalar) -> Result<()> {
    let cv_pt = Point::new(estimate.x.round() as i32, estimate.y.round() as i32);
    circle(img, cv_pt, 6, color, 2, LINE_8, 0)?;
    Ok(())
}

pub fn draw_observation(img: &mut Mat, observation: &Observation, color: Scalar) -> Result<()> {
    let cv_pt = Point::new(observation.x.round() as i32, observation.y.round() as i32);
    circle(img, cv_pt, 3, color, FILLED, LINE_8, 0)?;
    Ok(())
}
