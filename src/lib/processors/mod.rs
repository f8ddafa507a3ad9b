mod processor;
mod particle_filter_processor;
#[cfg(feature = "opencv-backend")]
mod clahe_processor;

pub use self::{processor::*, particle_filter_processor::*};
#[cfg(feature = "opencv-backend")]
pub use self::clahe_processor::*;
