pub mod constants;
pub mod error;
pub mod centroid;
pub mod particle_filter;
pub mod processors;
pub mod settings;
pub mod perf_stats;

#[cfg(feature = "opencv-backend")]
pub mod convert;
#[cfg(feature = "opencv-backend")]
pub mod draw;
#[cfg(feature = "opencv-backend")]
pub mod video_capture;

pub use self::error::{TrackerError, Result};
