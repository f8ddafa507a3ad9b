use thiserror::Error;

/// Errors that can occur while configuring or running the tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Number of particles must be positive, got {0}")]
    InvalidParticleCount(usize),

    #[error("Frame bounds must be finite and positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Can't parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Video error: {0}")]
    Video(String),

    #[cfg(feature = "opencv-backend")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),
}

/// Result type for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
