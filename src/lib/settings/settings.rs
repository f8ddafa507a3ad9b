use std::fs;
use std::fmt;

use serde::{ Deserialize, Serialize };
use toml;

use crate::constants::{
    DEFAULT_CLAHE_CLIP_LIMIT,
    DEFAULT_CLAHE_TILE_GRID,
    DEFAULT_LIKELIHOOD_DECAY,
    DEFAULT_MOTION_NOISE_STD,
    DEFAULT_NUM_PARTICLES,
    DEFAULT_THRESHOLD,
};
use crate::error::{Result, TrackerError};
use crate::particle_filter::ParticleFilterParams;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub input: InputSettings,
    pub output: OutputSettings,
    #[serde(default)]
    pub centroid: CentroidSettings,
    #[serde(default)]
    pub tracking: TrackingSettings,
    #[serde(default)]
    pub clahe: ClaheSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InputSettings {
    pub video_src: String,
    // Either "device", "rtsp" or "file". Default is "device"
    #[serde(alias = "type", default = "default_input_typ")]
    pub typ: String,
}

fn default_input_typ() -> String { "device".to_string() }

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutputSettings {
    pub enable: bool,
    pub width: i32,
    pub height: i32,
    pub window_name: String,
    /// Draw the mean particle position on top of the particle cloud
    #[serde(default = "default_draw_estimate")]
    pub draw_estimate: bool,
}

fn default_draw_estimate() -> bool { true }

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CentroidSettings {
    /// Binarization threshold, pixels `>= threshold` belong to the blob.
    /// Kept wider than u8 so out-of-range values are reported rather than rejected by the parser
    #[serde(default = "default_threshold")]
    pub threshold: u16,
}

fn default_threshold() -> u16 { DEFAULT_THRESHOLD as u16 }

impl Default for CentroidSettings {
    fn default() -> Self {
        CentroidSettings { threshold: default_threshold() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackingSettings {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "default_num_particles")]
    pub num_particles: usize,
    #[serde(default = "default_motion_noise_std")]
    pub motion_noise_std: f32,
    #[serde(default = "default_likelihood_decay")]
    pub likelihood_decay: f32,
    /// Fixed RNG seed. Entropy from the OS is used when absent
    pub seed: Option<u64>,
}

fn default_enable() -> bool { true }
fn default_num_particles() -> usize { DEFAULT_NUM_PARTICLES }
fn default_motion_noise_std() -> f32 { DEFAULT_MOTION_NOISE_STD }
fn default_likelihood_decay() -> f32 { DEFAULT_LIKELIHOOD_DECAY }

impl Default for TrackingSettings {
    fn default() -> Self {
        TrackingSettings {
            enable: default_enable(),
            num_particles: default_num_particles(),
            motion_noise_std: default_motion_noise_std(),
            likelihood_decay: default_likelihood_decay(),
            seed: None,
        }
    }
}

impl TrackingSettings {
    pub fn get_params(&self) -> ParticleFilterParams {
        ParticleFilterParams {
            motion_noise_std: self.motion_noise_std,
            likelihood_decay: self.likelihood_decay,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClaheSettings {
    #[serde(default)]
    pub enable: bool,
    #[serde(default = "default_clip_limit")]
    pub clip_limit: f64,
    /// Tile grid as [columns, rows]
    #[serde(default = "default_tile_grid")]
    pub tile_grid: [i32; 2],
}

fn default_clip_limit() -> f64 { DEFAULT_CLAHE_CLIP_LIMIT }
fn default_tile_grid() -> [i32; 2] { DEFAULT_CLAHE_TILE_GRID }

impl Default for ClaheSettings {
    fn default() -> Self {
        ClaheSettings {
            enable: false,
            clip_limit: default_clip_limit(),
            tile_grid: default_tile_grid(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DebugSettings {
    #[serde(default)]
    pub enable: bool,
    /// Log performance stats every N frames. 0 = disabled.
    #[serde(default)]
    pub perf_stats_interval: u32,
}

impl AppSettings {
    pub fn new(filename: &str) -> Result<Self> {
        let toml_contents = fs::read_to_string(filename)?;
        AppSettings::parse(&toml_contents)
    }
    pub fn parse(toml_contents: &str) -> Result<Self> {
        let app_settings = toml::from_str::<AppSettings>(toml_contents)?;
        app_settings.validate()?;
        Ok(app_settings)
    }
    pub fn validate(&self) -> Result<()> {
        match self.input.typ.as_str() {
            "device" | "rtsp" | "file" => { },
            _ => {
                return Err(TrackerError::InvalidConfig(format!("Invalid input type: '{}'. Supported types are 'device', 'rtsp' and 'file'.", self.input.typ)));
            }
        }
        if self.input.typ == "device" && self.input.video_src.parse::<i32>().is_err() {
            return Err(TrackerError::InvalidConfig(format!("Can't parse '{}' as device_id (i32)", self.input.video_src)));
        }
        if self.output.enable && (self.output.width <= 0 || self.output.height <= 0) {
            return Err(TrackerError::InvalidConfig(format!("Output size must be positive, got {}x{}", self.output.width, self.output.height)));
        }
        if self.centroid.threshold > u8::MAX as u16 {
            return Err(TrackerError::InvalidConfig(format!("Centroid threshold must be in [0; 255], got {}", self.centroid.threshold)));
        }
        if self.tracking.num_particles == 0 {
            return Err(TrackerError::InvalidParticleCount(0));
        }
        self.tracking.get_params().validate()?;
        if !(self.clahe.clip_limit.is_finite() && self.clahe.clip_limit > 0.0) || self.clahe.tile_grid.iter().any(|v| *v <= 0) {
            return Err(TrackerError::InvalidConfig(format!("Invalid CLAHE settings: clip limit {}, tile grid {:?}", self.clahe.clip_limit, self.clahe.tile_grid)));
        }
        Ok(())
    }
    pub fn get_threshold(&self) -> u8 {
        self.centroid.threshold.min(u8::MAX as u16) as u8
    }
}

impl fmt::Display for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Video input: {} ({})\n\tOutput window: {} [{}]\n\tThreshold: {}\n\tParticle filter: {} [particles: {}, motion noise std: {}, likelihood decay: {}, seed: {:?}]\n\tCLAHE: {} [clip limit: {}, tile grid: {:?}]",
            self.input.video_src,
            self.input.typ,
            self.output.window_name,
            self.output.enable,
            self.centroid.threshold,
            self.tracking.enable,
            self.tracking.num_particles,
            self.tracking.motion_noise_std,
            self.tracking.likelihood_decay,
            self.tracking.seed,
            self.clahe.enable,
            self.clahe.clip_limit,
            self.clahe.tile_grid,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const MINIMAL: &str = r#"
[input]
video_src = "0"

[output]
enable = true
width = 640
height = 480
window_name = "particle filter"
"#;
    #[test]
    fn test_defaults() {
        let settings = AppSettings::parse(MINIMAL).unwrap();
        assert_eq!(settings.input.typ, "device");
        assert!(settings.output.draw_estimate);
        assert_eq!(settings.get_threshold(), 128);
        assert!(settings.tracking.enable);
        assert_eq!(settings.tracking.num_particles, 1000);
        assert_eq!(settings.tracking.get_params(), ParticleFilterParams::default());
        assert!(settings.tracking.seed.is_none());
        assert!(!settings.clahe.enable);
        assert_eq!(settings.clahe.clip_limit, 4.0);
        assert_eq!(settings.clahe.tile_grid, [8, 6]);
        assert!(!settings.debug.enable);
        assert_eq!(settings.debug.perf_stats_interval, 0);
    }
    #[test]
    fn test_full() {
        let contents = format!("{}{}", MINIMAL, r#"
[centroid]
threshold = 200

[tracking]
num_particles = 250
motion_noise_std = 5.5
likelihood_decay = 0.1
seed = 42

[clahe]
enable = true
clip_limit = 2.0
tile_grid = [4, 4]

[debug]
enable = true
perf_stats_interval = 30
"#);
        let settings = AppSettings::parse(&contents).unwrap();
        assert_eq!(settings.get_threshold(), 200);
        assert_eq!(settings.tracking.num_particles, 250);
        assert_eq!(settings.tracking.seed, Some(42));
        assert_eq!(settings.tracking.get_params().motion_noise_std, 5.5);
        assert_eq!(settings.tracking.get_params().likelihood_decay, 0.1);
        assert!(settings.clahe.enable);
        assert_eq!(settings.clahe.tile_grid, [4, 4]);
        assert_eq!(settings.debug.perf_stats_interval, 30);
    }
    #[test]
    fn test_validation() {
        let bad_particles = format!("{}\n[tracking]\nnum_particles = 0\n", MINIMAL);
        assert!(matches!(AppSettings::parse(&bad_particles), Err(TrackerError::InvalidParticleCount(0))));
        let bad_threshold = format!("{}\n[centroid]\nthreshold = 300\n", MINIMAL);
        assert!(matches!(AppSettings::parse(&bad_threshold), Err(TrackerError::InvalidConfig(_))));
        let bad_noise = format!("{}\n[tracking]\nmotion_noise_std = -2.0\n", MINIMAL);
        assert!(matches!(AppSettings::parse(&bad_noise), Err(TrackerError::InvalidParameter { .. })));
        let bad_typ = MINIMAL.replace("video_src = \"0\"", "video_src = \"0\"\ntyp = \"usb\"");
        assert!(matches!(AppSettings::parse(&bad_typ), Err(TrackerError::InvalidConfig(_))));
        let bad_device = MINIMAL.replace("video_src = \"0\"", "video_src = \"cam\"");
        assert!(matches!(AppSettings::parse(&bad_device), Err(TrackerError::InvalidConfig(_))));
        assert!(matches!(AppSettings::parse("[input]"), Err(TrackerError::ConfigParse(_))));
        let nan_clip = format!("{}\n[clahe]\nclip_limit = nan\n", MINIMAL);
        assert!(matches!(AppSettings::parse(&nan_clip), Err(TrackerError::InvalidConfig(_))));
        let inf_clip = format!("{}\n[clahe]\nclip_limit = inf\n", MINIMAL);
        assert!(matches!(AppSettings::parse(&inf_clip), Err(TrackerError::InvalidConfig(_))));
    }
    #[test]
    fn test_rtsp_source() {
        let rtsp = MINIMAL.replace("video_src = \"0\"", "video_src = \"rtsp://127.0.0.1:554/live\"\ntype = \"rtsp\"");
        let settings = AppSettings::parse(&rtsp).unwrap();
        assert_eq!(settings.input.typ, "rtsp");
    }
}
