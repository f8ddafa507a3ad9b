use opencv::{
    prelude::*,
    core::Mat,
    core::Ptr,
    core::Size,
    imgproc::CLAHE,
    imgproc::create_clahe,
};

use crate::error::Result;
use crate::processors::FrameProcessor;

/// Contrast Limited Adaptive Histogram Equalization of a grayscale frame
pub struct ClaheProcessor {
    enabled: bool,
    clahe: Ptr<CLAHE>,
}

impl ClaheProcessor {
    /// `tile_grid` is (columns, rows)
    pub fn new(clip_limit: f64, tile_grid: [i32; 2], enabled: bool) -> Result<Self> {
        let clahe = create_clahe(clip_limit, Size::new(tile_grid[0], tile_grid[1]))?;
        Ok(ClaheProcessor { enabled, clahe })
    }
    /// Writes the equalized frame into `dst`, or a plain copy when disabled
    pub fn process(&mut self, src: &Mat, dst: &mut Mat) -> Result<()> {
        if self.enabled {
            self.clahe.apply(src, dst)?;
        } else {
            src.copy_to(dst)?;
        }
        Ok(())
    }
}

impl FrameProcessor for ClaheProcessor {
    fn name(&self) -> &'static str {
        "clahe"
    }
    fn is_enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
