use ndarray::Array2;
use opencv::{
    prelude::*,
    core::Mat,
    core::CV_8UC1,
    imgproc::COLOR_BGR2GRAY,
    imgproc::cvt_color_def,
};

use crate::error::{Result, TrackerError};

/// BGR (or already single channel) frame to 8-bit grayscale
pub fn to_grayscale(frame: &Mat, dst: &mut Mat) -> Result<()> {
    if frame.channels() == 1 {
        frame.copy_to(dst)?;
    } else {
        cvt_color_def(frame, dst, COLOR_BGR2GRAY)?;
    }
    Ok(())
}

/// Copies a CV_8UC1 Mat into an ndarray buffer with shape (rows, cols)
pub fn mat_to_array(gray: &Mat) -> Result<Array2<u8>> {
    if gray.typ() != CV_8UC1 {
        return Err(TrackerError::Video(format!("Expected CV_8UC1 frame, got type {}", gray.typ())));
    }
    let rows = gray.rows() as usize;
    let cols = gray.cols() as usize;
    let data = if gray.is_continuous() {
        gray.data_bytes()?.to_vec()
    } else {
        gray.try_clone()?.data_bytes()?.to_vec()
    };
    Array2::from_shape_vec((rows, cols), data).map_err(|err| TrackerError::Video(format!("Can't convert frame to array due to the error: {}", err)))
}
