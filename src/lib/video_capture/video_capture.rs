use opencv::{prelude::*, videoio::VideoCapture, videoio::CAP_ANY};

use crate::error::{Result, TrackerError};

/// Opens either a camera device (`typ = "device"`) or a stream/file
pub fn get_video_capture(video_src: &str, typ: &str) -> Result<VideoCapture> {
    let video_capture = match typ {
        "rtsp" | "file" => VideoCapture::from_file(video_src, CAP_ANY)?,
        _ => {
            let device_id = video_src.parse::<i32>().map_err(|err| {
                TrackerError::Video(format!("Can't parse '{}' as device_id (i32) due to the error: {}", video_src, err))
            })?;
            VideoCapture::new(device_id, CAP_ANY)?
        }
    };
    if !video_capture.is_opened()? {
        return Err(TrackerError::Video(format!("Can't open video '{}'", video_src)));
    }
    Ok(video_capture)
}

/// Frame width and height
pub fn probe_video(capture: &VideoCapture) -> Result<(f32, f32)> {
    let frame_cols = capture.get(opencv::videoio::CAP_PROP_FRAME_WIDTH)? as f32;
    let frame_rows = capture.get(opencv::videoio::CAP_PROP_FRAME_HEIGHT)? as f32;
    Ok((frame_cols, frame_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_invalid_device_id() {
        let err = match get_video_capture("front_camera", "device") {
            Ok(_) => panic!("device id must be numeric"),
            Err(err) => err,
        };
        assert!(matches!(err, TrackerError::Video(_)));
        assert!(err.to_string().contains("Can't parse 'front_camera' as device_id (i32) due to the error"));
    }
}
