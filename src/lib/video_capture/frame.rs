use opencv::core::Mat;

use chrono::{
    DateTime,
    Utc,
};

pub struct ThreadedFrame {
    pub frame: Mat,
    pub frame_number: u64,
    pub last_time: DateTime<Utc>,
}
