use std::time::{Duration, Instant};

use tracing::info;

/// Averaged per-stage timings of the frame pipeline.
/// Accumulates timing data and logs averages every N frames.
pub struct PerfStats {
    /// Number of frames between stats output. 0 disables the output
    interval: u32,
    frame_count: u32,
    contrast_total: Duration,
    tracking_total: Duration,
    render_total: Duration,
}

/// Average milliseconds per frame for every stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfReport {
    pub frames: u32,
    pub contrast_ms: f64,
    pub tracking_ms: f64,
    pub render_ms: f64,
}

impl PerfReport {
    pub fn total_ms(&self) -> f64 {
        self.contrast_ms + self.tracking_ms + self.render_ms
    }
}

impl PerfStats {
    pub fn new(interval: u32) -> Self {
        PerfStats {
            interval,
            frame_count: 0,
            contrast_total: Duration::ZERO,
            tracking_total: Duration::ZERO,
            render_total: Duration::ZERO,
        }
    }

    /// Record timings for a single frame. Returns the report once the interval is reached.
    ///
    /// # Arguments
    /// * `contrast` - Time for grayscale conversion and CLAHE
    /// * `tracking` - Time for centroid extraction, update and predict
    /// * `render` - Time for drawing particles and showing the frame
    pub fn record(&mut self, contrast: Duration, tracking: Duration, render: Duration) -> Option<PerfReport> {
        if self.interval == 0 {
            return None;
        }
        self.contrast_total += contrast;
        self.tracking_total += tracking;
        self.render_total += render;
        self.frame_count += 1;

        if self.frame_count >= self.interval {
            return Some(self.log_and_reset());
        }
        None
    }

    fn log_and_reset(&mut self) -> PerfReport {
        let n = self.frame_count as f64;
        let report = PerfReport {
            frames: self.frame_count,
            contrast_ms: self.contrast_total.as_secs_f64() * 1000.0 / n,
            tracking_ms: self.tracking_total.as_secs_f64() * 1000.0 / n,
            render_ms: self.render_total.as_secs_f64() * 1000.0 / n,
        };
        let avg_total = report.total_ms();
        // Processing time only, capture is not included
        let estimated_fps = if avg_total > 0.0 { 1000.0 / avg_total } else { 0.0 };

        info!(
            "[PerfStats] Last {} frames avg: contrast={:.2}ms, tracking={:.2}ms, render={:.2}ms | total={:.2}ms (~{:.1} FPS)",
            report.frames,
            report.contrast_ms,
            report.tracking_ms,
            report.render_ms,
            avg_total,
            estimated_fps
        );

        self.frame_count = 0;
        self.contrast_total = Duration::ZERO;
        self.tracking_total = Duration::ZERO;
        self.render_total = Duration::ZERO;
        report
    }
}

/// Simple stopwatch
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Timer { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_report_every_interval() {
        let mut stats = PerfStats::new(2);
        let ms = Duration::from_millis;
        assert!(stats.record(ms(2), ms(4), ms(6)).is_none());
        let report = stats.record(ms(4), ms(6), ms(8)).unwrap();
        assert_eq!(report.frames, 2);
        assert!((report.contrast_ms - 3.0).abs() < 1e-9);
        assert!((report.tracking_ms - 5.0).abs() < 1e-9);
        assert!((report.render_ms - 7.0).abs() < 1e-9);
        assert!((report.total_ms() - 15.0).abs() < 1e-9);
        // counters are reset
        assert!(stats.record(ms(1), ms(1), ms(1)).is_none());
    }
    #[test]
    fn test_disabled() {
        let mut stats = PerfStats::new(0);
        for _ in 0..10 {
            assert!(stats.record(Duration::from_millis(1), Duration::ZERO, Duration::ZERO).is_none());
        }
    }
}
