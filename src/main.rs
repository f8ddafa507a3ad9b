use opencv::{
    prelude::*,
    core::Mat,
    core::Scalar,
    core::Size,
    highgui::named_window,
    highgui::resize_window,
    highgui::imshow,
    highgui::wait_key,
    imgproc::resize,
    videoio::VideoCapture,
};

use chrono::Utc;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use blob_particle_tracker::{
    Result,
    TrackerError,
    centroid::CentroidExtractor,
    convert::{mat_to_array, to_grayscale},
    draw::{draw_estimate, draw_observation, draw_particles},
    particle_filter::{FrameBounds, ParticleFilter},
    perf_stats::{PerfStats, Timer},
    processors::{ClaheProcessor, FrameProcessor, ParticleFilterProcessor},
    settings::AppSettings,
    video_capture::{ThreadedFrame, get_video_capture, probe_video},
};

use std::process;
use std::thread;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

const EMPTY_FRAMES_LIMIT: u16 = 60;
const FRAMES_QUEUE_SIZE: usize = 25;
const KEY_ESC: i32 = 27;

#[derive(Parser, Debug)]
#[command(version, about = "Particle filter tracking of a bright blob in a video stream")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "./data/conf.toml")]
    config: String,
    /// RNG seed for the particle filter (overrides `tracking.seed`)
    #[arg(long)]
    seed: Option<u64>,
}

/// Reads the first non-empty frame. Its size seeds the particle cloud
fn read_first_frame(capture: &mut VideoCapture) -> Result<Mat> {
    for _ in 0..EMPTY_FRAMES_LIMIT {
        let mut frame = Mat::default();
        capture.read(&mut frame)?;
        if !frame.empty() {
            return Ok(frame);
        }
    }
    Err(TrackerError::Video("Too many empty frames at start".to_string()))
}

fn run(settings: &AppSettings) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C has been pressed! Stopping");
            running.store(false, Ordering::SeqCst);
        }).map_err(|err| TrackerError::InvalidConfig(format!("Error setting `Ctrl-C` handler: {}", err)))?;
    }
    info!("Press `Ctrl-C` to stop main programm");

    /* Probe video */
    let mut video_capture = get_video_capture(&settings.input.video_src, &settings.input.typ)?;
    let (probe_width, probe_height) = probe_video(&video_capture)?;
    let first_frame = read_first_frame(&mut video_capture)?;
    let bounds = FrameBounds::new(first_frame.cols() as f32, first_frame.rows() as f32);
    info!("Video probe: {{Width: {}px | Height: {}px}}, first frame: {}x{}", probe_width, probe_height, bounds.width, bounds.height);

    /* Prepare processors */
    let params = settings.tracking.get_params();
    let filter = match settings.tracking.seed {
        Some(seed) => ParticleFilter::with_seed(settings.tracking.num_particles, bounds, params, seed)?,
        None => ParticleFilter::from_os_rng(settings.tracking.num_particles, bounds, params)?,
    };
    info!("Particle filter is:\n\t{}", filter);
    let extractor = CentroidExtractor::new(settings.get_threshold());
    let mut pf_processor = ParticleFilterProcessor::new(extractor, filter, settings.tracking.enable);
    let mut clahe_processor = ClaheProcessor::new(settings.clahe.clip_limit, settings.clahe.tile_grid, settings.clahe.enable)?;

    /* Create imshow() if needed */
    let window = &settings.output.window_name;
    if settings.output.enable {
        named_window(window, 1)?;
        resize_window(window, settings.output.width, settings.output.height)?;
        info!("Keys: 'q'/Esc - quit, 'c' - toggle CLAHE, 'p' - toggle particle filter");
    }

    /* Start capture loop */
    let (tx_capture, rx_capture): (mpsc::SyncSender<ThreadedFrame>, mpsc::Receiver<ThreadedFrame>) = mpsc::sync_channel(FRAMES_QUEUE_SIZE);
    let capture_running = running.clone();
    let capture_handle = thread::spawn(move || {
        let mut frame_number: u64 = 0;
        let mut empty_frames_counter: u16 = 0;
        let mut pending = Some(first_frame);
        while capture_running.load(Ordering::SeqCst) {
            let read_frame = match pending.take() {
                Some(frame) => frame,
                None => {
                    let mut frame = Mat::default();
                    if let Err(err) = video_capture.read(&mut frame) {
                        error!("Can't read next frame due to the error: {}", err);
                        break;
                    }
                    frame
                }
            };
            if read_frame.empty() {
                debug!("Empty frame");
                empty_frames_counter += 1;
                if empty_frames_counter >= EMPTY_FRAMES_LIMIT {
                    warn!("Too many empty frames");
                    break;
                }
                continue;
            }
            empty_frames_counter = 0;
            frame_number += 1;
            let frame = ThreadedFrame {
                frame: read_frame,
                frame_number,
                last_time: Utc::now(),
            };
            if tx_capture.send(frame).is_err() {
                // Processing loop is gone
                break;
            }
        }
        match video_capture.release() {
            Ok(_) => {
                info!("Video capture has been closed successfully");
            },
            Err(err) => {
                error!("Can't release video capturer due to the error: {}", err);
            }
        };
    });

    /* Processing loop */
    let mut perf_stats = PerfStats::new(settings.debug.perf_stats_interval);
    let mut gray = Mat::default();
    let mut enhanced = Mat::default();
    let mut resized_frame = Mat::default();
    let particle_color = Scalar::from((0.0, 0.0, 255.0));
    let estimate_color = Scalar::from((0.0, 255.0, 0.0));
    let observation_color = Scalar::from((255.0, 0.0, 0.0));
    for received in rx_capture {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let mut frame = received.frame;

        let timer = Timer::start();
        to_grayscale(&frame, &mut gray)?;
        clahe_processor.process(&gray, &mut enhanced)?;
        let contrast_elapsed = timer.elapsed();

        let timer = Timer::start();
        let gray_array = mat_to_array(&enhanced)?;
        let observation = pf_processor.process(&gray_array.view());
        let tracking_elapsed = timer.elapsed();
        debug!("Frame #{} at {}: observation {:?}", received.frame_number, received.last_time, observation);

        let timer = Timer::start();
        if settings.output.enable {
            if pf_processor.is_enabled() {
                let filter = pf_processor.get_filter();
                draw_particles(&mut frame, filter.particles(), particle_color)?;
                if settings.output.draw_estimate {
                    draw_estimate(&mut frame, &filter.estimate(), estimate_color)?;
                }
                if let Some(obs) = observation {
                    draw_observation(&mut frame, &obs, observation_color)?;
                }
            }
            resize(&frame, &mut resized_frame, Size::new(settings.output.width, settings.output.height), 0.0, 0.0, 1)?;
            if resized_frame.size()?.width > 0 {
                imshow(window, &resized_frame)?;
            }
            let key = wait_key(1)?;
            if key > 0 && key != 255 {
                match char::from_u32((key & 0xFF) as u32) {
                    Some('q') => break,
                    Some('c') => clahe_processor.toggle(),
                    Some('p') => pf_processor.toggle(),
                    _ if (key & 0xFF) == KEY_ESC => break,
                    _ => {}
                }
            }
        }
        perf_stats.record(contrast_elapsed, tracking_elapsed, timer.elapsed());
    }

    running.store(false, Ordering::SeqCst);
    if capture_handle.join().is_err() {
        error!("Capture thread panicked");
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let settings = AppSettings::new(&args.config);

    let default_level = match &settings {
        Ok(s) if s.debug.enable => "debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut settings = match settings {
        Ok(s) => s,
        Err(err) => {
            error!("Can't load settings from '{}' due to the error: {}", args.config, err);
            process::exit(1);
        }
    };
    if args.seed.is_some() {
        settings.tracking.seed = args.seed;
    }
    info!("Settings are:\n\t{}", settings);

    if let Err(err) = run(&settings) {
        error!("Error in main thread: {}", err);
        process::exit(1);
    }
}
