//! CLI for replaying recorded landmark detections through the overlay.
//!
//! Usage:
//!   brow-overlay <recording.json>                  # Human-readable summary
//!   brow-overlay <recording.json> --json           # Draw plans as JSON
//!   brow-overlay <recording.json> -o plans.json    # Save to file
//!   brow-overlay <recording.json> --render out/    # PNG preview per plan

use brow_overlay::{
    raster, rect_from_screen, DetectionFrame, DrawPlan, FaceObservation, OverlayConfig,
    OverlaySession, Primitive, Rect, Size,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "brow-overlay")]
#[command(author, version, about = "Replay recorded face detections through the eyebrow overlay", long_about = None)]
struct Args {
    /// Recorded detection stream (JSON)
    #[arg(required = true)]
    recording: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overlay config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write one PNG preview per emitted plan into this directory
    #[arg(long)]
    render: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// A recorded detection stream.
#[derive(Deserialize)]
struct Recording {
    frames: Vec<RecordedFrame>,
}

#[derive(Deserialize)]
struct RecordedFrame {
    timestamp_ms: u64,
    width: f32,
    height: f32,
    #[serde(default)]
    observations: Vec<FaceObservation>,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    recording: String,
    frames_total: usize,
    frames_processed: usize,
    frames_dropped: usize,
    frames: Vec<FrameOutput>,
}

#[derive(Serialize)]
struct FrameOutput {
    timestamp_ms: u64,
    faces_detected: usize,
    viewport: Size,
    /// Smoothed box mapped back to normalized, bottom-left origin space.
    normalized_box: Option<Rect>,
    plan: DrawPlan,
}

impl FrameOutput {
    fn new(timestamp_ms: u64, faces_detected: usize, viewport: Size, plan: DrawPlan) -> Self {
        let normalized_box = plan.iter().find_map(|p| match p {
            Primitive::Rect { rect, .. } => Some(rect_from_screen(rect, viewport)),
            _ => None,
        });
        Self {
            timestamp_ms,
            faces_detected,
            viewport,
            normalized_box,
            plan,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            OverlayConfig::load(path)?
        }
        None => OverlayConfig::default(),
    };

    info!(path = %args.recording.display(), "loading recording");
    let text = std::fs::read_to_string(&args.recording)?;
    let recording: Recording = serde_json::from_str(&text)?;

    if let Some(ref dir) = args.render {
        std::fs::create_dir_all(dir)?;
    }

    let mut session = OverlaySession::new(config)?;
    let mut frames = Vec::new();

    for recorded in &recording.frames {
        let frame = DetectionFrame::new(recorded.width, recorded.height);
        let now = Duration::from_millis(recorded.timestamp_ms);

        let Some(ticket) = session.begin_frame(now, frame) else {
            continue;
        };
        let Some(plan) = session.complete(ticket, Ok(recorded.observations.clone())) else {
            continue;
        };

        if let Some(ref dir) = args.render {
            let path = dir.join(format!("frame_{:08}.png", recorded.timestamp_ms));
            raster::save_png(&plan, frame.viewport, &path)?;
        }

        frames.push(FrameOutput::new(
            recorded.timestamp_ms,
            recorded.observations.len(),
            frame.viewport,
            plan,
        ));
    }

    let output = Output {
        recording: args.recording.display().to_string(),
        frames_total: recording.frames.len(),
        frames_processed: frames.len(),
        frames_dropped: recording.frames.len() - frames.len(),
        frames,
    };
    info!(
        processed = output.frames_processed,
        dropped = output.frames_dropped,
        "replay finished"
    );

    // Generate output
    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    // Write output
    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!(path = %path.display(), "output written");
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!("Recording: {}\n", output.recording));
    s.push_str(&format!(
        "Frames: {} total, {} processed, {} dropped\n",
        output.frames_total, output.frames_processed, output.frames_dropped
    ));

    if output.frames.is_empty() {
        s.push_str("\nNo frames processed.\n");
        return s;
    }

    for frame in &output.frames {
        s.push_str(&format!("\n--- t={}ms ---\n", frame.timestamp_ms));
        if frame.plan.is_empty() {
            s.push_str("No face.\n");
            continue;
        }

        s.push_str(&format!("Faces detected: {}\n", frame.faces_detected));
        if let Some(quality) = frame.plan.quality {
            s.push_str(&format!("Quality: {:.2}\n", quality));
        }
        for primitive in frame.plan.iter() {
            if let Primitive::Rect { rect, .. } = primitive {
                s.push_str(&format!(
                    "Box: {:.0}x{:.0} at ({:.0}, {:.0})\n",
                    rect.width, rect.height, rect.x, rect.y
                ));
            }
        }
        if let Some(rect) = frame.normalized_box {
            s.push_str(&format!(
                "Normalized box: {:.3}x{:.3} at ({:.3}, {:.3})\n",
                rect.width, rect.height, rect.x, rect.y
            ));
        }
        let summaries = frame
            .plan
            .texts()
            .filter(|t| t.starts_with("Eyebrows") || t.starts_with("Yaw"));
        for text in summaries {
            s.push_str(&format!("  {}\n", text));
        }
        s.push_str(&format!("Primitives: {}\n", frame.plan.len()));
    }

    s
}
