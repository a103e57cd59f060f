//! # brow-overlay
//!
//! Geometry and scoring core of a live eyebrow/eye landmark overlay.
//!
//! This crate provides:
//! - **Coordinate mapping**: normalized, bottom-left-origin detection space to
//!   top-left-origin screen space
//! - **Box smoothing**: exponential smoothing of the face box across frames
//! - **Quality scoring**: a bounded [0,1] heuristic from landmark completeness,
//!   face size and head pose
//! - **Frame processing**: one frame's detections in, an ordered [`DrawPlan`]
//!   of drawable primitives out
//! - **Sessions**: minimum-interval frame admission, a detector seam and a
//!   worker thread that discards results once the overlay is gone
//!
//! The face-landmark detector and the renderer are external collaborators:
//! implement [`LandmarkDetector`] for the former and consume [`DrawPlan`]s in
//! the latter.
//!
//! ## Quick Start
//!
//! ```rust
//! use brow_overlay::{
//!     DetectionFrame, FaceObservation, FrameProcessor, Landmarks, Point, Rect,
//! };
//!
//! let mut processor = FrameProcessor::default();
//! let frame = DetectionFrame::new(390.0, 844.0);
//!
//! let face = FaceObservation::new(0.92, Rect::new(0.2, 0.3, 0.6, 0.4))
//!     .with_landmarks(Landmarks {
//!         left_eyebrow: Some(vec![Point::new(0.2, 0.8), Point::new(0.4, 0.85)]),
//!         ..Default::default()
//!     })
//!     .with_pose(Some(0.1), Some(0.0), Some(0.0));
//!
//! let plan = processor.process(&frame, &[face]);
//! assert!(!plan.is_empty());
//! assert!(plan.quality.unwrap() <= 1.0);
//!
//! // No face in the next frame: nothing to draw.
//! assert!(processor.process(&frame, &[]).is_empty());
//! ```

pub mod config;
pub mod coords;
pub mod draw;
mod error;
pub mod pipeline;
pub mod processor;
pub mod quality;
pub mod raster;
pub mod session;
pub mod smoother;
mod types;

pub use config::OverlayConfig;
pub use coords::{landmark_to_screen, point_in_face_space, rect_from_screen, rect_to_screen, to_screen};
pub use draw::{Alignment, Color, DrawPlan, Palette, Primitive, TextLabel};
pub use error::{DetectError, Error, Result};
pub use pipeline::OverlayWorker;
pub use processor::{classify_yaw, FrameProcessor, YawDirection};
pub use quality::{evaluate, score_observation, QualityInputs};
pub use session::{FrameGate, FrameTicket, LandmarkDetector, OverlaySession, SessionHandle};
pub use smoother::BoxSmoother;
pub use types::{
    DetectionFrame, FaceObservation, LandmarkRole, Landmarks, Orientation, Point, Rect, Size,
};
