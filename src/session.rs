//! Frame admission and session lifetime.
//!
//! A session owns the [`FrameProcessor`] and decides which frames reach the
//! detector at all. Frames closer together than the configured interval are
//! dropped, never queued. Results that arrive after the session was closed
//! are discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::draw::DrawPlan;
use crate::error::{DetectError, Result};
use crate::processor::FrameProcessor;
use crate::types::{DetectionFrame, FaceObservation};

/// The external face-landmark detector.
pub trait LandmarkDetector {
    /// Detect faces in a frame. An empty list means no face was found.
    fn detect(&mut self, frame: &DetectionFrame)
        -> std::result::Result<Vec<FaceObservation>, DetectError>;
}

impl<F> LandmarkDetector for F
where
    F: FnMut(&DetectionFrame) -> std::result::Result<Vec<FaceObservation>, DetectError>,
{
    fn detect(
        &mut self,
        frame: &DetectionFrame,
    ) -> std::result::Result<Vec<FaceObservation>, DetectError> {
        self(frame)
    }
}

/// Admits frames no more often than a fixed minimum interval.
///
/// Timestamps are offsets on any monotonic clock chosen by the caller.
#[derive(Debug, Clone)]
pub struct FrameGate {
    min_interval: Duration,
    last_accepted: Option<Duration>,
}

impl FrameGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns true and records `now` if the frame may be processed.
    pub fn try_accept(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_sub(last) < self.min_interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Permission to process one admitted frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTicket {
    epoch: u64,
    sequence: u64,
    frame: DetectionFrame,
}

impl FrameTicket {
    pub fn frame(&self) -> &DetectionFrame {
        &self.frame
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Default)]
struct SessionState {
    closed: AtomicBool,
    epoch: AtomicU64,
}

/// Cloneable, thread-safe handle used to end a session from outside the
/// processing path, e.g. when the overlay view is torn down.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<SessionState>,
}

impl SessionHandle {
    pub fn close(&self) {
        if !self.state.closed.swap(true, Ordering::SeqCst) {
            info!("overlay session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

/// One overlay session: frame gate, processor and lifetime.
#[derive(Debug)]
pub struct OverlaySession {
    gate: FrameGate,
    processor: FrameProcessor,
    state: Arc<SessionState>,
    next_sequence: u64,
}

impl OverlaySession {
    /// Start a session. Fails if the config does not validate.
    pub fn new(config: OverlayConfig) -> Result<Self> {
        let gate = FrameGate::new(config.min_frame_interval());
        let min_interval_ms = config.min_frame_interval_ms;
        let smoothing_alpha = config.smoothing_alpha;
        let processor = FrameProcessor::new(config)?;
        info!(min_interval_ms, smoothing_alpha, "overlay session started");
        Ok(Self {
            gate,
            processor,
            state: Arc::new(SessionState::default()),
            next_sequence: 0,
        })
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }

    /// Drop smoothing history and invalidate every outstanding ticket.
    pub fn reacquire(&mut self) {
        self.state.epoch.fetch_add(1, Ordering::SeqCst);
        self.processor.reset();
    }

    /// Ask to process a frame arriving at `now`.
    ///
    /// Returns `None` when the session is closed or the frame arrives too
    /// soon after the previous accepted one.
    pub fn begin_frame(&mut self, now: Duration, frame: DetectionFrame) -> Option<FrameTicket> {
        if self.is_closed() {
            return None;
        }
        if !self.gate.try_accept(now) {
            debug!(now_ms = now.as_millis() as u64, "frame dropped by gate");
            return None;
        }

        let ticket = FrameTicket {
            epoch: self.state.epoch.load(Ordering::SeqCst),
            sequence: self.next_sequence,
            frame,
        };
        self.next_sequence += 1;
        Some(ticket)
    }

    /// Turn a detector result into a plan.
    ///
    /// Returns `None` if the session was closed, or the ticket outlived a
    /// reacquisition, while detection was in flight.
    pub fn complete(
        &mut self,
        ticket: FrameTicket,
        result: std::result::Result<Vec<FaceObservation>, DetectError>,
    ) -> Option<DrawPlan> {
        if self.is_closed() || ticket.epoch != self.state.epoch.load(Ordering::SeqCst) {
            debug!(sequence = ticket.sequence, "discarding stale detection result");
            return None;
        }

        let observations = match result {
            Ok(observations) => observations,
            Err(e) => {
                warn!(sequence = ticket.sequence, error = %e, "detection failed, treating as no face");
                Vec::new()
            }
        };

        Some(self.processor.process(&ticket.frame, &observations))
    }

    /// Gate, detect and process one frame synchronously.
    pub fn run_frame<D: LandmarkDetector + ?Sized>(
        &mut self,
        detector: &mut D,
        now: Duration,
        frame: DetectionFrame,
    ) -> Option<DrawPlan> {
        let ticket = self.begin_frame(now, frame)?;
        let result = detector.detect(ticket.frame());
        self.complete(ticket, result)
    }
}
