//! Detection worker thread.
//!
//! Frames are handed to a dedicated thread over a single-slot channel. The
//! worker counts as busy from the moment a frame is accepted until its
//! detection has finished, and any frame submitted while busy is dropped.
//! Plans come back on a single-slot channel that always holds the newest
//! plan; an unread older plan is replaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, error, info};

use crate::config::OverlayConfig;
use crate::draw::DrawPlan;
use crate::error::Result;
use crate::session::{LandmarkDetector, OverlaySession, SessionHandle};
use crate::types::DetectionFrame;

struct TimedFrame {
    at: Duration,
    frame: DetectionFrame,
}

pub struct OverlayWorker {
    frames: Option<Sender<TimedFrame>>,
    plans: Receiver<DrawPlan>,
    session: SessionHandle,
    busy: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    started: Instant,
}

impl OverlayWorker {
    /// Start the detection thread with its own session.
    pub fn spawn<D>(mut detector: D, config: OverlayConfig) -> Result<Self>
    where
        D: LandmarkDetector + Send + 'static,
    {
        let (frame_tx, frame_rx) = bounded::<TimedFrame>(1);
        let (plan_tx, plan_rx) = bounded::<DrawPlan>(1);
        let stale_plans = plan_rx.clone();

        let mut session = OverlaySession::new(config)?;
        let handle = session.handle();
        let busy = Arc::new(AtomicBool::new(false));
        let worker_busy = Arc::clone(&busy);

        let thread = thread::Builder::new()
            .name("overlay-detect".to_string())
            .spawn(move || {
                for TimedFrame { at, frame } in frame_rx.iter() {
                    if let Some(ticket) = session.begin_frame(at, frame) {
                        let result = detector.detect(ticket.frame());
                        if let Some(plan) = session.complete(ticket, result) {
                            publish_latest(&plan_tx, &stale_plans, plan);
                        }
                    }
                    worker_busy.store(false, Ordering::Release);
                    if session.is_closed() {
                        break;
                    }
                }
                debug!("overlay worker exiting");
            })?;

        info!("overlay worker started");
        Ok(Self {
            frames: Some(frame_tx),
            plans: plan_rx,
            session: handle,
            busy,
            thread: Some(thread),
            started: Instant::now(),
        })
    }

    /// Submit a frame stamped with the time since the worker started.
    pub fn submit(&self, frame: DetectionFrame) -> bool {
        self.submit_at(self.started.elapsed(), frame)
    }

    /// Submit a frame with an explicit timestamp. Returns false if it was
    /// dropped because a frame is queued or being detected, or the worker
    /// has stopped.
    pub fn submit_at(&self, at: Duration, frame: DetectionFrame) -> bool {
        let Some(frames) = &self.frames else {
            return false;
        };
        if self.session.is_closed() {
            return false;
        }
        if self.busy.swap(true, Ordering::AcqRel) {
            debug!("detection busy, frame dropped");
            return false;
        }
        match frames.try_send(TimedFrame { at, frame }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.busy.store(false, Ordering::Release);
                false
            }
        }
    }

    /// True while a submitted frame has not finished detection.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The newest unread plan. Holds at most one.
    pub fn plans(&self) -> &Receiver<DrawPlan> {
        &self.plans
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Close the session and wait for the thread. Any detection still in
    /// flight is discarded.
    pub fn shutdown(&mut self) {
        self.session.close();
        self.frames.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("overlay worker panicked");
            }
        }
    }
}

/// Send `plan`, evicting an unread older plan if the slot is taken.
fn publish_latest(plans: &Sender<DrawPlan>, stale: &Receiver<DrawPlan>, mut plan: DrawPlan) {
    loop {
        match plans.try_send(plan) {
            Ok(()) => return,
            Err(TrySendError::Full(rejected)) => {
                if stale.try_recv().is_ok() {
                    debug!("replaced unread plan");
                }
                plan = rejected;
            }
            Err(TrySendError::Disconnected(_)) => return,
        }
    }
}

impl Drop for OverlayWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
