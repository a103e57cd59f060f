//! Exponential smoothing of the face bounding box across frames.

use crate::types::Rect;

/// Default smoothing factor. Only `1 - alpha` of each new box is blended in,
/// so a higher value responds more slowly.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.7;

/// Smooths a sequence of screen-space rects.
///
/// State survives frames without a detection: when a face reappears the
/// stale box is blended with the new one. Call [`BoxSmoother::reset`] to
/// start over explicitly.
#[derive(Debug, Clone)]
pub struct BoxSmoother {
    alpha: f32,
    previous: Option<Rect>,
}

impl BoxSmoother {
    /// `alpha` is clamped to [0, 1] so the output never leaves the hull of
    /// the previous and new boxes.
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { DEFAULT_SMOOTHING_ALPHA } else { alpha };
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            previous: None,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// The most recently emitted rect.
    pub fn previous(&self) -> Option<Rect> {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Blend `new` into the running state and return the emitted rect.
    pub fn smooth(&mut self, new: Rect) -> Rect {
        let emitted = match self.previous {
            None => new,
            Some(prev) => {
                let gain = 1.0 - self.alpha;
                Rect::new(
                    blend(prev.x, new.x, gain),
                    blend(prev.y, new.y, gain),
                    blend(prev.width, new.width, gain),
                    blend(prev.height, new.height, gain),
                )
            }
        };

        self.previous = Some(emitted);
        emitted
    }
}

impl Default for BoxSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_ALPHA)
    }
}

fn blend(previous: f32, new: f32, gain: f32) -> f32 {
    previous + (new - previous) * gain
}
