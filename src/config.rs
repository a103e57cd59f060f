//! Overlay tunables.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::draw::{Color, Palette};
use crate::error::{Error, Result};
use crate::smoother::DEFAULT_SMOOTHING_ALPHA;

/// Frames closer together than this are never both processed.
pub const MIN_FRAME_INTERVAL_MS: u64 = 50;

/// Settings for the frame processor and session.
///
/// Every field has a default, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Weight of the previous box when smoothing, in [0, 1).
    pub smoothing_alpha: f32,
    /// Yaw magnitude, in degrees, above which the pose is a large angle.
    pub large_yaw_degrees: f32,
    /// Minimum spacing between accepted frames.
    pub min_frame_interval_ms: u64,
    pub eyebrow_marker_radius: f32,
    pub eye_marker_radius: f32,
    pub eyebrow_line_width: f32,
    pub box_line_width: f32,
    pub box_color: Color,
    pub index_label_size: f32,
    pub label_size: f32,
    pub normal_palette: Palette,
    pub large_angle_palette: Palette,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            large_yaw_degrees: 35.0,
            min_frame_interval_ms: MIN_FRAME_INTERVAL_MS,
            eyebrow_marker_radius: 4.0,
            eye_marker_radius: 2.0,
            eyebrow_line_width: 2.0,
            box_line_width: 2.0,
            box_color: Color::rgb(255, 255, 0),
            index_label_size: 10.0,
            label_size: 14.0,
            normal_palette: Palette::NORMAL,
            large_angle_palette: Palette::LARGE_ANGLE,
        }
    }
}

impl OverlayConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.smoothing_alpha) {
            return Err(Error::InvalidConfig(format!(
                "smoothing_alpha must be in [0, 1), got {}",
                self.smoothing_alpha
            )));
        }
        if !self.large_yaw_degrees.is_finite() || self.large_yaw_degrees <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "large_yaw_degrees must be positive, got {}",
                self.large_yaw_degrees
            )));
        }
        if self.min_frame_interval_ms < MIN_FRAME_INTERVAL_MS {
            return Err(Error::InvalidConfig(format!(
                "min_frame_interval_ms must be at least {}, got {}",
                MIN_FRAME_INTERVAL_MS, self.min_frame_interval_ms
            )));
        }
        let sizes = [
            ("eyebrow_marker_radius", self.eyebrow_marker_radius),
            ("eye_marker_radius", self.eye_marker_radius),
            ("eyebrow_line_width", self.eyebrow_line_width),
            ("box_line_width", self.box_line_width),
            ("index_label_size", self.index_label_size),
            ("label_size", self.label_size),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn min_frame_interval(&self) -> Duration {
        Duration::from_millis(self.min_frame_interval_ms)
    }
}
