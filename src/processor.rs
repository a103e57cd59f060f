//! Per-frame orchestration: detections in, draw plan out.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OverlayConfig;
use crate::coords::{landmark_to_screen, rect_to_screen};
use crate::draw::{Alignment, Color, DrawPlan, Palette, Primitive, TextLabel};
use crate::error::Result;
use crate::quality::score_observation;
use crate::smoother::BoxSmoother;
use crate::types::{DetectionFrame, FaceObservation, LandmarkRole, Point, Rect, Size};

const STATUS_MARGIN: f32 = 8.0;
const LABEL_GAP: f32 = 4.0;

/// Which way the head is turned when its yaw is a large angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YawDirection {
    Left,
    Right,
}

impl fmt::Display for YawDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YawDirection::Left => f.write_str("left"),
            YawDirection::Right => f.write_str("right"),
        }
    }
}

/// Classify a yaw angle (radians).
///
/// Returns the turn direction only when |yaw| exceeds `threshold_degrees`.
/// A missing or non-finite yaw is never a large angle.
pub fn classify_yaw(yaw: Option<f32>, threshold_degrees: f32) -> Option<YawDirection> {
    let yaw = yaw.filter(|y| y.is_finite())?;
    if yaw.to_degrees().abs() <= threshold_degrees {
        return None;
    }
    if yaw < 0.0 {
        Some(YawDirection::Left)
    } else {
        Some(YawDirection::Right)
    }
}

/// Turns one frame's detections into a [`DrawPlan`].
///
/// Owns the smoothing state for the tracked face; a processor must only be
/// driven from a single processing path.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    config: OverlayConfig,
    smoother: BoxSmoother,
}

impl FrameProcessor {
    /// Build a processor, rejecting configs that fail validation.
    pub fn new(config: OverlayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: OverlayConfig) -> Self {
        let smoother = BoxSmoother::new(config.smoothing_alpha);
        Self { config, smoother }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn smoothed_box(&self) -> Option<Rect> {
        self.smoother.previous()
    }

    /// Forget the smoothed box so the next face starts without history.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn process(&mut self, frame: &DetectionFrame, observations: &[FaceObservation]) -> DrawPlan {
        let Some(face) = observations.first() else {
            return DrawPlan::empty();
        };

        let viewport = frame.viewport;
        let large_angle = classify_yaw(face.yaw, self.config.large_yaw_degrees);
        let palette = if large_angle.is_some() {
            self.config.large_angle_palette
        } else {
            self.config.normal_palette
        };

        let quality = score_observation(face);
        debug!(
            quality,
            confidence = face.confidence,
            large_angle = large_angle.is_some(),
            "face quality"
        );

        let mut plan = DrawPlan {
            primitives: Vec::new(),
            quality: Some(quality),
        };

        for role in [LandmarkRole::LeftEyebrow, LandmarkRole::RightEyebrow] {
            if let Some(points) = face.drawable_landmark(role) {
                let screen = to_screen_points(points, &face.bounding_box, viewport);
                self.push_eyebrow(&mut plan, &screen, palette);
            }
        }

        for role in [LandmarkRole::LeftEye, LandmarkRole::RightEye] {
            if let Some(points) = face.drawable_landmark(role) {
                for p in to_screen_points(points, &face.bounding_box, viewport) {
                    plan.push(Primitive::Circle {
                        center: p,
                        radius: self.config.eye_marker_radius,
                        color: palette.eye,
                    });
                }
            }
        }

        let smoothed = self
            .smoother
            .smooth(rect_to_screen(&face.bounding_box, viewport));
        plan.push(Primitive::Rect {
            rect: smoothed,
            color: self.config.box_color,
            width: self.config.box_line_width,
        });

        let mut eyebrow_count = 0;
        for (role, text) in [(LandmarkRole::LeftEyebrow, "L"), (LandmarkRole::RightEyebrow, "R")] {
            if let Some(points) = face.drawable_landmark(role) {
                eyebrow_count += 1;
                let anchor = landmark_to_screen(points[0], &face.bounding_box, viewport);
                let origin = Point::new(
                    anchor.x,
                    anchor.y - self.config.label_size - 2.0 * LABEL_GAP,
                );
                plan.push(self.label(origin, self.config.label_size, text, Alignment::Center));
            }
        }

        let mut status = format!("Eyebrows: {}/2", eyebrow_count);
        if let Some(direction) = large_angle {
            status.push_str(&format!(" | Large angle ({})", direction));
        }
        plan.push(self.label(
            Point::new(STATUS_MARGIN, STATUS_MARGIN),
            self.config.label_size,
            status,
            Alignment::Left,
        ));

        if face.yaw.is_some() || face.pitch.is_some() || face.roll.is_some() {
            let text = format!(
                "Yaw: {} Pitch: {} Roll: {}",
                format_angle(face.yaw),
                format_angle(face.pitch),
                format_angle(face.roll)
            );
            let origin = Point::new(smoothed.x, smoothed.y + smoothed.height + LABEL_GAP);
            plan.push(self.label(origin, self.config.label_size, text, Alignment::Left));
        }

        plan
    }

    fn push_eyebrow(&self, plan: &mut DrawPlan, points: &[Point], palette: Palette) {
        if points.len() >= 2 {
            plan.push(Primitive::Polyline {
                points: points.to_vec(),
                color: palette.eyebrow,
                width: self.config.eyebrow_line_width,
            });
        }

        let radius = self.config.eyebrow_marker_radius;
        for (i, p) in points.iter().enumerate() {
            plan.push(Primitive::Circle {
                center: *p,
                radius,
                color: palette.eyebrow,
            });
            let origin = Point::new(
                p.x + radius + 1.0,
                p.y - radius - self.config.index_label_size,
            );
            plan.push(self.label(
                origin,
                self.config.index_label_size,
                i.to_string(),
                Alignment::Left,
            ));
        }
    }

    fn label(
        &self,
        origin: Point,
        size: f32,
        text: impl Into<String>,
        alignment: Alignment,
    ) -> Primitive {
        Primitive::Text(TextLabel {
            origin,
            size,
            text: text.into(),
            foreground: Color::WHITE,
            background: Color::TRANSLUCENT_BLACK,
            alignment,
        })
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::with_valid_config(OverlayConfig::default())
    }
}

fn to_screen_points(points: &[Point], face_box: &Rect, viewport: Size) -> Vec<Point> {
    points
        .iter()
        .map(|p| landmark_to_screen(*p, face_box, viewport))
        .collect()
}

fn format_angle(angle: Option<f32>) -> String {
    match angle {
        Some(rad) => format!("{:.1}°", rad.to_degrees()),
        None => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmarks;

    fn frame() -> DetectionFrame {
        DetectionFrame::new(400.0, 800.0)
    }

    fn brow(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point::new(0.2 + 0.15 * i as f32, 0.7))
            .collect()
    }

    fn face() -> FaceObservation {
        FaceObservation::new(0.9, Rect::new(0.25, 0.25, 0.5, 0.5))
    }

    fn circles(plan: &DrawPlan) -> Vec<(f32, Color)> {
        plan.iter()
            .filter_map(|p| match p {
                Primitive::Circle { radius, color, .. } => Some((*radius, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn yaw_classification() {
        assert_eq!(
            classify_yaw(Some(40f32.to_radians()), 35.0),
            Some(YawDirection::Right)
        );
        assert_eq!(
            classify_yaw(Some(-40f32.to_radians()), 35.0),
            Some(YawDirection::Left)
        );
        assert_eq!(classify_yaw(Some(20f32.to_radians()), 35.0), None);
        assert_eq!(classify_yaw(None, 35.0), None);
    }

    /// The radian value whose conversion lands exactly on `degrees`.
    fn exact_radians(degrees: f32) -> f32 {
        let start = degrees.to_radians().to_bits();
        (start - 64..start + 64)
            .map(f32::from_bits)
            .find(|r| r.to_degrees() == degrees)
            .expect("an f32 converting exactly to the threshold")
    }

    #[test]
    fn yaw_at_threshold_is_not_large() {
        let at = exact_radians(35.0);
        assert_eq!(classify_yaw(Some(at), 35.0), None);
        assert_eq!(classify_yaw(Some(-at), 35.0), None);

        let above = (at.to_bits()..at.to_bits() + 64)
            .map(f32::from_bits)
            .find(|r| r.to_degrees() > 35.0)
            .unwrap();
        assert_eq!(classify_yaw(Some(above), 35.0), Some(YawDirection::Right));
    }

    #[test]
    fn non_finite_yaw_is_not_large() {
        assert_eq!(classify_yaw(Some(f32::NAN), 35.0), None);
        assert_eq!(classify_yaw(Some(f32::INFINITY), 35.0), None);
        assert_eq!(classify_yaw(Some(f32::NEG_INFINITY), 35.0), None);

        let mut processor = FrameProcessor::default();
        let plan = processor.process(&frame(), &[face().with_pose(Some(f32::NAN), None, None)]);
        assert!(plan.texts().any(|t| t == "Eyebrows: 0/2"));
        assert!(!plan.texts().any(|t| t.contains("Large angle")));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = OverlayConfig {
            smoothing_alpha: 1.5,
            ..OverlayConfig::default()
        };
        assert!(matches!(
            FrameProcessor::new(config),
            Err(crate::Error::InvalidConfig(_))
        ));
        assert!(FrameProcessor::new(OverlayConfig::default()).is_ok());
    }

    #[test]
    fn no_observations_yield_empty_plan() {
        let mut processor = FrameProcessor::default();
        let plan = processor.process(&frame(), &[]);
        assert!(plan.is_empty());
        assert_eq!(plan.quality, None);
    }

    #[test]
    fn empty_frame_keeps_smoothing_state() {
        let mut processor = FrameProcessor::default();
        processor.process(&frame(), &[face()]);
        let before = processor.smoothed_box();
        processor.process(&frame(), &[]);
        assert_eq!(processor.smoothed_box(), before);
        processor.reset();
        assert_eq!(processor.smoothed_box(), None);
    }

    #[test]
    fn bare_face_draws_box_and_status_only() {
        let mut processor = FrameProcessor::default();
        let plan = processor.process(&frame(), &[face()]);

        assert_eq!(plan.len(), 2);
        match &plan.primitives[0] {
            Primitive::Rect { rect, .. } => {
                assert!((rect.x - 100.0).abs() < 1e-3);
                assert!((rect.y - 200.0).abs() < 1e-3);
                assert!((rect.width - 200.0).abs() < 1e-3);
                assert!((rect.height - 400.0).abs() < 1e-3);
            }
            other => panic!("expected rect, got {:?}", other),
        }
        assert_eq!(plan.texts().collect::<Vec<_>>(), vec!["Eyebrows: 0/2"]);
    }

    #[test]
    fn only_first_observation_is_used() {
        let mut processor = FrameProcessor::default();
        let second = FaceObservation::new(0.9, Rect::new(0.0, 0.0, 0.1, 0.1)).with_landmarks(
            Landmarks {
                left_eyebrow: Some(brow(3)),
                ..Default::default()
            },
        );
        let plan = processor.process(&frame(), &[face(), second]);
        assert!(circles(&plan).is_empty());
    }

    #[test]
    fn eyebrow_primitives_in_order() {
        let mut processor = FrameProcessor::default();
        let obs = face().with_landmarks(Landmarks {
            left_eyebrow: Some(brow(3)),
            ..Default::default()
        });
        let plan = processor.process(&frame(), &[obs]);

        assert!(matches!(plan.primitives[0], Primitive::Polyline { .. }));
        assert!(matches!(plan.primitives[1], Primitive::Circle { .. }));
        assert!(matches!(plan.primitives[2], Primitive::Text(_)));

        let texts: Vec<_> = plan.texts().collect();
        assert_eq!(texts, vec!["0", "1", "2", "L", "Eyebrows: 1/2"]);

        // First eyebrow point (0.2, 0.7) in a (0.25, 0.25, 0.5, 0.5) box.
        match &plan.primitives[1] {
            Primitive::Circle { center, .. } => {
                assert!((center.x - 140.0).abs() < 1e-3);
                assert!((center.y - 320.0).abs() < 1e-3);
            }
            other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn single_point_eyebrow_has_no_polyline() {
        let mut processor = FrameProcessor::default();
        let obs = face().with_landmarks(Landmarks {
            right_eyebrow: Some(brow(1)),
            ..Default::default()
        });
        let plan = processor.process(&frame(), &[obs]);
        assert!(!plan.iter().any(|p| matches!(p, Primitive::Polyline { .. })));
        assert_eq!(circles(&plan).len(), 1);
        assert!(plan.texts().any(|t| t == "R"));
    }

    #[test]
    fn empty_groups_emit_nothing() {
        let mut processor = FrameProcessor::default();
        let obs = face().with_landmarks(Landmarks {
            left_eyebrow: Some(Vec::new()),
            left_eye: Some(Vec::new()),
            ..Default::default()
        });
        let plan = processor.process(&frame(), &[obs]);
        assert!(circles(&plan).is_empty());
        assert!(!plan.texts().any(|t| t == "L"));
    }

    #[test]
    fn eyes_use_small_dim_markers() {
        let mut processor = FrameProcessor::default();
        let obs = face().with_landmarks(Landmarks {
            left_eye: Some(brow(2)),
            right_eye: Some(brow(2)),
            ..Default::default()
        });
        let plan = processor.process(&frame(), &[obs]);
        let markers = circles(&plan);
        assert_eq!(markers.len(), 4);
        assert!(markers
            .iter()
            .all(|(radius, color)| *radius == 2.0 && *color == Palette::NORMAL.eye));
    }

    #[test]
    fn large_angle_switches_palette_and_status() {
        let mut processor = FrameProcessor::default();
        let obs = face()
            .with_landmarks(Landmarks {
                left_eyebrow: Some(brow(2)),
                right_eye: Some(brow(1)),
                ..Default::default()
            })
            .with_pose(Some(-40f32.to_radians()), None, None);
        let plan = processor.process(&frame(), &[obs]);

        let markers = circles(&plan);
        assert_eq!(markers[0].1, Palette::LARGE_ANGLE.eyebrow);
        assert_eq!(markers[2].1, Palette::LARGE_ANGLE.eye);
        assert!(plan
            .texts()
            .any(|t| t == "Eyebrows: 1/2 | Large angle (left)"));
        assert!(plan.texts().any(|t| t == "Yaw: -40.0° Pitch: -- Roll: --"));
    }

    #[test]
    fn quality_is_reported_on_plan() {
        let mut processor = FrameProcessor::default();
        let plan = processor.process(&frame(), &[face()]);
        // 0.9 confidence + 0.2 for a 0.25 area box, clamped.
        assert_eq!(plan.quality, Some(1.0));
    }

    #[test]
    fn box_is_smoothed_across_frames() {
        let mut processor = FrameProcessor::default();
        processor.process(&frame(), &[face()]);
        let moved = FaceObservation::new(0.9, Rect::new(0.5, 0.25, 0.5, 0.5));
        let plan = processor.process(&frame(), &[moved]);
        match &plan.primitives[0] {
            // 100 + (200 - 100) * 0.3
            Primitive::Rect { rect, .. } => assert!((rect.x - 130.0).abs() < 1e-3),
            other => panic!("expected rect, got {:?}", other),
        }
    }
}
