use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Width and height of a viewport in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle defined by its origin corner, width, and height.
///
/// The same type is used in both coordinate spaces: in detection space the
/// origin is the bottom-left corner, in screen space it is the top-left one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Convert a point from normalized coordinates [0,1] relative to this
    /// rect into the rect's enclosing coordinate space.
    pub fn denormalize_point(&self, p: Point) -> Point {
        Point::new(self.x + p.x * self.width, self.y + p.y * self.height)
    }

    /// Convert a point into normalized [0,1] coordinates relative to this rect.
    pub fn normalize_point(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.width, (p.y - self.y) / self.height)
    }
}

/// Orientation tag attached to every frame handed to the detector.
///
/// The front camera delivers frames already mirrored at capture, so the only
/// orientation the overlay ever sees is mirrored upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    UpMirrored,
}

/// One video frame as seen by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    pub viewport: Size,
    #[serde(default)]
    pub orientation: Orientation,
}

impl DetectionFrame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Size::new(width, height),
            orientation: Orientation::UpMirrored,
        }
    }
}

/// Named facial feature regions reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkRole {
    LeftEyebrow,
    RightEyebrow,
    LeftEye,
    RightEye,
    Nose,
}

/// Landmark point groups of one face.
///
/// Points are normalized relative to the face's own bounding box. Every group
/// is independently optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Landmarks {
    pub left_eyebrow: Option<Vec<Point>>,
    pub right_eyebrow: Option<Vec<Point>>,
    pub left_eye: Option<Vec<Point>>,
    pub right_eye: Option<Vec<Point>>,
    pub nose: Option<Vec<Point>>,
}

impl Landmarks {
    pub fn group(&self, role: LandmarkRole) -> Option<&[Point]> {
        let group = match role {
            LandmarkRole::LeftEyebrow => &self.left_eyebrow,
            LandmarkRole::RightEyebrow => &self.right_eyebrow,
            LandmarkRole::LeftEye => &self.left_eye,
            LandmarkRole::RightEye => &self.right_eye,
            LandmarkRole::Nose => &self.nose,
        };
        group.as_deref()
    }

    pub fn has(&self, role: LandmarkRole) -> bool {
        self.group(role).is_some()
    }

    /// The group's points, only if the group exists and is non-empty.
    pub fn drawable(&self, role: LandmarkRole) -> Option<&[Point]> {
        self.group(role).filter(|points| !points.is_empty())
    }
}

/// A single face reported by the detector for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    pub confidence: f32,
    /// Normalized rect, bottom-left origin.
    pub bounding_box: Rect,
    #[serde(default)]
    pub landmarks: Option<Landmarks>,
    /// Head pose angles in radians.
    #[serde(default)]
    pub yaw: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
    #[serde(default)]
    pub roll: Option<f32>,
}

impl FaceObservation {
    pub fn new(confidence: f32, bounding_box: Rect) -> Self {
        Self {
            confidence,
            bounding_box,
            landmarks: None,
            yaw: None,
            pitch: None,
            roll: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: Landmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    pub fn with_pose(mut self, yaw: Option<f32>, pitch: Option<f32>, roll: Option<f32>) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self.roll = roll;
        self
    }

    pub fn has_landmark(&self, role: LandmarkRole) -> bool {
        self.landmarks.as_ref().is_some_and(|l| l.has(role))
    }

    pub fn drawable_landmark(&self, role: LandmarkRole) -> Option<&[Point]> {
        self.landmarks.as_ref().and_then(|l| l.drawable(role))
    }
}
