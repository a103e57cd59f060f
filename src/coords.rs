//! Conversion between detection space and screen space.
//!
//! Detection space is normalized to [0,1] with the origin at the bottom-left
//! and Y pointing up. Screen space is measured in viewport units with the
//! origin at the top-left and Y pointing down.

use crate::types::{Point, Rect, Size};

/// Map a landmark point, normalized to the face's bounding box, into
/// normalized frame coordinates.
pub fn point_in_face_space(p: Point, face_box: &Rect) -> Point {
    face_box.denormalize_point(p)
}

/// Map a normalized frame point into screen space.
pub fn to_screen(p: Point, viewport: Size) -> Point {
    Point::new(p.x * viewport.width, (1.0 - p.y) * viewport.height)
}

/// Map a landmark point straight from face-box space into screen space.
pub fn landmark_to_screen(p: Point, face_box: &Rect, viewport: Size) -> Point {
    to_screen(point_in_face_space(p, face_box), viewport)
}

/// Map a normalized rect into screen space.
///
/// The flip has to account for the rect's height: the bottom-left origin of
/// the normalized rect becomes its bottom edge on screen.
pub fn rect_to_screen(r: &Rect, viewport: Size) -> Rect {
    Rect::new(
        r.x * viewport.width,
        (1.0 - r.y - r.height) * viewport.height,
        r.width * viewport.width,
        r.height * viewport.height,
    )
}

/// Inverse of [`rect_to_screen`]. A degenerate viewport maps to the zero rect.
pub fn rect_from_screen(r: &Rect, viewport: Size) -> Rect {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Rect::default();
    }

    let height = r.height / viewport.height;
    Rect::new(
        r.x / viewport.width,
        1.0 - r.y / viewport.height - height,
        r.width / viewport.width,
        height,
    )
}
