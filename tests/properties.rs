use proptest::prelude::*;

use brow_overlay::{
    classify_yaw, evaluate, rect_from_screen, rect_to_screen, BoxSmoother, QualityInputs, Rect,
    Size,
};

fn normalized_rect() -> impl Strategy<Value = Rect> {
    (0.0f32..1.0, 0.0f32..1.0, 0.01f32..1.0, 0.01f32..1.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn viewport() -> impl Strategy<Value = Size> {
    (1.0f32..4000.0, 1.0f32..4000.0).prop_map(|(w, h)| Size::new(w, h))
}

fn screen_rect() -> impl Strategy<Value = Rect> {
    (-500.0f32..2000.0, -500.0f32..2000.0, 0.0f32..1000.0, 0.0f32..1000.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn angle() -> impl Strategy<Value = Option<f32>> {
    prop::option::of(-3.2f32..3.2)
}

proptest! {
    #[test]
    fn pt_rect_flip_compensates_height(r in normalized_rect(), v in viewport()) {
        let s = rect_to_screen(&r, v);
        let expected = (1.0 - r.y) * v.height;
        prop_assert!((s.y + s.height - expected).abs() <= 1e-3 * v.height.max(1.0));

        let back = rect_from_screen(&s, v);
        prop_assert!((back.x - r.x).abs() < 1e-4);
        prop_assert!((back.y - r.y).abs() < 1e-4);
        prop_assert!((back.width - r.width).abs() < 1e-4);
        prop_assert!((back.height - r.height).abs() < 1e-4);
    }

    #[test]
    fn pt_smoother_idempotent_on_stationary_input(start in screen_rect(), r in screen_rect()) {
        let mut smoother = BoxSmoother::default();
        smoother.smooth(start);
        let settled = smoother.smooth(r);
        prop_assert_eq!(smoother.smooth(settled), settled);

        let mut fresh = BoxSmoother::default();
        fresh.smooth(r);
        prop_assert_eq!(fresh.smooth(r), r);
    }

    #[test]
    fn pt_smoother_stays_in_hull(prev in screen_rect(), new in screen_rect()) {
        let mut smoother = BoxSmoother::default();
        smoother.smooth(prev);
        let out = smoother.smooth(new);

        let within = |p: f32, n: f32, o: f32| o >= p.min(n) - 1e-3 && o <= p.max(n) + 1e-3;
        prop_assert!(within(prev.x, new.x, out.x));
        prop_assert!(within(prev.y, new.y, out.y));
        prop_assert!(within(prev.width, new.width, out.width));
        prop_assert!(within(prev.height, new.height, out.height));
    }

    #[test]
    fn pt_smoother_converges(start in screen_rect(), target in screen_rect()) {
        let distance = |r: Rect| {
            (r.x - target.x).abs()
                + (r.y - target.y).abs()
                + (r.width - target.width).abs()
                + (r.height - target.height).abs()
        };

        let mut smoother = BoxSmoother::default();
        let mut last = distance(smoother.smooth(start));
        for _ in 0..8 {
            let d = distance(smoother.smooth(target));
            prop_assert!(d <= last);
            if last > 1.0 {
                prop_assert!(d < last);
            }
            last = d;
        }
    }

    #[test]
    fn pt_quality_bounded(
        confidence in 0.0f32..=1.0,
        flags in prop::array::uniform5(any::<bool>()),
        box_area in 0.0f32..=1.0,
        roll in angle(),
        pitch in angle(),
        yaw in angle(),
    ) {
        let score = evaluate(&QualityInputs {
            confidence,
            has_left_eyebrow: flags[0],
            has_right_eyebrow: flags[1],
            has_left_eye: flags[2],
            has_right_eye: flags[3],
            has_nose: flags[4],
            box_area,
            roll,
            pitch,
            yaw,
        });
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert!(score >= confidence.min(1.0) - 1e-6);
    }

    #[test]
    fn pt_large_angle_is_symmetric(yaw_degrees in -90.0f32..90.0) {
        let right = classify_yaw(Some(yaw_degrees.abs().to_radians()), 35.0);
        let left = classify_yaw(Some(-yaw_degrees.abs().to_radians()), 35.0);
        prop_assert_eq!(right.is_some(), left.is_some());
        prop_assert_eq!(right.is_some(), yaw_degrees.abs().to_radians().to_degrees() > 35.0);
    }
}
