#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Point / Size
// =============================================================

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn size_is_positive() {
    assert!(Size::new(1.0, 1.0).is_positive());
    assert!(!Size::new(0.0, 1.0).is_positive());
    assert!(!Size::new(1.0, -2.0).is_positive());
    assert!(!Size::new(f64::NAN, 1.0).is_positive());
}

// =============================================================
// fit_contain
// =============================================================

#[test]
fn fit_contain_same_aspect_fills_box() {
    let fit = fit_contain(Size::new(400.0, 300.0), Size::new(800.0, 600.0));
    assert_eq!(fit.scale, 2.0);
    assert_eq!(fit.offset_x, 0.0);
    assert_eq!(fit.offset_y, 0.0);
}

#[test]
fn fit_contain_wide_image_letterboxes_vertically() {
    let fit = fit_contain(Size::new(200.0, 50.0), Size::new(100.0, 100.0));
    assert_eq!(fit.scale, 0.5);
    assert_eq!(fit.offset_x, 0.0);
    assert!(approx_eq(fit.offset_y, 37.5));
}

#[test]
fn fit_contain_tall_image_pillarboxes() {
    let fit = fit_contain(Size::new(50.0, 200.0), Size::new(100.0, 100.0));
    assert_eq!(fit.scale, 0.5);
    assert!(approx_eq(fit.offset_x, 37.5));
    assert_eq!(fit.offset_y, 0.0);
}

#[test]
fn fit_contain_degenerate_image_is_identity() {
    assert_eq!(fit_contain(Size::new(0.0, 10.0), Size::new(100.0, 100.0)), Fit::default());
}

#[test]
fn fit_corners_clockwise_from_top_left() {
    let fit = fit_contain(Size::new(200.0, 50.0), Size::new(100.0, 100.0));
    let c = fit.corners(Size::new(200.0, 50.0));
    assert!(point_approx_eq(c[0], Point::new(0.0, 37.5)));
    assert!(point_approx_eq(c[1], Point::new(100.0, 37.5)));
    assert!(point_approx_eq(c[2], Point::new(100.0, 62.5)));
    assert!(point_approx_eq(c[3], Point::new(0.0, 62.5)));
}

// =============================================================
// Normalized <-> pixels
// =============================================================

#[test]
fn to_canvas_pixels_scales_each_axis() {
    let p = to_canvas_pixels(Point::new(0.25, 0.5), Size::new(800.0, 600.0));
    assert_eq!(p, Point::new(200.0, 300.0));
}

#[test]
fn normalized_round_trip_is_lossless() {
    let sizes = [Size::new(800.0, 600.0), Size::new(1.0, 1.0), Size::new(1337.0, 17.3), Size::new(0.5, 3000.0)];
    let points = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.333_333, 0.777_777),
        Point::new(0.1, 0.9),
    ];
    for size in sizes {
        for p in points {
            let back = to_normalized(to_canvas_pixels(p, size), size);
            assert!(point_approx_eq(back, p), "{p:?} via {size:?} came back as {back:?}");
        }
    }
}

// =============================================================
// uniform_rescale
// =============================================================

#[test]
fn uniform_rescale_uses_smaller_ratio() {
    let v = uniform_rescale(10.0, Size::new(800.0, 600.0), Size::new(400.0, 600.0));
    assert_eq!(v, 5.0);
}

#[test]
fn uniform_rescale_identity_when_extents_match() {
    let s = Size::new(640.0, 480.0);
    assert_eq!(uniform_rescale(42.0, s, s), 42.0);
}

#[test]
fn uniform_rescale_degenerate_source_returns_value() {
    assert_eq!(uniform_rescale(3.0, Size::new(0.0, 0.0), Size::new(100.0, 100.0)), 3.0);
}

// =============================================================
// ViewTransform
// =============================================================

#[test]
fn view_transform_round_trips_points() {
    let t = ViewTransform { scale: 0.5, offset_x: 10.0, offset_y: 20.0 };
    let logical = Point::new(40.0, 60.0);
    let pixel = t.to_pixels(logical);
    assert_eq!(pixel, Point::new(30.0, 50.0));
    assert!(point_approx_eq(t.to_logical(pixel), logical));
}

#[test]
fn view_transform_rect_to_pixels_leaves_input_alone() {
    let t = ViewTransform { scale: 2.0, offset_x: 5.0, offset_y: 0.0 };
    let r = Rect::new(10.0, 10.0, 20.0, -4.0);
    let px = t.rect_to_pixels(&r);
    assert_eq!(px, Rect::new(25.0, 20.0, 40.0, -8.0));
    assert_eq!(r, Rect::new(10.0, 10.0, 20.0, -4.0));
}

#[test]
fn view_transform_for_client_combines_rescale_and_letterbox() {
    let fit = Fit { scale: 1.0, offset_x: 0.0, offset_y: 12.0 };
    let t = ViewTransform::for_client(Size::new(800.0, 600.0), Size::new(400.0, 400.0), &fit);
    assert_eq!(t.scale, 0.5);
    assert_eq!(t.offset_y, 12.0);
    assert_eq!(t.pixel_dist_to_logical(6.0), 12.0);
}
