use super::*;

fn r(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, w, h)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Corner positions
// =============================================================

#[test]
fn corner_positions_read_rect_literally() {
    let rect = r(10.0, 20.0, 30.0, 40.0);
    assert_eq!(Corner::Tl.position(&rect), pt(10.0, 20.0));
    assert_eq!(Corner::Tr.position(&rect), pt(40.0, 20.0));
    assert_eq!(Corner::Bl.position(&rect), pt(10.0, 60.0));
    assert_eq!(Corner::Br.position(&rect), pt(40.0, 60.0));
}

#[test]
fn corner_positions_of_flipped_rect_swap() {
    let rect = r(50.0, 50.0, -20.0, 10.0);
    assert_eq!(Corner::Tl.position(&rect), pt(50.0, 50.0));
    assert_eq!(Corner::Tr.position(&rect), pt(30.0, 50.0));
}

// =============================================================
// hit_rect: priority
// =============================================================

#[test]
fn corner_wins_over_edge_and_interior() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    // Inside the rect, within the left edge band, and within the tl handle.
    assert_eq!(hit_rect(pt(103.0, 103.0), &rect, 1.0), Some(RectPart::Handle(Corner::Tl)));
    assert_eq!(hit_rect(pt(297.0, 197.0), &rect, 1.0), Some(RectPart::Handle(Corner::Br)));
    assert_eq!(hit_rect(pt(302.0, 98.0), &rect, 1.0), Some(RectPart::Handle(Corner::Tr)));
    assert_eq!(hit_rect(pt(98.0, 202.0), &rect, 1.0), Some(RectPart::Handle(Corner::Bl)));
}

#[test]
fn edge_wins_over_interior() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    assert_eq!(hit_rect(pt(103.0, 150.0), &rect, 1.0), Some(RectPart::Edge(Edge::Left)));
    assert_eq!(hit_rect(pt(297.0, 150.0), &rect, 1.0), Some(RectPart::Edge(Edge::Right)));
    assert_eq!(hit_rect(pt(200.0, 104.0), &rect, 1.0), Some(RectPart::Edge(Edge::Top)));
    assert_eq!(hit_rect(pt(200.0, 196.0), &rect, 1.0), Some(RectPart::Edge(Edge::Bottom)));
}

#[test]
fn edge_band_outside_the_rect_still_hits() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    assert_eq!(hit_rect(pt(95.0, 150.0), &rect, 1.0), Some(RectPart::Edge(Edge::Left)));
}

#[test]
fn edge_band_bounded_by_perpendicular_span() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    // Beyond the vertical span and outside the corner handle.
    assert_eq!(hit_rect(pt(100.0, 210.0), &rect, 1.0), None);
}

#[test]
fn interior_yields_grab_offset() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    assert_eq!(hit_rect(pt(150.0, 130.0), &rect, 1.0), Some(RectPart::Body { grab_x: 50.0, grab_y: 30.0 }));
}

#[test]
fn thresholds_are_strict() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    // Exactly 6px left of the left edge: not in the band.
    assert_eq!(hit_rect(pt(94.0, 150.0), &rect, 1.0), None);
}

#[test]
fn miss_returns_none() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    assert_eq!(hit_rect(pt(0.0, 0.0), &rect, 1.0), None);
}

#[test]
fn tolerance_scales_bands() {
    let rect = r(100.0, 100.0, 200.0, 100.0);
    assert_eq!(hit_rect(pt(90.0, 150.0), &rect, 1.0), None);
    assert_eq!(hit_rect(pt(90.0, 150.0), &rect, 2.0), Some(RectPart::Edge(Edge::Left)));
}

#[test]
fn flipped_rect_has_no_strict_interior() {
    // w < 0: the interior test `x < px < x + w` can never hold.
    let rect = r(300.0, 100.0, -200.0, 100.0);
    assert_eq!(hit_rect(pt(200.0, 150.0), &rect, 1.0), None);
}

// =============================================================
// hit_quad_point
// =============================================================

fn unit_quad() -> NormalizedQuad {
    NormalizedQuad::from_points([pt(0.1, 0.1), pt(0.9, 0.1), pt(0.9, 0.9), pt(0.1, 0.9)])
}

#[test]
fn quad_point_hit_within_radius() {
    let canvas = Size::new(100.0, 100.0);
    assert_eq!(hit_quad_point(pt(88.0, 12.0), &unit_quad(), canvas), Some(1));
}

#[test]
fn quad_point_miss_outside_radius() {
    let canvas = Size::new(100.0, 100.0);
    assert_eq!(hit_quad_point(pt(50.0, 50.0), &unit_quad(), canvas), None);
}

#[test]
fn quad_point_first_index_wins_over_nearest() {
    let quad = NormalizedQuad::from_points([pt(0.0, 0.0), pt(0.05, 0.0), pt(1.0, 1.0), pt(0.0, 1.0)]);
    let canvas = Size::new(100.0, 100.0);
    // 8px from point 0, 3px from point 1.
    assert_eq!(hit_quad_point(pt(8.0, 0.0), &quad, canvas), Some(0));
}

#[test]
fn quad_point_uninitialized_never_hits() {
    assert_eq!(hit_quad_point(pt(0.0, 0.0), &NormalizedQuad::empty(), Size::new(100.0, 100.0)), None);
}
