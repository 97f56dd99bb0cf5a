use super::*;

const EPSILON: f64 = 1e-12;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn canvas() -> Size {
    Size::new(200.0, 100.0)
}

fn quad() -> NormalizedQuad {
    NormalizedQuad::from_points([
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.5, 0.5),
    ])
}

fn key(k: &str) -> Key {
    Key(k.to_owned())
}

fn shift() -> Modifiers {
    Modifiers { shift: true, ..Modifiers::default() }
}

fn selected(index: usize) -> Option<DragSession> {
    Some(DragSession::QuadPoint { point_index: index })
}

// =============================================================
// hit_test / drag
// =============================================================

#[test]
fn hit_test_starts_quad_session() {
    // Point 3 sits at (100, 50) on a 200x100 canvas.
    assert_eq!(hit_test(Point::new(104.0, 47.0), &quad(), canvas()), selected(3));
}

#[test]
fn hit_test_misses_far_pointer() {
    assert_eq!(hit_test(Point::new(50.0, 50.0), &quad(), canvas()), None);
}

#[test]
fn drag_stores_normalized_pointer() {
    let mut q = quad();
    assert!(drag(&DragSession::QuadPoint { point_index: 1 }, Point::new(150.0, 25.0), &mut q, canvas(), false));
    assert_eq!(q.get(1), Some(Point::new(0.75, 0.25)));
}

#[test]
fn drag_outside_canvas_is_unclamped_by_default() {
    let mut q = quad();
    drag(&DragSession::QuadPoint { point_index: 0 }, Point::new(-20.0, 150.0), &mut q, canvas(), false);
    assert_eq!(q.get(0), Some(Point::new(-0.1, 1.5)));
}

#[test]
fn drag_outside_canvas_clamps_when_asked() {
    let mut q = quad();
    drag(&DragSession::QuadPoint { point_index: 0 }, Point::new(-20.0, 150.0), &mut q, canvas(), true);
    assert_eq!(q.get(0), Some(Point::new(0.0, 1.0)));
}

#[test]
fn drag_ignores_rect_sessions() {
    let mut q = quad();
    let session = DragSession::RectMove { rect_index: 0, grab_x: 0.0, grab_y: 0.0 };
    assert!(!drag(&session, Point::new(10.0, 10.0), &mut q, canvas(), false));
    assert_eq!(q, quad());
}

#[test]
fn drag_may_cross_points() {
    // Moving point 0 past point 2 is allowed; nothing is reordered.
    let mut q = quad();
    drag(&DragSession::QuadPoint { point_index: 0 }, Point::new(200.0, 100.0), &mut q, canvas(), false);
    assert_eq!(q.get(0), Some(Point::new(1.0, 1.0)));
    assert_eq!(q.get(2), Some(Point::new(1.0, 1.0)));
}

// =============================================================
// on_key
// =============================================================

#[test]
fn key_without_session_is_ignored() {
    let mut session = None;
    let mut q = quad();
    assert_eq!(on_key(&mut session, &key("ArrowUp"), Modifiers::default(), &mut q), KeyOutcome::Ignored);
    assert_eq!(q, quad());
}

#[test]
fn escape_releases_without_reverting() {
    let mut session = selected(3);
    let mut q = quad();
    drag(&DragSession::QuadPoint { point_index: 3 }, Point::new(20.0, 20.0), &mut q, canvas(), false);
    assert_eq!(on_key(&mut session, &key("Escape"), Modifiers::default(), &mut q), KeyOutcome::Released);
    assert!(session.is_none());
    assert_eq!(q.get(3), Some(Point::new(0.1, 0.2)));
}

#[test]
fn arrow_and_wasd_are_equivalent() {
    let pairs = [("ArrowUp", "w"), ("ArrowDown", "s"), ("ArrowLeft", "a"), ("ArrowRight", "d")];
    for (arrow, letter) in pairs {
        let mut a = quad();
        let mut b = quad();
        on_key(&mut selected(3), &key(arrow), Modifiers::default(), &mut a);
        on_key(&mut selected(3), &key(letter), Modifiers::default(), &mut b);
        assert_eq!(a, b, "{arrow} vs {letter}");
        assert_ne!(a, quad(), "{arrow} did not move");
    }
}

#[test]
fn nudge_up_decreases_y() {
    let mut q = quad();
    assert_eq!(on_key(&mut selected(3), &key("ArrowUp"), Modifiers::default(), &mut q), KeyOutcome::Moved);
    let p = q.get(3).unwrap_or_default();
    assert!(approx_eq(p.x, 0.5));
    assert!(approx_eq(p.y, 0.499));
}

#[test]
fn shift_nudges_ten_times_further() {
    let mut q = quad();
    on_key(&mut selected(3), &key("D"), shift(), &mut q);
    let p = q.get(3).unwrap_or_default();
    assert!(approx_eq(p.x, 0.51));
    assert!(approx_eq(p.y, 0.5));
}

#[test]
fn nudge_clamps_only_the_moved_axis() {
    // Point 0 pushed outside by the pointer, then nudged right.
    let mut q = quad();
    drag(&DragSession::QuadPoint { point_index: 0 }, Point::new(-20.0, 150.0), &mut q, canvas(), false);
    on_key(&mut selected(0), &key("ArrowRight"), Modifiers::default(), &mut q);
    let p = q.get(0).unwrap_or_default();
    assert!(approx_eq(p.x, 0.0));
    assert!(approx_eq(p.y, 1.5));
}

#[test]
fn nudge_stops_at_border() {
    let mut q = quad();
    assert_eq!(on_key(&mut selected(1), &key("ArrowRight"), shift(), &mut q), KeyOutcome::Moved);
    assert_eq!(q.get(1), Some(Point::new(1.0, 0.0)));
}

#[test]
fn unbound_key_is_ignored() {
    let mut session = selected(0);
    let mut q = quad();
    assert_eq!(on_key(&mut session, &key("x"), Modifiers::default(), &mut q), KeyOutcome::Ignored);
    assert!(session.is_some());
}

#[test]
fn nudge_on_uninitialized_quad_is_ignored() {
    let mut q = NormalizedQuad::empty();
    assert_eq!(on_key(&mut selected(0), &key("w"), Modifiers::default(), &mut q), KeyOutcome::Ignored);
}
