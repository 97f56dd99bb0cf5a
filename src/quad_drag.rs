//! Homography drag controller: grabs one of the four calibration points,
//! follows the pointer, and nudges the grabbed point from the keyboard.
//!
//! Storage stays normalized. Pointer moves store `pointer / canvas` as-is,
//! which can leave [0,1]² unless the caller asks for clamping; keyboard
//! nudges always clamp. The quad is never reordered, so a self-intersecting
//! quad is a legal result.

#[cfg(test)]
#[path = "quad_drag_test.rs"]
mod quad_drag_test;

use crate::doc::NormalizedQuad;
use crate::hit::hit_quad_point;
use crate::input::{DragSession, Key, Modifiers, Nudge};
use crate::space::{Point, Size, to_normalized};

/// What a key press did to the quad session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No quad session, or the key is not bound.
    Ignored,
    /// The selected point moved.
    Moved,
    /// Escape: the session ended, the point stays where it is.
    Released,
}

/// Start a session on the first point within grab radius of `pointer`.
#[must_use]
pub fn hit_test(pointer: Point, quad: &NormalizedQuad, canvas: Size) -> Option<DragSession> {
    hit_quad_point(pointer, quad, canvas).map(|point_index| DragSession::QuadPoint { point_index })
}

/// Move the session's point to `pointer`. Returns false for non-quad sessions.
pub fn drag(session: &DragSession, pointer: Point, quad: &mut NormalizedQuad, canvas: Size, clamp: bool) -> bool {
    let Some(index) = session.quad_point() else {
        return false;
    };
    let mut p = to_normalized(pointer, canvas);
    if clamp {
        p = clamp_unit(p);
    }
    quad.set(index, p)
}

/// Handle a key press while a quad session may be active.
pub fn on_key(session: &mut Option<DragSession>, key: &Key, modifiers: Modifiers, quad: &mut NormalizedQuad) -> KeyOutcome {
    let Some(index) = session.as_ref().and_then(DragSession::quad_point) else {
        return KeyOutcome::Ignored;
    };
    if key.0 == "Escape" {
        *session = None;
        return KeyOutcome::Released;
    }
    let Some(nudge) = Nudge::from_key(key) else {
        return KeyOutcome::Ignored;
    };
    let Some(current) = quad.get(index) else {
        return KeyOutcome::Ignored;
    };
    let (dx, dy) = nudge.delta(modifiers);
    // Only the moved coordinate is clamped.
    let next = match nudge {
        Nudge::Up | Nudge::Down => Point::new(current.x, (current.y + dy).clamp(0.0, 1.0)),
        Nudge::Left | Nudge::Right => Point::new((current.x + dx).clamp(0.0, 1.0), current.y),
    };
    if quad.set(index, next) { KeyOutcome::Moved } else { KeyOutcome::Ignored }
}

fn clamp_unit(p: Point) -> Point {
    Point::new(p.x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0))
}
