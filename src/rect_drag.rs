//! Rect drag controller: picks a rect part under the pointer and applies
//! pointer-moves to it.
//!
//! Rects are scanned from last to first so the top-most one wins overlaps.
//! Resizes recompute the dragged side against the stored opposite side, and
//! nothing is clamped: dragging a side through its opposite leaves a negative
//! extent, and the next hit test reads that rect literally.

#[cfg(test)]
#[path = "rect_drag_test.rs"]
mod rect_drag_test;

use crate::doc::Rect;
use crate::hit::{Corner, Edge, RectPart, hit_rect};
use crate::input::DragSession;
use crate::space::{Point, ViewTransform};

/// Hit-test rects that share the pointer's coordinate space.
#[must_use]
pub fn hit_test<R: AsRef<Rect>>(pointer: Point, rects: &[R]) -> Option<DragSession> {
    hit_test_with(pointer, rects, |_| Some(ViewTransform::default()))
}

/// Hit-test rects stored in per-rect logical spaces.
///
/// `transform_of(i)` maps rect `i`'s space to pointer pixels; `None` skips the
/// rect. The pointer is inverse-transformed and the pixel tolerances scaled
/// so handles stay the same size on screen.
pub fn hit_test_with<R, F>(pointer: Point, rects: &[R], transform_of: F) -> Option<DragSession>
where
    R: AsRef<Rect>,
    F: Fn(usize) -> Option<ViewTransform>,
{
    rects.iter().enumerate().rev().find_map(|(rect_index, r)| {
        let t = transform_of(rect_index)?;
        let local = t.to_logical(pointer);
        let part = hit_rect(local, r.as_ref(), t.pixel_dist_to_logical(1.0))?;
        Some(match part {
            RectPart::Handle(corner) => DragSession::RectHandle { rect_index, corner },
            RectPart::Edge(edge) => DragSession::RectEdge { rect_index, edge },
            RectPart::Body { grab_x, grab_y } => DragSession::RectMove { rect_index, grab_x, grab_y },
        })
    })
}

/// Apply a pointer position (in the rect's space) to `rect` for `session`.
///
/// Quad sessions are ignored.
pub fn apply(session: &DragSession, m: Point, r: &mut Rect) {
    match *session {
        DragSession::RectHandle { corner, .. } => match corner {
            Corner::Tl => {
                r.w += r.x - m.x;
                r.h += r.y - m.y;
                r.x = m.x;
                r.y = m.y;
            }
            Corner::Tr => {
                r.w = m.x - r.x;
                r.h += r.y - m.y;
                r.y = m.y;
            }
            Corner::Bl => {
                r.w += r.x - m.x;
                r.x = m.x;
                r.h = m.y - r.y;
            }
            Corner::Br => {
                r.w = m.x - r.x;
                r.h = m.y - r.y;
            }
        },
        DragSession::RectEdge { edge, .. } => match edge {
            Edge::Left => {
                r.w += r.x - m.x;
                r.x = m.x;
            }
            Edge::Right => r.w = m.x - r.x,
            Edge::Top => {
                r.h += r.y - m.y;
                r.y = m.y;
            }
            Edge::Bottom => r.h = m.y - r.y,
        },
        DragSession::RectMove { grab_x, grab_y, .. } => {
            r.x = m.x - grab_x;
            r.y = m.y - grab_y;
        }
        DragSession::QuadPoint { .. } => {}
    }
}
