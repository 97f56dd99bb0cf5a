#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{EDGE_BAND_PX, HANDLE_HIT_HALF_PX, QUAD_HIT_RADIUS_PX};
use crate::doc::{NormalizedQuad, Rect};
use crate::space::{Point, Size, to_canvas_pixels};

/// A rect corner handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Tl,
    Tr,
    Bl,
    Br,
}

impl Corner {
    /// Hit-test order.
    pub const ALL: [Corner; 4] = [Corner::Tl, Corner::Tr, Corner::Bl, Corner::Br];

    /// Position of this corner on `rect`, read literally from `x, y, w, h`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        match self {
            Self::Tl => Point::new(rect.x, rect.y),
            Self::Tr => Point::new(rect.x + rect.w, rect.y),
            Self::Bl => Point::new(rect.x, rect.y + rect.h),
            Self::Br => Point::new(rect.x + rect.w, rect.y + rect.h),
        }
    }
}

/// A rect side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Which part of a rect was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RectPart {
    Handle(Corner),
    Edge(Edge),
    /// Interior; carries the pointer's offset from the rect origin.
    Body { grab_x: f64, grab_y: f64 },
}

/// Hit-test one rect. `tolerance` scales the handle half-width and edge band;
/// it is 1.0 when pointer and rect share a space.
///
/// Corners beat edges, edges beat the interior. Edge spans are inclusive,
/// everything else is strict.
#[must_use]
pub fn hit_rect(p: Point, r: &Rect, tolerance: f64) -> Option<RectPart> {
    let handle = HANDLE_HIT_HALF_PX * tolerance;
    for corner in Corner::ALL {
        let c = corner.position(r);
        if (p.x - c.x).abs() < handle && (p.y - c.y).abs() < handle {
            return Some(RectPart::Handle(corner));
        }
    }

    let band = EDGE_BAND_PX * tolerance;
    let within_y = p.y >= r.y && p.y <= r.y + r.h;
    let within_x = p.x >= r.x && p.x <= r.x + r.w;
    if (p.x - r.x).abs() < band && within_y {
        return Some(RectPart::Edge(Edge::Left));
    }
    if (p.x - (r.x + r.w)).abs() < band && within_y {
        return Some(RectPart::Edge(Edge::Right));
    }
    if (p.y - r.y).abs() < band && within_x {
        return Some(RectPart::Edge(Edge::Top));
    }
    if (p.y - (r.y + r.h)).abs() < band && within_x {
        return Some(RectPart::Edge(Edge::Bottom));
    }

    if p.x > r.x && p.x < r.x + r.w && p.y > r.y && p.y < r.y + r.h {
        return Some(RectPart::Body { grab_x: p.x - r.x, grab_y: p.y - r.y });
    }
    None
}

/// Index of the first quad point within the grab radius of `pointer`.
///
/// Points are denormalized against `canvas` for the test only. Index order
/// wins over distance.
#[must_use]
pub fn hit_quad_point(pointer: Point, quad: &NormalizedQuad, canvas: Size) -> Option<usize> {
    quad.points()?
        .iter()
        .position(|p| to_canvas_pixels(*p, canvas).distance_to(pointer) < QUAD_HIT_RADIUS_PX)
}
