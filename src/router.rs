//! Device input normalization.
//!
//! Mouse and touch events are reduced to one viewport-space pointer position
//! and then mapped into canvas backing-store pixels. Keyboard events bypass
//! this module and go straight to the homography controller.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use crate::space::Point;

/// Stage of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The device aborted the gesture (`touchcancel`). Ends the drag like `Up`.
    Cancel,
}

/// A raw pointer event from one device, positions in viewport (client) space.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Mouse { phase: PointerPhase, client: Point },
    /// `touches` are the touches still on the surface; `changed` are the ones
    /// that triggered this event.
    Touch { phase: PointerPhase, touches: Vec<Point>, changed: Vec<Point> },
}

/// A device event reduced to one pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedPointer {
    pub phase: PointerPhase,
    pub client: Point,
    /// Whether the host must suppress the browser default (page scroll).
    pub prevent_default: bool,
}

/// Reduce a device event to a single pointer.
///
/// Touch uses the first active touch, falling back to the first changed touch
/// (on release no touches remain). Returns `None` for a touch event with no
/// touch points at all, except a cancel: it always routes so the drag ends,
/// at the origin when the browser reports no touches.
#[must_use]
pub fn route(event: &DeviceEvent) -> Option<RoutedPointer> {
    match event {
        DeviceEvent::Mouse { phase, client } => {
            Some(RoutedPointer { phase: *phase, client: *client, prevent_default: false })
        }
        DeviceEvent::Touch { phase, touches, changed } => {
            let client = match phase {
                PointerPhase::Up | PointerPhase::Cancel => changed.first().or_else(|| touches.first()),
                PointerPhase::Down | PointerPhase::Move => touches.first().or_else(|| changed.first()),
            };
            let client = match (client, phase) {
                (Some(c), _) => *c,
                (None, PointerPhase::Cancel) => Point::default(),
                (None, _) => return None,
            };
            Some(RoutedPointer { phase: *phase, client, prevent_default: true })
        }
    }
}

/// On-screen placement of the canvas element and its backing-store size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    /// Bounding box origin in viewport space.
    pub left: f64,
    pub top: f64,
    /// Displayed (CSS) size.
    pub css_width: f64,
    pub css_height: f64,
    /// Backing-store resolution.
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl CanvasBounds {
    /// Map a viewport point to canvas backing-store pixels.
    ///
    /// Falls back to a 1:1 ratio on an axis whose CSS size is zero.
    #[must_use]
    pub fn to_canvas(&self, client: Point) -> Point {
        let ratio = |pixel: f64, css: f64| if css > 0.0 { pixel / css } else { 1.0 };
        Point::new(
            (client.x - self.left) * ratio(self.pixel_width, self.css_width),
            (client.y - self.top) * ratio(self.pixel_height, self.css_height),
        )
    }
}
