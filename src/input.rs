//! Input model: editor modes, modifier keys, keys, and the drag session.
//!
//! `DragSession` is the single active gesture tracked between pointer-down
//! and pointer-up. It records which element is being manipulated and the
//! context needed to apply each pointer-move. There is no commit step; the
//! target geometry is mutated live, so discarding a session never reverts
//! anything.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{NUDGE_STEP, NUDGE_STEP_FAST};
use crate::doc::QuadKey;
use crate::hit::{Corner, Edge};

/// What the editor is currently editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Rect assignments for all clients over the reference image.
    #[default]
    Rects,
    /// The calibration quad of one display.
    Homography(QuadKey),
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// A keyboard key as reported by the browser (e.g. `"ArrowUp"`, `"w"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Direction of a keyboard nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
    Left,
    Right,
}

impl Nudge {
    /// Map a key to a nudge. Arrow keys and WASD are equivalent.
    #[must_use]
    pub fn from_key(key: &Key) -> Option<Self> {
        match key.0.as_str() {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }

    /// Normalized `(dx, dy)` for one press.
    #[must_use]
    pub fn delta(self, modifiers: Modifiers) -> (f64, f64) {
        let step = if modifiers.shift { NUDGE_STEP_FAST } else { NUDGE_STEP };
        match self {
            Self::Up => (0.0, -step),
            Self::Down => (0.0, step),
            Self::Left => (-step, 0.0),
            Self::Right => (step, 0.0),
        }
    }
}

/// The active drag, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSession {
    /// Resizing a rect by one of its corners.
    RectHandle { rect_index: usize, corner: Corner },
    /// Resizing a rect by one of its sides.
    RectEdge { rect_index: usize, edge: Edge },
    /// Moving a rect; the grab offset is in the rect's logical space.
    RectMove { rect_index: usize, grab_x: f64, grab_y: f64 },
    /// Moving one calibration quad point.
    QuadPoint { point_index: usize },
}

impl DragSession {
    /// The rect this session targets, if it is a rect session.
    #[must_use]
    pub fn rect_index(&self) -> Option<usize> {
        match *self {
            Self::RectHandle { rect_index, .. }
            | Self::RectEdge { rect_index, .. }
            | Self::RectMove { rect_index, .. } => Some(rect_index),
            Self::QuadPoint { .. } => None,
        }
    }

    /// The quad point this session targets, if it is a quad session.
    #[must_use]
    pub fn quad_point(&self) -> Option<usize> {
        match *self {
            Self::QuadPoint { point_index } => Some(point_index),
            _ => None,
        }
    }
}
