//! Coordinate spaces: normalized [0,1]², per-client logical space, and
//! preview-canvas pixel space.
//!
//! Everything here is pure. The renderer and the drag controllers compose
//! these conversions; none of them store derived geometry back into the
//! document.

#[cfg(test)]
#[path = "space_test.rs"]
mod space_test;

use serde::{Deserialize, Serialize};

use crate::doc::Rect;

/// A point in normalized, logical, or canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A width/height extent. Used for canvas sizes, image sizes, and the
/// per-client logical canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Result of a letterbox fit: uniform scale plus the centering offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Fit {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Fit {
    /// Size of the image once scaled into the box.
    #[must_use]
    pub fn scaled(&self, image: Size) -> Size {
        Size::new(image.width * self.scale, image.height * self.scale)
    }

    /// The four corners of the placed image, top-left first, clockwise.
    #[must_use]
    pub fn corners(&self, image: Size) -> [Point; 4] {
        let s = self.scaled(image);
        let (x0, y0) = (self.offset_x, self.offset_y);
        let (x1, y1) = (x0 + s.width, y0 + s.height);
        [Point::new(x0, y0), Point::new(x1, y0), Point::new(x1, y1), Point::new(x0, y1)]
    }
}

/// Fit an image of size `image` inside `bounds`, preserving aspect ratio and
/// centering it.
///
/// A degenerate image (non-positive size) yields the identity fit.
#[must_use]
pub fn fit_contain(image: Size, bounds: Size) -> Fit {
    if !image.is_positive() {
        return Fit::default();
    }
    let scale = (bounds.width / image.width).min(bounds.height / image.height);
    Fit {
        scale,
        offset_x: (bounds.width - image.width * scale) / 2.0,
        offset_y: (bounds.height - image.height * scale) / 2.0,
    }
}

/// Map a normalized point onto a canvas of the given pixel size.
#[must_use]
pub fn to_canvas_pixels(p: Point, canvas: Size) -> Point {
    Point::new(p.x * canvas.width, p.y * canvas.height)
}

/// Inverse of [`to_canvas_pixels`].
#[must_use]
pub fn to_normalized(p: Point, canvas: Size) -> Point {
    Point::new(p.x / canvas.width, p.y / canvas.height)
}

/// Scale `value` from one extent to another, preserving aspect ratio.
///
/// Returns `value` unchanged when `from` is degenerate.
#[must_use]
pub fn uniform_rescale(value: f64, from: Size, to: Size) -> f64 {
    if !from.is_positive() {
        return value;
    }
    value * (to.width / from.width).min(to.height / from.height)
}

/// Logical-to-pixel transform for one client: `pixel = offset + logical * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl ViewTransform {
    /// Build the transform for a client whose rects live in `logical`, drawn on
    /// a canvas of size `canvas` with the background placed by `fit`.
    #[must_use]
    pub fn for_client(logical: Size, canvas: Size, fit: &Fit) -> Self {
        Self { scale: uniform_rescale(1.0, logical, canvas), offset_x: fit.offset_x, offset_y: fit.offset_y }
    }

    /// Convert a logical point to canvas pixels.
    #[must_use]
    pub fn to_pixels(&self, logical: Point) -> Point {
        Point::new(self.offset_x + logical.x * self.scale, self.offset_y + logical.y * self.scale)
    }

    /// Convert a canvas pixel point to logical space.
    #[must_use]
    pub fn to_logical(&self, pixel: Point) -> Point {
        Point::new((pixel.x - self.offset_x) / self.scale, (pixel.y - self.offset_y) / self.scale)
    }

    /// Convert a pixel distance to a logical distance.
    #[must_use]
    pub fn pixel_dist_to_logical(&self, dist: f64) -> f64 {
        dist / self.scale
    }

    /// Derive the pixel-space rect for a logical rect. The input is not touched.
    #[must_use]
    pub fn rect_to_pixels(&self, rect: &Rect) -> Rect {
        let origin = self.to_pixels(Point::new(rect.x, rect.y));
        Rect { x: origin.x, y: origin.y, w: rect.w * self.scale, h: rect.h * self.scale }
    }
}
