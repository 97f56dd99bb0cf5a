//! Rendering: draws a prepared [`Frame`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! The frame is computed by [`crate::engine::EngineCore::layout_frame`], which
//! derives pixel geometry from the stored logical geometry; drawing itself
//! reads the frame and produces pixels without mutating any state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{GRID_DIVISIONS, HANDLE_DRAW_SIZE_PX, QUAD_HANDLE_DRAW_RADIUS_PX};
use crate::doc::Rect;
use crate::hit::Corner;
use crate::space::{Fit, Point, Size};

const RECT_STROKE: &str = "green";
const RECT_STROKE_SELECTED_CLIENT: &str = "#00c8ff";
const RECT_STROKE_ACTIVE: &str = "yellow";
const RECT_LINE_WIDTH: f64 = 2.0;
const HANDLE_FILL: &str = "red";

const GRID_STROKE: &str = "rgba(255, 255, 255, 0.25)";
const QUAD_STROKE: &str = "#ff00ff";
const QUAD_LINE_WIDTH: f64 = 2.0;
const QUAD_HANDLE_FILL: &str = "white";
const QUAD_HANDLE_ACTIVE_FILL: &str = "orange";
const QUAD_EDGE_DASH_PX: f64 = 6.0;

/// A rect ready to draw, already in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRect {
    /// Index into the store's rect list.
    pub index: usize,
    pub rect: Rect,
    /// Belongs to the selected client.
    pub selected_client: bool,
    /// Target of the active drag.
    pub active: bool,
}

/// Mode-specific content drawn over the background.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Rects(Vec<RenderRect>),
    Quad {
        /// Corners in canvas pixels, stored order.
        points: [Point; 4],
        /// Index of the dragged corner.
        active: Option<usize>,
        /// Grid cell size in pixels.
        grid_cell: f64,
    },
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Canvas backing-store size.
    pub canvas: Size,
    /// Natural size of the background image.
    pub image: Size,
    /// Placement of the background image.
    pub fit: Fit,
    pub overlay: Overlay,
}

/// Backing-store size for a container: full width, height following the
/// image aspect ratio. `None` when either is degenerate.
#[must_use]
pub fn backing_size(container_width: f64, image: Size) -> Option<Size> {
    if !container_width.is_finite() || container_width <= 0.0 || !image.is_positive() {
        return None;
    }
    Some(Size::new(container_width, container_width * image.height / image.width))
}

/// Width left for content once horizontal padding is removed. Never negative.
#[must_use]
pub fn content_width(client_width: f64, padding_left: f64, padding_right: f64) -> f64 {
    (client_width - padding_left - padding_right).max(0.0)
}

/// Parse a computed CSS length such as `"12.5px"`. Anything unparseable or
/// non-finite counts as zero.
#[must_use]
pub fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .map_or(0.0, |v| if v.is_finite() { v } else { 0.0 })
}

/// Grid cell size for a canvas.
#[must_use]
pub fn grid_cell(canvas: Size) -> f64 {
    canvas.width / GRID_DIVISIONS
}

/// Positions of grid lines along one axis of length `extent`, from 0.
#[must_use]
pub fn grid_lines(extent: f64, cell: f64) -> Vec<f64> {
    if !cell.is_finite() || cell <= 0.0 || !extent.is_finite() {
        return Vec::new();
    }
    (0_u32..)
        .map(|i| f64::from(i) * cell)
        .take_while(|v| *v <= extent)
        .collect()
}

/// Draw a full frame: background, then the overlay.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, image: &HtmlImageElement, frame: &Frame) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, frame.canvas.width, frame.canvas.height);

    let placed = frame.fit.scaled(frame.image);
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        image,
        0.0,
        0.0,
        frame.image.width,
        frame.image.height,
        frame.fit.offset_x,
        frame.fit.offset_y,
        placed.width,
        placed.height,
    )?;

    match &frame.overlay {
        Overlay::Rects(rects) => {
            for r in rects {
                draw_rect(ctx, r);
            }
            Ok(())
        }
        Overlay::Quad { points, active, grid_cell } => {
            draw_grid(ctx, frame.canvas, *grid_cell);
            draw_quad(ctx, points, *active)
        }
    }
}

fn draw_rect(ctx: &CanvasRenderingContext2d, r: &RenderRect) {
    let stroke = if r.active {
        RECT_STROKE_ACTIVE
    } else if r.selected_client {
        RECT_STROKE_SELECTED_CLIENT
    } else {
        RECT_STROKE
    };
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(RECT_LINE_WIDTH);
    ctx.stroke_rect(r.rect.x, r.rect.y, r.rect.w, r.rect.h);

    let half = HANDLE_DRAW_SIZE_PX / 2.0;
    ctx.set_fill_style_str(HANDLE_FILL);
    for corner in Corner::ALL {
        let c = corner.position(&r.rect);
        ctx.fill_rect(c.x - half, c.y - half, HANDLE_DRAW_SIZE_PX, HANDLE_DRAW_SIZE_PX);
    }
}

fn draw_grid(ctx: &CanvasRenderingContext2d, canvas: Size, cell: f64) {
    ctx.save();
    ctx.set_stroke_style_str(GRID_STROKE);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    for x in grid_lines(canvas.width, cell) {
        ctx.move_to(x, 0.0);
        ctx.line_to(x, canvas.height);
    }
    for y in grid_lines(canvas.height, cell) {
        ctx.move_to(0.0, y);
        ctx.line_to(canvas.width, y);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_quad(ctx: &CanvasRenderingContext2d, points: &[Point; 4], active: Option<usize>) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(QUAD_STROKE);
    ctx.set_line_width(QUAD_LINE_WIDTH);
    let dash = js_sys::Array::new();
    dash.push(&JsValue::from_f64(QUAD_EDGE_DASH_PX));
    dash.push(&JsValue::from_f64(QUAD_EDGE_DASH_PX));
    ctx.set_line_dash(&dash)?;

    ctx.begin_path();
    ctx.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;

    for (i, p) in points.iter().enumerate() {
        let fill = if active == Some(i) { QUAD_HANDLE_ACTIVE_FILL } else { QUAD_HANDLE_FILL };
        ctx.set_fill_style_str(fill);
        ctx.begin_path();
        ctx.arc(p.x, p.y, QUAD_HANDLE_DRAW_RADIUS_PX, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }

    ctx.restore();
    Ok(())
}
