//! Shared numeric constants for the editor crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Half-width in screen pixels of the square hit zone around a rect corner.
pub const HANDLE_HIT_HALF_PX: f64 = 6.0;

/// Width in screen pixels of the hit band along each rect edge.
pub const EDGE_BAND_PX: f64 = 6.0;

/// Radius in canvas pixels within which a quad point can be grabbed.
pub const QUAD_HIT_RADIUS_PX: f64 = 10.0;

// ── Keyboard nudge ──────────────────────────────────────────────

/// Normalized distance a quad point moves per key press.
pub const NUDGE_STEP: f64 = 0.001;

/// Normalized distance a quad point moves per key press with Shift held.
pub const NUDGE_STEP_FAST: f64 = 0.01;

// ── Defaults ────────────────────────────────────────────────────

/// Resolution substituted for displays with a missing or non-positive one.
pub const DEFAULT_RESOLUTION_W: f64 = 800.0;
pub const DEFAULT_RESOLUTION_H: f64 = 600.0;

/// Width of a synthesized rect for a display without an assignment.
pub const DEFAULT_RECT_WIDTH: f64 = 150.0;

/// Origin of the first synthesized rect, and the per-display / per-client stagger.
pub const DEFAULT_RECT_ORIGIN: f64 = 20.0;
pub const DEFAULT_RECT_DISPLAY_STAGGER: f64 = 30.0;
pub const DEFAULT_RECT_CLIENT_STAGGER: f64 = 10.0;

// ── Rendering ───────────────────────────────────────────────────

/// Number of grid cells across the canvas width in homography mode.
pub const GRID_DIVISIONS: f64 = 50.0;

/// Side length in pixels of a drawn rect corner handle.
pub const HANDLE_DRAW_SIZE_PX: f64 = 8.0;

/// Radius in pixels of a drawn quad corner handle.
pub const QUAD_HANDLE_DRAW_RADIUS_PX: f64 = 6.0;
