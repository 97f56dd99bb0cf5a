use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent, TouchList};

use crate::config::EditorConfig;
use crate::doc::{Client, ClientConfig, DocError, LayoutStore, QuadKey, RectAssignment};
use crate::input::{DragSession, EditorMode, Key, Modifiers};
use crate::loader::{ImageLoader, LoadTicket};
use crate::quad_drag::{self, KeyOutcome};
use crate::rect_drag;
use crate::render::{self, Frame, Overlay, RenderRect};
use crate::router::{self, CanvasBounds, DeviceEvent, PointerPhase};
use crate::space::{Fit, Point, Size, ViewTransform, fit_contain, to_canvas_pixels, to_normalized};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// Geometry or selection changed; draw again.
    RenderNeeded,
    /// Fetch `url` and report back with `ticket`.
    LoadImage { ticket: LoadTicket, url: String },
    /// Push this config to the config service.
    ConfigReady { client_id: String, config: ClientConfig },
}

/// Core engine state: everything that does not touch the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub config: EditorConfig,
    pub store: LayoutStore,
    pub mode: EditorMode,
    pub session: Option<DragSession>,
    pub loader: ImageLoader,
    /// Uploaded images available for selection.
    pub images: Vec<String>,
    pub selected_image: Option<String>,
    /// Canvas size of the last laid-out frame. Pointer input is interpreted
    /// against the geometry that is on screen.
    pub canvas: Size,
    pub fit: Fit,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace all clients and rebuild rects, logical sizes, and quads.
    pub fn load_clients(&mut self, clients: Vec<Client>) -> Vec<Action> {
        self.session = None;
        self.store.load_clients(clients, self.config.default_resolution);
        tracing::info!(clients = self.store.clients().len(), rects = self.store.len(), "clients loaded");
        vec![Action::RenderNeeded]
    }

    /// Decode a client list from the config service and load it.
    ///
    /// # Errors
    ///
    /// Returns [`DocError`] if the payload is not a client list.
    pub fn load_clients_json(&mut self, json: &str) -> Result<Vec<Action>, DocError> {
        let clients = crate::doc::parse_clients(json)?;
        Ok(self.load_clients(clients))
    }

    /// Set the available uploads and select the first one.
    pub fn set_images(&mut self, uploads: Vec<String>) -> Vec<Action> {
        self.images = uploads;
        match self.images.first().cloned() {
            Some(first) => self.select_image(&first),
            None => Vec::new(),
        }
    }

    /// Select a background image and request it unless it is already the
    /// requested one.
    pub fn select_image(&mut self, filename: &str) -> Vec<Action> {
        self.selected_image = Some(filename.to_owned());
        let url = self.config.image_url(filename);
        match self.loader.request(&url) {
            Some(ticket) => vec![Action::LoadImage { ticket, url }],
            None => Vec::new(),
        }
    }

    /// An image load finished with the given natural size.
    pub fn image_loaded(&mut self, ticket: LoadTicket, size: Size) -> Vec<Action> {
        if self.accept_image(ticket, size) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Record a finished load. Returns false when `ticket` is not the latest
    /// request, in which case the loaded image must be dropped.
    pub fn accept_image(&mut self, ticket: LoadTicket, size: Size) -> bool {
        self.loader.complete(ticket, size)
    }

    /// An image load failed. The last frame stays on screen.
    pub fn image_failed(&mut self, ticket: LoadTicket, reason: &str) -> Vec<Action> {
        self.loader.fail(ticket, reason);
        Vec::new()
    }

    // --- Selection / mode ---

    pub fn select_client(&mut self, client_id: &str) -> Vec<Action> {
        if self.store.select_client(client_id) {
            vec![Action::RenderNeeded]
        } else {
            tracing::debug!(%client_id, "select_client: unknown client");
            Vec::new()
        }
    }

    /// Switch between rect editing and calibrating one display. Ends any drag.
    pub fn set_mode(&mut self, mode: EditorMode) -> Vec<Action> {
        self.session = None;
        self.mode = mode;
        vec![Action::RenderNeeded]
    }

    /// Calibrate the quad of `display` on `client_id`.
    pub fn edit_homography(&mut self, client_id: &str, display: &str) -> Vec<Action> {
        self.set_mode(EditorMode::Homography(QuadKey::new(client_id, display)))
    }

    // --- Rect list edits ---

    /// Replace a rect by identity key.
    pub fn update_rect(&mut self, updated: RectAssignment) -> Vec<Action> {
        if self.store.update_rect(updated) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Delete a rect by index. Ends a rect drag, since indices shift.
    pub fn delete_rect(&mut self, index: usize) -> Vec<Action> {
        if self.store.delete_rect(index).is_none() {
            return Vec::new();
        }
        if self.session.is_some_and(|s| s.rect_index().is_some()) {
            self.session = None;
        }
        vec![Action::RenderNeeded]
    }

    /// Build the config push for one client.
    #[must_use]
    pub fn export_client_config(&self, client_id: &str) -> Option<Action> {
        let config = self.store.export_client_config(client_id)?;
        tracing::info!(
            %client_id,
            assignments = config.assignments.len(),
            homographies = config.homographies.len(),
            "client config exported"
        );
        Some(Action::ConfigReady { client_id: client_id.to_owned(), config })
    }

    // --- Pointer / keyboard input (canvas pixel coordinates) ---

    /// Start a drag on whatever is under `pt`.
    ///
    /// A session still open from a pointer-up that never arrived is ended
    /// first, so the pointer always grabs what is under it now.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(stale) = self.session {
            tracing::debug!(?stale, "pointer-down with open drag; releasing it");
            actions = self.on_pointer_up(pt);
        }
        let session = match &self.mode {
            EditorMode::Rects => {
                let rects = self.store.rects();
                rect_drag::hit_test_with(pt, rects, |i| {
                    rects
                        .get(i)
                        .and_then(|r| self.client_transform(&r.client_id))
                })
            }
            EditorMode::Homography(key) if self.canvas.is_positive() => self
                .store
                .quad(key)
                .and_then(|quad| quad_drag::hit_test(pt, quad, self.canvas)),
            EditorMode::Homography(_) => None,
        };
        let Some(session) = session else {
            return actions;
        };
        tracing::debug!(?session, "drag started");
        self.session = Some(session);
        vec![Action::RenderNeeded]
    }

    /// Apply the pointer to the active drag target.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let Some(session) = self.session else {
            return Vec::new();
        };
        let moved = match (self.quad_key(), session.rect_index()) {
            (None, Some(index)) => self.drag_rect(&session, index, pt),
            (Some(key), None) if self.canvas.is_positive() => {
                let canvas = self.canvas;
                let clamp = self.config.clamp_pointer_quad;
                quad_drag::drag(&session, pt, self.store.quad_mut(&key), canvas, clamp)
            }
            _ => false,
        };
        if moved { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// The gesture was cancelled by the device (e.g. `touchcancel`). Ends the
    /// drag like a pointer-up; geometry is not reverted.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.on_pointer_up(Point::default())
    }

    /// End the active drag. A no-op when idle.
    pub fn on_pointer_up(&mut self, _pt: Point) -> Vec<Action> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        if self.config.normalize_rects_on_release {
            if let Some(entry) = session.rect_index().and_then(|i| self.store.rect_mut(i)) {
                entry.rect = entry.rect.normalized();
            }
        }
        tracing::debug!(?session, "drag ended");
        vec![Action::RenderNeeded]
    }

    /// Keyboard nudges for the grabbed quad point. Ignored in rect mode.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let Some(quad_key) = self.quad_key() else {
            return Vec::new();
        };
        match quad_drag::on_key(&mut self.session, key, modifiers, self.store.quad_mut(&quad_key)) {
            KeyOutcome::Ignored => Vec::new(),
            KeyOutcome::Moved | KeyOutcome::Released => vec![Action::RenderNeeded],
        }
    }

    /// The quad being calibrated, or `None` in rect mode.
    fn quad_key(&self) -> Option<QuadKey> {
        match &self.mode {
            EditorMode::Rects => None,
            EditorMode::Homography(key) => Some(key.clone()),
        }
    }

    fn drag_rect(&mut self, session: &DragSession, index: usize, pt: Point) -> bool {
        let Some(t) = self
            .store
            .rect(index)
            .and_then(|r| self.client_transform(&r.client_id))
        else {
            return false;
        };
        let Some(entry) = self.store.rect_mut(index) else {
            return false;
        };
        rect_drag::apply(session, t.to_logical(pt), &mut entry.rect);
        true
    }

    /// Logical-to-pixel transform of a client on the current frame.
    #[must_use]
    pub fn client_transform(&self, client_id: &str) -> Option<ViewTransform> {
        if !self.canvas.is_positive() {
            return None;
        }
        self.store.client(client_id)?;
        let logical = self.store.canvas_size(client_id)?;
        Some(ViewTransform::for_client(logical, self.canvas, &self.fit))
    }

    // --- Frame layout ---

    /// Size the canvas to `container_width` and derive everything the renderer
    /// draws. Returns `None` until an image is ready.
    ///
    /// Logical client sizes and an uninitialized quad are filled in here on
    /// first use; stored rects are never rescaled.
    pub fn layout_frame(&mut self, container_width: f64) -> Option<Frame> {
        let image = self.loader.ready()?.size;
        let canvas = render::backing_size(container_width, image)?;
        let fit = fit_contain(image, canvas);
        self.canvas = canvas;
        self.fit = fit;

        let overlay = match self.quad_key() {
            None => Overlay::Rects(self.layout_rects()),
            Some(key) => self.layout_quad(&key, image)?,
        };
        Some(Frame { canvas, image, fit, overlay })
    }

    fn layout_rects(&mut self) -> Vec<RenderRect> {
        let canvas = self.canvas;
        let client_ids: Vec<String> = self
            .store
            .rects()
            .iter()
            .map(|r| r.client_id.clone())
            .collect();
        for client_id in &client_ids {
            if self.store.client(client_id).is_some() {
                self.store.ensure_canvas_size(client_id, canvas);
            }
        }

        let active = self.session.and_then(|s| s.rect_index());
        self.store
            .rects()
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let Some(t) = self.client_transform(&entry.client_id) else {
                    tracing::debug!(client_id = %entry.client_id, "skipping rect of unknown client");
                    return None;
                };
                Some(RenderRect {
                    index,
                    rect: t.rect_to_pixels(&entry.rect),
                    selected_client: self.store.is_rect_from_selected_client(index),
                    active: active == Some(index),
                })
            })
            .collect()
    }

    fn layout_quad(&mut self, key: &QuadKey, image: Size) -> Option<Overlay> {
        let canvas = self.canvas;
        let corners = self.fit.corners(image).map(|p| to_normalized(p, canvas));
        let quad = self.store.quad_mut(key);
        if quad.initialize(corners) {
            tracing::debug!(client_id = %key.client_id, display = %key.display, "quad initialized to image corners");
        }
        let stored = *quad.points()?;
        Some(Overlay::Quad {
            points: stored.map(|p| to_canvas_pixels(p, canvas)),
            active: self.session.and_then(|s| s.quad_point()),
            grid_cell: render::grid_cell(canvas),
        })
    }
}

/// The full editor engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    image: Option<HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EditorConfig) -> Self {
        Self { canvas, image: None, core: EngineCore::new(config) }
    }

    /// Carry out render and image-load actions; return the rest (config
    /// pushes) for the host.
    pub fn dispatch(engine: &Rc<RefCell<Engine>>, actions: Vec<Action>) -> Vec<Action> {
        let mut rest = Vec::new();
        let mut render = false;
        for action in actions {
            match action {
                Action::RenderNeeded => render = true,
                Action::LoadImage { ticket, url } => {
                    if let Err(err) = Self::load_image(engine, ticket, &url) {
                        tracing::warn!(?err, %url, "could not start image load");
                        engine
                            .borrow_mut()
                            .core
                            .image_failed(ticket, "could not start load");
                    }
                }
                other @ Action::ConfigReady { .. } => rest.push(other),
            }
        }
        if render {
            engine.borrow_mut().redraw();
        }
        rest
    }

    /// Start loading `url` into a fresh image element; completion is reported
    /// back to the engine with `ticket`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image element cannot be created.
    pub fn load_image(engine: &Rc<RefCell<Engine>>, ticket: LoadTicket, url: &str) -> Result<(), JsValue> {
        let img = HtmlImageElement::new()?;

        let engine_for_load = Rc::clone(engine);
        let img_for_load = img.clone();
        let on_load = Closure::once_into_js(move || {
            engine_for_load
                .borrow_mut()
                .finish_image_load(ticket, img_for_load);
        });

        let engine_for_error = Rc::clone(engine);
        let on_error = Closure::once_into_js(move || {
            engine_for_error
                .borrow_mut()
                .core
                .image_failed(ticket, "image element reported an error");
        });

        img.set_onload(Some(on_load.unchecked_ref()));
        img.set_onerror(Some(on_error.unchecked_ref()));
        img.set_src(url);
        Ok(())
    }

    fn finish_image_load(&mut self, ticket: LoadTicket, img: HtmlImageElement) {
        let size = Size::new(f64::from(img.natural_width()), f64::from(img.natural_height()));
        if !self.core.accept_image(ticket, size) {
            return;
        }
        self.image = Some(img);
        self.redraw();
    }

    // --- Input events ---

    pub fn on_mouse(&mut self, ev: &MouseEvent, phase: PointerPhase) -> Vec<Action> {
        let client = Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
        self.route(&DeviceEvent::Mouse { phase, client }, ev.as_ref())
    }

    /// Feed `touchstart`/`touchmove`/`touchend` as `Down`/`Move`/`Up` and
    /// `touchcancel` as `Cancel`.
    pub fn on_touch(&mut self, ev: &TouchEvent, phase: PointerPhase) -> Vec<Action> {
        let event = DeviceEvent::Touch {
            phase,
            touches: touch_points(&ev.touches()),
            changed: touch_points(&ev.changed_touches()),
        };
        self.route(&event, ev.as_ref())
    }

    pub fn on_key_down(&mut self, ev: &KeyboardEvent) -> Vec<Action> {
        let modifiers = Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() };
        let actions = self.core.on_key_down(&Key(ev.key()), modifiers);
        if !actions.is_empty() {
            ev.prevent_default();
        }
        actions
    }

    fn route(&mut self, event: &DeviceEvent, raw: &web_sys::Event) -> Vec<Action> {
        let Some(pointer) = router::route(event) else {
            return Vec::new();
        };
        if pointer.prevent_default {
            raw.prevent_default();
        }
        let pt = self.canvas_bounds().to_canvas(pointer.client);
        match pointer.phase {
            PointerPhase::Down => self.core.on_pointer_down(pt),
            PointerPhase::Move => self.core.on_pointer_move(pt),
            PointerPhase::Up => self.core.on_pointer_up(pt),
            PointerPhase::Cancel => self.core.on_pointer_cancel(),
        }
    }

    fn canvas_bounds(&self) -> CanvasBounds {
        let r = self.canvas.get_bounding_client_rect();
        CanvasBounds {
            left: r.left(),
            top: r.top(),
            css_width: r.width(),
            css_height: r.height(),
            pixel_width: f64::from(self.canvas.width()),
            pixel_height: f64::from(self.canvas.height()),
        }
    }

    // --- Render ---

    /// Draw the current state to the canvas, resizing it to its container.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let Some(image) = self.image.as_ref() else {
            return Ok(());
        };
        let container_width = self.container_width()?;
        let Some(frame) = self.core.layout_frame(container_width) else {
            return Ok(());
        };

        self.canvas.set_width(to_px(frame.canvas.width));
        self.canvas.set_height(to_px(frame.canvas.height));
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, image, &frame)
    }

    /// Content width of the canvas's container: its client width less the
    /// computed horizontal padding.
    fn container_width(&self) -> Result<f64, JsValue> {
        let Some(parent) = self.canvas.parent_element() else {
            return Ok(f64::from(self.canvas.client_width()));
        };
        let client_width = f64::from(parent.client_width());
        let Some(window) = web_sys::window() else {
            return Ok(client_width);
        };
        let Some(style) = window.get_computed_style(&parent)? else {
            return Ok(client_width);
        };
        let left = render::parse_px(&style.get_property_value("padding-left")?);
        let right = render::parse_px(&style.get_property_value("padding-right")?);
        Ok(render::content_width(client_width, left, right))
    }

    /// Render, logging a failure. The previous frame stays on screen.
    pub fn redraw(&mut self) {
        if let Err(err) = self.render() {
            tracing::warn!(?err, "render failed");
        }
    }
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}
