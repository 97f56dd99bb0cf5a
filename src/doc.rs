//! Document model: clients, displays, rect assignments, calibration quads,
//! and the in-memory store that owns them.
//!
//! Data flows into this layer from the config service (JSON deserialization
//! via [`parse_clients`]) and from the drag controllers (live mutation of
//! rects and quad points). Rects are stored in each client's logical space;
//! the renderer derives pixel geometry from them and never writes it back.
//! [`LayoutStore::export_client_config`] produces the payload the host pushes
//! back to the config service.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_RECT_CLIENT_STAGGER, DEFAULT_RECT_DISPLAY_STAGGER, DEFAULT_RECT_ORIGIN, DEFAULT_RECT_WIDTH,
};
use crate::space::{Point, Size};

/// Error returned by [`parse_clients`].
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The payload is not a client list in any accepted shape.
    #[error("invalid client list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Axis-aligned rectangle. `w` and `h` may be negative after a drag through
/// the opposite edge; the stored values are always read literally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl AsRef<Rect> for Rect {
    fn as_ref(&self) -> &Rect {
        self
    }
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The same area with non-negative width and height.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            x: self.x.min(self.x + self.w),
            y: self.y.min(self.y + self.h),
            w: self.w.abs(),
            h: self.h.abs(),
        }
    }
}

/// A display attached to a client device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayDescriptor {
    pub name: String,
    #[serde(default)]
    pub resolution: Option<Size>,
    #[serde(default)]
    pub status: String,
}

impl DisplayDescriptor {
    /// The display resolution, or `fallback` when it is absent or non-positive.
    #[must_use]
    pub fn effective_resolution(&self, fallback: Size) -> Size {
        match self.resolution {
            Some(r) if r.is_positive() => r,
            _ => fallback,
        }
    }
}

/// A stored rect for one display, as it appears in a client config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub display_output: String,
    pub rect: Rect,
}

/// A stored calibration for one display.
///
/// Quads round-trip through `matrix` as four `[x, y]` rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Homography {
    pub matrix: Vec<Vec<f64>>,
}

/// Per-client configuration as exchanged with the config service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub client_id: String,
    pub assignments: Vec<Assignment>,
    pub displays: Vec<DisplayDescriptor>,
    pub homographies: BTreeMap<String, Homography>,
    /// Logical extent the client's rects were authored in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    pub is_connected: bool,
}

/// A client device known to the config service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    #[serde(default)]
    pub config: Option<ClientConfig>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClientListPayload {
    Connected { connected: Vec<Client> },
    Bare(Vec<Client>),
}

/// Decode the config service's client list. Accepts `{"connected": [...]}` or
/// a bare array.
///
/// # Errors
///
/// Returns [`DocError::Decode`] if the payload matches neither shape.
pub fn parse_clients(json: &str) -> Result<Vec<Client>, DocError> {
    Ok(match serde_json::from_str::<ClientListPayload>(json)? {
        ClientListPayload::Connected { connected } => connected,
        ClientListPayload::Bare(clients) => clients,
    })
}

/// One rect bound to one (client, display) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectAssignment {
    pub client_id: String,
    pub display_output: String,
    pub rect: Rect,
}

impl AsRef<Rect> for RectAssignment {
    fn as_ref(&self) -> &Rect {
        &self.rect
    }
}

impl RectAssignment {
    /// Identity key: `client_id-display_output`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}-{}", self.client_id, self.display_output)
    }
}

/// Identifies the calibration quad of one display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadKey {
    pub client_id: String,
    pub display: String,
}

impl QuadKey {
    #[must_use]
    pub fn new(client_id: impl Into<String>, display: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), display: display.into() }
    }
}

/// Four calibration corners in normalized space, or nothing yet.
///
/// Once initialized the quad always holds exactly four points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedQuad {
    points: Option<[Point; 4]>,
}

impl NormalizedQuad {
    /// An uninitialized quad.
    #[must_use]
    pub fn empty() -> Self {
        Self { points: None }
    }

    #[must_use]
    pub fn from_points(points: [Point; 4]) -> Self {
        Self { points: Some(points) }
    }

    /// Parse a stored matrix of four `[x, y]` rows. Anything else is rejected.
    #[must_use]
    pub fn from_matrix(matrix: &[Vec<f64>]) -> Option<Self> {
        if matrix.len() != 4 {
            return None;
        }
        let mut points = [Point::default(); 4];
        for (slot, row) in points.iter_mut().zip(matrix) {
            let [x, y] = row.as_slice() else {
                return None;
            };
            *slot = Point::new(*x, *y);
        }
        Some(Self::from_points(points))
    }

    /// Four `[x, y]` rows, or an empty matrix when uninitialized.
    #[must_use]
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.points
            .map(|pts| pts.iter().map(|p| vec![p.x, p.y]).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.points.is_some()
    }

    /// Number of stored points: 0 or 4.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.points.is_some() { 4 } else { 0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_none()
    }

    #[must_use]
    pub fn points(&self) -> Option<&[Point; 4]> {
        self.points.as_ref()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.and_then(|pts| pts.get(index).copied())
    }

    /// Overwrite one point. Returns false when uninitialized or out of range.
    pub fn set(&mut self, index: usize, point: Point) -> bool {
        let Some(slot) = self.points.as_mut().and_then(|pts| pts.get_mut(index)) else {
            return false;
        };
        *slot = point;
        true
    }

    /// Fill an uninitialized quad. Returns false if it already holds points.
    pub fn initialize(&mut self, points: [Point; 4]) -> bool {
        if self.points.is_some() {
            return false;
        }
        self.points = Some(points);
        true
    }
}

/// Default rect for a display without an assignment: 150 wide, height from
/// the display aspect ratio, staggered by display and client index.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn default_rect(display_index: usize, client_index: usize, resolution: Size) -> Rect {
    let aspect = resolution.width / resolution.height;
    let origin = DEFAULT_RECT_ORIGIN
        + display_index as f64 * DEFAULT_RECT_DISPLAY_STAGGER
        + client_index as f64 * DEFAULT_RECT_CLIENT_STAGGER;
    Rect::new(origin, origin, DEFAULT_RECT_WIDTH, DEFAULT_RECT_WIDTH / aspect)
}

/// In-memory store of clients, their rects, logical canvas sizes, and quads.
#[derive(Debug, Default)]
pub struct LayoutStore {
    clients: Vec<Client>,
    rects: Vec<RectAssignment>,
    canvas_sizes: HashMap<String, Size>,
    quads: BTreeMap<QuadKey, NormalizedQuad>,
    selected_client: Option<String>,
}

impl LayoutStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all state with a freshly fetched client list.
    ///
    /// Clients with assignments get one rect per assignment; clients without
    /// get a synthesized rect per display. Stored canvas sizes and 4-point
    /// homographies are carried over.
    pub fn load_clients(&mut self, clients: Vec<Client>, default_resolution: Size) {
        self.rects.clear();
        self.canvas_sizes.clear();
        self.quads.clear();

        for (client_index, client) in clients.iter().enumerate() {
            let Some(config) = client.config.as_ref() else {
                continue;
            };
            if config.assignments.is_empty() {
                for (display_index, display) in config.displays.iter().enumerate() {
                    let resolution = display.effective_resolution(default_resolution);
                    self.rects.push(RectAssignment {
                        client_id: client.client_id.clone(),
                        display_output: display.name.clone(),
                        rect: default_rect(display_index, client_index, resolution),
                    });
                }
            } else {
                self.rects.extend(config.assignments.iter().map(|a| RectAssignment {
                    client_id: client.client_id.clone(),
                    display_output: a.display_output.clone(),
                    rect: a.rect,
                }));
            }

            if let Some(size) = config.canvas_size.filter(|s| s.is_positive()) {
                self.canvas_sizes.insert(client.client_id.clone(), size);
            }

            for (output, homography) in &config.homographies {
                match NormalizedQuad::from_matrix(&homography.matrix) {
                    Some(quad) => {
                        self.quads.insert(QuadKey::new(&client.client_id, output), quad);
                    }
                    None => tracing::debug!(
                        client_id = %client.client_id,
                        display = %output,
                        "ignoring homography that is not a 4-point quad"
                    ),
                }
            }
        }

        if let Some(selected) = self.selected_client.as_ref() {
            if !clients.iter().any(|c| &c.client_id == selected) {
                self.selected_client = None;
            }
        }
        self.clients = clients;
    }

    // --- Clients ---

    #[must_use]
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    #[must_use]
    pub fn client(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.client_id == client_id)
    }

    /// Select a client. Returns false if no such client is loaded.
    pub fn select_client(&mut self, client_id: &str) -> bool {
        if self.client(client_id).is_none() {
            return false;
        }
        self.selected_client = Some(client_id.to_owned());
        true
    }

    #[must_use]
    pub fn selected_client(&self) -> Option<&str> {
        self.selected_client.as_deref()
    }

    /// Whether the rect at `index` belongs to the selected client.
    #[must_use]
    pub fn is_rect_from_selected_client(&self, index: usize) -> bool {
        match (self.selected_client.as_deref(), self.rects.get(index)) {
            (Some(selected), Some(r)) => r.client_id == selected,
            _ => false,
        }
    }

    /// Rects of the selected client, in store order.
    #[must_use]
    pub fn rects_for_selected_client(&self) -> Vec<&RectAssignment> {
        let Some(selected) = self.selected_client.as_deref() else {
            return Vec::new();
        };
        self.rects.iter().filter(|r| r.client_id == selected).collect()
    }

    // --- Rects ---

    #[must_use]
    pub fn rects(&self) -> &[RectAssignment] {
        &self.rects
    }

    #[must_use]
    pub fn rect(&self, index: usize) -> Option<&RectAssignment> {
        self.rects.get(index)
    }

    pub fn rect_mut(&mut self, index: usize) -> Option<&mut RectAssignment> {
        self.rects.get_mut(index)
    }

    /// Replace the rect with the same identity key. Returns false if none matches.
    pub fn update_rect(&mut self, updated: RectAssignment) -> bool {
        let id = updated.id();
        let Some(slot) = self.rects.iter_mut().find(|r| r.id() == id) else {
            return false;
        };
        *slot = updated;
        true
    }

    /// Remove the rect at `index`, returning it if it was present.
    pub fn delete_rect(&mut self, index: usize) -> Option<RectAssignment> {
        (index < self.rects.len()).then(|| self.rects.remove(index))
    }

    /// Remove the rect with identity key `id`, returning it if it was present.
    pub fn delete_rect_by_id(&mut self, id: &str) -> Option<RectAssignment> {
        let index = self.rects.iter().position(|r| r.id() == id)?;
        self.delete_rect(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    // --- Logical canvas sizes ---

    #[must_use]
    pub fn canvas_size(&self, client_id: &str) -> Option<Size> {
        self.canvas_sizes.get(client_id).copied()
    }

    /// The client's logical size, set to `current` on first use.
    pub fn ensure_canvas_size(&mut self, client_id: &str, current: Size) -> Size {
        *self
            .canvas_sizes
            .entry(client_id.to_owned())
            .or_insert(current)
    }

    // --- Quads ---

    #[must_use]
    pub fn quad(&self, key: &QuadKey) -> Option<&NormalizedQuad> {
        self.quads.get(key)
    }

    /// The quad for `key`, created uninitialized if missing.
    pub fn quad_mut(&mut self, key: &QuadKey) -> &mut NormalizedQuad {
        self.quads.entry(key.clone()).or_default()
    }

    // --- Export ---

    /// Build the config to push back for `client_id`: the loaded config with
    /// assignments, homographies, and logical canvas size replaced by the
    /// current editor state.
    #[must_use]
    pub fn export_client_config(&self, client_id: &str) -> Option<ClientConfig> {
        let client = self.client(client_id)?;
        let mut config = client.config.clone().unwrap_or_default();
        config.client_id = client_id.to_owned();
        config.assignments = self
            .rects
            .iter()
            .filter(|r| r.client_id == client_id)
            .map(|r| Assignment { display_output: r.display_output.clone(), rect: r.rect })
            .collect();
        for (key, quad) in self.quads.range(QuadKey::new(client_id, "")..) {
            if key.client_id != client_id {
                break;
            }
            if quad.is_initialized() {
                config
                    .homographies
                    .insert(key.display.clone(), Homography { matrix: quad.to_matrix() });
            }
        }
        if let Some(size) = self.canvas_size(client_id) {
            config.canvas_size = Some(size);
        }
        Some(config)
    }
}
