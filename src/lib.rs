//! Geometry editing engine for the projection control panel.
//!
//! This crate is compiled to WebAssembly and runs in the browser. An operator
//! places one rect per (client, display) pair over a reference image and
//! calibrates a four-point quad per display. The engine owns coordinate
//! conversion, hit-testing, the drag state machines, input normalization, and
//! drawing. The host page is responsible only for wiring DOM events to the
//! engine, fetching client configuration, and pushing the resulting
//! [`engine::Action::ConfigReady`] payloads back to the config service.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Clients, rect assignments, quads, and the layout store |
//! | [`space`] | Normalized / logical / pixel conversions and letterbox fit |
//! | [`hit`] | Hit-testing of rect parts and quad points |
//! | [`rect_drag`] | Rect drag controller |
//! | [`quad_drag`] | Homography quad drag and keyboard nudge controller |
//! | [`input`] | Editor modes, keys, modifiers, and the drag session |
//! | [`router`] | Mouse/touch normalization into canvas pixels |
//! | [`render`] | Frame description and canvas drawing |
//! | [`loader`] | Generation-checked background image loading |
//! | [`config`] | Host-supplied editor configuration |
//! | [`consts`] | Shared numeric constants (hit radii, nudge steps, defaults) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod loader;
pub mod quad_drag;
pub mod rect_drag;
pub mod render;
pub mod router;
pub mod space;
