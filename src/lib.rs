//! Viewport and manipulation engine for a grid-snapped map editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive part of the editor canvas: translating pointer, wheel and key
//! input into camera changes and object edits, snapping everything to the
//! grid, hit-testing objects and resize handles, and rendering the scene. The
//! host JavaScript layer wires DOM events to the engine, drives the frame
//! loop, and reacts to the returned [`engine::Action`]s (menus, persistence).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Object store, categories and map rectangle types |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`snap`] | Grid snapping |
//! | [`hit`] | Hit-testing against handles and objects |
//! | [`selection`] | Selected object, category, and corner handles |
//! | [`input`] | Input event types and the drag/resize engine |
//! | [`render`] | Scene rendering behind the [`render::Surface`] trait |
//! | [`color`] | Hex colors and HSB shading |
//! | [`exchange`] | JSON import/export of layouts |
//! | [`config`] | Editor tunables |
//! | [`logging`] | Tracing subscriber setup |
//! | [`consts`] | Shared numeric constants (zoom limits, snap unit, etc.) |

pub mod camera;
pub mod color;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod exchange;
pub mod hit;
pub mod input;
pub mod logging;
pub mod render;
pub mod selection;
pub mod snap;
