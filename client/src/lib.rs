//! # client
//!
//! Browser front end for the campus portal, rendered client-side with Leptos.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session, token and API behavior live in the `campus` crate. This crate
//! plugs in the browser pieces (`localStorage`, `fetch`, timers), mirrors the
//! session into a reactive signal, and renders role-guarded dashboards.
//!
//! Native builds (no `csr` feature) compile the same modules with inert
//! browser stubs so the pure helpers can be unit-tested off-wasm.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic/log bridges and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
