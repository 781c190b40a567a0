//! Strainmap Web - browser frontend for the body strain viewer
//!
//! This crate provides the WASM entry point, the Bevy app and the bridge to
//! the host page's form inputs.

mod app;
mod config;
mod form_bridge;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let config = config::load_config();

    // Run the Bevy app
    app::run(config);
}
