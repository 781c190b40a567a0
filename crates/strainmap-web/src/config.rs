//! Configuration for the browser build: embedded TOML plus page parameters

use anyhow::{Context, Result};
use strainmap_core::StrainConfig;

const EMBEDDED_CONFIG: &str = include_str!("../strainmap.toml");

/// Embedded configuration with the `?model=` override applied.
/// Falls back to defaults if the embedded document is unusable.
pub fn load_config() -> StrainConfig {
    let mut config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Invalid embedded configuration, using defaults: {:#}", err);
            StrainConfig::default()
        }
    };
    apply_model_override(&mut config, model_param());
    config
}

fn parse_config(content: &str) -> Result<StrainConfig> {
    StrainConfig::from_toml(content).context("Failed to load embedded strainmap.toml")
}

/// Replace the figure model path with a non-blank page parameter
fn apply_model_override(config: &mut StrainConfig, model: Option<String>) {
    if let Some(model) = model.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
        tracing::info!("Using figure model from page URL: {}", model);
        config.figure.model_path = Some(model);
    }
}

#[cfg(target_arch = "wasm32")]
fn model_param() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get("model")
}

#[cfg(not(target_arch = "wasm32"))]
fn model_param() -> Option<String> {
    None
}
