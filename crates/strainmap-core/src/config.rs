//! Viewer configuration loading and validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::counters::DEFAULT_MAX;
use crate::region::Category;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrainConfig {
    #[serde(default)]
    pub figure: FigureConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub counters: CountersConfig,
    #[serde(default)]
    pub form: FormConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Optional glTF asset; the procedural body is used when absent or broken
    #[serde(default)]
    pub model_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_eye")]
    pub eye: [f32; 3],
    #[serde(default = "default_target")]
    pub target: [f32; 3],
    /// Damping rate of the orbit controls (higher settles faster)
    #[serde(default = "default_smooth_factor")]
    pub smooth_factor: f32,
    /// Radians per dragged pixel
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            eye: default_eye(),
            target: default_target(),
            smooth_factor: default_smooth_factor(),
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

fn default_fov() -> f32 {
    50.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_eye() -> [f32; 3] {
    [0.0, 1.5, 3.0]
}

fn default_target() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_smooth_factor() -> f32 {
    0.15
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

fn default_min_distance() -> f32 {
    0.5
}

fn default_max_distance() -> f32 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Emissive flash on the clicked segment
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
    /// Outline pulse on the counter field
    #[serde(default = "default_field_pulse_ms")]
    pub field_pulse_ms: u64,
    /// Floating message lifetime
    #[serde(default = "default_message_ms")]
    pub message_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            highlight_ms: default_highlight_ms(),
            field_pulse_ms: default_field_pulse_ms(),
            message_ms: default_message_ms(),
        }
    }
}

impl FeedbackConfig {
    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn field_pulse(&self) -> Duration {
        Duration::from_millis(self.field_pulse_ms)
    }

    pub fn message(&self) -> Duration {
        Duration::from_millis(self.message_ms)
    }
}

fn default_highlight_ms() -> u64 {
    300
}

fn default_field_pulse_ms() -> u64 {
    300
}

fn default_message_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountersConfig {
    /// Ceiling for every counter
    #[serde(default = "default_max")]
    pub max: u8,
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self { max: default_max() }
    }
}

fn default_max() -> u8 {
    DEFAULT_MAX
}

/// Element ids of the host page's counter inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_neck_field")]
    pub neck_field: String,
    #[serde(default = "default_back_field")]
    pub back_field: String,
    #[serde(default = "default_eye_field")]
    pub eye_field: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            neck_field: default_neck_field(),
            back_field: default_back_field(),
            eye_field: default_eye_field(),
        }
    }
}

impl FormConfig {
    pub fn field_id(&self, category: Category) -> &str {
        match category {
            Category::Neck => &self.neck_field,
            Category::Back => &self.back_field,
            Category::EyeStrain => &self.eye_field,
        }
    }
}

fn default_neck_field() -> String {
    "neckInput".to_string()
}

fn default_back_field() -> String {
    "backInput".to_string()
}

fn default_eye_field() -> String {
    "eyeInput".to_string()
}

impl StrainConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StrainConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_toml(&content)?;
            info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        } else {
            info!(
                path = %path.display(),
                "Configuration file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", format!("{} is outside (0, 180)", camera.fov_degrees)));
        }
        if !(camera.near > 0.0) {
            return Err(invalid("camera.near", format!("{} must be positive", camera.near)));
        }
        if !(camera.far > camera.near) {
            return Err(invalid("camera.far", format!("{} must exceed near ({})", camera.far, camera.near)));
        }
        if camera.eye == camera.target {
            return Err(invalid("camera.eye", "eye and target coincide".to_string()));
        }
        if !(camera.min_distance > 0.0 && camera.max_distance >= camera.min_distance) {
            return Err(invalid(
                "camera.min_distance",
                format!("range [{}, {}] is empty", camera.min_distance, camera.max_distance),
            ));
        }
        if self.counters.max == 0 {
            return Err(invalid("counters.max", "must be at least 1".to_string()));
        }
        if let Some(path) = &self.figure.model_path {
            if path.trim().is_empty() {
                return Err(invalid("figure.model_path", "empty path".to_string()));
            }
        }
        Ok(())
    }

    /// Vertical field of view in radians
    pub fn fov_radians(&self) -> f32 {
        self.camera.fov_degrees.to_radians()
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
