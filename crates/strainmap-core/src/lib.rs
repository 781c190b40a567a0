//! Strainmap Core - Body model, picking, and strain feedback state
//!
//! This crate holds everything that does not need a renderer:
//! - Procedural humanoid body built from tagged primitive segments
//! - Analytic ray intersection and pointer hit testing
//! - Damped orbit camera model shared by rendering and picking
//! - Region classification, bounded counters and exercise suggestions
//! - Scoped transient feedback (highlights, field pulses, toasts)
//! - The per-page `Session` context and TOML configuration

pub mod assessment;
pub mod body;
pub mod color;
pub mod config;
pub mod counters;
pub mod geometry;
pub mod orbit;
pub mod picking;
pub mod region;
pub mod session;
pub mod transient;

pub use assessment::{recommended_exercises, Exercise};
pub use body::{build_body, Body, BodyNode, Hit, MaterialDef, MaterialPalette, NodeId, NodeKind, Segment, Side, SurfaceKind};
pub use color::Rgb;
pub use config::{ConfigError, StrainConfig};
pub use counters::{parse_field_value, RegionCounters};
pub use geometry::{Ray, Shape};
pub use orbit::OrbitCamera;
pub use picking::{hit_test, PerspectiveView, Viewport};
pub use region::{classify, classify_label, BodyRegion, Category, RegionEffect};
pub use session::{FeedbackTimings, Lens, PressOutcome, SegmentKey, Session};
pub use transient::{Deadlines, FieldPulses, HighlightTracker, Toast, Toasts};
