//! Per-page interaction state
//!
//! A [`Session`] owns the body, camera, counters and every piece of transient
//! feedback. The renderer feeds it pointer presses and frame times and reads
//! back emissive writes, counter values and visible toasts.

use std::time::Duration;

use glam::Vec2;
use tracing::{debug, info};

use crate::body::{Body, NodeId};
use crate::color::Rgb;
use crate::config::{FeedbackConfig, StrainConfig};
use crate::counters::RegionCounters;
use crate::geometry::Ray;
use crate::orbit::OrbitCamera;
use crate::picking::{self, PerspectiveView, Viewport};
use crate::region::{classify, classify_label, Category, RegionEffect};
use crate::transient::{FieldPulses, HighlightTracker, Toasts};

/// Identifies a highlightable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKey {
    /// Segment of the procedural body
    Node(NodeId),
    /// Part of an imported model, keyed by the renderer
    External(u64),
}

/// What a press did
#[derive(Debug, Clone, PartialEq)]
pub struct PressOutcome {
    pub target: SegmentKey,
    pub label: String,
    pub effect: RegionEffect,
    pub counter_before: u8,
    pub counter_after: u8,
    /// Id of the toast that was shown
    pub toast: u64,
}

impl PressOutcome {
    pub fn incremented(&self) -> bool {
        self.counter_after > self.counter_before
    }
}

/// Hold times of the three feedback effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTimings {
    pub highlight: Duration,
    pub field_pulse: Duration,
    pub message: Duration,
}

impl Default for FeedbackTimings {
    fn default() -> Self {
        Self::from(&FeedbackConfig::default())
    }
}

impl From<&FeedbackConfig> for FeedbackTimings {
    fn from(config: &FeedbackConfig) -> Self {
        Self {
            highlight: config.highlight(),
            field_pulse: config.field_pulse(),
            message: config.message(),
        }
    }
}

/// Lens parameters shared by rendering and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: 50f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

pub struct Session {
    body: Body,
    camera: OrbitCamera,
    lens: Lens,
    viewport: Viewport,
    counters: RegionCounters,
    highlights: HighlightTracker<SegmentKey>,
    pulses: FieldPulses,
    toasts: Toasts,
    timings: FeedbackTimings,
    emissive_changes: Vec<(SegmentKey, Rgb)>,
}

impl Session {
    pub fn new(body: Body, config: &StrainConfig) -> Self {
        let camera_config = &config.camera;
        let mut camera = OrbitCamera::looking_at(camera_config.eye.into(), camera_config.target.into());
        camera.sensitivity = camera_config.sensitivity;
        camera.zoom_speed = camera_config.zoom_speed;
        camera.smooth_factor = camera_config.smooth_factor;
        camera.min_distance = camera_config.min_distance;
        camera.max_distance = camera_config.max_distance;

        info!(
            segments = body.segments().count(),
            counter_max = config.counters.max,
            "Session created"
        );

        Self {
            body,
            camera,
            lens: Lens {
                fov_y: config.fov_radians(),
                near: camera_config.near,
                far: camera_config.far,
            },
            viewport: Viewport::default(),
            counters: RegionCounters::with_max(config.counters.max),
            highlights: HighlightTracker::default(),
            pulses: FieldPulses::default(),
            toasts: Toasts::default(),
            timings: FeedbackTimings::from(&config.feedback),
            emissive_changes: Vec::new(),
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn lens(&self) -> Lens {
        self.lens
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Track the drawing surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.set_viewport(Viewport::sized(width, height));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(width = viewport.width, height = viewport.height, "Viewport resized");
            self.viewport = viewport;
        }
    }

    /// Current camera pose with the session lens
    pub fn view(&self) -> PerspectiveView {
        self.camera.view(self.lens.fov_y, self.lens.near, self.lens.far)
    }

    /// World ray under a pointer position
    pub fn pointer_ray(&self, pointer: Vec2) -> Option<Ray> {
        let ndc = self.viewport.to_ndc(pointer)?;
        self.view().ray_through_ndc(ndc, self.viewport.aspect())
    }

    pub fn counters(&self) -> &RegionCounters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut RegionCounters {
        &mut self.counters
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn field_pulsing(&self, category: Category) -> bool {
        self.pulses.is_pulsing(category)
    }

    pub fn is_highlighted(&self, key: SegmentKey) -> bool {
        self.highlights.is_active(key)
    }

    /// Press at a pointer position on the procedural body.
    /// A press that hits nothing changes nothing.
    pub fn press(&mut self, pointer: Vec2, now: Duration) -> Option<PressOutcome> {
        let hit = picking::hit_test(&self.body, &self.view(), &self.viewport, pointer)?;
        self.press_segment(hit.node, now)
    }

    /// Press on a known body segment
    pub fn press_segment(&mut self, node: NodeId, now: Duration) -> Option<PressOutcome> {
        let segment = self.body.segment(node)?;
        let effect = classify(segment.region);
        let current = segment.emissive;
        let label = self.body.display_label(node)?;
        Some(self.apply(SegmentKey::Node(node), label, effect, current, now))
    }

    /// Press on an imported-model part, classified by its name.
    ///
    /// `current` is the emissive color the part shows right now.
    pub fn press_external(&mut self, key: u64, label: &str, current: Rgb, now: Duration) -> Option<PressOutcome> {
        let effect = classify_label(label)?;
        Some(self.apply(SegmentKey::External(key), label.to_string(), effect, current, now))
    }

    fn apply(
        &mut self,
        target: SegmentKey,
        label: String,
        effect: RegionEffect,
        current: Rgb,
        now: Duration,
    ) -> PressOutcome {
        let category = effect.category;
        let counter_before = self.counters.get(category);
        if self.counters.increment(category) {
            self.pulses.start(category, now, self.timings.field_pulse);
        }
        let counter_after = self.counters.get(category);

        self.highlights.acquire(target, current, now, self.timings.highlight);
        self.write_emissive(target, effect.color);

        let toast = self.toasts.show(effect.message, now, self.timings.message);

        info!(
            label = %label,
            category = category.label(),
            before = counter_before,
            after = counter_after,
            "Strain recorded"
        );

        PressOutcome {
            target,
            label,
            effect,
            counter_before,
            counter_after,
            toast,
        }
    }

    fn write_emissive(&mut self, key: SegmentKey, color: Rgb) {
        if let SegmentKey::Node(node) = key {
            self.body.set_emissive(node, color);
        }
        self.emissive_changes.push((key, color));
    }

    /// Expire highlights, pulses and toasts due at `now`
    pub fn tick(&mut self, now: Duration) {
        for (key, color) in self.highlights.release_expired(now) {
            debug!(?key, %color, "Highlight restored");
            self.write_emissive(key, color);
        }
        self.pulses.expire(now);
        self.toasts.expire(now);
    }

    /// Emissive writes since the last call, oldest first
    pub fn take_emissive_changes(&mut self) -> Vec<(SegmentKey, Rgb)> {
        std::mem::take(&mut self.emissive_changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::build_body;
    use glam::Vec3;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session() -> Session {
        let mut session = Session::new(build_body(), &StrainConfig::default());
        session.resize(1280.0, 720.0);
        session
    }

    fn project(session: &Session, point: Vec3) -> Vec2 {
        let view = session.view();
        let viewport = session.viewport();
        let ndc = (view.projection_matrix(viewport.aspect()) * view.view_matrix()).project_point3(point);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc.y) * 0.5 * viewport.height,
        )
    }

    fn right_upper_arm(session: &Session) -> NodeId {
        session
            .body()
            .find_all("Arm/Upper")
            .find(|&id| session.body().display_label(id).as_deref() == Some("Arm/Upper (R)"))
            .unwrap()
    }

    #[test]
    fn test_head_click_records_eye_strain() {
        let mut session = session();
        let head = session.body().find("Head").unwrap();
        let point = session.body().world_translation(head).unwrap() - Vec3::new(0.0, 0.08, 0.0);
        let pointer = project(&session, point);

        let outcome = session.press(pointer, ms(0)).unwrap();
        assert_eq!(outcome.target, SegmentKey::Node(head));
        assert_eq!(outcome.effect.category, Category::EyeStrain);
        assert_eq!((outcome.counter_before, outcome.counter_after), (0, 1));
        assert_eq!(session.counters().get(Category::EyeStrain), 1);

        // Red flash, counter field pulse, message
        assert_eq!(session.take_emissive_changes(), vec![(SegmentKey::Node(head), Rgb::RED)]);
        assert_eq!(session.body().emissive(head), Some(Rgb::RED));
        assert!(session.field_pulsing(Category::EyeStrain));
        assert_eq!(session.toasts().iter().next().unwrap().text, "Eye Strain Recorded!");

        session.tick(ms(299));
        assert!(session.take_emissive_changes().is_empty());

        session.tick(ms(300));
        assert_eq!(session.take_emissive_changes(), vec![(SegmentKey::Node(head), Rgb::BLACK)]);
        assert_eq!(session.body().emissive(head), Some(Rgb::BLACK));
        assert!(!session.field_pulsing(Category::EyeStrain));
        assert_eq!(session.toasts().len(), 1);

        session.tick(ms(1000));
        assert!(session.toasts().is_empty());
    }

    #[test]
    fn test_arm_click_feeds_neck_counter() {
        let mut session = session();
        session.counters_mut().set(Category::Neck, 9);
        let arm = right_upper_arm(&session);

        let outcome = session.press_segment(arm, ms(0)).unwrap();
        assert_eq!(outcome.label, "Arm/Upper (R)");
        assert_eq!(outcome.effect.message, "Arm/Shoulder Strain -> Neck Input");
        assert_eq!(outcome.effect.color, Rgb::AMBER);
        assert!(outcome.incremented());
        assert_eq!(session.counters().get(Category::Neck), 10);
        assert!(session.field_pulsing(Category::Neck));
    }

    #[test]
    fn test_saturated_counter_still_gives_feedback() {
        let mut session = session();
        session.counters_mut().set(Category::Neck, 10);
        let arm = right_upper_arm(&session);

        let outcome = session.press_segment(arm, ms(0)).unwrap();
        assert!(!outcome.incremented());
        assert_eq!(session.counters().get(Category::Neck), 10);
        // Flash and message still happen, the field does not pulse
        assert_eq!(session.take_emissive_changes(), vec![(SegmentKey::Node(arm), Rgb::AMBER)]);
        assert_eq!(session.toasts().len(), 1);
        assert!(!session.field_pulsing(Category::Neck));
    }

    #[test]
    fn test_empty_space_changes_nothing() {
        let mut session = session();
        assert!(session.press(Vec2::new(5.0, 5.0), ms(0)).is_none());
        for category in Category::ALL {
            assert_eq!(session.counters().get(category), 0);
            assert!(!session.field_pulsing(category));
        }
        assert!(session.take_emissive_changes().is_empty());
        assert!(session.toasts().is_empty());
    }

    #[test]
    fn test_double_click_never_restores_stale_color() {
        let mut session = session();
        let neck = session.body().find("Neck").unwrap();

        session.press_segment(neck, ms(0)).unwrap();
        session.press_segment(neck, ms(200)).unwrap();
        assert_eq!(session.counters().get(Category::Neck), 2);
        assert_eq!(session.toasts().len(), 2);
        session.take_emissive_changes();

        // First hold would have ended here; the second press extended it
        session.tick(ms(300));
        assert!(session.take_emissive_changes().is_empty());
        assert_eq!(session.body().emissive(neck), Some(Rgb::AMBER));

        session.tick(ms(500));
        assert_eq!(session.take_emissive_changes(), vec![(SegmentKey::Node(neck), Rgb::BLACK)]);
        session.tick(ms(5000));
        assert!(session.take_emissive_changes().is_empty());
    }

    #[test]
    fn test_external_parts_classified_by_label() {
        let mut session = session();
        let prior = Rgb::from_hex(0x101010);

        let outcome = session.press_external(42, "mixamorig:LeftUpLeg", prior, ms(0)).unwrap();
        assert_eq!(outcome.target, SegmentKey::External(42));
        assert_eq!(outcome.effect.category, Category::Back);
        assert_eq!(session.counters().get(Category::Back), 1);

        session.tick(ms(300));
        assert_eq!(
            session.take_emissive_changes(),
            vec![(SegmentKey::External(42), Rgb::BLUE), (SegmentKey::External(42), prior)]
        );

        // Unclassifiable names do nothing
        assert!(session.press_external(7, "Scene_Root", Rgb::BLACK, ms(400)).is_none());
        assert_eq!(session.counters().get(Category::Back), 1);
    }

    #[test]
    fn test_config_drives_timings_and_ceiling() {
        let config = StrainConfig::from_toml("[feedback]\nhighlight_ms = 50\n[counters]\nmax = 1\n").unwrap();
        let mut session = Session::new(build_body(), &config);
        let spine = session.body().find("Back/Spine").unwrap();

        assert!(session.press_segment(spine, ms(0)).unwrap().incremented());
        assert!(!session.press_segment(spine, ms(10)).unwrap().incremented());
        session.take_emissive_changes();
        session.tick(ms(60));
        assert_eq!(session.take_emissive_changes(), vec![(SegmentKey::Node(spine), Rgb::BLACK)]);
    }

    #[test]
    fn test_pointer_ray_needs_viewport_area() {
        let mut session = session();
        assert!(session.pointer_ray(Vec2::new(640.0, 360.0)).is_some());
        session.resize(0.0, 0.0);
        assert!(session.pointer_ray(Vec2::new(640.0, 360.0)).is_none());
        assert!(session.press(Vec2::new(640.0, 360.0), ms(0)).is_none());
    }
}
