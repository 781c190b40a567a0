//! Two-way sync between the session counters and the host page's inputs
//!
//! The page keeps its own `<input>` fields for the three counters. Values
//! flow out whenever a counter changes, user edits flow back in, and the
//! field border pulses red alongside the in-canvas field.

use bevy::prelude::*;
use strainmap_core::{Category, RegionCounters};

#[cfg(target_arch = "wasm32")]
use strainmap_scene::{SessionResource, StrainSet, StrainSettings};

pub const PULSE_BORDER: &str = "2px solid red";
pub const IDLE_BORDER: &str = "1px solid gray";

pub struct FormBridgePlugin;

impl Plugin for FormBridgePlugin {
    #[cfg(target_arch = "wasm32")]
    fn build(&self, app: &mut App) {
        app.add_systems(Update, sync_form_fields.after(StrainSet::Feedback));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn build(&self, _app: &mut App) {}
}

/// What was last exchanged with one input element
#[derive(Debug, Clone, Default)]
pub struct FieldMirror {
    last_text: Option<String>,
    last_value: Option<u8>,
    pulsing: bool,
}

impl FieldMirror {
    /// Reconcile the element text with the counter.
    ///
    /// Text that differs from what was last seen is a user edit (or the first
    /// read) and is parsed leniently into the counter. Returns the text to
    /// write back when the counter moved since the last exchange.
    pub fn sync(&mut self, text: &str, counters: &mut RegionCounters, category: Category) -> Option<String> {
        if self.last_text.as_deref() != Some(text) {
            counters.set_from_field(category, text);
            self.last_text = Some(text.to_string());
            self.last_value = Some(counters.get(category));
        }

        let value = counters.get(category);
        if self.last_value == Some(value) {
            return None;
        }
        let written = value.to_string();
        self.last_text = Some(written.clone());
        self.last_value = Some(value);
        Some(written)
    }

    /// Border to apply when the pulse state flipped
    pub fn border(&mut self, pulsing: bool) -> Option<&'static str> {
        if pulsing == self.pulsing {
            return None;
        }
        self.pulsing = pulsing;
        Some(if pulsing { PULSE_BORDER } else { IDLE_BORDER })
    }
}

#[cfg(target_arch = "wasm32")]
fn sync_form_fields(
    mut session: ResMut<SessionResource>,
    settings: Res<StrainSettings>,
    mut mirrors: Local<[FieldMirror; 3]>,
) {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    for (mirror, category) in mirrors.iter_mut().zip(Category::ALL) {
        // Missing elements are skipped silently
        let Some(input) = document
            .get_element_by_id(settings.form.field_id(category))
            .and_then(|e| e.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            continue;
        };

        if let Some(text) = mirror.sync(&input.value(), session.counters_mut(), category) {
            input.set_value(&text);
        }

        if let Some(border) = mirror.border(session.field_pulsing(category)) {
            if let Err(err) = input.style().set_property("border", border) {
                tracing::debug!("Failed to set border on {}: {:?}", settings.form.field_id(category), err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_read_seeds_counter_without_rewrite() {
        let mut counters = RegionCounters::default();
        let mut mirror = FieldMirror::default();

        assert_eq!(mirror.sync("4", &mut counters, Category::Neck), None);
        assert_eq!(counters.get(Category::Neck), 4);

        // Empty field reads as 0 and is left as typed
        let mut mirror = FieldMirror::default();
        assert_eq!(mirror.sync("", &mut counters, Category::Back), None);
        assert_eq!(counters.get(Category::Back), 0);
    }

    #[test]
    fn test_counter_change_is_written_out() {
        let mut counters = RegionCounters::default();
        let mut mirror = FieldMirror::default();
        mirror.sync("2", &mut counters, Category::EyeStrain);

        counters.increment(Category::EyeStrain);
        assert_eq!(mirror.sync("2", &mut counters, Category::EyeStrain).as_deref(), Some("3"));
        // Element now shows what was written
        assert_eq!(mirror.sync("3", &mut counters, Category::EyeStrain), None);
    }

    #[test]
    fn test_user_edit_flows_in_leniently() {
        let mut counters = RegionCounters::default();
        let mut mirror = FieldMirror::default();
        mirror.sync("1", &mut counters, Category::Neck);

        assert_eq!(mirror.sync("7 days", &mut counters, Category::Neck), None);
        assert_eq!(counters.get(Category::Neck), 7);

        // Out of range input is clamped; the typed text stays until the counter moves
        mirror.sync("7", &mut counters, Category::Neck);
        assert_eq!(mirror.sync("99", &mut counters, Category::Neck), None);
        assert_eq!(counters.get(Category::Neck), 10);
    }

    #[test]
    fn test_border_follows_pulse_transitions() {
        let mut mirror = FieldMirror::default();
        assert_eq!(mirror.border(false), None);
        assert_eq!(mirror.border(true), Some(PULSE_BORDER));
        assert_eq!(mirror.border(true), None);
        assert_eq!(mirror.border(false), Some(IDLE_BORDER));
    }
}
