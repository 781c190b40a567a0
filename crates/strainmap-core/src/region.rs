//! Body regions, strain categories and the click classifier

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Anatomical tag attached to every segment when the body is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRegion {
    Head,
    Eye,
    Neck,
    Torso,
    Back,
    Arm,
    Leg,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 7] = [
        BodyRegion::Head,
        BodyRegion::Eye,
        BodyRegion::Neck,
        BodyRegion::Torso,
        BodyRegion::Back,
        BodyRegion::Arm,
        BodyRegion::Leg,
    ];

    /// Derive a region from a free-form node name.
    ///
    /// Only used for meshes that were not built with a tag (imported models).
    /// Rules are checked in a fixed order and the first hit wins, so a name
    /// containing both "Back" and "Leg" is a back part:
    /// 1. "Head" or "Eye"
    /// 2. "Neck"
    /// 3. "Back", "Torso" or "Chest"
    /// 4. "Arm"
    /// 5. "Leg"
    pub fn from_label(label: &str) -> Option<Self> {
        if label.contains("Head") {
            Some(BodyRegion::Head)
        } else if label.contains("Eye") {
            Some(BodyRegion::Eye)
        } else if label.contains("Neck") {
            Some(BodyRegion::Neck)
        } else if label.contains("Back") {
            Some(BodyRegion::Back)
        } else if label.contains("Torso") || label.contains("Chest") {
            Some(BodyRegion::Torso)
        } else if label.contains("Arm") {
            Some(BodyRegion::Arm)
        } else if label.contains("Leg") {
            Some(BodyRegion::Leg)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyRegion::Head => "Head",
            BodyRegion::Eye => "Eye",
            BodyRegion::Neck => "Neck",
            BodyRegion::Torso => "Torso",
            BodyRegion::Back => "Back",
            BodyRegion::Arm => "Arm",
            BodyRegion::Leg => "Leg",
        }
    }
}

/// Form counter a region feeds into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Neck,
    Back,
    EyeStrain,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Neck, Category::Back, Category::EyeStrain];

    /// Emissive flash color for hits routed to this counter
    pub fn highlight_color(self) -> Rgb {
        match self {
            Category::EyeStrain => Rgb::RED,
            Category::Neck => Rgb::AMBER,
            Category::Back => Rgb::BLUE,
        }
    }

    /// Form field caption
    pub fn label(self) -> &'static str {
        match self {
            Category::Neck => "Neck pain",
            Category::Back => "Back pain",
            Category::EyeStrain => "Eye strain",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Neck => 0,
            Category::Back => 1,
            Category::EyeStrain => 2,
        }
    }
}

/// Everything a click on a region should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEffect {
    pub region: BodyRegion,
    pub category: Category,
    pub color: Rgb,
    pub message: &'static str,
}

/// Map a region tag to its counter, flash color and feedback message.
///
/// Arms feed the neck counter (shoulder tension) and legs feed the back
/// counter (sitting posture); the form only has three fields.
pub fn classify(region: BodyRegion) -> RegionEffect {
    let (category, message) = match region {
        BodyRegion::Head | BodyRegion::Eye => (Category::EyeStrain, "Eye Strain Recorded!"),
        BodyRegion::Neck => (Category::Neck, "Neck Pain Recorded!"),
        BodyRegion::Torso | BodyRegion::Back => (Category::Back, "Back Pain Recorded!"),
        BodyRegion::Arm => (Category::Neck, "Arm/Shoulder Strain -> Neck Input"),
        BodyRegion::Leg => (Category::Back, "Leg Strain -> Back Input"),
    };

    RegionEffect {
        region,
        category,
        color: category.highlight_color(),
        message,
    }
}

/// Classify an untagged name; `None` means the click has no effect
pub fn classify_label(label: &str) -> Option<RegionEffect> {
    BodyRegion::from_label(label).map(classify)
}
