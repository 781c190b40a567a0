//! Packed RGB colors used for materials and highlight signals

use serde::{Deserialize, Serialize};

/// 24-bit `0xRRGGBB` color
///
/// Serializes as a plain integer, so TOML documents can write `0xff0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const RED: Rgb = Rgb(0xff0000);
    pub const AMBER: Rgb = Rgb(0xffaa00);
    pub const BLUE: Rgb = Rgb(0x0000ff);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// Channel bytes as (r, g, b)
    pub const fn bytes(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    /// Channels normalized to `0.0..=1.0` (sRGB encoded)
    pub fn to_array(self) -> [f32; 3] {
        let (r, g, b) = self.bytes();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Quantize normalized channels back into a packed color
    pub fn from_array(channels: [f32; 3]) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        Self((q(channels[0]) << 16) | (q(channels[1]) << 8) | q(channels[2]))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        assert_eq!(Rgb::AMBER.bytes(), (0xff, 0xaa, 0x00));
        let [r, g, b] = Rgb::from_hex(0xcd5c5c).to_array();
        assert!((r - 205.0 / 255.0).abs() < 1e-6);
        assert!((g - 92.0 / 255.0).abs() < 1e-6);
        assert!((b - 92.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_array_quantizes() {
        assert_eq!(Rgb::from_array([1.0, 0.0, 0.0]), Rgb::RED);
        assert_eq!(Rgb::from_array(Rgb::from_hex(0x333333).to_array()), Rgb(0x333333));
        // Out-of-range channels clamp instead of bleeding into neighbours
        assert_eq!(Rgb::from_array([2.0, -1.0, 0.0]), Rgb::RED);
    }

    #[test]
    fn test_display_and_mask() {
        assert_eq!(Rgb::from_hex(0xff12_3456).to_string(), "#123456");
    }
}
